//! Wellbeing analyzer over daily check-ins.

use crate::models::{AnalyzerKind, DailyUpdate, Finding, RiskLevel, Subject};

pub const HIGH_STRESS: &str = "High stress levels detected";
pub const MULTIPLE_BLOCKERS: &str = "Multiple blockers";
pub const EXTENDED_HOURS: &str = "Extended working hours";
pub const NEGATIVE_SENTIMENT: &str = "Negative sentiment in feedback";

/// Words in a comment that signal distress.
const NEGATIVE_KEYWORDS: [&str; 4] = ["overwhelmed", "tired", "stressed", "frustrated"];

/// Produce one finding per daily update, in input order.
pub fn analyze(updates: &[DailyUpdate]) -> Vec<Finding> {
    updates.iter().map(analyze_update).collect()
}

fn analyze_update(update: &DailyUpdate) -> Finding {
    let mut finding = Finding::new(
        AnalyzerKind::Wellbeing,
        Subject::Member(update.member_id.clone()),
    );

    if update.mood.is_high_stress() {
        finding.note(HIGH_STRESS, "Schedule 1:1 and reduce load");
        finding.escalate(RiskLevel::High);
    }

    if update.blockers.len() > 2 {
        finding.note(MULTIPLE_BLOCKERS, "Resolve blockers");
        finding.escalate(RiskLevel::Medium);
    }

    if update.working_hours > 9 {
        finding.note(EXTENDED_HOURS, "Monitor hours");
        finding.escalate(RiskLevel::Medium);
    }

    if has_negative_sentiment(&update.comments) {
        finding.note(NEGATIVE_SENTIMENT, "Immediate support required");
        finding.escalate(RiskLevel::High);
    }

    finding
}

fn has_negative_sentiment(comment: &str) -> bool {
    let comment = comment.to_lowercase();
    NEGATIVE_KEYWORDS.iter().any(|kw| comment.contains(kw))
}
