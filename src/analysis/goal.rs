//! Goal attainment analyzer.

use crate::models::{AnalyzerKind, Finding, GoalData, RiskLevel, Subject};

pub const LOW_COMPLETION: &str = "Low sprint completion rate";
pub const BEHIND_VELOCITY: &str = "Behind velocity";
pub const EXCEEDING_GOALS: &str = "Exceeding goals";
pub const NO_GOALS: &str = "No sprint goals defined";

/// Produce one finding per goal record, in input order.
///
/// Records with zero sprint goals skip the completion-rate checks.
pub fn analyze(records: &[GoalData]) -> Vec<Finding> {
    records.iter().map(analyze_member).collect()
}

fn analyze_member(data: &GoalData) -> Finding {
    let mut finding = Finding::new(AnalyzerKind::Goal, Subject::Member(data.member_id.clone()));
    let completion_rate = data.completion_rate();

    match completion_rate {
        Some(rate) if rate < 0.5 => {
            finding.note(LOW_COMPLETION, "Review sprint commitments");
            finding.escalate(RiskLevel::High);
        }
        Some(_) => {}
        None => finding.note(NO_GOALS, "Set measurable sprint goals"),
    }

    if data.velocity < data.expected_completion {
        finding.note(BEHIND_VELOCITY, "Assess task complexity");
        finding.escalate(RiskLevel::Medium);
    }

    if completion_rate.is_some_and(|rate| rate > 0.9) {
        finding.note(EXCEEDING_GOALS, "Increase sprint capacity");
    }

    finding
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goals(sprint_goals: u32, completed_goals: u32, velocity: f64, expected: f64) -> GoalData {
        GoalData {
            member_id: "bob".to_string(),
            sprint_goals,
            completed_goals,
            velocity,
            story_points: 20,
            expected_completion: expected,
        }
    }

    #[test]
    fn test_low_completion_is_high_risk() {
        let findings = analyze(&[goals(10, 4, 0.9, 0.8)]);
        assert_eq!(findings[0].risk, RiskLevel::High);
        assert_eq!(findings[0].flags, vec![LOW_COMPLETION]);
    }

    #[test]
    fn test_behind_velocity_keeps_high() {
        let findings = analyze(&[goals(10, 4, 0.5, 0.8)]);
        assert_eq!(findings[0].risk, RiskLevel::High);
        assert_eq!(findings[0].flags, vec![LOW_COMPLETION, BEHIND_VELOCITY]);
    }

    #[test]
    fn test_behind_velocity_alone_is_medium() {
        let findings = analyze(&[goals(6, 4, 0.67, 0.7)]);
        assert_eq!(findings[0].risk, RiskLevel::Medium);
        assert_eq!(findings[0].recommendations, vec!["Assess task complexity"]);
    }

    #[test]
    fn test_exceeding_goals_regardless_of_velocity() {
        for velocity in [0.1, 0.9, 5.0] {
            let findings = analyze(&[goals(10, 10, velocity, 1.0)]);
            assert!(findings[0].has_flag(EXCEEDING_GOALS));
        }
        let findings = analyze(&[goals(10, 10, 2.0, 1.0)]);
        assert_eq!(findings[0].risk, RiskLevel::Low);
    }

    #[test]
    fn test_zero_goals_skips_rate_checks() {
        let findings = analyze(&[goals(0, 0, 0.5, 0.8)]);
        let finding = &findings[0];
        assert_eq!(finding.flags, vec![NO_GOALS, BEHIND_VELOCITY]);
        assert_eq!(finding.risk, RiskLevel::Medium);
        assert!(!finding.has_flag(LOW_COMPLETION));
    }
}
