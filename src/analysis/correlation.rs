//! Cross-dimension correlation.
//!
//! Combines each member's findings from the different analyzers to spot
//! compound risks no single analyzer sees on its own, such as a member who
//! is both overloaded and stressed.

use crate::analysis::aggregator::group_by_member;
use crate::analysis::{wellbeing, workload};
use crate::models::{AnalyzerKind, Correlation, Finding, MemberId};

/// Signals derived from one member's findings.
#[derive(Debug, Clone, Copy, Default)]
struct MemberSignals {
    high_load: bool,
    high_stress: bool,
    underused: bool,
}

impl MemberSignals {
    fn from_findings(findings: &[&Finding]) -> Self {
        let flagged = |kind: AnalyzerKind, flag: &str| {
            findings
                .iter()
                .any(|f| f.kind == kind && f.has_flag(flag))
        };

        Self {
            high_load: flagged(AnalyzerKind::Workload, workload::HIGH_TASK_LOAD),
            high_stress: flagged(AnalyzerKind::Wellbeing, wellbeing::HIGH_STRESS),
            underused: flagged(AnalyzerKind::Workload, workload::UNDERUTILIZED),
        }
    }
}

/// Correlate findings per member. Team findings are ignored.
///
/// Members are visited in the order they first appear in `findings`. Member
/// lists never hold the same id twice. The URGENT and the 1:1 support
/// recommendations are mutually exclusive for a member.
pub fn correlate(findings: &[Finding]) -> Correlation {
    let mut correlation = Correlation::default();

    for (member, member_findings) in group_by_member(findings) {
        let signals = MemberSignals::from_findings(&member_findings);

        if signals.high_load && signals.high_stress {
            push_unique(&mut correlation.overloaded, member);
            push_unique(&mut correlation.burnout, member);
            correlation
                .critical
                .push(format!("{}: High workload + stress", member));
            correlation
                .recommendations
                .push(format!("URGENT: Redistribute {}'s workload", member));
        } else if signals.high_load {
            push_unique(&mut correlation.overloaded, member);
        } else if signals.underused {
            push_unique(&mut correlation.underutilized, member);
        }

        if signals.high_stress && !signals.high_load {
            push_unique(&mut correlation.burnout, member);
            correlation
                .recommendations
                .push(format!("Support {} with 1:1 check-in", member));
        }
    }

    correlation
}

fn push_unique(list: &mut Vec<MemberId>, member: &str) {
    if !list.iter().any(|m| m == member) {
        list.push(member.to_string());
    }
}
