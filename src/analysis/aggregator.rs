//! Finding aggregation and statistics.
//!
//! Helpers for regrouping and ranking the flat finding list produced by the
//! analyzers. None of them mutate findings.

use crate::models::{Finding, RiskLevel, Subject};

/// Group findings by subject, keeping the order in which subjects first
/// appear and the order of findings within each group.
pub fn group_by_subject(findings: &[Finding]) -> Vec<(&Subject, Vec<&Finding>)> {
    let mut grouped: Vec<(&Subject, Vec<&Finding>)> = Vec::new();

    for finding in findings {
        match grouped.iter_mut().find(|(s, _)| *s == &finding.subject) {
            Some((_, group)) => group.push(finding),
            None => grouped.push((&finding.subject, vec![finding])),
        }
    }

    grouped
}

/// Group member findings by member id. Team findings are dropped.
pub fn group_by_member(findings: &[Finding]) -> Vec<(&str, Vec<&Finding>)> {
    group_by_subject(findings)
        .into_iter()
        .filter_map(|(subject, group)| subject.member().map(|id| (id, group)))
        .collect()
}

/// Sort findings by risk (high first). Ties keep their original order.
pub fn sort_by_risk(findings: &mut [&Finding]) {
    findings.sort_by(|a, b| b.risk.cmp(&a.risk));
}

/// Highest risk across all findings.
pub fn highest_risk(findings: &[Finding]) -> Option<RiskLevel> {
    findings.iter().map(|f| f.risk).max()
}

/// A member's combined standing across analyzers.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRisk<'a> {
    pub member: &'a str,
    pub risk: RiskLevel,
    pub flag_count: usize,
}

/// Identify the members most at risk: highest risk first, then most flags.
/// Members with no flags are left out.
pub fn most_at_risk_members(findings: &[Finding], n: usize) -> Vec<MemberRisk<'_>> {
    let mut members: Vec<MemberRisk<'_>> = group_by_member(findings)
        .into_iter()
        .map(|(member, group)| MemberRisk {
            member,
            risk: group.iter().map(|f| f.risk).max().unwrap_or_default(),
            flag_count: group.iter().map(|f| f.flags.len()).sum(),
        })
        .filter(|m| m.flag_count > 0)
        .collect();

    members.sort_by(|a, b| {
        b.risk
            .cmp(&a.risk)
            .then_with(|| b.flag_count.cmp(&a.flag_count))
    });
    members.truncate(n);

    members
}
