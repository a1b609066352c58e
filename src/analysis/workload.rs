//! Workload analyzer.
//!
//! Flags overload, overtime, SLA breaches and idle capacity per member.

use crate::models::{AnalyzerKind, Finding, RiskLevel, Subject, WorkloadData};

pub const HIGH_TASK_LOAD: &str = "High task load";
pub const EXCESSIVE_OVERTIME: &str = "Excessive overtime";
pub const SLA_VIOLATIONS: &str = "SLA violations detected";
pub const UNDERUTILIZED: &str = "Underutilized capacity";

/// Produce one finding per workload record, in input order.
pub fn analyze(records: &[WorkloadData]) -> Vec<Finding> {
    records.iter().map(analyze_member).collect()
}

fn analyze_member(data: &WorkloadData) -> Finding {
    let mut finding = Finding::new(
        AnalyzerKind::Workload,
        Subject::Member(data.member_id.clone()),
    );

    if data.active_tasks > 10 {
        finding.note(HIGH_TASK_LOAD, "Redistribute tasks");
        finding.escalate(RiskLevel::High);
    }

    if data.overtime_hours > 10 {
        finding.note(EXCESSIVE_OVERTIME, "Reduce workload");
        finding.escalate(RiskLevel::High);
    }

    if data.sla_breaches > 1 {
        finding.note(SLA_VIOLATIONS, "Review deadlines");
        finding.escalate(RiskLevel::Medium);
    }

    // Informational only
    if data.active_tasks < 4 && data.overtime_hours < 3 {
        finding.note(UNDERUTILIZED, "Assign more tasks");
    }

    finding
}
