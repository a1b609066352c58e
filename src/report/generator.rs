//! Markdown and JSON report generation.
//!
//! Renders a [`Report`] for humans (Markdown) or for tooling (JSON).

use crate::analysis::{group_by_subject, most_at_risk_members, sort_by_risk};
use crate::models::{Correlation, Finding, Report, ReportMetadata, RiskLevel, RiskSummary};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# PulseBoard Team Health Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.summary));
    output.push_str(&generate_at_risk_section(&report.findings));
    output.push_str(&generate_team_health_section(&report.correlation));
    output.push_str(&generate_findings_section(&report.findings));
    output.push_str(&generate_recommendations_section(&report.recommendations));
    output.push_str(&generate_footer());

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Evaluated As Of:** {}\n", metadata.today));
    section.push_str(&format!("- **Data Source:** {}\n", metadata.data_source));
    section.push_str(&format!(
        "- **Current Sprint:** {}\n",
        metadata.current_sprint.as_deref().unwrap_or("none")
    ));
    section.push_str(&format!("- **Members:** {}\n", metadata.member_count));
    section.push_str(&format!("- **Findings:** {}\n\n", metadata.finding_count));

    section
}

fn generate_summary_section(summary: &RiskSummary) -> String {
    let mut section = String::new();

    section.push_str("## Risk Summary\n\n");
    section.push_str(&format!(
        "| {} High | {} Medium | {} Low | **Total** |\n",
        RiskLevel::High.emoji(),
        RiskLevel::Medium.emoji(),
        RiskLevel::Low.emoji(),
    ));
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | **{}** |\n\n",
        summary.high, summary.medium, summary.low, summary.total
    ));

    let raised: Vec<_> = summary
        .flags_by_kind
        .iter()
        .filter(|(_, count)| **count > 0)
        .collect();
    if !raised.is_empty() {
        section.push_str("### Flags by Analyzer\n\n");
        section.push_str("| Analyzer | Flags |\n");
        section.push_str("|:---|:---:|\n");
        for (kind, count) in raised {
            section.push_str(&format!("| {} | {} |\n", kind, count));
        }
        section.push('\n');
    }

    section
}

fn generate_at_risk_section(findings: &[Finding]) -> String {
    let members = most_at_risk_members(findings, 5);
    if members.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Most At-Risk Members\n\n");
    section.push_str("| Member | Risk | Flags |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for member in members {
        section.push_str(&format!(
            "| {} | {} {} | {} |\n",
            member.member,
            member.risk.emoji(),
            member.risk,
            member.flag_count
        ));
    }
    section.push('\n');

    section
}

fn generate_team_health_section(correlation: &Correlation) -> String {
    let mut section = String::new();

    section.push_str("## Team Health\n\n");
    section.push_str(&format!(
        "- **Overloaded:** {}\n",
        list_or_none(&correlation.overloaded)
    ));
    section.push_str(&format!(
        "- **Underutilized:** {}\n",
        list_or_none(&correlation.underutilized)
    ));
    section.push_str(&format!(
        "- **Burnout Risk:** {}\n",
        list_or_none(&correlation.burnout)
    ));
    section.push('\n');

    if !correlation.critical.is_empty() {
        section.push_str("### Critical Patterns\n\n");
        for pattern in &correlation.critical {
            section.push_str(&format!("- ⚠️ {}\n", pattern));
        }
        section.push('\n');
    }

    section
}

fn generate_findings_section(findings: &[Finding]) -> String {
    let mut section = String::new();

    section.push_str("## Findings by Subject\n\n");

    let mut groups: Vec<_> = group_by_subject(findings)
        .into_iter()
        .filter(|(_, group)| group.iter().any(|f| !f.flags.is_empty()))
        .collect();

    if groups.is_empty() {
        section.push_str("No risks were flagged. The team looks healthy. 🎉\n\n");
        return section;
    }

    // Stable sort keeps first-seen subject order within a risk level.
    groups.sort_by_key(|(_, group)| {
        std::cmp::Reverse(group.iter().map(|f| f.risk).max().unwrap_or_default())
    });

    for (subject, mut group) in groups {
        section.push_str(&format!("### {}\n\n", subject));
        sort_by_risk(&mut group);
        for finding in group.into_iter().filter(|f| !f.flags.is_empty()) {
            section.push_str(&generate_finding_block(finding));
        }
    }

    section
}

fn generate_finding_block(finding: &Finding) -> String {
    let mut block = String::new();

    let badge = match finding.risk {
        RiskLevel::High => "🔴 **HIGH**",
        RiskLevel::Medium => "🟡 **MEDIUM**",
        RiskLevel::Low => "🟢 **LOW**",
    };
    match &finding.sprint {
        Some(sprint) => block.push_str(&format!("#### {} {} ({})\n\n", badge, finding.kind, sprint)),
        None => block.push_str(&format!("#### {} {}\n\n", badge, finding.kind)),
    }

    for (flag, rec) in finding.flags.iter().zip(&finding.recommendations) {
        block.push_str(&format!("- {}\n  > 💡 {}\n", flag, rec));
    }
    block.push('\n');

    block
}

fn generate_recommendations_section(recommendations: &[String]) -> String {
    if recommendations.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Recommendations\n\n");
    for (i, rec) in recommendations.iter().enumerate() {
        section.push_str(&format!("{}. {}\n", i + 1, rec));
    }
    section.push('\n');

    section
}

fn generate_footer() -> String {
    format!(
        "---\n\n*Report generated by PulseBoard v{}*\n",
        env!("CARGO_PKG_VERSION")
    )
}

fn list_or_none(members: &[String]) -> String {
    if members.is_empty() {
        "None".to_string()
    } else {
        members.join(", ")
    }
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
