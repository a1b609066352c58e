//! Context brief generation.
//!
//! Renders sprint state, trends, findings and correlations into the single
//! text block the assistant receives as its system message. The output is a
//! pure function of its inputs and the injected `today`.

use crate::models::{
    AnalyzerKind, Correlation, DailyUpdate, Finding, SprintStatus, UserStory, WorkloadData,
};
use chrono::NaiveDate;

/// Returned instead of a brief when there is no sprint history.
pub const NO_SPRINT_DATA: &str = "No sprint data available.";

const PREAMBLE: &str =
    "You are AskManager, an AI assistant for sprint and team health management.";

const CLOSING: &str =
    "Provide concise, actionable advice based on this data. Focus on practical solutions.";

/// Everything the brief is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct BriefInput<'a> {
    /// Chronological; the last entry is the current sprint.
    pub sprints: &'a [SprintStatus],
    pub daily_updates: &'a [DailyUpdate],
    pub findings: &'a [Finding],
    pub correlation: &'a Correlation,
    pub workload: &'a [WorkloadData],
}

/// Build the brief. An empty sprint history yields [`NO_SPRINT_DATA`].
pub fn build_brief(input: &BriefInput<'_>, today: NaiveDate) -> String {
    let Some((current, earlier)) = input.sprints.split_last() else {
        return NO_SPRINT_DATA.to_string();
    };
    let previous = earlier.last();

    let current_findings: Vec<&Finding> = input
        .findings
        .iter()
        .filter(|f| f.kind == AnalyzerKind::Sprint)
        .filter(|f| {
            f.sprint
                .as_deref()
                .map_or(true, |name| name == current.sprint_name)
        })
        .collect();
    let sprint_flags: Vec<&str> = current_findings
        .iter()
        .flat_map(|f| f.flags.iter().map(String::as_str))
        .collect();
    let mut recommendations: Vec<&str> = current_findings
        .iter()
        .flat_map(|f| f.recommendations.iter().map(String::as_str))
        .collect();
    recommendations.extend(input.correlation.recommendations.iter().map(String::as_str));

    let sections = [
        PREAMBLE.to_string(),
        sprint_header(current),
        section("SPRINT TREND ANALYSIS:", trend_lines(current, previous), ""),
        section(
            "SPRINT HEALTH FINDINGS:",
            sprint_flags.iter().map(|f| format!("- {}", f)).collect(),
            "- No major sprint-level risks detected",
        ),
        section(
            "USER STORY DETAILS:",
            current
                .user_stories
                .iter()
                .map(|story| story_line(story, today))
                .collect(),
            "- No stories assigned for this sprint",
        ),
        section(
            "DAILY TEAM UPDATES:",
            input.daily_updates.iter().map(daily_update_line).collect(),
            "- No updates submitted today",
        ),
        section(
            "WORKLOAD SUMMARY:",
            input.workload.iter().map(workload_line).collect(),
            "- No workload data available",
        ),
        team_health(input.correlation),
        section(
            "KEY RECOMMENDATIONS:",
            recommendations.iter().map(|r| format!("• {}", r)).collect(),
            "• No immediate actions required",
        ),
        CLOSING.to_string(),
    ];

    sections.join("\n\n")
}

/// A titled block of lines, or the fallback line when there are none.
fn section(title: &str, lines: Vec<String>, empty: &str) -> String {
    if lines.is_empty() {
        format!("{}\n{}", title, empty)
    } else {
        format!("{}\n{}", title, lines.join("\n"))
    }
}

fn sprint_header(sprint: &SprintStatus) -> String {
    [
        format!(
            "SPRINT INFO: \"{}\" ({} → {})",
            sprint.sprint_name, sprint.start_date, sprint.end_date
        ),
        format!(
            "- Progress: {}% complete (target: {}%)",
            sprint.completion, sprint.target
        ),
        format!(
            "- Velocity: {} SP / {} SP",
            sprint.velocity, sprint.planned_velocity
        ),
        format!("- Critical bugs: {}", sprint.critical_bugs),
        format!("- Unassigned stories: {}", sprint.unassigned_stories),
    ]
    .join("\n")
}

fn trend_lines(current: &SprintStatus, previous: Option<&SprintStatus>) -> Vec<String> {
    let Some(previous) = previous else {
        return vec!["- No previous sprint available for comparison.".to_string()];
    };

    vec![
        format!(
            "- Velocity changed: {} → {} ({})",
            previous.velocity,
            current.velocity,
            signed_delta(previous.velocity, current.velocity)
        ),
        format!(
            "- Completion changed: {}% → {}% ({}%)",
            previous.completion,
            current.completion,
            signed_delta(previous.completion, current.completion)
        ),
        format!(
            "- Critical bugs changed: {} → {} ({})",
            previous.critical_bugs,
            current.critical_bugs,
            signed_delta(previous.critical_bugs, current.critical_bugs)
        ),
    ]
}

/// `+n` for growth or no change, `-n` for a drop.
fn signed_delta(before: u32, after: u32) -> String {
    let delta = i64::from(after) - i64::from(before);
    if delta >= 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}

fn story_line(story: &UserStory, today: NaiveDate) -> String {
    let assignee = if story.is_assigned() {
        story.assignee.as_str()
    } else {
        "Unassigned"
    };
    let started = if story.start_date.is_empty() {
        "N/A"
    } else {
        story.start_date.as_str()
    };
    let days_active = story.days_active(today);

    let estimate = story
        .story_points
        .map_or_else(|| "?".to_string(), |sp| sp.to_string());
    let progress = days_active.map_or_else(|| "N/A".to_string(), |d| d.to_string());
    let remaining = match (story.story_points, days_active) {
        (Some(sp), Some(days)) => format!("{} days left", i64::from(sp) - days),
        _ => "N/A".to_string(),
    };

    format!(
        "- {}: '{}' → {} | status: {}, started: {}, est: {}d, progress: {}d active, {}",
        story.id, story.title, assignee, story.status, started, estimate, progress, remaining
    )
}

fn daily_update_line(update: &DailyUpdate) -> String {
    format!(
        "- {}: Mood: {} | Hours: {}h | Blockers: {} | Progress: {} | Notes: {}",
        update.member_id,
        update.mood.capitalized(),
        update.working_hours,
        join_or_none(&update.blockers),
        join_or_none(&update.achievements),
        if update.comments.is_empty() {
            "No comment"
        } else {
            update.comments.as_str()
        }
    )
}

fn workload_line(w: &WorkloadData) -> String {
    format!(
        "- {}: Tasks → active: {}, completed: {} | SLA breaches: {} | Overtime: {}h | Commits: {}, PRs: {}",
        w.member_id,
        w.active_tasks,
        w.completed_tasks,
        w.sla_breaches,
        w.overtime_hours,
        w.code_commits,
        w.pull_requests
    )
}

fn team_health(correlation: &Correlation) -> String {
    [
        "TEAM HEALTH ANALYSIS:".to_string(),
        format!("- Critical Issues: {}", join_or_none(&correlation.critical)),
        format!(
            "- Overloaded members: {}",
            join_or_none(&correlation.overloaded)
        ),
        format!(
            "- Underutilized members: {}",
            join_or_none(&correlation.underutilized)
        ),
        format!("- Burnout risk: {}", join_or_none(&correlation.burnout)),
    ]
    .join("\n")
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TeamAnalysis;
    use crate::models::{Dataset, Mood, RiskLevel, StoryStatus, Subject};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 28).unwrap()
    }

    fn sprint(name: &str, completion: u32, velocity: u32, bugs: u32) -> SprintStatus {
        SprintStatus {
            sprint_name: name.to_string(),
            start_date: "2025-06-17".to_string(),
            end_date: "2025-07-01".to_string(),
            completion,
            target: 60,
            critical_bugs: bugs,
            unassigned_stories: 1,
            velocity,
            planned_velocity: 75,
            user_stories: vec![
                UserStory {
                    id: "US-101".to_string(),
                    title: "Implement login API".to_string(),
                    assignee: "alice".to_string(),
                    start_date: "2025-06-17".to_string(),
                    status: StoryStatus::InProgress,
                    story_points: Some(5),
                    tags: None,
                },
                UserStory {
                    id: "US-105".to_string(),
                    title: "Update documentation".to_string(),
                    assignee: String::new(),
                    start_date: String::new(),
                    status: StoryStatus::Unassigned,
                    story_points: Some(2),
                    tags: None,
                },
            ],
        }
    }

    fn dataset() -> Dataset {
        Dataset {
            sprints: vec![sprint("Sprint 41", 55, 50, 1), sprint("Sprint 42", 30, 45, 3)],
            daily_updates: vec![
                DailyUpdate {
                    member_id: "alice".to_string(),
                    date: "2025-06-28".to_string(),
                    mood: Mood::Stressed,
                    blockers: vec!["API issues".to_string(), "Migration".to_string()],
                    achievements: vec!["Fixed bug #458".to_string()],
                    comments: "feeling overwhelmed".to_string(),
                    working_hours: 10,
                },
                DailyUpdate {
                    member_id: "bob".to_string(),
                    date: "2025-06-28".to_string(),
                    mood: Mood::Okay,
                    blockers: vec![],
                    achievements: vec![],
                    comments: String::new(),
                    working_hours: 6,
                },
            ],
            workload: vec![
                WorkloadData {
                    member_id: "alice".to_string(),
                    active_tasks: 12,
                    completed_tasks: 8,
                    sla_breaches: 2,
                    overtime_hours: 15,
                    code_commits: 25,
                    pull_requests: 8,
                },
                WorkloadData {
                    member_id: "bob".to_string(),
                    active_tasks: 3,
                    completed_tasks: 5,
                    sla_breaches: 0,
                    overtime_hours: 2,
                    code_commits: 8,
                    pull_requests: 3,
                },
            ],
            goals: vec![],
        }
    }

    fn render(dataset: &Dataset) -> String {
        let analysis = TeamAnalysis::run(dataset, today());
        let input = BriefInput {
            sprints: &dataset.sprints,
            daily_updates: &dataset.daily_updates,
            findings: &analysis.findings,
            correlation: &analysis.correlation,
            workload: &dataset.workload,
        };
        build_brief(&input, today())
    }

    #[test]
    fn test_empty_history_short_circuits() {
        let correlation = Correlation {
            critical: vec!["alice: High workload + stress".to_string()],
            ..Correlation::default()
        };
        let input = BriefInput {
            sprints: &[],
            daily_updates: &[],
            findings: &[],
            correlation: &correlation,
            workload: &[],
        };
        assert_eq!(build_brief(&input, today()), NO_SPRINT_DATA);
    }

    #[test]
    fn test_brief_is_deterministic() {
        let dataset = dataset();
        assert_eq!(render(&dataset), render(&dataset));
    }

    #[test]
    fn test_section_order() {
        let brief = render(&dataset());
        let headings = [
            "You are AskManager",
            "SPRINT INFO: \"Sprint 42\" (2025-06-17 → 2025-07-01)",
            "SPRINT TREND ANALYSIS:",
            "SPRINT HEALTH FINDINGS:",
            "USER STORY DETAILS:",
            "DAILY TEAM UPDATES:",
            "WORKLOAD SUMMARY:",
            "TEAM HEALTH ANALYSIS:",
            "KEY RECOMMENDATIONS:",
            "Provide concise, actionable advice",
        ];
        let positions: Vec<usize> = headings
            .iter()
            .map(|h| brief.find(h).unwrap_or_else(|| panic!("missing {}", h)))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_trend_lines_are_signed() {
        let brief = render(&dataset());
        assert!(brief.contains("- Velocity changed: 50 → 45 (-5)"));
        assert!(brief.contains("- Completion changed: 55% → 30% (-25%)"));
        assert!(brief.contains("- Critical bugs changed: 1 → 3 (+2)"));
    }

    #[test]
    fn test_single_sprint_has_no_trend() {
        let mut dataset = dataset();
        dataset.sprints.remove(0);
        let brief = render(&dataset);
        assert!(brief.contains("SPRINT TREND ANALYSIS:\n- No previous sprint available for comparison."));
    }

    #[test]
    fn test_only_current_sprint_flags_are_rendered() {
        let brief = render(&dataset());
        assert!(brief.contains("- Low progress: 30% vs target 60%"));
        assert!(brief.contains("- 3 critical bugs unresolved"));
        assert!(brief.contains("- Velocity dropped from 50 SP in Sprint 41 to 45 SP"));
        // Sprint 41 also has a stuck story, but its flags stay out
        assert_eq!(brief.matches("Stories stuck in progress: US-101").count(), 1);
    }

    #[test]
    fn test_story_lines() {
        let brief = render(&dataset());
        assert!(brief.contains(
            "- US-101: 'Implement login API' → alice | status: in progress, started: 2025-06-17, est: 5d, progress: 11d active, -6 days left"
        ));
        assert!(brief.contains(
            "- US-105: 'Update documentation' → Unassigned | status: unassigned, started: N/A, est: 2d, progress: N/Ad active, N/A"
        ));
    }

    #[test]
    fn test_daily_and_workload_lines() {
        let brief = render(&dataset());
        assert!(brief.contains(
            "- alice: Mood: Stressed | Hours: 10h | Blockers: API issues, Migration | Progress: Fixed bug #458 | Notes: feeling overwhelmed"
        ));
        assert!(brief.contains(
            "- bob: Mood: Okay | Hours: 6h | Blockers: None | Progress: None | Notes: No comment"
        ));
        assert!(brief.contains(
            "- alice: Tasks → active: 12, completed: 8 | SLA breaches: 2 | Overtime: 15h | Commits: 25, PRs: 8"
        ));
    }

    #[test]
    fn test_team_health_and_recommendation_order() {
        let brief = render(&dataset());
        assert!(brief.contains("- Critical Issues: alice: High workload + stress"));
        assert!(brief.contains("- Overloaded members: alice"));
        assert!(brief.contains("- Underutilized members: bob"));
        assert!(brief.contains("- Burnout risk: alice"));

        let sprint_rec = brief.find("• Prioritize fixing critical bugs").unwrap();
        let urgent = brief.find("• URGENT: Redistribute alice's workload").unwrap();
        assert!(sprint_rec < urgent);
    }

    #[test]
    fn test_empty_sections_use_sentinels() {
        let current = SprintStatus {
            user_stories: vec![],
            ..sprint("Sprint 1", 60, 70, 0)
        };
        let sprints = vec![current];
        let correlation = Correlation::default();
        let input = BriefInput {
            sprints: &sprints,
            daily_updates: &[],
            findings: &[],
            correlation: &correlation,
            workload: &[],
        };
        let brief = build_brief(&input, today());

        assert!(brief.contains("SPRINT HEALTH FINDINGS:\n- No major sprint-level risks detected"));
        assert!(brief.contains("USER STORY DETAILS:\n- No stories assigned for this sprint"));
        assert!(brief.contains("DAILY TEAM UPDATES:\n- No updates submitted today"));
        assert!(brief.contains("WORKLOAD SUMMARY:\n- No workload data available"));
        assert!(brief.contains("- Critical Issues: None"));
        assert!(brief.contains("- Burnout risk: None"));
        assert!(brief.contains("KEY RECOMMENDATIONS:\n• No immediate actions required"));
    }

    #[test]
    fn test_unscoped_sprint_findings_are_included() {
        let sprints = vec![sprint("Sprint 1", 60, 70, 0)];
        let mut finding = Finding::new(AnalyzerKind::Sprint, Subject::Team);
        finding.note("Manual flag", "Manual recommendation");
        finding.escalate(RiskLevel::Medium);
        let findings = vec![finding];
        let correlation = Correlation::default();
        let input = BriefInput {
            sprints: &sprints,
            daily_updates: &[],
            findings: &findings,
            correlation: &correlation,
            workload: &[],
        };
        let brief = build_brief(&input, today());

        assert!(brief.contains("- Manual flag"));
        assert!(brief.contains("• Manual recommendation"));
    }
}
