//! Analysis pipeline.
//!
//! Four independent dimension analyzers (workload, goal, wellbeing, sprint)
//! each turn records into findings; the correlation engine then merges the
//! member findings into team-level patterns.

pub mod aggregator;
pub mod correlation;
pub mod goal;
pub mod sprint;
pub mod wellbeing;
pub mod workload;

pub use aggregator::*;

use crate::models::{Correlation, Dataset, Finding, RiskSummary};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Result of one analysis cycle.
#[derive(Debug, Clone, Serialize)]
pub struct TeamAnalysis {
    /// Findings in analyzer order: workload, goal, wellbeing, sprint.
    pub findings: Vec<Finding>,
    pub correlation: Correlation,
}

impl TeamAnalysis {
    /// Run every analyzer over `dataset`, then correlate.
    ///
    /// `today` drives the stuck-story check.
    pub fn run(dataset: &Dataset, today: NaiveDate) -> Self {
        let mut findings = workload::analyze(&dataset.workload);
        findings.extend(goal::analyze(&dataset.goals));
        findings.extend(wellbeing::analyze(&dataset.daily_updates));
        findings.extend(sprint::analyze(&dataset.sprints, today));

        debug!(
            "Produced {} findings ({} workload, {} goal, {} wellbeing, {} sprint)",
            findings.len(),
            dataset.workload.len(),
            dataset.goals.len(),
            dataset.daily_updates.len(),
            dataset.sprints.len()
        );

        let correlation = correlation::correlate(&findings);
        debug!(
            "Correlation: {} overloaded, {} underutilized, {} at burnout risk",
            correlation.overloaded.len(),
            correlation.underutilized.len(),
            correlation.burnout.len()
        );

        Self {
            findings,
            correlation,
        }
    }

    pub fn summary(&self) -> RiskSummary {
        RiskSummary::from_findings(&self.findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AnalyzerKind, DailyUpdate, Mood, RiskLevel, SprintStatus, StoryStatus, UserStory,
        WorkloadData,
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 28).unwrap()
    }

    fn workload(member: &str, active_tasks: u32, overtime_hours: u32) -> WorkloadData {
        WorkloadData {
            member_id: member.to_string(),
            active_tasks,
            completed_tasks: 4,
            sla_breaches: 0,
            overtime_hours,
            code_commits: 10,
            pull_requests: 3,
        }
    }

    fn update(member: &str, mood: &str, comments: &str) -> DailyUpdate {
        DailyUpdate {
            member_id: member.to_string(),
            date: "2025-06-28".to_string(),
            mood: Mood::from(mood),
            blockers: vec![],
            achievements: vec![],
            comments: comments.to_string(),
            working_hours: 8,
        }
    }

    #[test]
    fn test_overloaded_and_stressed_member_end_to_end() {
        let dataset = Dataset {
            workload: vec![
                workload("alice", 12, 15),
                workload("bob", 3, 2),
                workload("charlie", 7, 5),
            ],
            daily_updates: vec![
                update("alice", "stressed", "feeling overwhelmed"),
                update("bob", "okay", "Light week"),
                update("charlie", "good", "Making progress"),
            ],
            ..Dataset::default()
        };

        let analysis = TeamAnalysis::run(&dataset, today());
        let correlation = &analysis.correlation;

        assert_eq!(correlation.overloaded, vec!["alice"]);
        assert_eq!(correlation.burnout, vec!["alice"]);
        assert_eq!(correlation.underutilized, vec!["bob"]);
        assert!(correlation.critical.iter().any(|c| c.contains("alice")));
        assert!(correlation
            .recommendations
            .iter()
            .any(|r| r.contains("URGENT") && r.contains("alice")));
    }

    #[test]
    fn test_findings_follow_analyzer_order() {
        let dataset = Dataset {
            workload: vec![workload("alice", 5, 5)],
            daily_updates: vec![update("alice", "good", "")],
            sprints: vec![SprintStatus {
                sprint_name: "S1".to_string(),
                start_date: "2025-06-17".to_string(),
                end_date: "2025-07-01".to_string(),
                completion: 40,
                target: 60,
                critical_bugs: 3,
                unassigned_stories: 0,
                velocity: 45,
                planned_velocity: 75,
                user_stories: vec![UserStory {
                    id: "US-1".to_string(),
                    title: "Login".to_string(),
                    assignee: "alice".to_string(),
                    start_date: "2025-06-17".to_string(),
                    status: StoryStatus::InProgress,
                    story_points: Some(5),
                    tags: None,
                }],
            }],
            ..Dataset::default()
        };

        let analysis = TeamAnalysis::run(&dataset, today());
        let kinds: Vec<AnalyzerKind> = analysis.findings.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![AnalyzerKind::Workload, AnalyzerKind::Wellbeing, AnalyzerKind::Sprint]
        );

        let sprint = &analysis.findings[2];
        assert_eq!(sprint.risk, RiskLevel::High);
        assert!(sprint.has_flag("Stories stuck in progress: US-1"));
    }

    #[test]
    fn test_empty_dataset() {
        let analysis = TeamAnalysis::run(&Dataset::default(), today());
        assert!(analysis.findings.is_empty());
        assert_eq!(analysis.correlation, Correlation::default());
        assert_eq!(analysis.summary().total, 0);
    }
}
