//! Built-in sample dataset: a three-person team across two sprints.

use super::{DataSource, SourceError};
use crate::models::{
    DailyUpdate, Dataset, GoalData, Mood, SprintStatus, StoryStatus, UserStory, WorkloadData,
};

/// Serves a fixed demo dataset. Useful without a tracker export at hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleSource;

impl DataSource for SampleSource {
    fn describe(&self) -> String {
        "built-in sample dataset".to_string()
    }

    fn load(&self) -> Result<Dataset, SourceError> {
        Ok(Dataset {
            sprints: vec![previous_sprint(), current_sprint()],
            daily_updates: daily_updates(),
            workload: vec![
                workload("alice", [12, 8, 2, 15, 25, 8]),
                workload("bob", [3, 5, 0, 2, 8, 3]),
                workload("charlie", [7, 9, 1, 5, 18, 6]),
            ],
            goals: vec![
                goals("alice", 10, 6, 0.6, 32, 0.8),
                goals("bob", 6, 4, 0.67, 15, 0.7),
                goals("charlie", 8, 7, 0.875, 24, 0.85),
            ],
        })
    }
}

fn story(
    id: &str,
    title: &str,
    assignee: &str,
    start_date: &str,
    status: StoryStatus,
    story_points: u32,
    tags: &[&str],
) -> UserStory {
    UserStory {
        id: id.to_string(),
        title: title.to_string(),
        assignee: assignee.to_string(),
        start_date: start_date.to_string(),
        status,
        story_points: Some(story_points),
        tags: if tags.is_empty() {
            None
        } else {
            Some(tags.iter().map(|t| t.to_string()).collect())
        },
    }
}

fn previous_sprint() -> SprintStatus {
    SprintStatus {
        sprint_name: "Sprint 41 - Griffin".to_string(),
        start_date: "2025-06-03".to_string(),
        end_date: "2025-06-16".to_string(),
        completion: 85,
        target: 90,
        critical_bugs: 1,
        unassigned_stories: 0,
        velocity: 58,
        planned_velocity: 70,
        user_stories: vec![
            story("US-091", "Password reset flow", "alice", "2025-06-03", StoryStatus::Done, 5, &["backend"]),
            story("US-092", "Audit log export", "charlie", "2025-06-04", StoryStatus::Done, 8, &[]),
            story("US-093", "Session timeout banner", "bob", "2025-06-09", StoryStatus::Done, 3, &["frontend"]),
        ],
    }
}

fn current_sprint() -> SprintStatus {
    SprintStatus {
        sprint_name: "Sprint 42 - Phoenix".to_string(),
        start_date: "2025-06-17".to_string(),
        end_date: "2025-07-01".to_string(),
        completion: 40,
        target: 60,
        critical_bugs: 3,
        unassigned_stories: 1,
        velocity: 45,
        planned_velocity: 75,
        user_stories: vec![
            story("US-101", "Implement login API", "alice", "2025-06-17", StoryStatus::InProgress, 5, &["backend"]),
            story("US-102", "Create dashboard UI", "charlie", "2025-06-18", StoryStatus::InProgress, 8, &["frontend"]),
            story("US-103", "Fix session bug", "alice", "2025-06-20", StoryStatus::Done, 3, &[]),
            story("US-104", "Prepare test suite", "bob", "2025-06-21", StoryStatus::Todo, 5, &["qa"]),
            story("US-105", "Update documentation", "", "", StoryStatus::Unassigned, 2, &[]),
        ],
    }
}

fn daily_updates() -> Vec<DailyUpdate> {
    vec![
        DailyUpdate {
            member_id: "alice".to_string(),
            date: "2025-06-28".to_string(),
            mood: Mood::Stressed,
            blockers: vec!["API integration issues".to_string(), "Database migration".to_string()],
            achievements: vec!["Fixed critical bug #458".to_string()],
            comments: "Working late all week, feeling overwhelmed".to_string(),
            working_hours: 10,
        },
        DailyUpdate {
            member_id: "bob".to_string(),
            date: "2025-06-28".to_string(),
            mood: Mood::Okay,
            blockers: vec![],
            achievements: vec!["Code review completed".to_string()],
            comments: "Light workload, available for more tasks".to_string(),
            working_hours: 6,
        },
        DailyUpdate {
            member_id: "charlie".to_string(),
            date: "2025-06-28".to_string(),
            mood: Mood::Good,
            blockers: vec!["Waiting for design approval".to_string()],
            achievements: vec![
                "Sprint planning session".to_string(),
                "New feature development".to_string(),
            ],
            comments: "Making good progress on user stories".to_string(),
            working_hours: 8,
        },
    ]
}

/// `[active, completed, sla_breaches, overtime, commits, prs]`
fn workload(member: &str, counts: [u32; 6]) -> WorkloadData {
    let [active_tasks, completed_tasks, sla_breaches, overtime_hours, code_commits, pull_requests] =
        counts;
    WorkloadData {
        member_id: member.to_string(),
        active_tasks,
        completed_tasks,
        sla_breaches,
        overtime_hours,
        code_commits,
        pull_requests,
    }
}

fn goals(
    member: &str,
    sprint_goals: u32,
    completed_goals: u32,
    velocity: f64,
    story_points: u32,
    expected_completion: f64,
) -> GoalData {
    GoalData {
        member_id: member.to_string(),
        sprint_goals,
        completed_goals,
        velocity,
        story_points,
        expected_completion,
    }
}
