//! Sprint status analyzer.
//!
//! Scores each sprint in a chronological history against its own targets,
//! inspects its user stories, and compares its velocity with the sprint
//! before it.

use crate::models::{
    AnalyzerKind, Finding, RiskLevel, SprintStatus, StoryStatus, Subject, UserStory,
};
use chrono::NaiveDate;

/// A story in progress for longer than this many days is stuck.
pub const STUCK_AFTER_DAYS: i64 = 5;

/// More assigned stories than this marks a member as overloaded.
pub const MAX_STORIES_PER_MEMBER: usize = 3;

/// Produce one team finding per sprint, in input order.
pub fn analyze(sprints: &[SprintStatus], today: NaiveDate) -> Vec<Finding> {
    sprints
        .iter()
        .enumerate()
        .map(|(i, sprint)| {
            let previous = i.checked_sub(1).map(|p| &sprints[p]);
            analyze_sprint(sprint, previous, today)
        })
        .collect()
}

fn analyze_sprint(
    sprint: &SprintStatus,
    previous: Option<&SprintStatus>,
    today: NaiveDate,
) -> Finding {
    let mut finding = Finding::new(AnalyzerKind::Sprint, Subject::Team);
    finding.sprint = Some(sprint.sprint_name.clone());

    if (sprint.completion as f64) < sprint.target as f64 * 0.6 {
        finding.note(
            format!(
                "Low progress: {}% vs target {}%",
                sprint.completion, sprint.target
            ),
            "Investigate delays and reallocate resources",
        );
        finding.escalate(RiskLevel::Medium);
    }

    if sprint.critical_bugs >= 3 {
        finding.note(
            format!("{} critical bugs unresolved", sprint.critical_bugs),
            "Prioritize fixing critical bugs",
        );
        finding.escalate(RiskLevel::High);
    }

    if (sprint.velocity as f64) < sprint.planned_velocity as f64 * 0.5 {
        finding.note(
            format!(
                "Velocity is low: {} / {}",
                sprint.velocity, sprint.planned_velocity
            ),
            "Review capacity and scope creep",
        );
        finding.escalate(RiskLevel::Medium);
    }

    let mut stuck: Vec<&UserStory> = Vec::new();
    for story in sprint
        .user_stories
        .iter()
        .filter(|s| s.status == StoryStatus::InProgress)
    {
        match story.days_active(today) {
            Some(days) if days > STUCK_AFTER_DAYS => stuck.push(story),
            Some(_) => {}
            None => {
                finding.note(
                    format!("Invalid or missing start date in story {}", story.id),
                    format!("Check start date of {}", story.id),
                );
                finding.escalate(RiskLevel::Medium);
            }
        }
    }

    let overloaded = overloaded_assignees(&sprint.user_stories);
    if !overloaded.is_empty() {
        finding.note(
            format!("Members with high story load: {}", overloaded.join(", ")),
            "Balance story assignments across team",
        );
        finding.escalate(RiskLevel::Medium);
    }

    let unassigned = sprint.user_stories.iter().filter(|s| !s.is_assigned()).count();
    if unassigned > 0 {
        finding.note(
            format!("{} user stories are unassigned", unassigned),
            "Assign all unclaimed stories to team members",
        );
        finding.escalate(RiskLevel::Medium);
    }

    if !stuck.is_empty() {
        let ids: Vec<&str> = stuck.iter().map(|s| s.id.as_str()).collect();
        finding.note(
            format!("Stories stuck in progress: {}", ids.join(", ")),
            "Follow up on long-running tasks",
        );
        finding.escalate(RiskLevel::High);
    }

    // Informational only
    if let Some(prev) = previous {
        if sprint.velocity < prev.velocity {
            finding.note(
                format!(
                    "Velocity dropped from {} SP in {} to {} SP",
                    prev.velocity, prev.sprint_name, sprint.velocity
                ),
                "Investigate root cause of velocity drop",
            );
        }
    }

    finding
}

/// Assignees holding more than [`MAX_STORIES_PER_MEMBER`] stories, in the
/// order they first appear.
fn overloaded_assignees(stories: &[UserStory]) -> Vec<&str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for story in stories.iter().filter(|s| s.is_assigned()) {
        match counts.iter_mut().find(|(name, _)| *name == story.assignee) {
            Some((_, count)) => *count += 1,
            None => counts.push((story.assignee.as_str(), 1)),
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > MAX_STORIES_PER_MEMBER)
        .map(|(name, _)| name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 28).unwrap()
    }

    fn story(id: &str, assignee: &str, start: &str, status: &str) -> UserStory {
        UserStory {
            id: id.to_string(),
            title: format!("Story {}", id),
            assignee: assignee.to_string(),
            start_date: start.to_string(),
            status: StoryStatus::from(status),
            story_points: Some(3),
            tags: None,
        }
    }

    fn sprint(name: &str, velocity: u32, stories: Vec<UserStory>) -> SprintStatus {
        SprintStatus {
            sprint_name: name.to_string(),
            start_date: "2025-06-17".to_string(),
            end_date: "2025-07-01".to_string(),
            completion: 50,
            target: 60,
            critical_bugs: 0,
            unassigned_stories: 0,
            velocity,
            planned_velocity: 60,
            user_stories: stories,
        }
    }

    #[test]
    fn test_healthy_sprint_is_low() {
        let findings = analyze(&[sprint("S1", 50, vec![])], today());
        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.subject, Subject::Team);
        assert_eq!(finding.sprint.as_deref(), Some("S1"));
        assert_eq!(finding.risk, RiskLevel::Low);
        assert!(finding.flags.is_empty());
    }

    #[test]
    fn test_critical_bugs_force_high() {
        let current = SprintStatus {
            completion: 40,
            target: 60,
            critical_bugs: 3,
            velocity: 45,
            planned_velocity: 75,
            ..sprint("Sprint 42", 45, vec![])
        };
        let findings = analyze(&[current], today());
        let finding = &findings[0];

        assert_eq!(finding.risk, RiskLevel::High);
        assert!(finding.has_flag("3 critical bugs unresolved"));
        // 40 is not below 60% of 60, and 45 is not below half of 75
        assert_eq!(finding.flags.len(), 1);
    }

    #[test]
    fn test_low_progress_threshold() {
        let behind = SprintStatus {
            completion: 35,
            target: 60,
            ..sprint("S1", 50, vec![])
        };
        let findings = analyze(&[behind], today());
        assert_eq!(findings[0].risk, RiskLevel::Medium);
        assert_eq!(findings[0].flags, vec!["Low progress: 35% vs target 60%"]);
        assert_eq!(
            findings[0].recommendations,
            vec!["Investigate delays and reallocate resources"]
        );

        let on_track = SprintStatus {
            completion: 36,
            target: 60,
            ..sprint("S1", 50, vec![])
        };
        assert!(analyze(&[on_track], today())[0].flags.is_empty());
    }

    #[test]
    fn test_low_velocity_is_medium() {
        let current = SprintStatus {
            planned_velocity: 100,
            ..sprint("S1", 40, vec![])
        };
        let findings = analyze(&[current], today());
        assert_eq!(findings[0].risk, RiskLevel::Medium);
        assert_eq!(findings[0].flags, vec!["Velocity is low: 40 / 100"]);
    }

    #[test]
    fn test_stuck_story_forces_high() {
        let stories = vec![
            story("US-1", "alice", "2025-06-17", "in progress"),
            story("US-2", "bob", "2025-06-25", "in progress"),
            story("US-3", "carol", "2025-06-01", "done"),
        ];
        let findings = analyze(&[sprint("S1", 50, stories)], today());
        let finding = &findings[0];

        assert_eq!(finding.risk, RiskLevel::High);
        assert!(finding.has_flag("Stories stuck in progress: US-1"));
        assert!(finding
            .recommendations
            .contains(&"Follow up on long-running tasks".to_string()));
    }

    #[test]
    fn test_exactly_five_days_is_not_stuck() {
        let stories = vec![story("US-1", "alice", "2025-06-23", "in progress")];
        let findings = analyze(&[sprint("S1", 50, stories)], today());
        assert!(findings[0].flags.is_empty());
    }

    #[test]
    fn test_invalid_start_date_is_flagged_and_recovered() {
        let stories = vec![
            story("US-1", "alice", "", "in progress"),
            story("US-2", "bob", "not-a-date", "in progress"),
            story("US-3", "carol", "", "todo"),
        ];
        let findings = analyze(&[sprint("S1", 50, stories)], today());
        let finding = &findings[0];

        assert_eq!(finding.risk, RiskLevel::Medium);
        assert_eq!(
            finding.flags,
            vec![
                "Invalid or missing start date in story US-1",
                "Invalid or missing start date in story US-2",
            ]
        );
        assert_eq!(finding.recommendations[1], "Check start date of US-2");
    }

    #[test]
    fn test_invalid_date_does_not_lower_high() {
        let current = SprintStatus {
            critical_bugs: 4,
            ..sprint("S1", 50, vec![story("US-1", "alice", "", "in progress")])
        };
        let findings = analyze(&[current], today());
        assert_eq!(findings[0].risk, RiskLevel::High);
    }

    #[test]
    fn test_overloaded_assignees_in_first_seen_order() {
        let mut stories = Vec::new();
        for i in 0..4 {
            stories.push(story(&format!("B-{}", i), "bob", "2025-06-27", "todo"));
            stories.push(story(&format!("A-{}", i), "alice", "2025-06-27", "todo"));
        }
        stories.push(story("C-1", "carol", "2025-06-27", "todo"));

        let findings = analyze(&[sprint("S1", 50, stories)], today());
        assert_eq!(findings[0].risk, RiskLevel::Medium);
        assert_eq!(
            findings[0].flags,
            vec!["Members with high story load: bob, alice"]
        );
    }

    #[test]
    fn test_unassigned_stories_counted() {
        let stories = vec![
            story("US-1", "", "", "unassigned"),
            story("US-2", "  ", "", "todo"),
            story("US-3", "alice", "2025-06-27", "todo"),
        ];
        let findings = analyze(&[sprint("S1", 50, stories)], today());
        assert_eq!(findings[0].flags, vec!["2 user stories are unassigned"]);
        assert_eq!(findings[0].risk, RiskLevel::Medium);
    }

    #[test]
    fn test_velocity_regression_against_previous() {
        let history = vec![sprint("S41", 55, vec![]), sprint("S42", 50, vec![])];
        let findings = analyze(&history, today());

        assert_eq!(findings.len(), 2);
        assert!(findings[0].flags.is_empty());
        assert_eq!(
            findings[1].flags,
            vec!["Velocity dropped from 55 SP in S41 to 50 SP"]
        );
        assert_eq!(findings[1].risk, RiskLevel::Low);
    }

    #[test]
    fn test_flag_order_follows_check_order() {
        let stories = vec![
            story("US-1", "alice", "2025-06-01", "in progress"),
            story("US-2", "", "", "unassigned"),
        ];
        let current = SprintStatus {
            completion: 10,
            ..sprint("S2", 40, stories)
        };
        let history = vec![sprint("S1", 45, vec![]), current];
        let findings = analyze(&history, today());

        assert_eq!(
            findings[1].flags,
            vec![
                "Low progress: 10% vs target 60%",
                "1 user stories are unassigned",
                "Stories stuck in progress: US-1",
                "Velocity dropped from 45 SP in S1 to 40 SP",
            ]
        );
        assert_eq!(findings[1].risk, RiskLevel::High);
    }

    #[test]
    fn test_empty_history() {
        assert!(analyze(&[], today()).is_empty());
    }
}
