//! Data models for team health analysis.
//!
//! This module contains the records consumed by the analyzers (sprints,
//! stories, workload, goals, daily updates) and the findings they produce.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque key joining a member's records across all data sources.
pub type MemberId = String;

/// Sentinel subject id used for sprint-wide findings.
pub const TEAM_SUBJECT: &str = "team";

/// Date format used for story and sprint dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Risk level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Nothing needs attention.
    #[default]
    Low,
    /// Worth watching or discussing.
    Medium,
    /// Needs action now.
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

impl RiskLevel {
    /// Returns an emoji representation of the risk level.
    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::Low => "🟢",
            RiskLevel::Medium => "🟡",
            RiskLevel::High => "🔴",
        }
    }
}

/// Which analyzer produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    Workload,
    Goal,
    Wellbeing,
    Sprint,
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerKind::Workload => write!(f, "workload"),
            AnalyzerKind::Goal => write!(f, "goal"),
            AnalyzerKind::Wellbeing => write!(f, "wellbeing"),
            AnalyzerKind::Sprint => write!(f, "sprint"),
        }
    }
}

/// Who a finding is about: one member, or the whole team.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Subject {
    Team,
    Member(MemberId),
}

impl Subject {
    /// Returns the member id, or `None` for the team sentinel.
    pub fn member(&self) -> Option<&str> {
        match self {
            Subject::Team => None,
            Subject::Member(id) => Some(id),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Team => write!(f, "{}", TEAM_SUBJECT),
            Subject::Member(id) => write!(f, "{}", id),
        }
    }
}

impl From<String> for Subject {
    fn from(s: String) -> Self {
        if s == TEAM_SUBJECT {
            Subject::Team
        } else {
            Subject::Member(s)
        }
    }
}

impl From<Subject> for String {
    fn from(subject: Subject) -> Self {
        subject.to_string()
    }
}

/// Self-reported mood from a daily update.
///
/// Values outside the known set are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mood {
    Good,
    Okay,
    Stressed,
    Burnout,
    Other(String),
}

impl Mood {
    /// Raw text of the mood as reported.
    pub fn as_str(&self) -> &str {
        match self {
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Stressed => "stressed",
            Mood::Burnout => "burnout",
            Mood::Other(s) => s,
        }
    }

    /// Whether this mood counts as a high-stress signal.
    pub fn is_high_stress(&self) -> bool {
        matches!(self, Mood::Stressed | Mood::Burnout)
    }

    /// First letter upper-cased, the rest lower-cased.
    pub fn capitalized(&self) -> String {
        let mut chars = self.as_str().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
            None => String::new(),
        }
    }
}

impl From<&str> for Mood {
    fn from(s: &str) -> Self {
        match s {
            "good" => Mood::Good,
            "okay" => Mood::Okay,
            "stressed" => Mood::Stressed,
            "burnout" => Mood::Burnout,
            other => Mood::Other(other.to_string()),
        }
    }
}

impl From<String> for Mood {
    fn from(s: String) -> Self {
        Mood::from(s.as_str())
    }
}

impl From<Mood> for String {
    fn from(mood: Mood) -> Self {
        mood.as_str().to_string()
    }
}

/// Workflow status of a user story.
///
/// Matching is case-sensitive; data sources normalize casing before analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StoryStatus {
    InProgress,
    Done,
    Todo,
    Unassigned,
    Other(String),
}

impl StoryStatus {
    pub fn as_str(&self) -> &str {
        match self {
            StoryStatus::InProgress => "in progress",
            StoryStatus::Done => "done",
            StoryStatus::Todo => "todo",
            StoryStatus::Unassigned => "unassigned",
            StoryStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for StoryStatus {
    fn from(s: &str) -> Self {
        match s {
            "in progress" => StoryStatus::InProgress,
            "done" => StoryStatus::Done,
            "todo" => StoryStatus::Todo,
            "unassigned" => StoryStatus::Unassigned,
            other => StoryStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for StoryStatus {
    fn from(s: String) -> Self {
        StoryStatus::from(s.as_str())
    }
}

impl From<StoryStatus> for String {
    fn from(status: StoryStatus) -> Self {
        status.as_str().to_string()
    }
}

/// One member's daily check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyUpdate {
    pub member_id: MemberId,
    pub date: String,
    pub mood: Mood,
    #[serde(default)]
    pub blockers: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub comments: String,
    pub working_hours: u32,
}

/// Workload snapshot for one member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadData {
    pub member_id: MemberId,
    pub active_tasks: u32,
    pub completed_tasks: u32,
    pub sla_breaches: u32,
    pub overtime_hours: u32,
    pub code_commits: u32,
    pub pull_requests: u32,
}

/// Goal attainment for one member over the current sprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalData {
    pub member_id: MemberId,
    pub sprint_goals: u32,
    pub completed_goals: u32,
    pub velocity: f64,
    pub story_points: u32,
    pub expected_completion: f64,
}

impl GoalData {
    /// Completed over committed goals, or `None` when no goals were set.
    pub fn completion_rate(&self) -> Option<f64> {
        if self.sprint_goals == 0 {
            None
        } else {
            Some(self.completed_goals as f64 / self.sprint_goals as f64)
        }
    }
}

/// A user story inside a sprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStory {
    pub id: String,
    pub title: String,
    /// Empty means unassigned.
    #[serde(default)]
    pub assignee: String,
    /// ISO date, or empty when unknown.
    #[serde(default)]
    pub start_date: String,
    pub status: StoryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl UserStory {
    pub fn is_assigned(&self) -> bool {
        !self.assignee.trim().is_empty()
    }

    /// Parses `start_date`; `None` when it is empty or malformed.
    pub fn parsed_start_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.start_date.trim(), DATE_FORMAT).ok()
    }

    /// Whole days between the start date and `today`.
    pub fn days_active(&self, today: NaiveDate) -> Option<i64> {
        self.parsed_start_date()
            .map(|start| (today - start).num_days())
    }
}

/// Status of one sprint. A chronological list of these is the sprint history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintStatus {
    pub sprint_name: String,
    pub start_date: String,
    pub end_date: String,
    /// Percent complete, 0-100.
    pub completion: u32,
    /// Percent expected by now.
    pub target: u32,
    pub critical_bugs: u32,
    pub unassigned_stories: u32,
    /// Completed story points.
    pub velocity: u32,
    pub planned_velocity: u32,
    #[serde(default)]
    pub user_stories: Vec<UserStory>,
}

/// Output of one analyzer for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: AnalyzerKind,
    pub subject: Subject,
    /// Sprint this finding describes (sprint findings only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint: Option<String>,
    pub risk: RiskLevel,
    pub flags: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Finding {
    /// Creates an empty low-risk finding.
    pub fn new(kind: AnalyzerKind, subject: Subject) -> Self {
        Self {
            kind,
            subject,
            sprint: None,
            risk: RiskLevel::Low,
            flags: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    /// Records a flag together with its recommendation.
    pub fn note(&mut self, flag: impl Into<String>, recommendation: impl Into<String>) {
        self.flags.push(flag.into());
        self.recommendations.push(recommendation.into());
    }

    /// Raises the risk to `level`. Never lowers it.
    pub fn escalate(&mut self, level: RiskLevel) {
        self.risk = self.risk.max(level);
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

/// Cross-dimension patterns per member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub overloaded: Vec<MemberId>,
    pub underutilized: Vec<MemberId>,
    pub burnout: Vec<MemberId>,
    pub critical: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Counts of findings by risk level and analyzer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskSummary {
    /// Total number of findings.
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// Number of raised flags per analyzer kind.
    pub flags_by_kind: BTreeMap<String, usize>,
}

impl RiskSummary {
    /// Creates a summary from a list of findings.
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self {
            total: findings.len(),
            ..Self::default()
        };

        for finding in findings {
            match finding.risk {
                RiskLevel::High => summary.high += 1,
                RiskLevel::Medium => summary.medium += 1,
                RiskLevel::Low => summary.low += 1,
            }

            *summary
                .flags_by_kind
                .entry(finding.kind.to_string())
                .or_insert(0) += finding.flags.len();
        }

        summary
    }
}

/// All records for one analysis cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Chronological; the last entry is the current sprint.
    #[serde(default)]
    pub sprints: Vec<SprintStatus>,
    #[serde(default)]
    pub daily_updates: Vec<DailyUpdate>,
    #[serde(default)]
    pub workload: Vec<WorkloadData>,
    #[serde(default)]
    pub goals: Vec<GoalData>,
}

impl Dataset {
    /// Lower-cases moods and story statuses and trims assignees so the
    /// analyzers can match them exactly.
    pub fn normalized(mut self) -> Self {
        for update in &mut self.daily_updates {
            update.mood = Mood::from(update.mood.as_str().trim().to_lowercase());
        }
        for sprint in &mut self.sprints {
            for story in &mut sprint.user_stories {
                story.status = StoryStatus::from(story.status.as_str().trim().to_lowercase());
                story.assignee = story.assignee.trim().to_string();
            }
        }
        self
    }

    /// Keeps only the last `limit` sprints. Zero keeps everything.
    pub fn with_recent_sprints(mut self, limit: usize) -> Self {
        if limit > 0 && self.sprints.len() > limit {
            let excess = self.sprints.len() - limit;
            self.sprints.drain(..excess);
        }
        self
    }

    pub fn current_sprint(&self) -> Option<&SprintStatus> {
        self.sprints.last()
    }

    /// Distinct member ids across all per-member records, in first-seen order.
    pub fn member_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        let all = self
            .workload
            .iter()
            .map(|w| w.member_id.as_str())
            .chain(self.goals.iter().map(|g| g.member_id.as_str()))
            .chain(self.daily_updates.iter().map(|u| u.member_id.as_str()));
        for id in all {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Date the analysis was evaluated against.
    pub today: NaiveDate,
    /// Where the dataset came from.
    pub data_source: String,
    /// Name of the current sprint, if any.
    pub current_sprint: Option<String>,
    pub member_count: usize,
    pub finding_count: usize,
}

/// A complete analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summary: RiskSummary,
    pub findings: Vec<Finding>,
    pub correlation: Correlation,
    /// Finding recommendations then correlation recommendations, without
    /// repeats.
    pub recommendations: Vec<String>,
}

impl Report {
    pub fn new(metadata: ReportMetadata, findings: Vec<Finding>, correlation: Correlation) -> Self {
        let mut recommendations: Vec<String> = Vec::new();
        let all = findings
            .iter()
            .flat_map(|f| f.recommendations.iter())
            .chain(correlation.recommendations.iter());
        for rec in all {
            if !recommendations.contains(rec) {
                recommendations.push(rec.clone());
            }
        }

        Self {
            metadata,
            summary: RiskSummary::from_findings(&findings),
            findings,
            correlation,
            recommendations,
        }
    }
}
