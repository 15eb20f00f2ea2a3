use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Sort rank: high before medium before low.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// Interpret a stored priority string. Missing or unrecognized values
    /// count as medium; equality filters compare the raw stored value instead.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("high") => Self::High,
            Some("low") => Self::Low,
            _ => Self::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub list_id: i64,
    pub text: String,
    pub notes: String,
    pub completed: bool,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub tags: Vec<Tag>,
    pub starred: bool,
    pub category_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
    pub completed_at: Option<String>,
}

impl Task {
    pub fn priority_or_default(&self) -> Priority {
        Priority::from_stored(self.priority.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub created_at: String,
}

// ─── Store payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub list_id: i64,
    pub text: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

impl NewTask {
    pub fn new(list_id: i64, text: impl Into<String>) -> Self {
        Self {
            list_id,
            text: text.into(),
            notes: String::new(),
            priority: None,
            due_date: None,
            tags: Vec::new(),
            category_id: None,
        }
    }
}

/// Partial task update. `None` leaves a field untouched; the inner option on
/// nullable fields distinguishes "clear" from "unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskPatch {
    pub list_id: Option<i64>,
    pub text: Option<String>,
    pub notes: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Option<String>>,
    pub due_date: Option<Option<String>>,
    pub tags: Option<Vec<Tag>>,
    pub starred: Option<bool>,
    pub category_id: Option<Option<i64>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

// ─── View state ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn retains(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => !completed,
            Self::Completed => completed,
        }
    }
}

/// Transient filter state for the task-list page. Passed explicitly so the
/// derivation functions stay referentially transparent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListQuery {
    pub search: String,
    pub category: Option<i64>,
    pub status: StatusFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateRange {
    #[default]
    All,
    Week,
    Month,
    Quarter,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsFilter {
    pub category: Option<i64>,
    pub priority: Option<Priority>,
    pub status: StatusFilter,
    pub date_range: DateRange,
}

// ─── Materialized views ─────────────────────────────────────────────────────

/// Filtered, sorted and partitioned task list: incomplete tasks first,
/// completed tasks behind the collapsible section.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListView {
    pub active: Vec<Task>,
    pub completed: Vec<Task>,
}

impl TaskListView {
    pub fn len(&self) -> usize {
        self.active.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.completed.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub urgent: usize,
    pub all_completed: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayOverview {
    /// Pending tasks due today, priority-sorted, capped at the preview size.
    pub preview: Vec<Task>,
    /// Pending tasks beyond the preview, reported only as a count.
    pub overflow_count: usize,
    pub pending_count: usize,
    pub completed_count: usize,
    pub urgent_count: usize,
    pub all_done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSlice {
    pub name: &'static str,
    pub value: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBucket {
    pub name: String,
    pub tasks: usize,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityBucket {
    pub name: &'static str,
    pub tasks: usize,
    pub completed: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// "Wed, Mar 10"
    pub date: String,
    /// "Wed"
    pub short_date: String,
    pub created: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Rounded percentage; zero when there are no tasks.
    pub completion_rate: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub summary: AnalyticsSummary,
    pub status: Vec<StatusSlice>,
    pub categories: Vec<CategoryBucket>,
    pub priorities: Vec<PriorityBucket>,
    pub trend: Vec<TrendPoint>,
    pub high_priority_pending: usize,
    pub most_used_category: Option<String>,
    pub insights: Vec<String>,
}
