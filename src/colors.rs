use crate::models::Priority;

/// Swatches offered when tagging a task.
pub const TAG_COLORS: [&str; 10] = [
    "#ff6b6b", "#ffa94d", "#ffd43b", "#69db7c", "#4dabf7",
    "#9775fa", "#f783ac", "#20c997", "#a9e34b", "#748ffc",
];

/// Swatches offered when creating a category.
pub const CATEGORY_COLORS: [&str; 10] = [
    "#4dabf7", "#69db7c", "#ffa94d", "#ff6b6b", "#9775fa",
    "#f783ac", "#20c997", "#ffd43b", "#748ffc", "#a9e34b",
];

pub const CHART_COMPLETED: &str = "#69db7c";
pub const CHART_PENDING: &str = "#ffa94d";
pub const CHART_HIGH: &str = "#ff6b6b";
pub const CHART_MEDIUM: &str = "#ffd43b";
pub const CHART_LOW: &str = "#4dabf7";

/// Rotating fallback palette for category buckets with no resolvable category.
pub const CHART_CATEGORY_PALETTE: [&str; 10] = [
    "#4dabf7", "#69db7c", "#ffa94d", "#ff6b6b", "#9775fa",
    "#f783ac", "#20c997", "#ffd43b", "#748ffc", "#a9e34b",
];

pub fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "#ff4d4d",
        Priority::Medium => "#ffa500",
        Priority::Low => "#4dabf7",
    }
}

pub fn chart_priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => CHART_HIGH,
        Priority::Medium => CHART_MEDIUM,
        Priority::Low => CHART_LOW,
    }
}
