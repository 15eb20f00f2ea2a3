//! The derivation engine: pure functions from a persisted-task snapshot plus
//! explicit view state to the materialized views the presentation layer
//! renders. No I/O, no clock reads, no mutation of the input snapshot.

mod analytics;
mod list;
mod today;

pub use analytics::{
    analytics_report, category_histogram, filter_tasks, priority_histogram, seven_day_trend,
    status_split, summary,
};
pub use list::{list_counts, task_list_view};
pub use today::{today_overview, TODAY_PREVIEW_LIMIT};
