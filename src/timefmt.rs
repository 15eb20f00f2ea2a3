//! Human-facing time formatting for stored ISO timestamps.
//!
//! Every formatter takes the reference "now" as a parameter instead of reading
//! the system clock, so callers decide the clock and tests stay deterministic.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::Serialize;

/// Naive fallbacks for timestamps written without an offset, e.g. the value of
/// a datetime-local input. Interpreted in the local timezone.
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Lenient parse of a stored timestamp. Unparseable input is coerced to
/// "absent" rather than an error; the coercion is logged because it changes
/// observable filtering and formatting results.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Local));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Local
            .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
            .earliest();
    }
    tracing::warn!(raw, "unparseable stored timestamp; treating as absent");
    None
}

/// 12-hour clock, no leading hour zero: "3:00 PM".
fn clock(date: &DateTime<Local>) -> String {
    date.format("%-I:%M %p").to_string()
}

/// Due-date label: "Today, 3:00 PM", "Tomorrow, 9:00 AM", "Mar 10, 3:00 PM",
/// with the year appended when it differs from the current one.
pub fn format_due_date(due_date: &str, now: DateTime<Local>) -> Option<String> {
    let date = parse_timestamp(due_date)?;
    let today = now.date_naive();
    let due_day = date.date_naive();
    let time = clock(&date);

    if due_day == today {
        Some(format!("Today, {time}"))
    } else if today.succ_opt() == Some(due_day) {
        Some(format!("Tomorrow, {time}"))
    } else if date.year() != now.year() {
        Some(format!("{}, {time}", date.format("%b %-d, %Y")))
    } else {
        Some(format!("{}, {time}", date.format("%b %-d")))
    }
}

/// Placeholder label for a date input: "Wed, Jan 15".
pub fn format_date_display(date: Option<&str>) -> String {
    let Some(parsed) = date.and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()) else {
        return "Select Date".to_string();
    };
    parsed.format("%a, %b %-d").to_string()
}

/// Placeholder label for a time input: "15:00" -> "3:00 PM".
pub fn format_time_display(time: Option<&str>) -> String {
    let parsed = time.and_then(|raw| {
        let (hours, minutes) = raw.split_once(':')?;
        let hour: u32 = hours.parse().ok()?;
        (hour < 24 && minutes.len() == 2).then(|| (hour, minutes.to_string()))
    });
    let Some((hour, minutes)) = parsed else {
        return "Select Time".to_string();
    };
    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour12}:{minutes} {meridiem}")
}

/// A completed task is never overdue, whatever its due date says.
pub fn is_overdue(due_date: Option<&str>, completed: bool, now: DateTime<Local>) -> bool {
    if completed {
        return false;
    }
    due_date
        .and_then(parse_timestamp)
        .is_some_and(|due| due < now)
}

/// Relative "last updated" label. Boundaries use truncating division of the
/// elapsed time, so 90 seconds reads "1m ago".
pub fn format_last_updated(updated_at: &str, now: DateTime<Local>) -> Option<String> {
    let date = parse_timestamp(updated_at)?;
    let elapsed = now.signed_duration_since(date);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    let label = if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days == 1 {
        format!("Yesterday, {}", clock(&date))
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        format!("{}, {}", date.format("%-d %b"), clock(&date))
    };
    Some(label)
}

/// Age bucket for grouping and badging, split at local midnights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskAge {
    Today,
    Yesterday,
    Older,
}

impl TaskAge {
    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::Older => "Older",
        }
    }
}

/// Classify by `updated_at`, falling back to `created_at` when the former is
/// absent or unparseable. `None` when neither yields a timestamp.
pub fn task_age(
    updated_at: Option<&str>,
    created_at: Option<&str>,
    now: DateTime<Local>,
) -> Option<TaskAge> {
    let date = updated_at
        .and_then(parse_timestamp)
        .or_else(|| created_at.and_then(parse_timestamp))?;
    let today = now.date_naive();
    let day = date.date_naive();

    if day >= today {
        Some(TaskAge::Today)
    } else if today.pred_opt() == Some(day) {
        Some(TaskAge::Yesterday)
    } else {
        Some(TaskAge::Older)
    }
}
