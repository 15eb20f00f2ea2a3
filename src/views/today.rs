//! "Today" dashboard subset: tasks due within the current local calendar day.

use crate::models::{Task, TodayOverview};
use crate::timefmt::parse_timestamp;
use chrono::{DateTime, Local};

/// How many pending tasks the dashboard card previews before collapsing the
/// rest into a "+N more" count.
pub const TODAY_PREVIEW_LIMIT: usize = 4;

/// Compute the today dashboard from the cross-list snapshot.
///
/// Both buckets are keyed on `due_date` falling inside `[midnight, midnight+24h)`
/// of the local day of `now`. The completed bucket deliberately does not look
/// at `completed_at`, matching the shipped behavior.
pub fn today_overview(tasks: &[Task], now: DateTime<Local>) -> TodayOverview {
    let today = now.date_naive();
    let due_today = |task: &Task| {
        task.due_date
            .as_deref()
            .and_then(parse_timestamp)
            .is_some_and(|due| due.date_naive() == today)
    };

    let mut pending: Vec<&Task> = tasks
        .iter()
        .filter(|task| !task.completed && due_today(task))
        .collect();
    let completed_count = tasks
        .iter()
        .filter(|task| task.completed && due_today(task))
        .count();
    let urgent_count = pending
        .iter()
        .filter(|task| task.priority.as_deref() == Some("high"))
        .count();

    // Priority rank only; the dashboard preview has no starred level.
    pending.sort_by_key(|task| task.priority_or_default().rank());

    let pending_count = pending.len();
    let overflow_count = pending_count.saturating_sub(TODAY_PREVIEW_LIMIT);
    let preview = pending
        .into_iter()
        .take(TODAY_PREVIEW_LIMIT)
        .cloned()
        .collect();

    TodayOverview {
        preview,
        overflow_count,
        pending_count,
        completed_count,
        urgent_count,
        all_done: pending_count == 0 && completed_count > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::{today_overview, TODAY_PREVIEW_LIMIT};
    use crate::models::Task;
    use chrono::{DateTime, Duration, Local, TimeZone};

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn due_task(id: i64, due: Option<String>) -> Task {
        Task {
            id,
            list_id: 1,
            text: format!("task {id}"),
            notes: String::new(),
            completed: false,
            priority: None,
            due_date: due,
            tags: Vec::new(),
            starred: false,
            category_id: None,
            created_at: "2026-03-01T09:00:00+00:00".to_string(),
            updated_at: "2026-03-01T09:00:00+00:00".to_string(),
            completed_at: None,
        }
    }

    fn due_at(hour: u32) -> String {
        Local
            .with_ymd_and_hms(2026, 3, 10, hour, 0, 0)
            .unwrap()
            .to_rfc3339()
    }

    #[test]
    fn only_tasks_due_within_the_local_day_qualify() {
        let late_tonight = due_task(1, Some(due_at(23)));
        let yesterday = due_task(2, Some((now() - Duration::days(1)).to_rfc3339()));
        let tomorrow = due_task(3, Some((now() + Duration::days(1)).to_rfc3339()));
        let no_deadline = due_task(4, None);
        let malformed = due_task(5, Some("not a date".to_string()));

        let view = today_overview(
            &[late_tonight, yesterday, tomorrow, no_deadline, malformed],
            now(),
        );
        assert_eq!(view.pending_count, 1);
        assert_eq!(view.preview[0].id, 1);
    }

    #[test]
    fn completed_bucket_keys_on_due_date_not_completion_time() {
        let mut done_due_today = due_task(1, Some(due_at(9)));
        done_due_today.completed = true;
        // Completed days ago; still counts because the due date is today.
        done_due_today.completed_at = Some((now() - Duration::days(3)).to_rfc3339());

        let mut done_due_yesterday = due_task(2, Some((now() - Duration::days(1)).to_rfc3339()));
        done_due_yesterday.completed = true;
        done_due_yesterday.completed_at = Some(now().to_rfc3339());

        let view = today_overview(&[done_due_today, done_due_yesterday], now());
        assert_eq!(view.completed_count, 1);
        assert_eq!(view.pending_count, 0);
        assert!(view.all_done);
    }

    #[test]
    fn urgent_counts_only_exact_high_priority() {
        let mut high = due_task(1, Some(due_at(9)));
        high.priority = Some("high".to_string());
        let mut odd = due_task(2, Some(due_at(10)));
        odd.priority = Some("critical".to_string());
        let plain = due_task(3, Some(due_at(11)));

        let view = today_overview(&[high, odd, plain], now());
        assert_eq!(view.urgent_count, 1);
    }

    #[test]
    fn preview_is_priority_sorted_and_capped() {
        let mut tasks = Vec::new();
        for id in 1..=5 {
            tasks.push(due_task(id, Some(due_at(8 + id as u32))));
        }
        tasks[4].priority = Some("high".to_string());
        tasks[0].priority = Some("low".to_string());

        let view = today_overview(&tasks, now());
        assert_eq!(view.preview.len(), TODAY_PREVIEW_LIMIT);
        assert_eq!(view.pending_count, 5);
        assert_eq!(view.overflow_count, 1);
        // High first, then the mediums in input order.
        assert_eq!(view.preview[0].id, 5);
        assert_eq!(view.preview[1].id, 2);
        // The low-priority task is the one pushed out of the preview.
        assert!(view.preview.iter().all(|t| t.id != 1));
    }

    #[test]
    fn empty_snapshot_is_not_all_done() {
        let view = today_overview(&[], now());
        assert_eq!(view.pending_count, 0);
        assert_eq!(view.completed_count, 0);
        assert!(!view.all_done);
    }
}
