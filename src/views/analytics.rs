//! Cross-list analytics: filter pipeline, the four chart aggregates, the
//! summary card numbers and the insight banner messages.

use crate::colors;
use crate::models::{
    AnalyticsFilter, AnalyticsReport, AnalyticsSummary, Category, CategoryBucket, DateRange,
    Priority, PriorityBucket, StatusSlice, Task, TrendPoint,
};
use crate::timefmt::parse_timestamp;
use chrono::{DateTime, Days, Local, Months};

/// Apply the analytics filters, AND-combined. The result is a subsequence of
/// the input; ordering is untouched.
///
/// The priority filter matches the stored value verbatim: a task with no
/// priority at all never passes it, even though the histogram would bucket the
/// same task under medium.
pub fn filter_tasks(tasks: &[Task], filter: &AnalyticsFilter, now: DateTime<Local>) -> Vec<Task> {
    let cutoff = date_range_cutoff(filter.date_range, now);

    tasks
        .iter()
        .filter(|task| {
            filter
                .category
                .map_or(true, |id| task.category_id == Some(id))
        })
        .filter(|task| {
            filter
                .priority
                .map_or(true, |p| task.priority.as_deref() == Some(p.as_str()))
        })
        .filter(|task| filter.status.retains(task.completed))
        .filter(|task| match cutoff {
            None => true,
            // Unparseable created_at cannot satisfy a date bound.
            Some(start) => {
                parse_timestamp(&task.created_at).is_some_and(|created| created >= start)
            }
        })
        .cloned()
        .collect()
}

fn date_range_cutoff(range: DateRange, now: DateTime<Local>) -> Option<DateTime<Local>> {
    match range {
        DateRange::All => None,
        DateRange::Week => now.checked_sub_days(Days::new(7)),
        DateRange::Month => now.checked_sub_months(Months::new(1)),
        DateRange::Quarter => now.checked_sub_months(Months::new(3)),
    }
}

/// Completed-vs-pending split, fixed label order.
pub fn status_split(tasks: &[Task]) -> Vec<StatusSlice> {
    let completed = tasks.iter().filter(|task| task.completed).count();
    vec![
        StatusSlice {
            name: "Completed",
            value: completed,
            color: colors::CHART_COMPLETED,
        },
        StatusSlice {
            name: "Pending",
            value: tasks.len() - completed,
            color: colors::CHART_PENDING,
        },
    ]
}

/// Count tasks per category bucket in first-seen order. `None` keys the
/// uncategorized bucket. Deterministic for identical input.
fn bucket_by_category(tasks: &[Task]) -> Vec<(Option<i64>, usize)> {
    let mut buckets: Vec<(Option<i64>, usize)> = Vec::new();
    for task in tasks {
        match buckets.iter_mut().find(|(key, _)| *key == task.category_id) {
            Some(bucket) => bucket.1 += 1,
            None => buckets.push((task.category_id, 1)),
        }
    }
    buckets
}

/// Per-category histogram, sorted descending by count. Ties keep first-seen
/// order (stable sort). Buckets whose category no longer resolves fall back to
/// "Uncategorized" and a palette color rotated by bucket index.
pub fn category_histogram(tasks: &[Task], categories: &[Category]) -> Vec<CategoryBucket> {
    let mut histogram: Vec<CategoryBucket> = bucket_by_category(tasks)
        .into_iter()
        .enumerate()
        .map(|(index, (key, count))| {
            let category = key.and_then(|id| categories.iter().find(|c| c.id == id));
            CategoryBucket {
                name: category
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "Uncategorized".to_string()),
                tasks: count,
                color: category.map(|c| c.color.clone()).unwrap_or_else(|| {
                    colors::CHART_CATEGORY_PALETTE[index % colors::CHART_CATEGORY_PALETTE.len()]
                        .to_string()
                }),
            }
        })
        .collect();
    histogram.sort_by(|a, b| b.tasks.cmp(&a.tasks));
    histogram
}

/// Fixed high/medium/low buckets with total and completed counts. Missing or
/// unknown stored priority buckets as medium here.
pub fn priority_histogram(tasks: &[Task]) -> Vec<PriorityBucket> {
    let mut totals = [0usize; 3];
    let mut completed = [0usize; 3];
    for task in tasks {
        let rank = task.priority_or_default().rank() as usize;
        totals[rank] += 1;
        if task.completed {
            completed[rank] += 1;
        }
    }

    [Priority::High, Priority::Medium, Priority::Low]
        .into_iter()
        .map(|priority| {
            let rank = priority.rank() as usize;
            PriorityBucket {
                name: match priority {
                    Priority::High => "High",
                    Priority::Medium => "Medium",
                    Priority::Low => "Low",
                },
                tasks: totals[rank],
                completed: completed[rank],
                color: colors::chart_priority_color(priority),
            }
        })
        .collect()
}

/// Created/completed counts for each of the 7 local calendar days ending
/// today, oldest first. Always exactly 7 points.
pub fn seven_day_trend(tasks: &[Task], now: DateTime<Local>) -> Vec<TrendPoint> {
    let created_days: Vec<_> = tasks
        .iter()
        .map(|task| parse_timestamp(&task.created_at).map(|d| d.date_naive()))
        .collect();
    let completed_days: Vec<_> = tasks
        .iter()
        .map(|task| {
            task.completed_at
                .as_deref()
                .and_then(parse_timestamp)
                .map(|d| d.date_naive())
        })
        .collect();

    (0..7)
        .rev()
        .filter_map(|offset| now.date_naive().checked_sub_days(Days::new(offset)))
        .map(|day| TrendPoint {
            date: day.format("%a, %b %-d").to_string(),
            short_date: day.format("%a").to_string(),
            created: created_days.iter().filter(|d| **d == Some(day)).count(),
            completed: completed_days.iter().filter(|d| **d == Some(day)).count(),
        })
        .collect()
}

pub fn summary(tasks: &[Task]) -> AnalyticsSummary {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    let completion_rate = if total > 0 {
        ((completed as f64 / total as f64) * 100.0).round() as u32
    } else {
        0
    };
    AnalyticsSummary {
        total,
        completed,
        pending: total - completed,
        completion_rate,
    }
}

/// One analytics pass: filter once, compute every aggregate and the insight
/// messages from the same filtered set.
pub fn analytics_report(
    tasks: &[Task],
    categories: &[Category],
    filter: &AnalyticsFilter,
    now: DateTime<Local>,
) -> AnalyticsReport {
    let filtered = filter_tasks(tasks, filter, now);
    let summary = summary(&filtered);

    let high_priority_pending = filtered
        .iter()
        .filter(|task| task.priority.as_deref() == Some("high") && !task.completed)
        .count();

    // Most frequent bucket; the stable sort keeps first-seen order on ties.
    let most_used_key = {
        let mut buckets = bucket_by_category(&filtered);
        buckets.sort_by(|a, b| b.1.cmp(&a.1));
        buckets.first().map(|(key, _)| *key)
    };
    let most_used_category = most_used_key.map(|key| {
        key.and_then(|id| categories.iter().find(|c| c.id == id))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "Uncategorized".to_string())
    });

    let mut insights = Vec::new();
    if summary.completion_rate >= 70 {
        insights.push("🎉 Great job! You're highly productive!".to_string());
    } else if summary.completion_rate >= 40 {
        insights.push("💪 Good progress! Keep going!".to_string());
    } else if summary.total > 0 {
        insights.push("📈 Time to boost your productivity!".to_string());
    }
    if high_priority_pending > 0 {
        let plural = if high_priority_pending > 1 { "s" } else { "" };
        insights.push(format!(
            "⚠️ You have {high_priority_pending} high-priority task{plural} pending"
        ));
    }
    if let (Some(Some(_)), Some(name)) = (most_used_key, most_used_category.as_deref()) {
        insights.push(format!("📁 Most active category: {name}"));
    }

    AnalyticsReport {
        status: status_split(&filtered),
        categories: category_histogram(&filtered, categories),
        priorities: priority_histogram(&filtered),
        trend: seven_day_trend(&filtered, now),
        summary,
        high_priority_pending,
        most_used_category,
        insights,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        analytics_report, category_histogram, filter_tasks, priority_histogram, seven_day_trend,
        status_split, summary,
    };
    use crate::colors;
    use crate::models::{AnalyticsFilter, Category, DateRange, Priority, StatusFilter, Task};
    use chrono::{DateTime, Duration, Local, TimeZone};

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn task(id: i64) -> Task {
        Task {
            id,
            list_id: 1,
            text: format!("task {id}"),
            notes: String::new(),
            completed: false,
            priority: None,
            due_date: None,
            tags: Vec::new(),
            starred: false,
            category_id: None,
            created_at: (now() - Duration::days(1)).to_rfc3339(),
            updated_at: (now() - Duration::days(1)).to_rfc3339(),
            completed_at: None,
        }
    }

    fn completed_task(id: i64) -> Task {
        let mut t = task(id);
        t.completed = true;
        t.completed_at = Some(now().to_rfc3339());
        t
    }

    fn category(id: i64, name: &str, color: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            color: color.to_string(),
            icon: "📁".to_string(),
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn priority_filter_is_exact_but_histogram_defaults_to_medium() {
        let mut high = task(1);
        high.priority = Some("high".to_string());
        let unset = task(2);

        let filter = AnalyticsFilter {
            priority: Some(Priority::High),
            ..AnalyticsFilter::default()
        };
        let filtered = filter_tasks(&[high.clone(), unset.clone()], &filter, now());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);

        // The same unset task buckets as medium when aggregating.
        let histogram = priority_histogram(&[high, unset]);
        assert_eq!(histogram[0].tasks, 1); // High
        assert_eq!(histogram[1].tasks, 1); // Medium
        assert_eq!(histogram[2].tasks, 0); // Low
    }

    #[test]
    fn unknown_stored_priority_buckets_as_medium() {
        let mut odd = completed_task(1);
        odd.priority = Some("someday".to_string());
        let histogram = priority_histogram(&[odd]);
        assert_eq!(histogram[1].tasks, 1);
        assert_eq!(histogram[1].completed, 1);
    }

    #[test]
    fn status_split_sums_to_input_length() {
        let tasks = vec![task(1), completed_task(2), task(3), completed_task(4)];
        let split = status_split(&tasks);
        assert_eq!(split[0].name, "Completed");
        assert_eq!(split[1].name, "Pending");
        assert_eq!(split[0].value + split[1].value, tasks.len());
        assert_eq!(split[0].value, 2);
    }

    #[test]
    fn filtering_preserves_input_order() {
        let mut tasks: Vec<Task> = (1..=5).map(task).collect();
        tasks[1].completed = true;
        tasks[3].completed = true;
        let filter = AnalyticsFilter {
            status: StatusFilter::Active,
            ..AnalyticsFilter::default()
        };
        let ids: Vec<i64> = filter_tasks(&tasks, &filter, now())
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn week_range_drops_old_tasks_month_range_keeps_them() {
        let mut recent = task(1);
        recent.created_at = (now() - Duration::days(2)).to_rfc3339();
        let mut old = task(2);
        old.created_at = (now() - Duration::days(20)).to_rfc3339();
        let mut malformed = task(3);
        malformed.created_at = "whenever".to_string();
        let tasks = vec![recent, old, malformed];

        let week = AnalyticsFilter {
            date_range: DateRange::Week,
            ..AnalyticsFilter::default()
        };
        let month = AnalyticsFilter {
            date_range: DateRange::Month,
            ..AnalyticsFilter::default()
        };
        let all = AnalyticsFilter::default();

        assert_eq!(filter_tasks(&tasks, &week, now()).len(), 1);
        assert_eq!(filter_tasks(&tasks, &month, now()).len(), 2);
        // No bound: even the malformed timestamp survives.
        assert_eq!(filter_tasks(&tasks, &all, now()).len(), 3);
    }

    #[test]
    fn category_filter_matches_exact_id() {
        let mut a = task(1);
        a.category_id = Some(7);
        let b = task(2);
        let filter = AnalyticsFilter {
            category: Some(7),
            ..AnalyticsFilter::default()
        };
        let filtered = filter_tasks(&[a, b], &filter, now());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
    }

    #[test]
    fn category_histogram_sorts_descending_with_fallbacks() {
        let categories = vec![category(1, "Work", "#4dabf7")];
        let mut tasks = Vec::new();
        for id in 1..=2 {
            let mut t = task(id);
            t.category_id = Some(1);
            tasks.push(t);
        }
        // Category 9 was deleted; three orphans and one uncategorized.
        for id in 3..=5 {
            let mut t = task(id);
            t.category_id = Some(9);
            tasks.push(t);
        }
        tasks.push(task(6));

        let histogram = category_histogram(&tasks, &categories);
        assert_eq!(histogram.len(), 3);
        assert_eq!(histogram[0].name, "Uncategorized");
        assert_eq!(histogram[0].tasks, 3);
        // Orphan bucket was seen second, so it rotates to the second palette color.
        assert_eq!(histogram[0].color, colors::CHART_CATEGORY_PALETTE[1]);
        assert_eq!(histogram[1].name, "Work");
        assert_eq!(histogram[1].color, "#4dabf7");
        assert_eq!(histogram[2].tasks, 1);
    }

    #[test]
    fn category_histogram_ties_keep_first_seen_order() {
        let categories = vec![category(1, "Work", "#4dabf7"), category(2, "Home", "#69db7c")];
        let mut a = task(1);
        a.category_id = Some(2);
        let mut b = task(2);
        b.category_id = Some(1);
        let histogram = category_histogram(&[a, b], &categories);
        assert_eq!(histogram[0].name, "Home");
        assert_eq!(histogram[1].name, "Work");
    }

    #[test]
    fn trend_always_has_seven_points() {
        assert_eq!(seven_day_trend(&[], now()).len(), 7);
    }

    #[test]
    fn trend_counts_by_local_calendar_day() {
        let mut created_two_days_ago = task(1);
        created_two_days_ago.created_at = (now() - Duration::days(2)).to_rfc3339();
        let mut done_today = completed_task(2);
        done_today.created_at = (now() - Duration::days(2)).to_rfc3339();
        let mut too_old = task(3);
        too_old.created_at = (now() - Duration::days(10)).to_rfc3339();

        let trend = seven_day_trend(&[created_two_days_ago, done_today, too_old], now());
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[4].created, 2); // two days ago, oldest-first indexing
        assert_eq!(trend[6].completed, 1); // today
        let total_created: usize = trend.iter().map(|p| p.created).sum();
        assert_eq!(total_created, 2); // the 10-day-old task is off the chart
    }

    #[test]
    fn summary_rounds_completion_rate() {
        let tasks = vec![completed_task(1), task(2), task(3)];
        let s = summary(&tasks);
        assert_eq!(s.total, 3);
        assert_eq!(s.completed, 1);
        assert_eq!(s.pending, 2);
        assert_eq!(s.completion_rate, 33);
        assert_eq!(summary(&[]).completion_rate, 0);
    }

    #[test]
    fn insight_tiers_follow_completion_rate() {
        let report = analytics_report(
            &[completed_task(1), completed_task(2), completed_task(3), task(4)],
            &[],
            &AnalyticsFilter::default(),
            now(),
        );
        assert!(report.insights[0].contains("Great job"));

        let report = analytics_report(
            &[completed_task(1), task(2)],
            &[],
            &AnalyticsFilter::default(),
            now(),
        );
        assert!(report.insights[0].contains("Good progress"));

        let report = analytics_report(&[task(1)], &[], &AnalyticsFilter::default(), now());
        assert!(report.insights[0].contains("boost your productivity"));

        let report = analytics_report(&[], &[], &AnalyticsFilter::default(), now());
        assert!(report.insights.is_empty());
    }

    #[test]
    fn high_priority_pending_warning_pluralizes() {
        let mut one = task(1);
        one.priority = Some("high".to_string());
        let report = analytics_report(&[one.clone()], &[], &AnalyticsFilter::default(), now());
        assert!(report
            .insights
            .iter()
            .any(|m| m.contains("1 high-priority task pending")));

        let mut two = task(2);
        two.priority = Some("high".to_string());
        let report = analytics_report(&[one, two], &[], &AnalyticsFilter::default(), now());
        assert!(report
            .insights
            .iter()
            .any(|m| m.contains("2 high-priority tasks pending")));
    }

    #[test]
    fn most_active_category_insight_skips_uncategorized() {
        let categories = vec![category(3, "Errands", "#ffa94d")];
        let mut a = task(1);
        a.category_id = Some(3);
        let mut b = task(2);
        b.category_id = Some(3);
        let uncategorized = task(3);

        let report = analytics_report(
            &[a, b, uncategorized.clone()],
            &categories,
            &AnalyticsFilter::default(),
            now(),
        );
        assert_eq!(report.most_used_category.as_deref(), Some("Errands"));
        assert!(report
            .insights
            .iter()
            .any(|m| m.contains("Most active category: Errands")));

        // Uncategorized dominating suppresses the message entirely.
        let report = analytics_report(
            &[uncategorized],
            &categories,
            &AnalyticsFilter::default(),
            now(),
        );
        assert!(!report.insights.iter().any(|m| m.contains("Most active")));
    }
}
