//! The active-list page view: search, category and status filtering, the
//! starred-then-priority sort, and the active/completed partition.

use crate::models::{ListCounts, ListQuery, Task, TaskListView};

/// Filter, sort and partition one list's tasks. Pure; the input snapshot is
/// never mutated and the view owns its rows.
pub fn task_list_view(tasks: &[Task], query: &ListQuery) -> TaskListView {
    let search = query.search.trim().to_lowercase();

    let mut filtered: Vec<&Task> = tasks
        .iter()
        .filter(|task| matches_search(task, &search))
        .filter(|task| query.category.map_or(true, |id| task.category_id == Some(id)))
        .filter(|task| query.status.retains(task.completed))
        .collect();

    // Stable two-level sort: starred first, then priority rank. Unknown or
    // missing priority ranks as medium.
    filtered.sort_by_key(|task| (!task.starred, task.priority_or_default().rank()));

    let mut view = TaskListView::default();
    for task in filtered {
        if task.completed {
            view.completed.push(task.clone());
        } else {
            view.active.push(task.clone());
        }
    }
    view
}

/// Whitespace-only search means no search. A task stays when any of text,
/// notes or a tag name contains the query, case-insensitively.
fn matches_search(task: &Task, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    task.text.to_lowercase().contains(search)
        || task.notes.to_lowercase().contains(search)
        || task
            .tags
            .iter()
            .any(|tag| tag.name.to_lowercase().contains(search))
}

/// Unfiltered per-list counts for the sidebar and list cards. Urgent counts
/// only tasks whose stored priority is exactly "high".
pub fn list_counts(tasks: &[Task]) -> ListCounts {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    let active = total - completed;
    let urgent = tasks
        .iter()
        .filter(|task| !task.completed && task.priority.as_deref() == Some("high"))
        .count();
    ListCounts {
        total,
        active,
        completed,
        urgent,
        all_completed: total > 0 && active == 0,
    }
}
