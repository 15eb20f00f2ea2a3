use crate::errors::{AppError, AppResult};
use crate::models::{Category, CategoryPatch, List, NewTask, Task, TaskPatch};
use crate::watch::{Change, Collection};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fs;
use std::path::Path;
use tokio::sync::broadcast;
use tokio::sync::Mutex;

const SCHEMA_SQL: &str = include_str!("schema.sql");

const DEFAULT_LIST_NAME: &str = "Personal";
const DEFAULT_CATEGORY_ICON: &str = "📁";
const DEFAULT_CATEGORIES: [(&str, &str, &str); 5] = [
    ("Work", "#4dabf7", "💼"),
    ("Personal", "#69db7c", "🏠"),
    ("Shopping", "#ffa94d", "🛒"),
    ("Health", "#ff6b6b", "❤️"),
    ("Learning", "#9775fa", "📚"),
];

const TASK_COLUMNS: &str = "id, list_id, text, notes, completed, priority, due_date, tags_json, starred, category_id, created_at, updated_at, completed_at";

/// Embedded store for lists, tasks and categories. One SQLite connection
/// behind an async mutex; every committed mutation publishes a [`Change`]
/// so registered queries can re-run.
#[derive(Debug)]
pub struct Store {
    conn: Mutex<Connection>,
    changes: broadcast::Sender<Change>,
}

impl Store {
    pub fn open(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| AppError::Io(err.to_string()))?;
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> AppResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> AppResult<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        let (changes, _) = broadcast::channel(64);
        Ok(Self {
            conn: Mutex::new(conn),
            changes,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.changes.subscribe()
    }

    fn notify(&self, collection: Collection) {
        // No receivers is fine; nothing is watching yet.
        let _ = self.changes.send(Change { collection });
    }

    /// First-run seeding: a default list and the stock categories, each only
    /// when its collection is empty.
    pub async fn seed_defaults(&self) -> AppResult<()> {
        let now = Utc::now().to_rfc3339();
        let mut seeded_lists = false;
        let mut seeded_categories = false;
        {
            let conn = self.conn.lock().await;
            let lists: i64 = conn.query_row("SELECT COUNT(*) FROM lists", [], |row| row.get(0))?;
            if lists == 0 {
                conn.execute(
                    "INSERT INTO lists (name, created_at) VALUES (?1, ?2)",
                    params![DEFAULT_LIST_NAME, now],
                )?;
                seeded_lists = true;
            }

            let categories: i64 =
                conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
            if categories == 0 {
                for (name, color, icon) in DEFAULT_CATEGORIES {
                    conn.execute(
                        "INSERT INTO categories (name, color, icon, created_at) VALUES (?1, ?2, ?3, ?4)",
                        params![name, color, icon, now],
                    )?;
                }
                seeded_categories = true;
            }
        }
        if seeded_lists {
            self.notify(Collection::Lists);
        }
        if seeded_categories {
            self.notify(Collection::Categories);
        }
        Ok(())
    }

    // ─── Lists ──────────────────────────────────────────────────────────────

    pub async fn lists(&self) -> AppResult<Vec<List>> {
        let conn = self.conn.lock().await;
        let mut statement = conn.prepare("SELECT id, name, created_at FROM lists ORDER BY id")?;
        let rows = statement.query_map([], |row| {
            Ok(List {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }

    pub async fn add_list(&self, name: &str) -> AppResult<List> {
        let now = Utc::now().to_rfc3339();
        let id = {
            let conn = self.conn.lock().await;
            conn.execute(
                "INSERT INTO lists (name, created_at) VALUES (?1, ?2)",
                params![name, now],
            )?;
            conn.last_insert_rowid()
        };
        self.notify(Collection::Lists);
        Ok(List {
            id,
            name: name.to_string(),
            created_at: now,
        })
    }

    pub async fn rename_list(&self, id: i64, name: &str) -> AppResult<()> {
        let updated = {
            let conn = self.conn.lock().await;
            conn.execute("UPDATE lists SET name = ?1 WHERE id = ?2", params![name, id])?
        };
        if updated == 0 {
            return Err(AppError::NotFound(format!("list {id}")));
        }
        self.notify(Collection::Lists);
        Ok(())
    }

    /// Deleting a list cascades to its tasks, in one transaction.
    pub async fn delete_list(&self, id: i64) -> AppResult<()> {
        let removed_tasks = {
            let mut conn = self.conn.lock().await;
            let tx = conn.transaction()?;
            let removed_tasks =
                tx.execute("DELETE FROM tasks WHERE list_id = ?1", params![id])?;
            let removed = tx.execute("DELETE FROM lists WHERE id = ?1", params![id])?;
            if removed == 0 {
                return Err(AppError::NotFound(format!("list {id}")));
            }
            tx.commit()?;
            removed_tasks
        };
        tracing::debug!(list_id = id, removed_tasks, "deleted list");
        if removed_tasks > 0 {
            self.notify(Collection::Tasks);
        }
        self.notify(Collection::Lists);
        Ok(())
    }

    // ─── Tasks ──────────────────────────────────────────────────────────────

    /// Cross-list scan, insertion order.
    pub async fn tasks(&self) -> AppResult<Vec<Task>> {
        let conn = self.conn.lock().await;
        let mut statement =
            conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id"))?;
        let rows = statement.query_map([], task_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }

    pub async fn tasks_in_list(&self, list_id: i64) -> AppResult<Vec<Task>> {
        let conn = self.conn.lock().await;
        let mut statement = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE list_id = ?1 ORDER BY id"
        ))?;
        let rows = statement.query_map(params![list_id], task_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }

    pub async fn task(&self, id: i64) -> AppResult<Option<Task>> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
            params![id],
            task_from_row,
        )
        .optional()
        .map_err(AppError::from)
    }

    pub async fn add_task(&self, new: NewTask) -> AppResult<Task> {
        let now = Utc::now().to_rfc3339();
        let priority = new.priority.unwrap_or_else(|| "medium".to_string());
        let tags_json = serde_json::to_string(&new.tags)?;

        let id = {
            let conn = self.conn.lock().await;
            let list_exists: Option<i64> = conn
                .query_row(
                    "SELECT id FROM lists WHERE id = ?1",
                    params![new.list_id],
                    |row| row.get(0),
                )
                .optional()?;
            if list_exists.is_none() {
                return Err(AppError::NotFound(format!("list {}", new.list_id)));
            }
            conn.execute(
                "INSERT INTO tasks (list_id, text, notes, completed, priority, due_date, tags_json, starred, category_id, created_at, updated_at, completed_at)
                 VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6, 0, ?7, ?8, ?9, NULL)",
                params![
                    new.list_id,
                    new.text,
                    new.notes,
                    priority,
                    new.due_date,
                    tags_json,
                    new.category_id,
                    now,
                    now,
                ],
            )?;
            conn.last_insert_rowid()
        };
        self.notify(Collection::Tasks);

        Ok(Task {
            id,
            list_id: new.list_id,
            text: new.text,
            notes: new.notes,
            completed: false,
            priority: Some(priority),
            due_date: new.due_date,
            tags: new.tags,
            starred: false,
            category_id: new.category_id,
            created_at: now.clone(),
            updated_at: now,
            completed_at: None,
        })
    }

    /// Apply a partial update. `updated_at` is always re-stamped and
    /// `completed_at` tracks the `completed` transitions: set when a task
    /// flips to done, cleared when it flips back.
    pub async fn update_task(&self, id: i64, patch: TaskPatch) -> AppResult<Task> {
        let now = Utc::now().to_rfc3339();
        let task = {
            let conn = self.conn.lock().await;
            let mut task = conn
                .query_row(
                    &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                    params![id],
                    task_from_row,
                )
                .optional()?
                .ok_or_else(|| AppError::NotFound(format!("task {id}")))?;

            if let Some(list_id) = patch.list_id {
                task.list_id = list_id;
            }
            if let Some(text) = patch.text {
                task.text = text;
            }
            if let Some(notes) = patch.notes {
                task.notes = notes;
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
            }
            if let Some(due_date) = patch.due_date {
                task.due_date = due_date;
            }
            if let Some(tags) = patch.tags {
                task.tags = tags;
            }
            if let Some(starred) = patch.starred {
                task.starred = starred;
            }
            if let Some(category_id) = patch.category_id {
                task.category_id = category_id;
            }
            if let Some(completed) = patch.completed {
                if completed != task.completed {
                    task.completed_at = completed.then(|| now.clone());
                }
                task.completed = completed;
            }
            task.updated_at = now;

            let tags_json = serde_json::to_string(&task.tags)?;
            conn.execute(
                "UPDATE tasks SET list_id = ?1, text = ?2, notes = ?3, completed = ?4, priority = ?5, due_date = ?6, tags_json = ?7, starred = ?8, category_id = ?9, updated_at = ?10, completed_at = ?11
                 WHERE id = ?12",
                params![
                    task.list_id,
                    task.text,
                    task.notes,
                    task.completed,
                    task.priority,
                    task.due_date,
                    tags_json,
                    task.starred,
                    task.category_id,
                    task.updated_at,
                    task.completed_at,
                    id,
                ],
            )?;
            task
        };
        self.notify(Collection::Tasks);
        Ok(task)
    }

    pub async fn delete_task(&self, id: i64) -> AppResult<()> {
        let removed = {
            let conn = self.conn.lock().await;
            conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?
        };
        if removed == 0 {
            return Err(AppError::NotFound(format!("task {id}")));
        }
        self.notify(Collection::Tasks);
        Ok(())
    }

    /// "Clear completed" for one list. Returns how many rows went away.
    pub async fn delete_completed(&self, list_id: i64) -> AppResult<usize> {
        let removed = {
            let conn = self.conn.lock().await;
            conn.execute(
                "DELETE FROM tasks WHERE list_id = ?1 AND completed = 1",
                params![list_id],
            )?
        };
        if removed > 0 {
            self.notify(Collection::Tasks);
        }
        Ok(removed)
    }

    // ─── Categories ─────────────────────────────────────────────────────────

    pub async fn categories(&self) -> AppResult<Vec<Category>> {
        let conn = self.conn.lock().await;
        let mut statement =
            conn.prepare("SELECT id, name, color, icon, created_at FROM categories ORDER BY id")?;
        let rows = statement.query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
                color: row.get(2)?,
                icon: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }

    pub async fn add_category(
        &self,
        name: &str,
        color: &str,
        icon: Option<&str>,
    ) -> AppResult<Category> {
        let now = Utc::now().to_rfc3339();
        let icon = icon.unwrap_or(DEFAULT_CATEGORY_ICON);
        let id = {
            let conn = self.conn.lock().await;
            conn.execute(
                "INSERT INTO categories (name, color, icon, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![name, color, icon, now],
            )?;
            conn.last_insert_rowid()
        };
        self.notify(Collection::Categories);
        Ok(Category {
            id,
            name: name.to_string(),
            color: color.to_string(),
            icon: icon.to_string(),
            created_at: now,
        })
    }

    pub async fn update_category(&self, id: i64, patch: CategoryPatch) -> AppResult<Category> {
        let category = {
            let conn = self.conn.lock().await;
            let mut category = conn
                .query_row(
                    "SELECT id, name, color, icon, created_at FROM categories WHERE id = ?1",
                    params![id],
                    |row| {
                        Ok(Category {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            color: row.get(2)?,
                            icon: row.get(3)?,
                            created_at: row.get(4)?,
                        })
                    },
                )
                .optional()?
                .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;

            if let Some(name) = patch.name {
                category.name = name;
            }
            if let Some(color) = patch.color {
                category.color = color;
            }
            if let Some(icon) = patch.icon {
                category.icon = icon;
            }
            conn.execute(
                "UPDATE categories SET name = ?1, color = ?2, icon = ?3 WHERE id = ?4",
                params![category.name, category.color, category.icon, id],
            )?;
            category
        };
        self.notify(Collection::Categories);
        Ok(category)
    }

    /// Categories are weakly referenced: deletion unlinks referencing tasks
    /// (category reset to null, `updated_at` untouched) instead of cascading.
    pub async fn delete_category(&self, id: i64) -> AppResult<()> {
        let unlinked = {
            let mut conn = self.conn.lock().await;
            let tx = conn.transaction()?;
            let unlinked = tx.execute(
                "UPDATE tasks SET category_id = NULL WHERE category_id = ?1",
                params![id],
            )?;
            let removed = tx.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
            if removed == 0 {
                return Err(AppError::NotFound(format!("category {id}")));
            }
            tx.commit()?;
            unlinked
        };
        tracing::debug!(category_id = id, unlinked, "deleted category");
        if unlinked > 0 {
            self.notify(Collection::Tasks);
        }
        self.notify(Collection::Categories);
        Ok(())
    }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let tags_json: String = row.get(7)?;
    let tags = serde_json::from_str(&tags_json).unwrap_or_else(|err| {
        tracing::warn!(%err, "malformed tags column; treating as empty");
        Vec::new()
    });
    Ok(Task {
        id: row.get(0)?,
        list_id: row.get(1)?,
        text: row.get(2)?,
        notes: row.get(3)?,
        completed: row.get(4)?,
        priority: row.get(5)?,
        due_date: row.get(6)?,
        tags,
        starred: row.get(8)?,
        category_id: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
        completed_at: row.get(12)?,
    })
}
