//! The only path from handlers to persistent storage.
//!
//! # Design
//! The repository is deliberately thin: one statement per call, no caching,
//! no retries, no cross-record transactions. Existence checks for update and
//! delete belong to the caller, which means there is a window between the
//! caller's `find_by_id` and the mutating call in which another request may
//! delete the row. That window is not closed here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;
use task_core::{Task, TaskDraft, TaskId, TaskStatus};
use thiserror::Error;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("task {0} not found")]
    NotFound(TaskId),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row that can no longer be read back as a `Task`.
    #[error("task {id} is corrupt: {reason}")]
    CorruptRecord { id: i64, reason: String },
}

/// Persistence contract for tasks.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a new row and return it as stored, with `id` and timestamps
    /// assigned. An unset status is stored as `ToDo`.
    async fn create(&self, draft: &TaskDraft) -> RepositoryResult<Task>;

    /// Every task, oldest first.
    async fn find_all(&self) -> RepositoryResult<Vec<Task>>;

    /// # Errors
    ///
    /// [`RepositoryError::NotFound`] when no row has this id.
    async fn find_by_id(&self, id: TaskId) -> RepositoryResult<Task>;

    /// Overwrite every caller-controlled field of the row `task.id` and stamp
    /// `updated_at`. `created_at` is never written. The caller must already
    /// have confirmed that the row exists.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::NotFound`] only if the row disappeared after the
    /// caller's check.
    async fn update(&self, task: &Task) -> RepositoryResult<Task>;

    /// Remove the row. Deleting an id that does not exist is not an error.
    async fn delete(&self, id: TaskId) -> RepositoryResult<()>;
}

const TASK_COLUMNS: &str = "id, title, description, due_date, status, created_at, updated_at";

#[derive(Debug, FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    description: String,
    due_date: Option<DateTime<Utc>>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = RepositoryError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<TaskStatus>()
            .map_err(|e| RepositoryError::CorruptRecord {
                id: row.id,
                reason: e.to_string(),
            })?;
        Ok(Task {
            id: TaskId::new(row.id),
            title: row.title,
            description: row.description,
            due_date: row.due_date,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// [`TaskRepository`] backed by a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn create(&self, draft: &TaskDraft) -> RepositoryResult<Task> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO tasks (title, description, due_date, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {TASK_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.due_date)
            .bind(draft.status.unwrap_or_default().as_str())
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        row.try_into()
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id");
        sqlx::query_as::<_, TaskRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Task::try_from)
            .collect()
    }

    async fn find_by_id(&self, id: TaskId) -> RepositoryResult<Task> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?");
        sqlx::query_as::<_, TaskRow>(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound(id))?
            .try_into()
    }

    async fn update(&self, task: &Task) -> RepositoryResult<Task> {
        let sql = format!(
            "UPDATE tasks SET title = ?, description = ?, due_date = ?, status = ?, updated_at = ? \
             WHERE id = ? RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, TaskRow>(&sql)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.due_date)
            .bind(task.status.as_str())
            .bind(Utc::now())
            .bind(task.id.get())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound(task.id))?
            .try_into()
    }

    async fn delete(&self, id: TaskId) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
