use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

use crate::models::task::{NewTask, ParseTaskStatusError, Task};

/// Errors returned by task repository implementations. "Not found" is a
/// variant of its own so callers classify it structurally instead of
/// matching on error text.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("task not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// A stored row failed to map back into a domain task.
    #[error("invalid task row: {0}")]
    Decode(#[from] ParseTaskStatusError),
}

/// Storage gateway for task records.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a new task and returns it with the store-assigned id and
    /// timestamps.
    async fn create(&self, new_task: NewTask) -> Result<Task, RepositoryError>;

    /// Fetches a task by id. Returns [`RepositoryError::NotFound`] when no
    /// row exists.
    async fn get_by_id(&self, id: i32) -> Result<Task, RepositoryError>;

    /// Fetches every task, newest first.
    async fn get_all(&self) -> Result<Vec<Task>, RepositoryError>;

    /// Persists the given task's mutable fields and refreshes `updated_at`.
    /// Returns [`RepositoryError::NotFound`] when the row no longer exists.
    async fn update(&self, task: &Task) -> Result<Task, RepositoryError>;

    /// Deletes a task by id. Returns [`RepositoryError::NotFound`] when zero
    /// rows were affected.
    async fn delete(&self, id: i32) -> Result<(), RepositoryError>;
}

/// Row shape coming back from the tasks table. Status is stored as text and
/// parsed on the way out.
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: i32,
    title: String,
    description: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = ParseTaskStatusError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-backed implementation of [`TaskRepository`].
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, new_task: NewTask) -> Result<Task, RepositoryError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "INSERT INTO tasks (title, description, status, created_at, updated_at)
             VALUES ($1, $2, $3, NOW(), NOW())
             RETURNING id, title, description, status, created_at, updated_at",
        )
        .bind(&new_task.title)
        .bind(&new_task.description)
        .bind(new_task.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_into()?)
    }

    async fn get_by_id(&self, id: i32) -> Result<Task, RepositoryError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "SELECT id, title, description, status, created_at, updated_at
             FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.try_into()?)
    }

    async fn get_all(&self) -> Result<Vec<Task>, RepositoryError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, title, description, status, created_at, updated_at
             FROM tasks ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| row.try_into().map_err(RepositoryError::Decode))
            .collect()
    }

    async fn update(&self, task: &Task) -> Result<Task, RepositoryError> {
        // The row may have been deleted since it was fetched; an empty
        // RETURNING result reports that as NotFound instead of assuming the
        // write landed.
        let row = sqlx::query_as::<_, TaskRow>(
            "UPDATE tasks
             SET title = $1, description = $2, status = $3, updated_at = NOW()
             WHERE id = $4
             RETURNING id, title, description, status, created_at, updated_at",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.try_into()?)
    }

    async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
