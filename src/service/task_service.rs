use std::sync::Arc;

use thiserror::Error;

use crate::models::task::{CreateTaskRequest, NewTask, Task, TaskStatus, UpdateTaskRequest};
use crate::repository::{RepositoryError, TaskRepository};

/// Service-level outcomes for task operations. Validation failures are
/// caller faults detected before any store access; `NotFound` is kept apart
/// from generic repository failures so the handlers can map it to 404.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("task with ID {0} not found")]
    NotFound(i32),

    #[error("{context}: {source}")]
    Repository {
        context: &'static str,
        source: RepositoryError,
    },
}

impl TaskServiceError {
    fn repository(context: &'static str, source: RepositoryError) -> Self {
        Self::Repository { context, source }
    }
}

/// Business logic for task management. Holds the storage gateway behind a
/// trait object so tests can substitute an in-memory implementation.
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    /// Creates a new task. New tasks always start out pending.
    pub async fn create_task(&self, req: &CreateTaskRequest) -> Result<Task, TaskServiceError> {
        if req.title.is_empty() {
            return Err(TaskServiceError::Validation("title is required"));
        }

        let new_task = NewTask {
            title: req.title.clone(),
            description: req.description.clone(),
            status: TaskStatus::Pending,
        };

        self.repo
            .create(new_task)
            .await
            .map_err(|e| TaskServiceError::repository("failed to create task in repository", e))
    }

    /// Retrieves a single task by its id.
    pub async fn get_task(&self, id: i32) -> Result<Task, TaskServiceError> {
        if id <= 0 {
            return Err(TaskServiceError::Validation("invalid task ID"));
        }

        self.repo.get_by_id(id).await.map_err(|e| match e {
            RepositoryError::NotFound => TaskServiceError::NotFound(id),
            other => TaskServiceError::repository("failed to get task from repository", other),
        })
    }

    /// Retrieves all tasks, newest first. An empty store yields an empty
    /// list, not an error.
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        self.repo
            .get_all()
            .await
            .map_err(|e| TaskServiceError::repository("failed to get all tasks from repository", e))
    }

    /// Applies a partial update to an existing task. Fields that are absent
    /// or empty keep their stored values; a status outside the known set
    /// aborts before anything is written.
    pub async fn update_task(
        &self,
        id: i32,
        req: &UpdateTaskRequest,
    ) -> Result<Task, TaskServiceError> {
        if id <= 0 {
            return Err(TaskServiceError::Validation("invalid task ID"));
        }

        let mut task = self.repo.get_by_id(id).await.map_err(|e| match e {
            RepositoryError::NotFound => TaskServiceError::NotFound(id),
            other => TaskServiceError::repository("failed to get task from repository", other),
        })?;

        if let Some(title) = req.title.as_deref() {
            if !title.is_empty() {
                task.title = title.to_string();
            }
        }
        if let Some(description) = req.description.as_deref() {
            if !description.is_empty() {
                task.description = description.to_string();
            }
        }
        if let Some(status) = req.status.as_deref() {
            if !status.is_empty() {
                task.status = status
                    .parse()
                    .map_err(|_| TaskServiceError::Validation("invalid status value"))?;
            }
        }

        self.repo.update(&task).await.map_err(|e| match e {
            // The row can disappear between the fetch above and this write.
            RepositoryError::NotFound => TaskServiceError::NotFound(id),
            other => TaskServiceError::repository("failed to update task in repository", other),
        })
    }

    /// Deletes a task by its id.
    pub async fn delete_task(&self, id: i32) -> Result<(), TaskServiceError> {
        if id <= 0 {
            return Err(TaskServiceError::Validation("invalid task ID"));
        }

        self.repo.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => TaskServiceError::NotFound(id),
            other => TaskServiceError::repository("failed to delete task from repository", other),
        })
    }
}
