use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use crate::models::task::{NewTask, Task};
use crate::repository::task_repository::{RepositoryError, TaskRepository};

/// Thread-safe in-memory task repository. Substitute for the Postgres
/// implementation in unit and HTTP tests; obeys the same contract,
/// including not-found signalling and newest-first ordering.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    tasks: HashMap<i32, Task>,
    next_id: i32,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> RepositoryError {
    RepositoryError::Database(sqlx::Error::Io(std::io::Error::other(err.to_string())))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, new_task: NewTask) -> Result<Task, RepositoryError> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.next_id += 1;
        let now = Utc::now();
        let task = Task {
            id: state.next_id,
            title: new_task.title,
            description: new_task.description,
            status: new_task.status,
            created_at: now,
            updated_at: now,
        };
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get_by_id(&self, id: i32) -> Result<Task, RepositoryError> {
        let state = self.state.read().map_err(poisoned)?;
        state.tasks.get(&id).cloned().ok_or(RepositoryError::NotFound)
    }

    async fn get_all(&self) -> Result<Vec<Task>, RepositoryError> {
        let state = self.state.read().map_err(poisoned)?;
        let mut tasks: Vec<Task> = state.tasks.values().cloned().collect();
        // Ties on created_at fall back to id so rapid inserts still list
        // newest-first deterministically.
        tasks.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(tasks)
    }

    async fn update(&self, task: &Task) -> Result<Task, RepositoryError> {
        let mut state = self.state.write().map_err(poisoned)?;
        let existing = state
            .tasks
            .get(&task.id)
            .ok_or(RepositoryError::NotFound)?;

        let mut updated = task.clone();
        // created_at is immutable in the store regardless of what the caller
        // put in the struct.
        updated.created_at = existing.created_at;
        updated.updated_at = Utc::now();
        state.tasks.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let mut state = self.state.write().map_err(poisoned)?;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}
