pub mod memory;
pub mod task_repository;

pub use memory::InMemoryTaskRepository;
pub use task_repository::{PgTaskRepository, RepositoryError, TaskRepository};
