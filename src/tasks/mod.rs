pub mod models;
pub mod repo;
pub mod service;

pub use models::{NewTask, Task, TaskChanges, TaskDraft, TaskPriority, TaskStatus};
pub use repo::{PgTaskStore, TaskStore};
pub use service::OwnedTasks;
