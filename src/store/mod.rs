//! Task persistence behind a single capability interface.
//!
//! The concrete backing is chosen once at startup by [`build_store`]; the rest of
//! the crate only sees `Arc<dyn TaskStore>`.

pub mod cache;
pub mod memory;
pub mod supabase;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::core::config::{AppConfig, StoreBackend};
use crate::core::models::{NewTask, Task, TaskPatch};
use crate::errors::TodoError;

pub use cache::TaskCache;
pub use memory::InMemoryTaskStore;
pub use supabase::SupabaseTaskStore;

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks in the backend's natural order.
    async fn list(&self) -> Result<Vec<Task>, TodoError>;

    /// Persists a new task; the store assigns its identifier.
    async fn insert(&self, new_task: NewTask) -> Result<Task, TodoError>;

    /// Returns `TodoError::NotFound` when no task has this id.
    async fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task, TodoError>;

    /// Removes the task and returns it. `TodoError::NotFound` when absent.
    async fn delete(&self, id: &str) -> Result<Task, TodoError>;
}

/// Sample tasks used when `SEED_DEMO_TASKS` is enabled.
pub fn demo_tasks() -> Vec<Task> {
    let mut tasks = vec![
        Task::from_new(NewTask::new(
            "Complete the Todo Summary Assistant project",
            Some("Implement todo management, AI summary, and Slack integration.".to_string()),
        )),
        Task::from_new(NewTask::new(
            "Add proper error handling",
            Some("Ensure all error cases are handled in the UI.".to_string()),
        )),
        Task::from_new(NewTask::new(
            "Test the application thoroughly",
            Some("Verify that all features work as expected.".to_string()),
        )),
    ];
    tasks[1].completed = true;
    tasks
}

/// Builds the configured primary store. `seed` only applies to the in-memory backend.
pub fn build_store(config: &AppConfig, seed: Vec<Task>) -> Result<Arc<dyn TaskStore>, TodoError> {
    match config.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory task store with {} seeded tasks", seed.len());
            Ok(Arc::new(InMemoryTaskStore::with_tasks(seed)))
        }
        StoreBackend::Supabase => {
            let supabase = config.supabase.as_ref().ok_or_else(|| {
                TodoError::ConfigError("Supabase backend selected without credentials".to_string())
            })?;
            info!(table = %supabase.table, "Using Supabase task store");
            Ok(Arc::new(SupabaseTaskStore::new(
                supabase,
                config.external_timeout,
            )?))
        }
    }
}
