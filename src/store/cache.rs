use std::sync::Arc;

use tokio::sync::RwLock;

use crate::core::models::{Task, TaskPatch};

/// Last known copy of the task collection.
///
/// Refreshed after every successful primary read and used when the primary store
/// is unreachable. The contents may be stale; nothing here is authoritative.
/// Clones share the same underlying collection.
#[derive(Debug, Clone, Default)]
pub struct TaskCache {
    tasks: Arc<RwLock<Vec<Task>>>,
}

impl TaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(tasks)),
        }
    }

    pub async fn snapshot(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    pub async fn replace(&self, tasks: Vec<Task>) {
        *self.tasks.write().await = tasks;
    }

    /// Inserts the task, or overwrites the cached copy with the same id.
    pub async fn upsert(&self, task: Task) {
        let mut tasks = self.tasks.write().await;
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => tasks.push(task),
        }
    }

    pub async fn apply(&self, id: &str, patch: &TaskPatch) -> Option<Task> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.iter_mut().find(|t| t.id == id)?;
        task.apply(patch);
        Some(task.clone())
    }

    pub async fn remove(&self, id: &str) -> Option<Task> {
        let mut tasks = self.tasks.write().await;
        let index = tasks.iter().position(|t| t.id == id)?;
        Some(tasks.remove(index))
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}
