use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::TaskStore;
use crate::core::models::{NewTask, Task, TaskPatch};
use crate::errors::TodoError;

/// Process-local store. Tasks are listed in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
        }
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn list(&self) -> Result<Vec<Task>, TodoError> {
        Ok(self.tasks.read().await.clone())
    }

    async fn insert(&self, new_task: NewTask) -> Result<Task, TodoError> {
        let task = Task::from_new(new_task);
        debug!(id = %task.id, "Inserting task in memory");
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task, TodoError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TodoError::NotFound(id.to_string()))?;
        task.apply(patch);
        Ok(task.clone())
    }

    async fn delete(&self, id: &str) -> Result<Task, TodoError> {
        let mut tasks = self.tasks.write().await;
        let index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TodoError::NotFound(id.to_string()))?;
        Ok(tasks.remove(index))
    }
}
