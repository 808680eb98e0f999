use std::sync::Arc;

use tracing::{info, warn};

use crate::core::models::{NewTask, Task, TaskPatch};
use crate::errors::TodoError;
use crate::store::{TaskCache, TaskStore};

/// CRUD over the primary store with the cache as a degraded fallback.
///
/// Successful primary operations are mirrored into the cache. When the primary
/// store fails (anything other than `NotFound`), the operation is applied to the
/// cache instead so the caller still gets a usable answer.
///
/// Writes that only reached the cache are not replayed. The next successful
/// primary read replaces the cache, so those tasks disappear once the store is back.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    cache: TaskCache,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, cache: TaskCache) -> Self {
        Self { store, cache }
    }

    pub fn cache(&self) -> &TaskCache {
        &self.cache
    }

    pub async fn list(&self) -> Vec<Task> {
        match self.store.list().await {
            Ok(tasks) => {
                info!("Fetched {} todos", tasks.len());
                self.cache.replace(tasks.clone()).await;
                tasks
            }
            Err(e) => {
                warn!("Task store list failed, serving cached todos: {}", e);
                self.cache.snapshot().await
            }
        }
    }

    pub async fn create(&self, new_task: NewTask) -> Result<Task, TodoError> {
        let new_task = new_task.validated()?;

        match self.store.insert(new_task.clone()).await {
            Ok(task) => {
                info!(id = %task.id, "Created todo");
                self.cache.upsert(task.clone()).await;
                Ok(task)
            }
            Err(e) => {
                warn!("Task store insert failed, keeping todo in cache: {}", e);
                let task = Task::from_new(new_task);
                self.cache.upsert(task.clone()).await;
                Ok(task)
            }
        }
    }

    pub async fn update(&self, id: &str, patch: TaskPatch) -> Result<Task, TodoError> {
        let patch = patch.validated()?;

        if patch.is_empty() {
            return self
                .list()
                .await
                .into_iter()
                .find(|t| t.id == id)
                .ok_or_else(|| TodoError::NotFound(id.to_string()));
        }

        match self.store.update(id, &patch).await {
            Ok(task) => {
                info!(id = %task.id, "Updated todo");
                self.cache.upsert(task.clone()).await;
                Ok(task)
            }
            Err(TodoError::NotFound(id)) => Err(TodoError::NotFound(id)),
            Err(e) => {
                warn!("Task store update failed, updating cached todo: {}", e);
                self.cache
                    .apply(id, &patch)
                    .await
                    .ok_or_else(|| TodoError::NotFound(id.to_string()))
            }
        }
    }

    pub async fn delete(&self, id: &str) -> Result<Task, TodoError> {
        match self.store.delete(id).await {
            Ok(task) => {
                info!(id = %task.id, "Deleted todo");
                self.cache.remove(id).await;
                Ok(task)
            }
            Err(TodoError::NotFound(id)) => Err(TodoError::NotFound(id)),
            Err(e) => {
                warn!("Task store delete failed, removing cached todo: {}", e);
                self.cache
                    .remove(id)
                    .await
                    .ok_or_else(|| TodoError::NotFound(id.to_string()))
            }
        }
    }
}
