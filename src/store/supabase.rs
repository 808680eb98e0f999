//! Supabase-backed task store.
//!
//! Talks to the PostgREST endpoint Supabase exposes for each table. Every
//! mutation asks for `return=representation` so the affected rows come back in
//! the response; an empty array means the id did not match anything.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;
use tracing::{debug, error};

use super::TaskStore;
use crate::core::config::SupabaseConfig;
use crate::core::models::{NewTask, Task, TaskPatch};
use crate::errors::TodoError;

pub struct SupabaseTaskStore {
    http: Client,
    endpoint: String,
}

impl SupabaseTaskStore {
    pub fn new(config: &SupabaseConfig, timeout: Duration) -> Result<Self, TodoError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&config.key)
                .map_err(|e| TodoError::ConfigError(format!("SUPABASE_KEY: {e}")))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.key))
                .map_err(|e| TodoError::ConfigError(format!("SUPABASE_KEY: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TodoError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: format!("{}/rest/v1/{}", config.url, config.table),
        })
    }

    fn returning(builder: RequestBuilder) -> RequestBuilder {
        builder.header("Prefer", "return=representation")
    }

    async fn rows(response: Response, operation: &str) -> Result<Vec<Task>, TodoError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            error!("Supabase {} failed: status={} body={}", operation, status, body);
            return Err(TodoError::StoreError(format!(
                "{operation} returned status {status}: {body}"
            )));
        }

        response
            .json::<Vec<Task>>()
            .await
            .map_err(|e| TodoError::StoreError(format!("{operation} returned malformed rows: {e}")))
    }

    async fn single_row(response: Response, operation: &str, id: &str) -> Result<Task, TodoError> {
        Self::rows(response, operation)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TodoError::NotFound(id.to_string()))
    }

    fn store_error(operation: &str, error: reqwest::Error) -> TodoError {
        TodoError::StoreError(format!("{operation} request failed: {error}"))
    }
}

#[async_trait]
impl TaskStore for SupabaseTaskStore {
    async fn list(&self) -> Result<Vec<Task>, TodoError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await
            .map_err(|e| Self::store_error("list", e))?;
        let tasks = Self::rows(response, "list").await?;
        debug!("Fetched {} tasks from Supabase", tasks.len());
        Ok(tasks)
    }

    async fn insert(&self, new_task: NewTask) -> Result<Task, TodoError> {
        let task = Task::from_new(new_task);
        // The table assigns `id` and `created_at`.
        let row = json!({
            "title": task.title,
            "description": task.description,
            "completed": task.completed,
        });
        let response = Self::returning(self.http.post(&self.endpoint))
            .json(&[row])
            .send()
            .await
            .map_err(|e| Self::store_error("insert", e))?;
        let mut rows = Self::rows(response, "insert").await?;
        // PostgREST may be configured to return nothing; the local copy is what was sent.
        Ok(if rows.is_empty() { task } else { rows.remove(0) })
    }

    async fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task, TodoError> {
        let response = Self::returning(self.http.patch(&self.endpoint))
            .query(&[("id", format!("eq.{id}"))])
            .json(patch)
            .send()
            .await
            .map_err(|e| Self::store_error("update", e))?;
        Self::single_row(response, "update", id).await
    }

    async fn delete(&self, id: &str) -> Result<Task, TodoError> {
        let response = Self::returning(self.http.delete(&self.endpoint))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(|e| Self::store_error("delete", e))?;
        Self::single_row(response, "delete", id).await
    }
}
