//! Summary pipeline: snapshot pending tasks, summarize them, deliver the result.
//!
//! Each run makes at most three sequential external calls (store read,
//! summarizer, notifier). Failures of those collaborators are turned into data
//! on the returned report; only malformed task state aborts a run.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::clients::{Notifier, Summarizer};
use crate::core::models::{SummaryMessage, Task};
use crate::errors::TodoError;
use crate::prompt::{SummaryPrompt, fallback_summary, format_task_list, sanitize_field};
use crate::store::{TaskCache, TaskStore};

pub const NOTHING_TO_SUMMARIZE_MESSAGE: &str = "No pending todos to summarize";

/// Where the summary text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    Ai,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryReport {
    pub summary: String,
    pub delivered: bool,
    pub delivery_error: Option<String>,
    pub pending_count: usize,
    pub source: SummarySource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    NothingToSummarize,
    Completed(SummaryReport),
}

pub struct SummaryPipeline {
    store: Arc<dyn TaskStore>,
    cache: TaskCache,
    summarizer: Arc<dyn Summarizer>,
    notifier: Arc<dyn Notifier>,
    call_timeout: Duration,
}

impl SummaryPipeline {
    pub fn new(
        store: Arc<dyn TaskStore>,
        cache: TaskCache,
        summarizer: Arc<dyn Summarizer>,
        notifier: Arc<dyn Notifier>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            summarizer,
            notifier,
            call_timeout,
        }
    }

    /// Build and deliver a summary of the currently pending tasks.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::InternalError` when a pending task has no usable
    /// title. Store, summarizer and notifier failures never produce an error.
    pub async fn run_summary(&self) -> Result<SummaryOutcome, TodoError> {
        let tasks = self.read_tasks().await;

        let pending: Vec<Task> = tasks.into_iter().filter(Task::is_pending).collect();
        if pending.is_empty() {
            info!("{}", NOTHING_TO_SUMMARIZE_MESSAGE);
            return Ok(SummaryOutcome::NothingToSummarize);
        }

        if let Some(bad) = pending
            .iter()
            .find(|task| sanitize_field(&task.title).is_empty())
        {
            error!(id = %bad.id, "Pending task has an empty title");
            return Err(TodoError::InternalError(format!(
                "task {} has an empty title",
                bad.id
            )));
        }

        let pending_count = pending.len();
        info!("Found {} pending todos to summarize", pending_count);

        let task_list = format_task_list(&pending);
        let prompt = SummaryPrompt::for_task_list(&task_list);

        let (summary, source) = match self
            .bounded("summarizer", self.summarizer.summarize(&prompt))
            .await
        {
            Ok(text) if !text.trim().is_empty() => (text, SummarySource::Ai),
            Ok(_) => {
                warn!("Summarizer returned empty text, using fallback summary");
                (fallback_summary(pending_count, &task_list), SummarySource::Fallback)
            }
            Err(e) => {
                warn!("Summarizer failed, using fallback summary: {}", e);
                (fallback_summary(pending_count, &task_list), SummarySource::Fallback)
            }
        };

        let message = SummaryMessage {
            summary,
            pending_count,
            generated_at: Utc::now(),
        };

        let (delivered, delivery_error) = match self
            .bounded("notifier", self.notifier.notify(&message))
            .await
        {
            Ok(()) => (true, None),
            Err(e) => {
                error!("Slack delivery failed: {}", e);
                (false, Some(e.to_string()))
            }
        };

        Ok(SummaryOutcome::Completed(SummaryReport {
            summary: message.summary,
            delivered,
            delivery_error,
            pending_count,
            source,
        }))
    }

    /// Primary read, degrading to the cache snapshot when the store fails.
    async fn read_tasks(&self) -> Vec<Task> {
        match self.bounded("task store", self.store.list()).await {
            Ok(tasks) => {
                self.cache.replace(tasks.clone()).await;
                tasks
            }
            Err(e) => {
                warn!("Task store unavailable, summarizing cached tasks: {}", e);
                self.cache.snapshot().await
            }
        }
    }

    async fn bounded<T, F>(&self, what: &str, call: F) -> Result<T, TodoError>
    where
        F: Future<Output = Result<T, TodoError>>,
    {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .unwrap_or_else(|_| {
                Err(TodoError::TimeoutError(format!(
                    "{what} after {}s",
                    self.call_timeout.as_secs()
                )))
            })
    }
}
