//! Hand-written fakes shared by the integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use todo_summary::clients::{Notifier, Summarizer};
use todo_summary::core::models::{NewTask, SummaryMessage, Task, TaskPatch};
use todo_summary::errors::TodoError;
use todo_summary::prompt::SummaryPrompt;
use todo_summary::store::{InMemoryTaskStore, TaskStore};

pub fn task(title: &str, description: &str, completed: bool) -> Task {
    let mut task = Task::from_new(NewTask::new(title, Some(description.to_string())));
    task.completed = completed;
    task
}

/// In-memory store whose every operation can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    inner: InMemoryTaskStore,
    failing: AtomicBool,
    hanging: AtomicBool,
    pub list_calls: AtomicUsize,
}

impl FlakyStore {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            inner: InMemoryTaskStore::with_tasks(tasks),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    /// Every operation sleeps for an hour before answering.
    pub fn hanging() -> Self {
        let store = Self::default();
        store.hanging.store(true, Ordering::SeqCst);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    async fn check(&self) -> Result<(), TodoError> {
        if self.hanging.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            Err(TodoError::StoreError("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TaskStore for FlakyStore {
    async fn list(&self) -> Result<Vec<Task>, TodoError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check().await?;
        self.inner.list().await
    }

    async fn insert(&self, new_task: NewTask) -> Result<Task, TodoError> {
        self.check().await?;
        self.inner.insert(new_task).await
    }

    async fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task, TodoError> {
        self.check().await?;
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<Task, TodoError> {
        self.check().await?;
        self.inner.delete(id).await
    }
}

pub enum SummarizerBehavior {
    Reply(String),
    Fail,
    Hang,
}

pub struct FakeSummarizer {
    behavior: SummarizerBehavior,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<SummaryPrompt>>,
}

impl FakeSummarizer {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self::new(SummarizerBehavior::Reply(text.to_string())))
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::new(SummarizerBehavior::Fail))
    }

    pub fn hanging() -> Arc<Self> {
        Arc::new(Self::new(SummarizerBehavior::Hang))
    }

    fn new(behavior: SummarizerBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, prompt: &SummaryPrompt) -> Result<String, TodoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().await.push(prompt.clone());
        match &self.behavior {
            SummarizerBehavior::Reply(text) => Ok(text.clone()),
            SummarizerBehavior::Fail => Err(TodoError::LlmError("status 503: overloaded".to_string())),
            SummarizerBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok("too late".to_string())
            }
        }
    }
}

pub struct FakeNotifier {
    fail_with: Option<String>,
    hang: bool,
    pub calls: AtomicUsize,
    pub messages: Mutex<Vec<SummaryMessage>>,
}

impl FakeNotifier {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            fail_with: None,
            hang: false,
            calls: AtomicUsize::new(0),
            messages: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(reason.to_string()),
            hang: false,
            calls: AtomicUsize::new(0),
            messages: Mutex::new(Vec::new()),
        })
    }

    pub fn hanging() -> Arc<Self> {
        Arc::new(Self {
            fail_with: None,
            hang: true,
            calls: AtomicUsize::new(0),
            messages: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(&self, message: &SummaryMessage) -> Result<(), TodoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.messages.lock().await.push(message.clone());
        if self.hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        match &self.fail_with {
            Some(reason) => Err(TodoError::DeliveryError(reason.clone())),
            None => Ok(()),
        }
    }
}
