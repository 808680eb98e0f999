use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TodoError;
use crate::prompt::sanitize_field;

/// A to-do item as stored and returned by the API.
///
/// `text` is accepted as a deprecated alias of `title` when reading rows or
/// request bodies from older clients. A missing `completed` flag means pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTask")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

// Rows written by older clients may carry `text` instead of (or next to) `title`,
// numeric ids, and nulls for optional columns.
#[derive(Deserialize)]
struct RawTask {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl From<RawTask> for Task {
    fn from(raw: RawTask) -> Self {
        Self {
            id: raw.id,
            title: pick_title(raw.title, raw.text).unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            completed: raw.completed.unwrap_or(false),
            created_at: raw.created_at.unwrap_or_else(Utc::now),
        }
    }
}

impl Task {
    /// Builds a fresh pending task with a newly assigned identifier.
    pub fn from_new(new_task: NewTask) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: new_task.title,
            description: new_task.description.unwrap_or_default(),
            completed: false,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.completed
    }

    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Create request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawNewTask")]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Deserialize)]
struct RawNewTask {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<RawNewTask> for NewTask {
    fn from(raw: RawNewTask) -> Self {
        Self {
            title: pick_title(raw.title, raw.text).unwrap_or_default(),
            description: raw.description,
        }
    }
}

impl NewTask {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
        }
    }

    /// Trims both fields and rejects a blank title.
    pub fn validated(self) -> Result<Self, TodoError> {
        let title = validate_title(&self.title)?;
        Ok(Self {
            title,
            description: self.description.map(|d| d.trim().to_string()),
        })
    }
}

/// Update request body. Any subset of fields may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTaskPatch")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

#[derive(Deserialize)]
struct RawTaskPatch {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    completed: Option<bool>,
}

impl From<RawTaskPatch> for TaskPatch {
    fn from(raw: RawTaskPatch) -> Self {
        Self {
            title: pick_title(raw.title, raw.text),
            description: raw.description,
            completed: raw.completed,
        }
    }
}

impl TaskPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn validated(self) -> Result<Self, TodoError> {
        let title = match self.title {
            Some(title) => Some(validate_title(&title)?),
            None => None,
        };
        Ok(Self {
            title,
            description: self.description.map(|d| d.trim().to_string()),
            completed: self.completed,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

// A title must survive prompt sanitizing, otherwise the summary run cannot list it.
fn validate_title(raw: &str) -> Result<String, TodoError> {
    let title = raw.trim();
    if sanitize_field(title).is_empty() {
        return Err(TodoError::ValidationError(
            "Todo title is required".to_string(),
        ));
    }
    Ok(title.to_string())
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// `title` wins over the deprecated `text` field when both are present.
fn pick_title(title: Option<String>, text: Option<String>) -> Option<String> {
    match (title, text) {
        (Some(title), _) if !title.trim().is_empty() => Some(title),
        (_, Some(text)) => Some(text),
        (title, None) => title,
    }
}

/// What the notifier delivers for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryMessage {
    pub summary: String,
    pub pending_count: usize,
    pub generated_at: DateTime<Utc>,
}
