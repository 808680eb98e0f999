use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Invalid request: {0}")]
    ValidationError(String),

    #[error("Todo not found: {0}")]
    NotFound(String),

    #[error("Failed to access task store: {0}")]
    StoreError(String),

    #[error("Failed to access summarizer API: {0}")]
    LlmError(String),

    #[error("Failed to deliver to chat webhook: {0}")]
    DeliveryError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Timed out waiting for {0}")]
    TimeoutError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<reqwest::Error> for TodoError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TodoError::TimeoutError(error.to_string())
        } else {
            TodoError::HttpError(error.to_string())
        }
    }
}

impl From<serde_json::Error> for TodoError {
    fn from(error: serde_json::Error) -> Self {
        TodoError::ParseError(error.to_string())
    }
}

impl From<anyhow::Error> for TodoError {
    fn from(error: anyhow::Error) -> Self {
        TodoError::InternalError(error.to_string())
    }
}
