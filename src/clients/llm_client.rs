//! LLM API client module
//!
//! Encapsulates the chat-completions call used to summarize pending tasks.

use std::time::Duration;

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tracing::info;

use crate::core::config::AppConfig;
use crate::errors::TodoError;
use crate::prompt::SummaryPrompt;

const APP_REFERER: &str = "https://todo-summary-assistant.example.com";
const APP_TITLE: &str = "Todo Summary Assistant";

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Returns the generated text for the prompt. Any failure is an error;
    /// callers decide how to recover.
    async fn summarize(&self, prompt: &SummaryPrompt) -> Result<String, TodoError>;
}

/// Client for an OpenAI-compatible chat-completions endpoint (OpenRouter by default)
pub struct LlmClient {
    api_key: Option<String>,
    base_url: String,
    model_name: String,
    http: Client,
}

impl LlmClient {
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        model_name: String,
        timeout: Duration,
    ) -> Result<Self, TodoError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TodoError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model_name,
            http,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, TodoError> {
        Self::new(
            config.openrouter_api_key.clone(),
            config.llm_base_url.clone(),
            config.llm_model.clone(),
            config.external_timeout,
        )
    }

    pub fn build_messages(&self, prompt: &SummaryPrompt) -> Vec<ChatCompletionMessage> {
        vec![
            ChatCompletionMessage {
                role: MessageRole::system,
                content: Content::Text(prompt.system.clone()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text(prompt.user.clone()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
        ]
    }

    pub fn build_request_body(&self, messages: &[ChatCompletionMessage]) -> Value {
        let messages: Vec<Value> = messages
            .iter()
            .map(|msg| {
                let role_str = match msg.role {
                    MessageRole::system => "system",
                    MessageRole::user => "user",
                    MessageRole::assistant => "assistant",
                    MessageRole::function => "function",
                    MessageRole::tool => "tool",
                };

                let content_val = match &msg.content {
                    Content::Text(text) => json!(text),
                    other => json!(format!("{other:?}")),
                };

                json!({
                    "role": role_str,
                    "content": content_val
                })
            })
            .collect();

        json!({
            "model": self.model_name,
            "messages": messages
        })
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap, TodoError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| TodoError::LlmError(format!("Invalid API key header: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("HTTP-Referer", HeaderValue::from_static(APP_REFERER));
        headers.insert("X-Title", HeaderValue::from_static(APP_TITLE));
        Ok(headers)
    }
}

#[async_trait]
impl Summarizer for LlmClient {
    async fn summarize(&self, prompt: &SummaryPrompt) -> Result<String, TodoError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| TodoError::LlmError("OPENROUTER_API_KEY is not configured".to_string()))?;

        let messages = self.build_messages(prompt);

        #[cfg(feature = "debug-logs")]
        info!("Using summary prompt:\n{:?}", messages);

        #[cfg(not(feature = "debug-logs"))]
        info!(
            "Requesting summary from {} with {} prompt messages",
            self.model_name,
            messages.len()
        );

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .headers(self.headers(api_key)?)
            .json(&self.build_request_body(&messages))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TodoError::LlmError(format!(
                "status {status}: {error_text}"
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| TodoError::LlmError(format!("Failed to parse response: {e}")))?;

        extract_completion_text(&response_json)
    }
}

/// Pulls `choices[0].message.content` out of a chat-completions response.
pub fn extract_completion_text(response_json: &Value) -> Result<String, TodoError> {
    if let Some(message) = response_json
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
    {
        return Err(TodoError::LlmError(message.to_string()));
    }

    response_json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or_else(|| TodoError::LlmError("No text in response".to_string()))
}
