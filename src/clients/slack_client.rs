//! Slack incoming-webhook client
//!
//! Posts summary envelopes to a single configured webhook. No retries: each
//! summary is attempted once and failures are reported back to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{error, info};

use crate::core::config::AppConfig;
use crate::core::models::SummaryMessage;
use crate::errors::TodoError;
use crate::slack::message_builder::build_summary_payload;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &SummaryMessage) -> Result<(), TodoError>;
}

pub struct SlackWebhookClient {
    webhook_url: Option<String>,
    http: Client,
}

impl SlackWebhookClient {
    pub fn new(webhook_url: Option<String>, timeout: Duration) -> Result<Self, TodoError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TodoError::ConfigError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { webhook_url, http })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, TodoError> {
        Self::new(config.slack_webhook_url.clone(), config.external_timeout)
    }
}

#[async_trait]
impl Notifier for SlackWebhookClient {
    async fn notify(&self, message: &SummaryMessage) -> Result<(), TodoError> {
        let webhook_url = self.webhook_url.as_deref().ok_or_else(|| {
            TodoError::DeliveryError("SLACK_WEBHOOK_URL is not configured".to_string())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let body = build_summary_payload(message);

        let resp = self
            .http
            .post(webhook_url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| TodoError::DeliveryError(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            error!(
                "Webhook POST failed: status={} body={}",
                status, body_text
            );
            return Err(TodoError::DeliveryError(format!(
                "status {}: {}",
                status.as_u16(),
                body_text
            )));
        }

        info!(
            "Summary delivered to Slack ({} pending tasks)",
            message.pending_count
        );
        Ok(())
    }
}
