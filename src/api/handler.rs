//! Route handlers - thin adapters between HTTP and the task service / pipeline.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use super::AppState;
use super::helpers::err_response_with_details;
use crate::core::models::{NewTask, Task, TaskPatch};
use crate::errors::TodoError;
use crate::features::summarize::NOTHING_TO_SUMMARIZE_MESSAGE;
use crate::features::{SummaryOutcome, SummaryReport};

pub const DELIVERED_MESSAGE: &str = "Summary generated and sent to Slack";
pub const UNDELIVERED_MESSAGE: &str = "Summary generated but Slack delivery failed";

/// Body of a `POST /summarize` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_error: Option<String>,
}

impl From<SummaryOutcome> for SummaryResponse {
    fn from(outcome: SummaryOutcome) -> Self {
        match outcome {
            SummaryOutcome::NothingToSummarize => Self {
                success: true,
                message: NOTHING_TO_SUMMARIZE_MESSAGE.to_string(),
                summary: None,
                delivered: None,
                delivery_error: None,
            },
            SummaryOutcome::Completed(SummaryReport {
                summary,
                delivered,
                delivery_error,
                ..
            }) => Self {
                success: true,
                message: if delivered {
                    DELIVERED_MESSAGE
                } else {
                    UNDELIVERED_MESSAGE
                }
                .to_string(),
                summary: Some(summary),
                delivered: Some(delivered),
                delivery_error,
            },
        }
    }
}

fn body_or_error<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, TodoError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| TodoError::ValidationError(rejection.body_text()))
}

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "message": "Todo Summary Assistant API is running",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

pub async fn list_todos_handler(State(state): State<AppState>) -> Json<Vec<Task>> {
    Json(state.tasks.list().await)
}

pub async fn create_todo_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), TodoError> {
    let new_task = body_or_error(payload)?;
    let task = state.tasks.create(new_task).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_todo_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<Task>, TodoError> {
    let patch = body_or_error(payload)?;
    Ok(Json(state.tasks.update(&id, patch).await?))
}

pub async fn delete_todo_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, TodoError> {
    let deleted = state.tasks.delete(&id).await?;
    Ok(Json(json!({
        "message": "Todo deleted successfully",
        "deletedTodo": deleted
    }))
    .into_response())
}

pub async fn summarize_handler(State(state): State<AppState>) -> Response {
    info!("Starting todo summarization");
    match state.pipeline.run_summary().await {
        Ok(outcome) => Json(SummaryResponse::from(outcome)).into_response(),
        Err(e) => {
            error!("Summary generation failed: {}", e);
            err_response_with_details(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate summary",
                &e.to_string(),
            )
        }
    }
}
