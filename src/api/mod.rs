//! HTTP API: router, shared state and request handlers

pub mod handler;
pub mod helpers;
pub mod middleware;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};

use crate::clients::{LlmClient, Notifier, SlackWebhookClient, Summarizer};
use crate::core::config::AppConfig;
use crate::errors::TodoError;
use crate::features::{SummaryPipeline, TaskService};
use crate::store::{TaskCache, TaskStore, build_store, demo_tasks};

/// State shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub tasks: TaskService,
    pub pipeline: Arc<SummaryPipeline>,
    pub cors_allowed_origins: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TaskStore>,
        cache: TaskCache,
        summarizer: Arc<dyn Summarizer>,
        notifier: Arc<dyn Notifier>,
        call_timeout: Duration,
        cors_allowed_origins: Vec<String>,
    ) -> Self {
        let pipeline = SummaryPipeline::new(
            store.clone(),
            cache.clone(),
            summarizer,
            notifier,
            call_timeout,
        );
        Self {
            tasks: TaskService::new(store, cache),
            pipeline: Arc::new(pipeline),
            cors_allowed_origins: Arc::new(cors_allowed_origins),
        }
    }

    /// Wires the configured store and the real summarizer and notifier clients.
    pub fn from_config(config: &AppConfig) -> Result<Self, TodoError> {
        let seed = if config.seed_demo_tasks {
            demo_tasks()
        } else {
            Vec::new()
        };
        let store = build_store(config, seed.clone())?;
        let cache = TaskCache::with_tasks(seed);

        Ok(Self::new(
            store,
            cache,
            Arc::new(LlmClient::from_config(config)?),
            Arc::new(SlackWebhookClient::from_config(config)?),
            config.external_timeout,
            config.cors_allowed_origins.clone(),
        ))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handler::health_handler))
        .route(
            "/todos",
            get(handler::list_todos_handler).post(handler::create_todo_handler),
        )
        .route(
            "/todos/:id",
            put(handler::update_todo_handler)
                .patch(handler::update_todo_handler)
                .delete(handler::delete_todo_handler),
        )
        .route("/summarize", post(handler::summarize_handler))
        .layer(from_fn_with_state(state.clone(), middleware::cors_middleware))
        .layer(from_fn(middleware::request_tracing_middleware))
        .with_state(state)
}
