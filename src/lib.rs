/// Todo Summary - a small task tracker that posts AI summaries of pending work to Slack.
///
/// The crate exposes a REST API for creating, updating and deleting tasks, and a
/// `/summarize` endpoint that builds a digest of all pending tasks and delivers it
/// to a Slack incoming webhook.
///
/// # Architecture
///
/// The system uses:
/// - axum for the HTTP API
/// - a pluggable task store (in-memory or Supabase) behind the `TaskStore` trait
/// - an OpenAI-compatible chat-completions API (OpenRouter) for summaries
/// - a Slack incoming webhook for delivery
/// - Tokio for async runtime
///
/// When the store, the model or the webhook misbehave, the summary pipeline
/// degrades instead of failing: cached tasks, a local fallback summary, and a
/// `delivered = false` flag on the result.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use todo_summary::clients::{LlmClient, SlackWebhookClient};
/// use todo_summary::features::{SummaryOutcome, SummaryPipeline};
/// use todo_summary::store::{InMemoryTaskStore, TaskCache};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     todo_summary::setup_logging();
///
///     let timeout = Duration::from_secs(15);
///     let pipeline = SummaryPipeline::new(
///         Arc::new(InMemoryTaskStore::new()),
///         TaskCache::new(),
///         Arc::new(LlmClient::new(
///             std::env::var("OPENROUTER_API_KEY").ok(),
///             "https://openrouter.ai/api/v1".to_string(),
///             "deepseek/deepseek-chat-v3-0324:free".to_string(),
///             timeout,
///         )?),
///         Arc::new(SlackWebhookClient::new(
///             std::env::var("SLACK_WEBHOOK_URL").ok(),
///             timeout,
///         )?),
///         timeout,
///     );
///
///     match pipeline.run_summary().await? {
///         SummaryOutcome::Completed(report) => println!("Summary: {}", report.summary),
///         SummaryOutcome::NothingToSummarize => println!("No pending todos to summarize"),
///     }
///
///     Ok(())
/// }
/// ```
// Module declarations
pub mod api;
pub mod clients;
pub mod core;
pub mod errors;
pub mod features;
pub mod prompt;
pub mod slack;
pub mod store;

pub use errors::TodoError;

/// Configure structured logging with JSON output.
///
/// Honours `RUST_LOG` and defaults to `info`. Safe to call more than once; later
/// calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// todo_summary::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
