use std::env;
use std::time::Duration;

use tracing::{info, warn};
use url::Url;

use crate::errors::TodoError;

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_LLM_MODEL: &str = "deepseek/deepseek-chat-v3-0324:free";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";
pub const SLACK_WEBHOOK_PREFIX: &str = "https://hooks.slack.com/";

/// Which backing the task store uses for this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Supabase,
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
    pub table: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub supabase: Option<SupabaseConfig>,
    pub openrouter_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub slack_webhook_url: Option<String>,
    pub external_timeout: Duration,
    pub cors_allowed_origins: Vec<String>,
    pub seed_demo_tasks: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, TodoError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset. Secrets have no defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TodoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| TodoError::ConfigError(format!("PORT: {e}")))?,
            None => DEFAULT_PORT,
        };

        let external_timeout_secs = match get("EXTERNAL_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| TodoError::ConfigError(format!("EXTERNAL_TIMEOUT_SECS: {e}")))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if external_timeout_secs == 0 {
            return Err(TodoError::ConfigError(
                "EXTERNAL_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        let supabase = match (get("SUPABASE_URL"), get("SUPABASE_KEY")) {
            (Some(url), Some(key)) => {
                validate_http_url("SUPABASE_URL", &url)?;
                Some(SupabaseConfig {
                    url: url.trim_end_matches('/').to_string(),
                    key,
                    table: get("SUPABASE_TABLE").unwrap_or_else(|| "todos".to_string()),
                })
            }
            _ => None,
        };

        let backend_name = get("STORE_BACKEND").map(|s| s.to_ascii_lowercase());
        let store_backend = match backend_name.as_deref() {
            Some("memory") => StoreBackend::Memory,
            Some("supabase") => {
                if supabase.is_none() {
                    return Err(TodoError::ConfigError(
                        "STORE_BACKEND=supabase requires SUPABASE_URL and SUPABASE_KEY"
                            .to_string(),
                    ));
                }
                StoreBackend::Supabase
            }
            Some(other) => {
                return Err(TodoError::ConfigError(format!(
                    "STORE_BACKEND: unknown backend '{other}'"
                )));
            }
            None if supabase.is_some() => StoreBackend::Supabase,
            None => StoreBackend::Memory,
        };

        let llm_base_url = get("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string());
        validate_http_url("LLM_BASE_URL", &llm_base_url)?;

        let slack_webhook_url = get("SLACK_WEBHOOK_URL");
        if let Some(url) = &slack_webhook_url {
            validate_http_url("SLACK_WEBHOOK_URL", url)?;
        }

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let seed_demo_tasks = get("SEED_DEMO_TASKS")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            store_backend,
            supabase,
            openrouter_api_key: get("OPENROUTER_API_KEY"),
            llm_base_url: llm_base_url.trim_end_matches('/').to_string(),
            llm_model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            slack_webhook_url,
            external_timeout: Duration::from_secs(external_timeout_secs),
            cors_allowed_origins,
            seed_demo_tasks,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Logs which settings are present without printing any values.
    pub fn log_summary(&self) {
        let set = |present: bool| if present { "set" } else { "not set" };
        info!(
            store_backend = ?self.store_backend,
            supabase = set(self.supabase.is_some()),
            openrouter_api_key = set(self.openrouter_api_key.is_some()),
            slack_webhook_url = set(self.slack_webhook_url.is_some()),
            llm_model = %self.llm_model,
            timeout_secs = self.external_timeout.as_secs(),
            "Loaded configuration"
        );

        let mut missing = Vec::new();
        if self.openrouter_api_key.is_none() {
            missing.push("OPENROUTER_API_KEY");
        }
        if self.slack_webhook_url.is_none() {
            missing.push("SLACK_WEBHOOK_URL");
        }
        if !missing.is_empty() {
            warn!(
                "Missing environment variables: {}. Summaries will use the local fallback or skip delivery.",
                missing.join(", ")
            );
        }

        if let Some(url) = &self.slack_webhook_url
            && !url.starts_with(SLACK_WEBHOOK_PREFIX)
        {
            warn!("SLACK_WEBHOOK_URL does not start with {}", SLACK_WEBHOOK_PREFIX);
        }
    }
}

fn validate_http_url(name: &str, raw: &str) -> Result<(), TodoError> {
    let parsed = Url::parse(raw).map_err(|e| TodoError::ConfigError(format!("{name}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(TodoError::ConfigError(format!(
            "{name}: unsupported scheme '{other}'"
        ))),
    }
}
