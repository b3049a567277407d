use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::extraction::RepairStrategy;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MEETING_HISTORY_LIMIT: usize = 10;
const DEFAULT_READAI_API_URL: &str = "https://api.read.ai/v1";

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Truncation repair used for the execution plan.
    pub repair_strategy: RepairStrategy,
    /// Outbound LLM request timeout. `None` keeps the transport default.
    pub llm_timeout: Option<Duration>,
    /// How many meetings the in-memory history keeps.
    pub meeting_history_limit: usize,
    pub readai_api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            repair_strategy: match optional_env("JSON_REPAIR_STRATEGY") {
                Some(value) => value
                    .parse::<RepairStrategy>()
                    .map_err(|e| anyhow!(e))
                    .context("JSON_REPAIR_STRATEGY is invalid")?,
                None => RepairStrategy::default(),
            },
            llm_timeout: optional_env("LLM_TIMEOUT_SECS")
                .map(|secs| {
                    secs.parse::<u64>()
                        .context("LLM_TIMEOUT_SECS must be a whole number of seconds")
                })
                .transpose()?
                .map(Duration::from_secs),
            meeting_history_limit: optional_env("MEETING_HISTORY_LIMIT")
                .map(|limit| {
                    limit
                        .parse::<usize>()
                        .context("MEETING_HISTORY_LIMIT must be a positive integer")
                })
                .transpose()?
                .unwrap_or(DEFAULT_MEETING_HISTORY_LIMIT)
                .max(1),
            readai_api_url: optional_env("READAI_API_URL")
                .unwrap_or_else(|| DEFAULT_READAI_API_URL.to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            anthropic_api_key: "test-key".to_string(),
            port: DEFAULT_PORT,
            rust_log: "debug".to_string(),
            repair_strategy: RepairStrategy::Depth,
            llm_timeout: None,
            meeting_history_limit: DEFAULT_MEETING_HISTORY_LIMIT,
            // Discard port: connections are refused immediately.
            readai_api_url: "http://127.0.0.1:9".to_string(),
        }
    }
}
