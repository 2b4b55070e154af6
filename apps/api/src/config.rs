use anyhow::{ensure, Context, Result};

use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub llm_api_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub session_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_api_url: optional_env("LLM_API_URL", DEFAULT_API_URL),
            llm_model: optional_env("LLM_MODEL", DEFAULT_MODEL),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 60)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            session_ttl_secs: parse_env("SESSION_TTL_SECS", 60 * 60)?,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG", "info"),
        };

        ensure!(config.session_ttl_secs > 0, "SESSION_TTL_SECS must be greater than zero");
        Ok(config)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
