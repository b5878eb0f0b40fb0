//! Environment-driven configuration
//!
//! Values are loaded from a `.env` file in the current directory or its
//! parents (if present) and then from the process environment; the
//! environment wins over `.env` entries.
//!
//! - `OPENAI_API_KEY`: bearer token for the model endpoint (required at call time)
//! - `OPENAI_API_URL`: chat-completion endpoint
//! - `OPENAI_MODEL`: model name
//! - `SCOUT_MIN_INTERVAL_MS`: minimum gap between outbound model calls
//! - `SCOUT_MAX_ATTEMPTS`: attempts per call when rate limited
//! - `SCOUT_TIMEOUT_MS`: HTTP timeout per attempt

use std::collections::HashMap;
use std::time::Duration;

use crate::error::{ScoutError, ScoutResult};
use crate::types::RetryPolicy;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT_MS: u64 = 30000;

/// System message sent ahead of every prompt
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that returns structured JSON data. Respond ONLY with JSON, no additional explanations.";

/// Runtime configuration for the model client and rate limiter
#[derive(Debug, Clone)]
pub struct ScoutConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub min_request_interval: Duration,
    pub retry: RetryPolicy,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            min_request_interval: Duration::from_millis(DEFAULT_MIN_INTERVAL_MS),
            retry: RetryPolicy::default(),
        }
    }
}

impl ScoutConfig {
    /// Load configuration from `.env` and the process environment
    pub fn from_env() -> ScoutResult<Self> {
        // Missing .env is fine
        let _ = dotenvy::dotenv();
        Self::from_vars(std::env::vars().collect())
    }

    /// Build configuration from an explicit variable map
    pub fn from_vars(vars: HashMap<String, String>) -> ScoutResult<Self> {
        let mut config = Self::default();

        config.api_key = vars
            .get("OPENAI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if let Some(url) = vars.get("OPENAI_API_URL").filter(|v| !v.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }
        if let Some(model) = vars.get("OPENAI_MODEL").filter(|v| !v.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(ms) = parse_u64(&vars, "SCOUT_MIN_INTERVAL_MS")? {
            config.min_request_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_u64(&vars, "SCOUT_TIMEOUT_MS")? {
            if ms == 0 {
                return Err(ScoutError::config("SCOUT_TIMEOUT_MS must be greater than 0"));
            }
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(attempts) = parse_u64(&vars, "SCOUT_MAX_ATTEMPTS")? {
            if attempts == 0 || attempts > u32::MAX as u64 {
                return Err(ScoutError::config(format!(
                    "SCOUT_MAX_ATTEMPTS must be between 1 and {}, got {attempts}",
                    u32::MAX
                )));
            }
            config.retry.max_attempts = attempts as u32;
        }

        Ok(config)
    }

    /// The API key, or a configuration error if none is set
    pub fn require_api_key(&self) -> ScoutResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ScoutError::config("OPENAI_API_KEY is not set"))
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

fn parse_u64(vars: &HashMap<String, String>, name: &str) -> ScoutResult<Option<u64>> {
    match vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ScoutError::config(format!("{name} must be a non-negative integer, got '{raw}'"))),
    }
}
