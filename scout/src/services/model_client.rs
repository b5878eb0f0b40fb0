//! Chat-completion client with rate limiting and 429 retries

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;

use shared::{Component, scout_debug, scout_error, scout_warn};
use crate::config::{ScoutConfig, SYSTEM_PROMPT};
use crate::core::backoff::retry_after;
use crate::core::rate_limiter::RateLimiter;
use crate::error::{ScoutError, ScoutResult};
use crate::traits::ModelClient;
use crate::types::{ChatCompletion, ChatMessage, ChatRequest};

/// Outcome of a single HTTP attempt
enum AttemptError {
    /// HTTP 429, carrying the server's Retry-After if present
    RateLimited(Option<std::time::Duration>),
    /// Anything else; never retried
    Fatal(ScoutError),
}

/// Real model client calling an OpenAI-compatible chat-completion endpoint
pub struct RealModelClient {
    config: ScoutConfig,
    http: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
}

impl RealModelClient {
    /// Create a client sharing the given rate limiter
    pub fn new(config: ScoutConfig, rate_limiter: Arc<RateLimiter>) -> ScoutResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ScoutError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http, rate_limiter })
    }

    fn build_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    async fn send_once(&self, api_key: &str, body: &ChatRequest) -> Result<String, AttemptError> {
        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AttemptError::Fatal(classify_transport_error(e)))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AttemptError::RateLimited(retry_after(response.headers())));
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(AttemptError::Fatal(ScoutError::Unauthorized));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptError::Fatal(ScoutError::HttpError {
                status: status.as_u16(),
                body,
            }));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| AttemptError::Fatal(classify_body_error(e)))?;

        completion
            .first_content()
            .ok_or_else(|| AttemptError::Fatal(ScoutError::malformed("no message content in the first choice")))
    }
}

fn classify_transport_error(error: reqwest::Error) -> ScoutError {
    if error.is_timeout() {
        ScoutError::Timeout
    } else {
        ScoutError::NetworkError { message: error.to_string() }
    }
}

fn classify_body_error(error: reqwest::Error) -> ScoutError {
    if error.is_timeout() {
        ScoutError::Timeout
    } else {
        ScoutError::malformed(format!("response body is not a completion envelope: {error}"))
    }
}

#[async_trait]
impl ModelClient for RealModelClient {
    async fn call(&self, prompt: &str, context: &str) -> ScoutResult<String> {
        let api_key = self.config.require_api_key()?;
        let body = self.build_request(prompt);
        let max_attempts = self.config.retry.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            self.rate_limiter.wait().await;

            match self.send_once(api_key, &body).await {
                Ok(content) => {
                    scout_debug!(Component::ModelClient, "Model response ({}): {}", context, content);
                    return Ok(content);
                }
                Err(AttemptError::RateLimited(server_delay)) if attempt < max_attempts => {
                    let delay = self.config.retry.delay_after_rate_limit(attempt, server_delay);
                    scout_warn!(
                        Component::ModelClient,
                        "⏳ Rate limited ({}), attempt {}/{}, retrying in {}ms",
                        context,
                        attempt,
                        max_attempts,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(AttemptError::RateLimited(_)) => {
                    scout_error!(
                        Component::ModelClient,
                        "❌ Rate limit still active after {} attempts ({})",
                        max_attempts,
                        context
                    );
                    return Err(ScoutError::RateLimitExceeded { attempts: max_attempts });
                }
                Err(AttemptError::Fatal(error)) => {
                    scout_error!(Component::ModelClient, "❌ Model API call failed ({}): {}", context, error);
                    return Err(error);
                }
            }
        }

        Err(ScoutError::RateLimitExceeded { attempts: max_attempts })
    }
}
