//! Delay computation for rate-limited retries

use std::time::Duration;

use rand::Rng;
use reqwest::header::{HeaderMap, RETRY_AFTER};

use crate::types::RetryPolicy;

impl RetryPolicy {
    /// Exponential backoff for the given 1-based attempt with a fixed jitter
    ///
    /// `min(base * 2^(attempt-1) + jitter, max_delay)`
    pub fn backoff_with_jitter(&self, attempt: u32, jitter: Duration) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let exponential = self.base_delay.saturating_mul(1u32 << exponent);
        exponential.saturating_add(jitter).min(self.max_delay)
    }

    /// Exponential backoff with a random jitter in `0..=self.jitter`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
        };
        self.backoff_with_jitter(attempt, jitter)
    }

    /// Delay before the next attempt after a 429 response
    ///
    /// The server's Retry-After is honoured as a lower bound.
    pub fn delay_after_rate_limit(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let backoff = self.backoff(attempt);
        match retry_after {
            Some(retry_after) => retry_after.max(backoff),
            None => backoff,
        }
    }
}

/// Retry-After header as a duration; only the delta-seconds form is read
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    let seconds = raw.parse::<f64>().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(Duration::from_millis((seconds * 1000.0).round() as u64))
}
