//! Scout error types

use thiserror::Error;
use shared::{BranchId, SharedError};

/// Result type for scout operations
pub type ScoutResult<T> = Result<T, ScoutError>;

/// Scout error types
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Missing data: {message}")]
    MissingData { message: String },

    #[error("Model API rate limit exceeded after {attempts} attempts")]
    RateLimitExceeded { attempts: u32 },

    #[error("Model API rejected the credentials (401 Unauthorized)")]
    Unauthorized,

    #[error("Model API request timed out")]
    Timeout,

    #[error("Malformed model API response: {message}")]
    MalformedResponse { message: String },

    #[error("Failed to parse model output: {message}")]
    ParseError { message: String },

    #[error("Model API returned HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Persistence error: {message}")]
    PersistenceError { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Sweep job runner is not running")]
    RunnerStopped,

    #[error("Competitor discovery for branch {branch_id} failed: {}", .kind.user_message())]
    DiscoveryFailed {
        branch_id: BranchId,
        kind: FailureKind,
        #[source]
        source: Box<ScoutError>,
    },

    #[error("Shared component error: {0}")]
    Shared(#[from] SharedError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Coarse classification of a model-call failure for user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unauthorized,
    RateLimit,
    Timeout,
    Config,
    Generic,
}

impl FailureKind {
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureKind::Unauthorized => "the model API key is invalid",
            FailureKind::RateLimit => "the model API rate limit was reached, please try again later",
            FailureKind::Timeout => "the model API timed out, please try again later",
            FailureKind::Config => "the model API key is not configured",
            FailureKind::Generic => "the model API call failed",
        }
    }
}

impl ScoutError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError { message: message.into() }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::PersistenceError { message: message.into() }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse { message: message.into() }
    }

    /// Classify this error, looking through the discovery wrapper
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ScoutError::DiscoveryFailed { kind, .. } => *kind,
            ScoutError::Unauthorized => FailureKind::Unauthorized,
            ScoutError::RateLimitExceeded { .. } => FailureKind::RateLimit,
            ScoutError::Timeout => FailureKind::Timeout,
            ScoutError::ConfigError { .. } => FailureKind::Config,
            _ => FailureKind::Generic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_classification() {
        assert_eq!(ScoutError::Unauthorized.failure_kind(), FailureKind::Unauthorized);
        assert_eq!(
            ScoutError::RateLimitExceeded { attempts: 3 }.failure_kind(),
            FailureKind::RateLimit
        );
        assert_eq!(ScoutError::Timeout.failure_kind(), FailureKind::Timeout);
        assert_eq!(
            ScoutError::HttpError { status: 500, body: String::new() }.failure_kind(),
            FailureKind::Generic
        );
    }

    #[test]
    fn test_discovery_wrapper_keeps_kind_and_message() {
        let err = ScoutError::DiscoveryFailed {
            branch_id: 4,
            kind: FailureKind::Timeout,
            source: Box::new(ScoutError::Timeout),
        };
        assert_eq!(err.failure_kind(), FailureKind::Timeout);
        assert!(err.to_string().contains("branch 4"));
        assert!(err.to_string().contains("timed out"));
    }
}
