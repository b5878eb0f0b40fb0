//! Scout-specific data types

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{DiscoveryCandidate, GroupId, JobId, RoomType};

/// Currency assumed when the model does not name one
pub const DEFAULT_CURRENCY: &str = "COP";

/// Error marker stored on a price cell whose output could not be parsed
pub const PARSE_ERROR_MARKER: &str = "Parse-Fehler";

/// Retry parameters for rate-limited model calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Upper bound of the random component added to each backoff
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(2000),
            max_delay: Duration::from_millis(60000),
            jitter: Duration::from_millis(1000),
        }
    }
}

/// One chat message in the completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// Body of the chat-completion POST
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Envelope returned by the chat-completion endpoint
///
/// Only the fields the client reads are modelled; everything is optional so
/// a shape mismatch surfaces as a malformed-response error, not a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// Content of the first choice, if the envelope carries one
    pub fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
    }
}

/// Price lookup result for one (competitor, date) cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCell {
    pub price: Option<f64>,
    pub currency: String,
    pub platform: Option<String>,
    pub url: Option<String>,
    pub available: bool,
    pub room_name: Option<String>,
    pub error: Option<String>,
}

impl PriceCell {
    /// Record returned when the model output is not valid JSON
    pub fn parse_failure() -> Self {
        Self {
            price: None,
            currency: DEFAULT_CURRENCY.to_string(),
            platform: None,
            url: None,
            available: false,
            room_name: None,
            error: Some(PARSE_ERROR_MARKER.to_string()),
        }
    }
}

/// Outcome of parsing discovery output
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryParse {
    /// A candidate list was found (possibly empty)
    List(Vec<DiscoveryCandidate>),
    /// Valid JSON, but no candidate list in any accepted shape
    Empty,
}

impl DiscoveryParse {
    pub fn into_candidates(self) -> Vec<DiscoveryCandidate> {
        match self {
            DiscoveryParse::List(candidates) => candidates,
            DiscoveryParse::Empty => Vec::new(),
        }
    }
}

/// Parameters of one price sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepRequest {
    pub group_id: GroupId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_type: RoomType,
}

/// Counters collected over a sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub competitors: usize,
    pub cells_total: usize,
    pub prices_found: usize,
    pub cells_without_price: usize,
    pub cells_failed: usize,
    /// Prices stored whose competitor timestamps could not be updated
    pub bookkeeping_failed: usize,
}

/// Lifecycle state of a sweep job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed { report: SweepReport },
    Failed { error: String },
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, JobStatus::Completed { .. } | JobStatus::Failed { .. })
    }
}

/// Job record exposed for polling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepJob {
    pub id: JobId,
    pub request: SweepRequest,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SweepJob {
    pub fn new(request: SweepRequest) -> Self {
        Self {
            id: JobId::new(),
            request,
            status: JobStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }
}

/// Lifecycle notifications broadcast by the job runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    Queued { job_id: JobId },
    Started { job_id: JobId },
    Finished { job_id: JobId, status: JobStatus },
}

impl JobEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            JobEvent::Queued { job_id } | JobEvent::Started { job_id } | JobEvent::Finished { job_id, .. } => *job_id,
        }
    }
}
