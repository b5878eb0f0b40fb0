//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::SharedError;

/// Primary key of a branch row
pub type BranchId = i64;

/// Primary key of a competitor group row
pub type GroupId = i64;

/// Primary key of a competitor row
pub type CompetitorId = i64;

/// Primary key of an OTA listing row
pub type ListingId = i64;

/// Unique identifier for a queued price sweep
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, SharedError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| SharedError::InvalidJobId { input: s.to_string() })
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room category a discovery or price sweep is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Private,
    Dorm,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Private => "private",
            RoomType::Dorm => "dorm",
        }
    }

    /// Human-readable label used inside model prompts
    pub fn label(&self) -> &'static str {
        match self {
            RoomType::Private => "private room",
            RoomType::Dorm => "dorm bed (shared dormitory)",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "private" => Ok(RoomType::Private),
            "dorm" => Ok(RoomType::Dorm),
            _ => Err(SharedError::InvalidRoomType { input: s.to_string() }),
        }
    }
}

/// Component tag attached to every log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Discovery,
    PriceSearch,
    ModelClient,
    RateLimiter,
    JobRunner,
    Store,
    Cli,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Discovery => write!(f, "discovery"),
            Component::PriceSearch => write!(f, "price_search"),
            Component::ModelClient => write!(f, "model_client"),
            Component::RateLimiter => write!(f, "rate_limiter"),
            Component::JobRunner => write!(f, "job_runner"),
            Component::Store => write!(f, "store"),
            Component::Cli => write!(f, "cli"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_type_parsing() {
        assert_eq!("private".parse::<RoomType>().unwrap(), RoomType::Private);
        assert_eq!(" Dorm ".parse::<RoomType>().unwrap(), RoomType::Dorm);
        assert!(matches!(
            "suite".parse::<RoomType>(),
            Err(SharedError::InvalidRoomType { .. })
        ));
    }

    #[test]
    fn test_room_type_serde_uses_lowercase() {
        let json = serde_json::to_string(&RoomType::Dorm).unwrap();
        assert_eq!(json, "\"dorm\"");
        let parsed: RoomType = serde_json::from_str("\"private\"").unwrap();
        assert_eq!(parsed, RoomType::Private);
    }

    #[test]
    fn test_job_id_round_trips_through_string() {
        let id = JobId::new();
        assert_eq!(JobId::from_string(&id.to_string()).unwrap(), id);
        assert!(JobId::from_string("not-a-uuid").is_err());
    }
}
