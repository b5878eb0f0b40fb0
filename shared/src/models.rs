//! Domain records read and written through the persistence gateway

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BranchId, CompetitorId, GroupId, ListingId, RoomType};

/// Platform tag for listings created by the price sweep
pub const AI_SEARCH_PLATFORM: &str = "ai_search";

/// Source tag for price rows written by the price sweep
pub const AI_SEARCH_SOURCE: &str = "ai_search";

/// Organization descriptor attached to a branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationContext {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Branch descriptor used as discovery context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchContext {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub organization: OrganizationContext,
}

impl BranchContext {
    /// Organization name for prompts, falling back to the display name
    pub fn organization_name(&self) -> &str {
        let org = &self.organization;
        if !org.name.trim().is_empty() {
            &org.name
        } else {
            org.display_name
                .as_deref()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or("Unknown")
        }
    }
}

/// Branch-scoped cluster of competitor properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorGroup {
    pub id: GroupId,
    pub branch_id: BranchId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub city: String,
    #[serde(default)]
    pub country: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A competitor property tracked inside a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub id: CompetitorId,
    pub group_id: GroupId,
    pub name: String,
    #[serde(default)]
    pub search_name: Option<String>,
    #[serde(default)]
    pub booking_com_url: Option<String>,
    #[serde(default)]
    pub hostelworld_url: Option<String>,
    #[serde(default)]
    pub other_urls: Option<serde_json::Value>,
    pub is_active: bool,
    #[serde(default)]
    pub ota_listing_id: Option<ListingId>,
    #[serde(default)]
    pub last_searched_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_price_found_at: Option<DateTime<Utc>>,
}

impl Competitor {
    /// Preferred public URL for the listing created from this competitor
    pub fn primary_url(&self) -> Option<&str> {
        self.booking_com_url
            .as_deref()
            .or(self.hostelworld_url.as_deref())
    }

    /// External key of the listing the sweep creates for this competitor
    pub fn listing_key(&self) -> String {
        format!("competitor-{}", self.id)
    }
}

/// A group together with its competitors, as loaded for a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorGroupWithCompetitors {
    pub group: CompetitorGroup,
    pub competitors: Vec<Competitor>,
}

/// Partial update of a competitor's bookkeeping fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorPatch {
    pub last_searched_at: Option<DateTime<Utc>>,
    pub last_price_found_at: Option<DateTime<Utc>>,
    pub ota_listing_id: Option<ListingId>,
}

impl CompetitorPatch {
    pub fn searched(at: DateTime<Utc>) -> Self {
        Self {
            last_searched_at: Some(at),
            ..Self::default()
        }
    }

    pub fn price_found(at: DateTime<Utc>) -> Self {
        Self {
            last_searched_at: Some(at),
            last_price_found_at: Some(at),
            ..Self::default()
        }
    }

    pub fn linked_listing(listing_id: ListingId) -> Self {
        Self {
            ota_listing_id: Some(listing_id),
            ..Self::default()
        }
    }

    /// Apply the set fields onto a competitor record
    pub fn apply_to(&self, competitor: &mut Competitor) {
        if let Some(at) = self.last_searched_at {
            competitor.last_searched_at = Some(at);
        }
        if let Some(at) = self.last_price_found_at {
            competitor.last_price_found_at = Some(at);
        }
        if let Some(listing_id) = self.ota_listing_id {
            competitor.ota_listing_id = Some(listing_id);
        }
    }
}

/// Normalized external listing that price rows attach to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtaListing {
    pub id: ListingId,
    pub platform: String,
    pub listing_id: String,
    #[serde(default)]
    pub listing_url: Option<String>,
    pub city: String,
    #[serde(default)]
    pub country: Option<String>,
    pub room_type: RoomType,
    pub room_name: String,
    pub branch_id: BranchId,
    pub is_active: bool,
}

/// Data for creating an OTA listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOtaListing {
    pub platform: String,
    pub listing_id: String,
    pub listing_url: Option<String>,
    pub city: String,
    pub country: Option<String>,
    pub room_type: RoomType,
    pub room_name: String,
    pub branch_id: BranchId,
    pub is_active: bool,
}

/// Nightly price observation, unique per (listing, date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtaPriceData {
    pub listing_id: ListingId,
    pub date: NaiveDate,
    pub price: f64,
    pub currency: String,
    pub available: bool,
    pub source: String,
    pub scraped_at: DateTime<Utc>,
}

/// Values written by a price upsert
///
/// On create every field is used; on repeat only `price` and `scraped_at`
/// overwrite the stored row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDataPatch {
    pub price: f64,
    pub currency: String,
    pub available: bool,
    pub source: String,
    pub scraped_at: DateTime<Utc>,
}

/// Candidate competitor proposed by discovery, returned for manual review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryCandidate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_com_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostelworld_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}
