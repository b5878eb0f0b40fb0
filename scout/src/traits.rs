//! Scout trait definitions for dependency injection

use async_trait::async_trait;
use chrono::NaiveDate;

use shared::{
    BranchContext, BranchId, CompetitorGroupWithCompetitors, CompetitorId, CompetitorPatch, GroupId,
    ListingId, NewOtaListing, OtaListing, OtaPriceData, PriceDataPatch,
};
use crate::error::ScoutResult;

/// Chat-completion client guarded by the shared rate limiter
#[mockall::automock]
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send one prompt and return the message content
    ///
    /// `context` only labels the call in logs (e.g. "competitor-discovery").
    async fn call(&self, prompt: &str, context: &str) -> ScoutResult<String>;
}

/// Read/write contract the core needs from the relational store
#[mockall::automock]
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Branch with its organization, `None` if the branch does not exist
    async fn get_branch_with_organization(&self, branch_id: BranchId) -> ScoutResult<Option<BranchContext>>;

    /// Group with its competitors, `None` if the group does not exist
    async fn get_competitor_group_with_competitors(
        &self,
        group_id: GroupId,
    ) -> ScoutResult<Option<CompetitorGroupWithCompetitors>>;

    async fn update_competitor(&self, id: CompetitorId, patch: CompetitorPatch) -> ScoutResult<()>;

    async fn get_ota_listing(&self, id: ListingId) -> ScoutResult<Option<OtaListing>>;

    async fn create_ota_listing(&self, data: NewOtaListing) -> ScoutResult<OtaListing>;

    /// Insert or overwrite the price row keyed by (listing_id, date)
    async fn upsert_price_data(
        &self,
        listing_id: ListingId,
        date: NaiveDate,
        patch: PriceDataPatch,
    ) -> ScoutResult<OtaPriceData>;

    /// Price rows for `date` across the branch's active listings
    async fn find_branch_price_data(&self, branch_id: BranchId, date: NaiveDate) -> ScoutResult<Vec<OtaPriceData>>;
}
