//! In-memory persistence gateway

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use shared::{
    BranchContext, BranchId, Competitor, CompetitorGroup, CompetitorGroupWithCompetitors, CompetitorId,
    CompetitorPatch, Component, GroupId, ListingId, NewOtaListing, OtaListing, OtaPriceData, PriceDataPatch,
    scout_debug,
};
use crate::error::{ScoutError, ScoutResult};
use crate::services::snapshot::StoreSnapshot;
use crate::traits::PersistenceGateway;

#[derive(Debug, Default)]
struct StoreState {
    branches: BTreeMap<BranchId, BranchContext>,
    groups: BTreeMap<GroupId, CompetitorGroup>,
    competitors: BTreeMap<CompetitorId, Competitor>,
    listings: BTreeMap<ListingId, OtaListing>,
    prices: BTreeMap<(ListingId, NaiveDate), OtaPriceData>,
    next_listing_id: ListingId,
}

impl StoreState {
    fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let next_listing_id = snapshot.listings.iter().map(|listing| listing.id).max().unwrap_or(0) + 1;
        Self {
            branches: snapshot.branches,
            groups: snapshot.groups.into_iter().map(|group| (group.id, group)).collect(),
            competitors: snapshot
                .competitors
                .into_iter()
                .map(|competitor| (competitor.id, competitor))
                .collect(),
            listings: snapshot.listings.into_iter().map(|listing| (listing.id, listing)).collect(),
            prices: snapshot
                .prices
                .into_iter()
                .map(|row| ((row.listing_id, row.date), row))
                .collect(),
            next_listing_id,
        }
    }

    fn to_snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            branches: self.branches.clone(),
            groups: self.groups.values().cloned().collect(),
            competitors: self.competitors.values().cloned().collect(),
            listings: self.listings.values().cloned().collect(),
            prices: self.prices.values().cloned().collect(),
        }
    }
}

/// Persistence gateway backed by process memory
///
/// Used by the CLI together with a JSON snapshot, and by tests that need to
/// look at what a sweep actually stored.
#[derive(Debug)]
pub struct InMemoryGateway {
    state: RwLock<StoreState>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::from_snapshot(StoreSnapshot::default())
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            state: RwLock::new(StoreState::from_snapshot(snapshot)),
        }
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.read().await.to_snapshot()
    }

    pub async fn insert_branch(&self, id: BranchId, branch: BranchContext) {
        self.state.write().await.branches.insert(id, branch);
    }

    pub async fn insert_group(&self, group: CompetitorGroup) {
        self.state.write().await.groups.insert(group.id, group);
    }

    pub async fn insert_competitor(&self, competitor: Competitor) {
        self.state.write().await.competitors.insert(competitor.id, competitor);
    }

    pub async fn competitor(&self, id: CompetitorId) -> Option<Competitor> {
        self.state.read().await.competitors.get(&id).cloned()
    }

    pub async fn listings(&self) -> Vec<OtaListing> {
        self.state.read().await.listings.values().cloned().collect()
    }

    pub async fn price_rows(&self) -> Vec<OtaPriceData> {
        self.state.read().await.prices.values().cloned().collect()
    }
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryGateway {
    async fn get_branch_with_organization(&self, branch_id: BranchId) -> ScoutResult<Option<BranchContext>> {
        Ok(self.state.read().await.branches.get(&branch_id).cloned())
    }

    async fn get_competitor_group_with_competitors(
        &self,
        group_id: GroupId,
    ) -> ScoutResult<Option<CompetitorGroupWithCompetitors>> {
        let state = self.state.read().await;
        let Some(group) = state.groups.get(&group_id) else {
            return Ok(None);
        };

        let competitors = state
            .competitors
            .values()
            .filter(|competitor| competitor.group_id == group_id)
            .cloned()
            .collect();

        Ok(Some(CompetitorGroupWithCompetitors {
            group: group.clone(),
            competitors,
        }))
    }

    async fn update_competitor(&self, id: CompetitorId, patch: CompetitorPatch) -> ScoutResult<()> {
        let mut state = self.state.write().await;
        let competitor = state
            .competitors
            .get_mut(&id)
            .ok_or(ScoutError::NotFound { entity: "Competitor", id })?;
        patch.apply_to(competitor);
        Ok(())
    }

    async fn get_ota_listing(&self, id: ListingId) -> ScoutResult<Option<OtaListing>> {
        Ok(self.state.read().await.listings.get(&id).cloned())
    }

    async fn create_ota_listing(&self, data: NewOtaListing) -> ScoutResult<OtaListing> {
        let mut state = self.state.write().await;
        let id = state.next_listing_id;
        state.next_listing_id += 1;

        let listing = OtaListing {
            id,
            platform: data.platform,
            listing_id: data.listing_id,
            listing_url: data.listing_url,
            city: data.city,
            country: data.country,
            room_type: data.room_type,
            room_name: data.room_name,
            branch_id: data.branch_id,
            is_active: data.is_active,
        };
        state.listings.insert(id, listing.clone());

        scout_debug!(Component::Store, "Created listing {} ({})", id, listing.listing_id);
        Ok(listing)
    }

    async fn upsert_price_data(
        &self,
        listing_id: ListingId,
        date: NaiveDate,
        patch: PriceDataPatch,
    ) -> ScoutResult<OtaPriceData> {
        let mut state = self.state.write().await;
        if !state.listings.contains_key(&listing_id) {
            return Err(ScoutError::NotFound { entity: "OtaListing", id: listing_id });
        }

        let row = state
            .prices
            .entry((listing_id, date))
            .and_modify(|row| {
                row.price = patch.price;
                row.scraped_at = patch.scraped_at;
            })
            .or_insert_with(|| OtaPriceData {
                listing_id,
                date,
                price: patch.price,
                currency: patch.currency.clone(),
                available: patch.available,
                source: patch.source.clone(),
                scraped_at: patch.scraped_at,
            });
        Ok(row.clone())
    }

    async fn find_branch_price_data(&self, branch_id: BranchId, date: NaiveDate) -> ScoutResult<Vec<OtaPriceData>> {
        let state = self.state.read().await;
        let rows = state
            .listings
            .values()
            .filter(|listing| listing.branch_id == branch_id && listing.is_active)
            .filter_map(|listing| state.prices.get(&(listing.id, date)))
            .cloned()
            .collect();
        Ok(rows)
    }
}
