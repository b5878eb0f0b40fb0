//! Price sweep over competitors x dates
//!
//! Cells run strictly one after another; the shared rate limiter already
//! serializes outbound calls. Each cell persists independently, so a sweep
//! that stops partway leaves a consistent subset of rows and can be re-run.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use shared::{
    AI_SEARCH_PLATFORM, AI_SEARCH_SOURCE, Competitor, CompetitorGroup, CompetitorPatch, Component, GroupId,
    NewOtaListing, OtaListing, PriceDataPatch, RoomType, scout_error, scout_info, scout_warn,
};
use crate::core::parser::parse_price_cell;
use crate::core::prompt::PromptBuilder;
use crate::error::{ScoutError, ScoutResult};
use crate::traits::{ModelClient, PersistenceGateway};
use crate::types::{SweepReport, SweepRequest};

const PRICE_CONTEXT: &str = "price-search";

/// Inclusive list of days from `start` to `end`; empty if `start > end`
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

/// What happened to a single cell that did not error
enum CellOutcome {
    PriceStored,
    PriceStoredWithoutBookkeeping,
    NoPrice,
}

/// Runs price sweeps for competitor groups
pub struct PriceSearchOrchestrator<M, P>
where
    M: ModelClient + 'static,
    P: PersistenceGateway + 'static,
{
    model: Arc<M>,
    gateway: Arc<P>,
    prompts: PromptBuilder,
}

impl<M, P> PriceSearchOrchestrator<M, P>
where
    M: ModelClient + 'static,
    P: PersistenceGateway + 'static,
{
    pub fn new(model: Arc<M>, gateway: Arc<P>) -> Self {
        Self {
            model,
            gateway,
            prompts: PromptBuilder::new(),
        }
    }

    /// Number of cells where a price was found and stored
    pub async fn search_prices(
        &self,
        group_id: GroupId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        room_type: RoomType,
    ) -> ScoutResult<usize> {
        let request = SweepRequest { group_id, start_date, end_date, room_type };
        Ok(self.search_prices_report(&request).await?.prices_found)
    }

    /// Run a sweep and return its counters
    ///
    /// Only a missing group or a failure loading it aborts the sweep; every
    /// per-cell failure is logged and counted.
    pub async fn search_prices_report(&self, request: &SweepRequest) -> ScoutResult<SweepReport> {
        let group_id = request.group_id;
        scout_info!(
            Component::PriceSearch,
            "🚀 Starting price sweep for group {} ({} to {}, {})",
            group_id,
            request.start_date,
            request.end_date,
            request.room_type
        );

        let loaded = self
            .gateway
            .get_competitor_group_with_competitors(group_id)
            .await?
            .ok_or(ScoutError::NotFound { entity: "CompetitorGroup", id: group_id })?;

        let group = loaded.group;
        let mut competitors: Vec<Competitor> =
            loaded.competitors.into_iter().filter(|competitor| competitor.is_active).collect();

        let mut report = SweepReport {
            competitors: competitors.len(),
            ..SweepReport::default()
        };

        if competitors.is_empty() {
            scout_warn!(Component::PriceSearch, "⚠️ No active competitors in group {}", group_id);
            return Ok(report);
        }

        let dates = date_range(request.start_date, request.end_date);
        report.cells_total = competitors.len() * dates.len();

        for competitor in competitors.iter_mut() {
            for date in &dates {
                match self.search_cell(&group, competitor, *date, request.room_type).await {
                    Ok(CellOutcome::PriceStored) => report.prices_found += 1,
                    Ok(CellOutcome::PriceStoredWithoutBookkeeping) => {
                        report.prices_found += 1;
                        report.bookkeeping_failed += 1;
                    }
                    Ok(CellOutcome::NoPrice) => report.cells_without_price += 1,
                    Err(e) => {
                        report.cells_failed += 1;
                        scout_error!(
                            Component::PriceSearch,
                            "❌ Price lookup failed for competitor {} on {}: {}",
                            competitor.id,
                            date,
                            e
                        );
                    }
                }
            }
        }

        scout_info!(
            Component::PriceSearch,
            "✅ Price sweep for group {} finished: {} prices found, {} without price, {} failed, {} bookkeeping failures",
            group_id,
            report.prices_found,
            report.cells_without_price,
            report.cells_failed,
            report.bookkeeping_failed
        );
        Ok(report)
    }

    async fn search_cell(
        &self,
        group: &CompetitorGroup,
        competitor: &mut Competitor,
        date: NaiveDate,
        room_type: RoomType,
    ) -> ScoutResult<CellOutcome> {
        let prompt = self.prompts.price_lookup(&competitor.name, &group.city, date, room_type);
        let raw = self.model.call(&prompt, PRICE_CONTEXT).await?;
        let cell = parse_price_cell(&raw);

        let Some(price) = cell.price else {
            self.gateway
                .update_competitor(competitor.id, CompetitorPatch::searched(Utc::now()))
                .await?;
            return Ok(CellOutcome::NoPrice);
        };

        let listing = self.listing_for(group, competitor, room_type).await?;
        let now = Utc::now();
        self.gateway
            .upsert_price_data(
                listing.id,
                date,
                PriceDataPatch {
                    price,
                    currency: cell.currency,
                    available: true,
                    source: AI_SEARCH_SOURCE.to_string(),
                    scraped_at: now,
                },
            )
            .await?;

        // The price row is stored; a failed timestamp update no longer fails the cell
        let patch = CompetitorPatch::price_found(now);
        if let Err(e) = self.gateway.update_competitor(competitor.id, patch.clone()).await {
            scout_warn!(
                Component::PriceSearch,
                "⚠️ Stored price for competitor {} on {} but could not update its timestamps: {}",
                competitor.id,
                date,
                e
            );
            return Ok(CellOutcome::PriceStoredWithoutBookkeeping);
        }
        patch.apply_to(competitor);

        Ok(CellOutcome::PriceStored)
    }

    /// Listing the competitor's prices attach to, created on first use
    async fn listing_for(
        &self,
        group: &CompetitorGroup,
        competitor: &mut Competitor,
        room_type: RoomType,
    ) -> ScoutResult<OtaListing> {
        if let Some(listing_id) = competitor.ota_listing_id {
            if let Some(listing) = self.gateway.get_ota_listing(listing_id).await? {
                return Ok(listing);
            }
            scout_warn!(
                Component::PriceSearch,
                "⚠️ Competitor {} points at missing listing {}, creating a new one",
                competitor.id,
                listing_id
            );
        }

        let listing = self
            .gateway
            .create_ota_listing(NewOtaListing {
                platform: AI_SEARCH_PLATFORM.to_string(),
                listing_id: competitor.listing_key(),
                listing_url: competitor.primary_url().map(str::to_string),
                city: group.city.clone(),
                country: group.country.clone(),
                room_type,
                room_name: competitor.name.clone(),
                branch_id: group.branch_id,
                is_active: true,
            })
            .await?;

        let patch = CompetitorPatch::linked_listing(listing.id);
        self.gateway.update_competitor(competitor.id, patch.clone()).await?;
        // Later dates of this sweep must reuse the listing
        patch.apply_to(competitor);

        scout_info!(
            Component::PriceSearch,
            "🆕 Created listing {} for competitor {}",
            listing.id,
            competitor.id
        );
        Ok(listing)
    }
}
