//! Read-side aggregation over stored competitor prices

use std::sync::Arc;

use chrono::NaiveDate;

use shared::{BranchId, Component, scout_debug};
use crate::error::ScoutResult;
use crate::traits::PersistenceGateway;

/// Answers "what do competitors charge" for a branch and night
pub struct CompetitorPriceQuery<P: PersistenceGateway + 'static> {
    gateway: Arc<P>,
}

impl<P: PersistenceGateway + 'static> CompetitorPriceQuery<P> {
    pub fn new(gateway: Arc<P>) -> Self {
        Self { gateway }
    }

    /// Mean price over the branch's listings for `date`, `None` without data
    ///
    /// Rows marked unavailable or carrying a non-positive price are ignored.
    pub async fn average_price(&self, branch_id: BranchId, date: NaiveDate) -> ScoutResult<Option<f64>> {
        let rows = self.gateway.find_branch_price_data(branch_id, date).await?;
        let prices: Vec<f64> = rows
            .iter()
            .filter(|row| row.available && row.price.is_finite() && row.price > 0.0)
            .map(|row| row.price)
            .collect();

        scout_debug!(
            Component::Store,
            "Branch {} on {}: {} usable price rows of {}",
            branch_id,
            date,
            prices.len(),
            rows.len()
        );

        if prices.is_empty() {
            return Ok(None);
        }
        Ok(Some(prices.iter().sum::<f64>() / prices.len() as f64))
    }
}
