//! Competitor discovery: branch context in, reviewed-later candidates out

use std::sync::Arc;

use shared::{BranchId, Component, DiscoveryCandidate, RoomType, scout_error, scout_info};
use crate::core::parser::parse_discovery;
use crate::core::prompt::PromptBuilder;
use crate::error::{ScoutError, ScoutResult};
use crate::traits::{ModelClient, PersistenceGateway};

/// Candidate count requested when the caller does not specify one
pub const DEFAULT_MAX_COMPETITORS: u32 = 10;

const DISCOVERY_CONTEXT: &str = "competitor-discovery";

/// Runs one discovery request end to end
///
/// Candidates are returned as-is; turning them into competitors is a separate
/// action by the caller.
pub struct DiscoveryOrchestrator<M, P>
where
    M: ModelClient + 'static,
    P: PersistenceGateway + 'static,
{
    model: Arc<M>,
    gateway: Arc<P>,
    prompts: PromptBuilder,
}

impl<M, P> DiscoveryOrchestrator<M, P>
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

    pub async fn discover_competitors(
        &self,
        branch_id: BranchId,
        room_type: RoomType,
        max_competitors: u32,
    ) -> ScoutResult<Vec<DiscoveryCandidate>> {
        scout_info!(
            Component::Discovery,
            "🔍 Starting competitor discovery for branch {} ({}, up to {})",
            branch_id,
            room_type,
            max_competitors
        );

        if max_competitors == 0 {
            return Err(ScoutError::InvalidRequest {
                message: "max_competitors must be at least 1".to_string(),
            });
        }

        let branch = self
            .gateway
            .get_branch_with_organization(branch_id)
            .await?
            .ok_or(ScoutError::NotFound { entity: "Branch", id: branch_id })?;

        let city = branch
            .city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .ok_or_else(|| ScoutError::MissingData {
                message: format!("branch {branch_id} has no city"),
            })?;

        let prompt = self.prompts.discovery(&branch, city, room_type, max_competitors);

        let raw = self.model.call(&prompt, DISCOVERY_CONTEXT).await.map_err(|source| {
            let kind = source.failure_kind();
            scout_error!(
                Component::Discovery,
                "❌ Model call for branch {} failed ({:?}): {}",
                branch_id,
                kind,
                source
            );
            ScoutError::DiscoveryFailed {
                branch_id,
                kind,
                source: Box::new(source),
            }
        })?;

        let candidates = parse_discovery(&raw)
            .inspect_err(|e| {
                scout_error!(Component::Discovery, "❌ Unparseable discovery output for branch {}: {}", branch_id, e);
            })?
            .into_candidates();

        scout_info!(
            Component::Discovery,
            "✅ Competitor discovery for branch {} finished: {} candidates",
            branch_id,
            candidates.len()
        );
        Ok(candidates)
    }
}
