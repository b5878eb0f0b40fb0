//! JSON snapshot of the in-memory store
//!
//! Lets the CLI run discovery and sweeps against a file instead of a
//! database: the store is loaded at start and written back when a command
//! changed it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;

use shared::{
    BranchContext, BranchId, Competitor, CompetitorGroup, Component, OtaListing, OtaPriceData, scout_info,
};
use crate::error::{ScoutError, ScoutResult};

/// Serializable contents of an [`InMemoryGateway`](super::InMemoryGateway)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSnapshot {
    pub branches: BTreeMap<BranchId, BranchContext>,
    pub groups: Vec<CompetitorGroup>,
    pub competitors: Vec<Competitor>,
    pub listings: Vec<OtaListing>,
    pub prices: Vec<OtaPriceData>,
}

/// Read a snapshot; a missing file yields an empty store
pub async fn load_snapshot(path: &Path) -> ScoutResult<StoreSnapshot> {
    if !fs::try_exists(path).await? {
        scout_info!(Component::Store, "📂 No store at {}, starting empty", path.display());
        return Ok(StoreSnapshot::default());
    }

    let raw = fs::read_to_string(path).await?;
    let snapshot: StoreSnapshot = serde_json::from_str(&raw)
        .map_err(|e| ScoutError::persistence(format!("invalid store file {}: {e}", path.display())))?;

    scout_info!(
        Component::Store,
        "📂 Loaded store from {}: {} branches, {} groups, {} competitors, {} price rows",
        path.display(),
        snapshot.branches.len(),
        snapshot.groups.len(),
        snapshot.competitors.len(),
        snapshot.prices.len()
    );
    Ok(snapshot)
}

/// Write a snapshot atomically through a sibling temp file
pub async fn save_snapshot(path: &Path, snapshot: &StoreSnapshot) -> ScoutResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(snapshot)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).await?;
    fs::rename(&tmp, path).await?;

    scout_info!(Component::Store, "💾 Saved store to {}", path.display());
    Ok(())
}
