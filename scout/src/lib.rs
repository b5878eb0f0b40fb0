//! Competitor discovery and price search for hostel branches
//!
//! Discovery asks a chat-completion model for nearby competitors of a branch
//! and returns them for review. Price search sweeps a competitor group over a
//! date range, one model call per competitor and night, and stores every
//! price it finds against a per-competitor listing.

pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use config::ScoutConfig;
pub use error::{FailureKind, ScoutError, ScoutResult};
pub use traits::*;
pub use types::*;
