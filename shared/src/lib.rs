//! Shared types for the competitor pricing subsystem
//!
//! Holds the domain records exchanged between the scout core and the
//! persistence layer, plus logging helpers used by every component.

pub mod errors;
pub mod logging;
pub mod models;
pub mod types;

pub use errors::*;
pub use models::*;
pub use types::*;
