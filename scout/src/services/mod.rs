//! Scout services implementations

pub mod job_runner;
pub mod memory_gateway;
pub mod model_client;
pub mod snapshot;

#[cfg(test)]
pub mod tests;

pub use job_runner::*;
pub use memory_gateway::*;
pub use model_client::*;
pub use snapshot::*;
