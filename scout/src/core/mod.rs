//! Scout core business logic

pub mod backoff;
pub mod discovery;
pub mod parser;
pub mod price_query;
pub mod price_search;
pub mod prompt;
pub mod rate_limiter;

pub use discovery::{DiscoveryOrchestrator, DEFAULT_MAX_COMPETITORS};
pub use parser::{parse_discovery, parse_price_cell, strip_code_fences};
pub use price_query::CompetitorPriceQuery;
pub use price_search::{date_range, PriceSearchOrchestrator};
pub use prompt::PromptBuilder;
pub use rate_limiter::RateLimiter;
