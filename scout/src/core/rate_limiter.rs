//! Global pacing gate for outbound model calls

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

use shared::{Component, scout_debug};

/// Enforces a minimum interval between any two outbound calls
///
/// One instance is shared by discovery and price-search traffic. Callers are
/// handed consecutive slots in the order they reach the lock; the lock is only
/// held while a slot is reserved, never while sleeping.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_slot: Mutex::new(None),
        }
    }

    /// Wait until this caller's slot is due
    pub async fn wait(&self) {
        let slot = self.reserve_slot().await;
        let now = Instant::now();
        if slot > now {
            scout_debug!(
                Component::RateLimiter,
                "⏳ Waiting {}ms for the next model call slot",
                (slot - now).as_millis()
            );
            sleep_until(slot).await;
        }
    }

    async fn reserve_slot(&self) -> Instant {
        let mut last_slot = self.last_slot.lock().await;
        let now = Instant::now();
        let slot = match *last_slot {
            Some(previous) => (previous + self.min_interval).max(now),
            None => now,
        };
        *last_slot = Some(slot);
        slot
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::DEFAULT_MIN_INTERVAL_MS))
    }
}
