//! Failure Cooldown
//!
//! Temporarily excludes endpoints that recently failed every probe.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Default time an endpoint stays excluded after a failed probe run.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

/// Tracks recently failed endpoints.
///
/// Safe to share between concurrent discovery calls. Entries are not evicted
/// actively; an entry older than the cooldown is treated as absent and
/// dropped on the next lookup.
#[derive(Debug)]
pub struct FailureCooldownTracker {
    cooldown: Duration,
    /// Endpoint key -> time of the last failed probe run
    failed_at: DashMap<String, Instant>,
}

impl FailureCooldownTracker {
    /// Create a tracker with the given cooldown window.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            failed_at: DashMap::new(),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Whether probing of this endpoint should be skipped right now.
    pub fn is_cooling_down(&self, endpoint: &str) -> bool {
        let expired = match self.failed_at.get(endpoint) {
            Some(entry) => entry.value().elapsed() >= self.cooldown,
            None => return false,
        };

        if expired {
            self.failed_at
                .remove_if(endpoint, |_, at| at.elapsed() >= self.cooldown);
            return false;
        }
        true
    }

    /// Record that every measurement against this endpoint failed.
    pub fn record_failure(&self, endpoint: &str) {
        self.failed_at.insert(endpoint.to_string(), Instant::now());
        tracing::debug!("endpoint {} entering cooldown for {:?}", endpoint, self.cooldown);
    }

    /// Record that at least one measurement succeeded.
    pub fn record_success(&self, endpoint: &str) {
        if self.failed_at.remove(endpoint).is_some() {
            tracing::debug!("endpoint {} recovered, cooldown cleared", endpoint);
        }
    }

    /// Number of tracked endpoints, including ones whose cooldown has lapsed
    /// but were not looked up since.
    pub fn len(&self) -> usize {
        self.failed_at.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failed_at.is_empty()
    }

    /// Forget all failures.
    pub fn clear(&self) {
        self.failed_at.clear();
    }
}

impl Default for FailureCooldownTracker {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}
