//! Discovery Context
//!
//! Caller-owned state that may be shared across discovery calls.

use crate::infrastructure::cooldown::FailureCooldownTracker;
use crate::infrastructure::manifest_cache::ManifestCache;
use std::time::Duration;

/// Optional cross-call state for discovery.
///
/// The default context holds nothing, so every call is fully independent.
/// Share one context between calls to skip recently dead endpoints and
/// reuse a fresh manifest.
#[derive(Debug, Default)]
pub struct DiscoveryContext {
    cooldown: Option<FailureCooldownTracker>,
    manifest_cache: Option<ManifestCache>,
}

impl DiscoveryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip endpoints whose last probe run failed within `cooldown`.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = Some(FailureCooldownTracker::new(cooldown));
        self
    }

    /// Reuse resolved manifests for `ttl`.
    pub fn with_manifest_cache(mut self, ttl: Duration) -> Self {
        self.manifest_cache = Some(ManifestCache::new(ttl));
        self
    }

    pub fn cooldown(&self) -> Option<&FailureCooldownTracker> {
        self.cooldown.as_ref()
    }

    pub fn manifest_cache(&self) -> Option<&ManifestCache> {
        self.manifest_cache.as_ref()
    }
}
