//! Manifest Cache
//!
//! TTL cache of resolved manifest endpoint lists, keyed by manifest URL.

use crate::domain::entities::EndpointDescriptor;
use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Default lifetime of a cached manifest.
pub const DEFAULT_MANIFEST_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CachedManifest {
    endpoints: Vec<EndpointDescriptor>,
    fetched_at: Instant,
}

/// Cache of remote manifest resolutions.
///
/// Only successful remote resolutions belong here; the static fallback list
/// is never cached so a recovered manifest server is picked up on the next
/// call.
#[derive(Debug)]
pub struct ManifestCache {
    ttl: Duration,
    entries: DashMap<String, CachedManifest>,
}

impl ManifestCache {
    /// Create a cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get the endpoints cached for `manifest_url` if still fresh.
    pub fn get(&self, manifest_url: &str) -> Option<Vec<EndpointDescriptor>> {
        {
            let entry = self.entries.get(manifest_url)?;
            if entry.fetched_at.elapsed() < self.ttl {
                return Some(entry.endpoints.clone());
            }
        }

        self.entries
            .remove_if(manifest_url, |_, cached| cached.fetched_at.elapsed() >= self.ttl);
        None
    }

    /// Store a freshly fetched endpoint list.
    pub fn put(&self, manifest_url: &str, endpoints: Vec<EndpointDescriptor>) {
        self.entries.insert(
            manifest_url.to_string(),
            CachedManifest {
                endpoints,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Drop the entry for one manifest URL.
    pub fn invalidate(&self, manifest_url: &str) {
        self.entries.remove(manifest_url);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ManifestCache {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST_TTL)
    }
}
