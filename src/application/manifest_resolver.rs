//! Manifest Resolver
//!
//! Resolves the candidate endpoint list from the remote manifest with
//! bounded retries, falling back to the static catalog. Never fails.

use crate::domain::catalog::static_endpoints;
use crate::domain::entities::EndpointDescriptor;
use crate::domain::manifest::Manifest;
use crate::domain::ports::{FetchError, ManifestSource};
use crate::infrastructure::ManifestCache;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

/// Delay unit between attempts: retry `n` waits `n` steps.
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_millis(500);

/// Where a candidate list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSource {
    /// Supplied by the caller
    Caller,
    /// Fetched from the remote manifest
    Remote,
    /// Reused from the manifest cache
    Cache,
    /// Hardcoded catalog
    StaticFallback,
}

impl std::fmt::Display for EndpointSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointSource::Caller => write!(f, "caller"),
            EndpointSource::Remote => write!(f, "remote"),
            EndpointSource::Cache => write!(f, "cache"),
            EndpointSource::StaticFallback => write!(f, "static"),
        }
    }
}

/// A resolved candidate list.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEndpoints {
    pub endpoints: Vec<EndpointDescriptor>,
    pub source: EndpointSource,
}

impl ResolvedEndpoints {
    pub fn static_fallback() -> Self {
        Self {
            endpoints: static_endpoints(),
            source: EndpointSource::StaticFallback,
        }
    }
}

/// Fetches and validates the endpoint manifest.
pub struct ManifestResolver {
    source: Arc<dyn ManifestSource>,
    backoff_step: Duration,
}

impl ManifestResolver {
    pub fn new(source: Arc<dyn ManifestSource>) -> Self {
        Self {
            source,
            backoff_step: DEFAULT_BACKOFF_STEP,
        }
    }

    /// Override the backoff unit.
    pub fn with_backoff_step(mut self, step: Duration) -> Self {
        self.backoff_step = step;
        self
    }

    /// Delay before the given attempt (0 for the first one).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }

    /// Resolve the endpoint list, returning the static catalog on failure.
    pub async fn resolve(
        &self,
        url: &str,
        timeout: Duration,
        max_retries: u32,
    ) -> Vec<EndpointDescriptor> {
        self.resolve_cached(url, timeout, max_retries, None)
            .await
            .endpoints
    }

    /// Resolve the endpoint list, consulting and filling `cache` if given.
    pub async fn resolve_cached(
        &self,
        url: &str,
        timeout: Duration,
        max_retries: u32,
        cache: Option<&ManifestCache>,
    ) -> ResolvedEndpoints {
        if let Some(endpoints) = cache.and_then(|c| c.get(url)) {
            tracing::debug!("manifest {} served from cache", url);
            return ResolvedEndpoints {
                endpoints,
                source: EndpointSource::Cache,
            };
        }

        match self.fetch_with_retry(url, timeout, max_retries).await {
            Some(manifest) => {
                if let Some(cache) = cache {
                    cache.put(url, manifest.endpoints.clone());
                }
                ResolvedEndpoints {
                    endpoints: manifest.endpoints,
                    source: EndpointSource::Remote,
                }
            }
            None => {
                tracing::warn!(
                    "manifest {} unavailable after {} attempt(s), using static endpoints",
                    url,
                    max_retries + 1
                );
                ResolvedEndpoints::static_fallback()
            }
        }
    }

    async fn fetch_with_retry(
        &self,
        url: &str,
        timeout: Duration,
        max_retries: u32,
    ) -> Option<Manifest> {
        for attempt in 0..=max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.backoff_delay(attempt)).await;
            }

            let body = match self.fetch_once(url, timeout).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("manifest attempt {} failed: {}", attempt + 1, e);
                    continue;
                }
            };

            match Manifest::parse(&body) {
                Ok(manifest) => {
                    tracing::debug!(
                        "manifest v{} loaded with {} endpoint(s) on attempt {}",
                        manifest.version,
                        manifest.endpoints.len(),
                        attempt + 1
                    );
                    return Some(manifest);
                }
                Err(e) => {
                    tracing::debug!("manifest attempt {} rejected: {}", attempt + 1, e);
                }
            }
        }
        None
    }

    /// One attempt, bounded by `timeout` even if the source ignores it.
    async fn fetch_once(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let fetch = AssertUnwindSafe(self.source.fetch(url, timeout)).catch_unwind();
        match tokio::time::timeout(timeout, fetch).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(FetchError::Client("manifest source panicked".to_string())),
            Err(_) => Err(FetchError::Timeout),
        }
    }
}
