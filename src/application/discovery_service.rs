//! Discovery Service - Main application use case
//!
//! Orchestrates endpoint discovery: resolving candidates, probing them
//! concurrently, and ranking the samples. This is the primary interface of
//! the crate and it never fails.

use crate::adapters::outbound::{HttpLatencyProbe, HttpManifestSource};
use crate::application::endpoint_prober::{EndpointProber, ProbePlan};
use crate::application::manifest_resolver::{EndpointSource, ManifestResolver, ResolvedEndpoints};
use crate::application::options::{DiscoveryOptions, DiscoverySettings, ResultObserver};
use crate::domain::entities::{EndpointDescriptor, EndpointResult, RankedSelection};
use crate::domain::ports::{LatencyProbe, ManifestSource};
use crate::domain::services::RankingEngine;
use crate::infrastructure::{DiscoveryContext, FailureCooldownTracker};
use futures::{FutureExt, StreamExt};
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Discovery service - main application use case.
///
/// This service orchestrates a discovery run:
/// 1. Sanitizes options and resolves the candidate endpoints
/// 2. Probes every candidate at once (sequentially within one endpoint)
/// 3. Reports each sample to the observer as it completes
/// 4. Ranks the samples into a non-empty selection
pub struct DiscoveryService {
    prober: EndpointProber,
    resolver: ManifestResolver,
}

impl DiscoveryService {
    /// Create a service from its outbound ports.
    pub fn new(probe: Arc<dyn LatencyProbe>, manifest_source: Arc<dyn ManifestSource>) -> Self {
        Self {
            prober: EndpointProber::new(probe),
            resolver: ManifestResolver::new(manifest_source),
        }
    }

    /// Create a service backed by reqwest, sharing one connection pool.
    pub fn http() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::new(
            Arc::new(HttpLatencyProbe::with_client(client.clone())),
            Arc::new(HttpManifestSource::with_client(client)),
        ))
    }

    /// Override the manifest retry backoff unit.
    pub fn with_backoff_step(mut self, step: Duration) -> Self {
        self.resolver = self.resolver.with_backoff_step(step);
        self
    }

    /// Run an isolated discovery with no cross-call state.
    pub async fn discover(&self, options: DiscoveryOptions) -> RankedSelection {
        self.discover_with(options, &DiscoveryContext::default()).await
    }

    /// Run a discovery using the cooldown tracker and manifest cache in `ctx`.
    ///
    /// Any panic inside the pipeline yields the auto-routed fallback.
    #[tracing::instrument(name = "discover", skip_all)]
    pub async fn discover_with(
        &self,
        options: DiscoveryOptions,
        ctx: &DiscoveryContext,
    ) -> RankedSelection {
        let pipeline = AssertUnwindSafe(self.run_pipeline(&options, ctx)).catch_unwind();
        match pipeline.await {
            Ok(selection) => selection,
            Err(_) => {
                tracing::warn!("discovery pipeline panicked, returning auto fallback");
                RankedSelection::fallback(EndpointDescriptor::auto())
            }
        }
    }

    async fn run_pipeline(
        &self,
        options: &DiscoveryOptions,
        ctx: &DiscoveryContext,
    ) -> RankedSelection {
        let start = Instant::now();
        let settings = options.sanitize();

        let resolved = self.resolve_candidates(options, &settings, ctx).await;
        let auto = resolved
            .endpoints
            .iter()
            .find(|e| e.is_auto())
            .cloned()
            .unwrap_or_else(EndpointDescriptor::auto);

        let results = self
            .probe_all(
                &resolved.endpoints,
                &settings,
                ctx.cooldown(),
                options.on_result.as_ref(),
            )
            .await;

        let selection = RankingEngine::rank(&results, &settings.ranking_policy(), &auto);

        let fastest = selection.fastest();
        tracing::info!(
            "discovery done in {:?}: {} candidate(s) from {}, fastest {} ({:.1}ms)",
            start.elapsed(),
            resolved.endpoints.len(),
            resolved.source,
            fastest.url(),
            fastest.min_time()
        );

        selection
    }

    /// Caller candidates first, then the manifest, then the static catalog.
    async fn resolve_candidates(
        &self,
        options: &DiscoveryOptions,
        settings: &DiscoverySettings,
        ctx: &DiscoveryContext,
    ) -> ResolvedEndpoints {
        let resolved = match options.caller_candidates() {
            Some(endpoints) => ResolvedEndpoints {
                endpoints,
                source: EndpointSource::Caller,
            },
            None => {
                self.resolver
                    .resolve_cached(
                        &settings.manifest_url,
                        settings.manifest_timeout,
                        settings.manifest_retries,
                        ctx.manifest_cache(),
                    )
                    .await
            }
        };

        let endpoints = dedupe_by_url(resolved.endpoints);
        if endpoints.is_empty() {
            tracing::warn!("no usable candidates from {}, using static endpoints", resolved.source);
            return ResolvedEndpoints::static_fallback();
        }

        ResolvedEndpoints {
            endpoints,
            source: resolved.source,
        }
    }

    /// Probe all candidates concurrently and return results in candidate order.
    ///
    /// Every candidate gets its own in-flight prober, so the slowest endpoint
    /// bounds the wait.
    async fn probe_all(
        &self,
        candidates: &[EndpointDescriptor],
        settings: &DiscoverySettings,
        cooldown: Option<&FailureCooldownTracker>,
        observer: Option<&ResultObserver>,
    ) -> Vec<EndpointResult> {
        let plan = ProbePlan {
            warmup_count: settings.warmup_count,
            ping_count: settings.ping_count,
            path: settings.path.clone(),
            timeout: settings.timeout,
        };
        let plan = &plan;

        let mut completed = futures::stream::iter(candidates.iter().enumerate())
            .map(|(index, endpoint)| async move {
                let sample = self.prober.run(endpoint, plan, cooldown).await;
                (index, EndpointResult::new(endpoint.clone(), sample))
            })
            .buffer_unordered(candidates.len().max(1));

        let mut results = Vec::with_capacity(candidates.len());
        while let Some((index, result)) = completed.next().await {
            notify(observer, &result);
            results.push((index, result));
        }

        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, result)| result).collect()
    }
}

/// Invoke the observer, discarding anything it throws.
fn notify(observer: Option<&ResultObserver>, result: &EndpointResult) {
    if let Some(observer) = observer {
        let _ = std::panic::catch_unwind(AssertUnwindSafe(|| observer(result)));
    }
}

/// Drop repeated URLs, keeping the first occurrence.
fn dedupe_by_url(endpoints: Vec<EndpointDescriptor>) -> Vec<EndpointDescriptor> {
    let mut seen = HashSet::new();
    endpoints
        .into_iter()
        .filter(|e| seen.insert(e.key()))
        .collect()
}

/// Discover and rank endpoints with the default HTTP adapters.
///
/// Never fails: if the HTTP client cannot be built the auto-routed fallback
/// is returned.
pub async fn discover(options: DiscoveryOptions) -> RankedSelection {
    discover_with(options, &DiscoveryContext::default()).await
}

/// Like [`discover`], with caller-owned cross-call state.
pub async fn discover_with(options: DiscoveryOptions, ctx: &DiscoveryContext) -> RankedSelection {
    match DiscoveryService::http() {
        Ok(service) => service.discover_with(options, ctx).await,
        Err(e) => {
            tracing::warn!("failed to build HTTP client: {}", e);
            RankedSelection::fallback(EndpointDescriptor::auto())
        }
    }
}
