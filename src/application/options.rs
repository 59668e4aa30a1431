//! Discovery Options
//!
//! Caller-facing configuration and its sanitization into valid ranges.
//! Out-of-range values are clamped, never rejected.

use crate::domain::catalog::DEFAULT_MANIFEST_URL;
use crate::domain::entities::{EndpointDescriptor, EndpointResult};
use crate::domain::services::RankingPolicy;
use std::sync::Arc;
use std::time::Duration;

/// Callback invoked once per endpoint as soon as its sample is complete.
pub type ResultObserver = Arc<dyn Fn(&EndpointResult) + Send + Sync>;

/// Inclusive range with a default for an integer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bound {
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

impl Bound {
    const fn new(min: i64, max: i64, default: i64) -> Self {
        Self { min, max, default }
    }

    /// Take the default for absent values and clamp everything else.
    pub fn apply(&self, value: Option<i64>) -> i64 {
        value.unwrap_or(self.default).clamp(self.min, self.max)
    }
}

pub const PING_COUNT: Bound = Bound::new(1, 20, 5);
pub const WARMUP_COUNT: Bound = Bound::new(0, 5, 2);
pub const TOP_COUNT: Bound = Bound::new(1, 10, 2);
pub const TIMEOUT_MS: Bound = Bound::new(1_000, 30_000, 5_000);
pub const MANIFEST_TIMEOUT_MS: Bound = Bound::new(1_000, 30_000, 5_000);
pub const MANIFEST_RETRIES: Bound = Bound::new(0, 5, 2);

/// Path appended to each endpoint URL when probing.
pub const DEFAULT_PROBE_PATH: &str = "/ping";

/// Options for a discovery call. Every field is optional.
#[derive(Clone, Default)]
pub struct DiscoveryOptions {
    /// Explicit candidates; skips manifest resolution
    pub endpoints: Option<Vec<EndpointDescriptor>>,
    /// Bare candidate URLs with inferred regions; used when `endpoints` is unset
    pub urls: Option<Vec<String>>,
    /// Where to fetch the manifest from
    pub manifest_url: Option<String>,
    /// Measurement probes per endpoint
    pub ping_count: Option<i64>,
    /// Discarded warmup probes per endpoint
    pub warmup_count: Option<i64>,
    /// Maximum number of non-auto results
    pub top_count: Option<i64>,
    /// Per-probe timeout in milliseconds
    pub timeout_ms: Option<i64>,
    /// Probe path; empty probes the bare URL
    pub path: Option<String>,
    /// Append the auto-routed entry last
    pub include_auto: Option<bool>,
    /// Keep only the fastest endpoint per region
    pub dedupe_by_region: Option<bool>,
    /// Per-attempt manifest fetch timeout in milliseconds
    pub manifest_timeout_ms: Option<i64>,
    /// Manifest fetch retries after the first attempt
    pub manifest_retries: Option<i64>,
    /// Per-result observer
    pub on_result: Option<ResultObserver>,
}

impl DiscoveryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoints(mut self, endpoints: Vec<EndpointDescriptor>) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    pub fn urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls = Some(urls.into_iter().map(Into::into).collect());
        self
    }

    pub fn manifest_url(mut self, url: impl Into<String>) -> Self {
        self.manifest_url = Some(url.into());
        self
    }

    pub fn ping_count(mut self, count: i64) -> Self {
        self.ping_count = Some(count);
        self
    }

    pub fn warmup_count(mut self, count: i64) -> Self {
        self.warmup_count = Some(count);
        self
    }

    pub fn top_count(mut self, count: i64) -> Self {
        self.top_count = Some(count);
        self
    }

    pub fn timeout_ms(mut self, ms: i64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn include_auto(mut self, include: bool) -> Self {
        self.include_auto = Some(include);
        self
    }

    pub fn dedupe_by_region(mut self, dedupe: bool) -> Self {
        self.dedupe_by_region = Some(dedupe);
        self
    }

    pub fn manifest_timeout_ms(mut self, ms: i64) -> Self {
        self.manifest_timeout_ms = Some(ms);
        self
    }

    pub fn manifest_retries(mut self, retries: i64) -> Self {
        self.manifest_retries = Some(retries);
        self
    }

    pub fn on_result<F>(mut self, observer: F) -> Self
    where
        F: Fn(&EndpointResult) + Send + Sync + 'static,
    {
        self.on_result = Some(Arc::new(observer));
        self
    }

    /// Clamp every setting into its documented range.
    pub fn sanitize(&self) -> DiscoverySettings {
        DiscoverySettings {
            ping_count: PING_COUNT.apply(self.ping_count) as usize,
            warmup_count: WARMUP_COUNT.apply(self.warmup_count) as usize,
            top_count: TOP_COUNT.apply(self.top_count) as usize,
            timeout: Duration::from_millis(TIMEOUT_MS.apply(self.timeout_ms) as u64),
            path: self
                .path
                .clone()
                .unwrap_or_else(|| DEFAULT_PROBE_PATH.to_string()),
            include_auto: self.include_auto.unwrap_or(true),
            dedupe_by_region: self.dedupe_by_region.unwrap_or(true),
            manifest_url: self
                .manifest_url
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .unwrap_or(DEFAULT_MANIFEST_URL)
                .to_string(),
            manifest_timeout: Duration::from_millis(
                MANIFEST_TIMEOUT_MS.apply(self.manifest_timeout_ms) as u64,
            ),
            manifest_retries: MANIFEST_RETRIES.apply(self.manifest_retries) as u32,
        }
    }

    /// Candidates supplied by the caller, if any.
    ///
    /// Descriptors win over bare URLs. Entries without a URL are dropped and
    /// missing regions are inferred from the URL.
    pub fn caller_candidates(&self) -> Option<Vec<EndpointDescriptor>> {
        if let Some(endpoints) = &self.endpoints {
            return Some(
                endpoints
                    .iter()
                    .filter(|e| !e.url.trim().is_empty())
                    .map(|e| {
                        let url = e.url.trim();
                        let region = e.region.trim();
                        if region.is_empty() {
                            let mut inferred = EndpointDescriptor::from_url(url);
                            inferred.kind = e.kind;
                            inferred
                        } else {
                            EndpointDescriptor::new(url, region, e.kind)
                        }
                    })
                    .collect(),
            );
        }

        self.urls.as_ref().map(|urls| {
            urls.iter()
                .map(|u| u.trim())
                .filter(|u| !u.is_empty())
                .map(EndpointDescriptor::from_url)
                .collect()
        })
    }
}

impl std::fmt::Debug for DiscoveryOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryOptions")
            .field("endpoints", &self.endpoints)
            .field("urls", &self.urls)
            .field("manifest_url", &self.manifest_url)
            .field("ping_count", &self.ping_count)
            .field("warmup_count", &self.warmup_count)
            .field("top_count", &self.top_count)
            .field("timeout_ms", &self.timeout_ms)
            .field("path", &self.path)
            .field("include_auto", &self.include_auto)
            .field("dedupe_by_region", &self.dedupe_by_region)
            .field("manifest_timeout_ms", &self.manifest_timeout_ms)
            .field("manifest_retries", &self.manifest_retries)
            .field("on_result", &self.on_result.as_ref().map(|_| "<observer>"))
            .finish()
    }
}

/// Options after clamping, as used by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverySettings {
    pub ping_count: usize,
    pub warmup_count: usize,
    pub top_count: usize,
    pub timeout: Duration,
    pub path: String,
    pub include_auto: bool,
    pub dedupe_by_region: bool,
    pub manifest_url: String,
    pub manifest_timeout: Duration,
    pub manifest_retries: u32,
}

impl DiscoverySettings {
    pub fn ranking_policy(&self) -> RankingPolicy {
        RankingPolicy {
            top_count: self.top_count,
            dedupe_by_region: self.dedupe_by_region,
            include_auto: self.include_auto,
        }
    }
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        DiscoveryOptions::default().sanitize()
    }
}
