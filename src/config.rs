use crate::application::DiscoveryOptions;
use crate::infrastructure::DiscoveryContext;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    // Candidate resolution
    pub manifest_url: Option<String>,
    pub urls: Vec<String>,

    // Probing
    pub ping_count: Option<i64>,
    pub warmup_count: Option<i64>,
    pub timeout_ms: Option<i64>,
    pub path: Option<String>,
    pub manifest_retries: Option<i64>,

    // Ranking
    pub top_count: Option<i64>,
    pub include_auto: bool,
    pub dedupe_by_region: bool,

    // Cross-call state
    pub cooldown_secs: Option<u64>,
    pub manifest_cache_secs: Option<u64>,

    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest_url: None,
            urls: Vec::new(),
            ping_count: None,
            warmup_count: None,
            timeout_ms: None,
            path: None,
            manifest_retries: None,
            top_count: None,
            include_auto: true,
            dedupe_by_region: true,
            cooldown_secs: None,
            manifest_cache_secs: None,
            debug: false,
        }
    }
}

impl Config {
    /// Discovery options for this configuration.
    ///
    /// Numeric values are passed through unclamped; the discovery service
    /// clamps them.
    pub fn to_options(&self) -> DiscoveryOptions {
        let mut options = DiscoveryOptions {
            manifest_url: self.manifest_url.clone(),
            ping_count: self.ping_count,
            warmup_count: self.warmup_count,
            top_count: self.top_count,
            timeout_ms: self.timeout_ms,
            path: self.path.clone(),
            include_auto: Some(self.include_auto),
            dedupe_by_region: Some(self.dedupe_by_region),
            manifest_retries: self.manifest_retries,
            ..Default::default()
        };
        if !self.urls.is_empty() {
            options.urls = Some(self.urls.clone());
        }
        options
    }

    /// Cross-call context with the configured cooldown and manifest cache.
    pub fn to_context(&self) -> DiscoveryContext {
        let mut ctx = DiscoveryContext::new();
        if let Some(secs) = self.cooldown_secs {
            ctx = ctx.with_cooldown(Duration::from_secs(secs));
        }
        if let Some(secs) = self.manifest_cache_secs {
            ctx = ctx.with_manifest_cache(Duration::from_secs(secs));
        }
        ctx
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Build the configuration from an arbitrary variable lookup.
pub fn load_config_from<F>(lookup: F) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let manifest_url = lookup("EDGERANK_MANIFEST_URL").filter(|v| !v.trim().is_empty());

    let urls = lookup("EDGERANK_URLS")
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let number = |key: &str| lookup(key).and_then(|v| v.trim().parse::<i64>().ok());
    let seconds = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());
    let flag = |key: &str, default: bool| {
        lookup(key)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(default)
    };

    Ok(Config {
        manifest_url,
        urls,
        ping_count: number("EDGERANK_PING_COUNT"),
        warmup_count: number("EDGERANK_WARMUP_COUNT"),
        timeout_ms: number("EDGERANK_TIMEOUT_MS"),
        path: lookup("EDGERANK_PATH"),
        manifest_retries: number("EDGERANK_MANIFEST_RETRIES"),
        top_count: number("EDGERANK_TOP_COUNT"),
        include_auto: flag("EDGERANK_INCLUDE_AUTO", true),
        dedupe_by_region: flag("EDGERANK_DEDUPE", true),
        cooldown_secs: seconds("EDGERANK_COOLDOWN_SECS"),
        manifest_cache_secs: seconds("EDGERANK_MANIFEST_CACHE_SECS"),
        debug: lookup("DEBUG").is_some(),
    })
}
