//! HTTP Latency Probe
//!
//! Implements LatencyProbe with reqwest GET requests.

use crate::domain::ports::LatencyProbe;
use crate::domain::value_objects::{probe_target, UNREACHABLE};
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::time::{Duration, Instant};

/// reqwest-backed latency probe.
///
/// Holds one pooled client so that warmup probes leave a warm connection
/// behind for the timed measurements.
#[derive(Debug, Clone)]
pub struct HttpLatencyProbe {
    client: reqwest::Client,
}

impl HttpLatencyProbe {
    /// Create a probe with its own HTTP client.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }

    /// Create a probe on top of an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LatencyProbe for HttpLatencyProbe {
    async fn probe(&self, base_url: &str, path: &str, timeout: Duration) -> f64 {
        let target = probe_target(base_url, path);
        let request = self
            .client
            .get(&target)
            .timeout(timeout)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache");

        let start = Instant::now();
        let response = request.send().await;
        let elapsed = start.elapsed();

        match response {
            Ok(resp) if resp.status().is_success() => {
                // Drain so the connection returns to the pool
                let _ = resp.bytes().await;
                elapsed.as_secs_f64() * 1000.0
            }
            Ok(resp) => {
                tracing::debug!("probe {} returned status {}", target, resp.status());
                UNREACHABLE
            }
            Err(e) if e.is_timeout() => {
                tracing::debug!("probe {} timed out after {:?}", target, timeout);
                UNREACHABLE
            }
            Err(e) => {
                tracing::debug!("probe {} failed: {}", target, e);
                UNREACHABLE
            }
        }
    }
}
