//! Endpoint Prober
//!
//! Runs the warmup-then-measurement probe sequence against one endpoint.

use crate::domain::entities::{EndpointDescriptor, ProbeSample};
use crate::domain::ports::LatencyProbe;
use crate::domain::value_objects::UNREACHABLE;
use crate::infrastructure::FailureCooldownTracker;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

/// How many probes to run and how.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbePlan {
    pub warmup_count: usize,
    pub ping_count: usize,
    pub path: String,
    pub timeout: Duration,
}

/// Sequential prober for a single endpoint.
///
/// Probes never overlap, so each measurement is an independent round trip
/// rather than a queued request.
#[derive(Clone)]
pub struct EndpointProber {
    probe: Arc<dyn LatencyProbe>,
}

impl EndpointProber {
    pub fn new(probe: Arc<dyn LatencyProbe>) -> Self {
        Self { probe }
    }

    /// Probe `endpoint` according to `plan`.
    ///
    /// With a cooldown tracker, endpoints in cooldown are skipped and the
    /// tracker is updated with the outcome of the measurements.
    #[tracing::instrument(
        name = "measure_endpoint",
        level = "debug",
        skip_all,
        fields(endpoint = %endpoint.url, region = %endpoint.region)
    )]
    pub async fn run(
        &self,
        endpoint: &EndpointDescriptor,
        plan: &ProbePlan,
        cooldown: Option<&FailureCooldownTracker>,
    ) -> ProbeSample {
        let key = endpoint.key();

        if let Some(tracker) = cooldown {
            if tracker.is_cooling_down(&key) {
                tracing::debug!("skipping {} (cooling down)", key);
                return ProbeSample::skipped();
            }
        }

        let mut warmup_times = Vec::with_capacity(plan.warmup_count);
        for _ in 0..plan.warmup_count {
            warmup_times.push(self.probe_once(&endpoint.url, plan).await);
        }

        let mut times = Vec::with_capacity(plan.ping_count);
        for _ in 0..plan.ping_count {
            times.push(self.probe_once(&endpoint.url, plan).await);
        }

        let sample = ProbeSample::from_measurements(warmup_times, times);

        if let Some(tracker) = cooldown {
            if sample.is_reachable() {
                tracker.record_success(&key);
            } else {
                tracker.record_failure(&key);
            }
        }

        tracing::debug!(
            "probed {} region={} min={:.1}ms",
            key,
            endpoint.region,
            sample.min_time
        );
        sample
    }

    /// One probe, bounded by the timeout and isolated from panics.
    async fn probe_once(&self, url: &str, plan: &ProbePlan) -> f64 {
        let probe = AssertUnwindSafe(self.probe.probe(url, &plan.path, plan.timeout)).catch_unwind();
        match tokio::time::timeout(plan.timeout, probe).await {
            Ok(Ok(ms)) if ms.is_nan() || ms < 0.0 => UNREACHABLE,
            Ok(Ok(ms)) => ms,
            Ok(Err(_)) => {
                tracing::debug!("probe for {} panicked", url);
                UNREACHABLE
            }
            Err(_) => UNREACHABLE,
        }
    }
}
