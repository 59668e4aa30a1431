//! Latency Probe Port
//!
//! Defines the interface for timing a single request against an endpoint.

use async_trait::async_trait;
use std::time::Duration;

/// Times one round trip to an endpoint.
///
/// This is an outbound port. Implementations must not fail: any error,
/// timeout, or non-success status is reported as
/// [`UNREACHABLE`](crate::domain::value_objects::UNREACHABLE).
#[async_trait]
pub trait LatencyProbe: Send + Sync {
    /// Probe `base_url` joined with `path` and return the elapsed
    /// milliseconds, or infinity if the endpoint did not answer with a
    /// success status within `timeout`.
    async fn probe(&self, base_url: &str, path: &str, timeout: Duration) -> f64;
}
