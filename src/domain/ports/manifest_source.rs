//! Manifest Source Port
//!
//! Defines the interface for fetching the raw endpoint manifest.

use async_trait::async_trait;
use std::time::Duration;

/// Failure to fetch a manifest body.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("unexpected status: {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("client error: {0}")]
    Client(String),
}

/// Source of raw manifest documents.
///
/// Retry and validation live in the resolver; a source performs exactly one
/// attempt per call.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Fetch the manifest body at `url` within `timeout`.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, FetchError>;
}
