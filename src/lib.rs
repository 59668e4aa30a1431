//! edge-ranker Library
//!
//! Discovers service endpoints, measures their latency, and ranks them so a
//! caller can route a time-sensitive request to the fastest one.
//!
//! ```no_run
//! use edge_ranker::{discover, DiscoveryOptions};
//!
//! # async fn example() {
//! let selection = discover(DiscoveryOptions::new().top_count(3)).await;
//! println!("fastest: {}", selection.fastest().url());
//! # }
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{discover, discover_with, DiscoveryOptions, DiscoveryService};
pub use config::load_config;
pub use domain::entities::{EndpointDescriptor, EndpointResult, ProbeSample, RankedSelection};
pub use domain::ports::{LatencyProbe, ManifestSource};
pub use domain::services::{RankingEngine, RankingPolicy};
pub use domain::value_objects::EndpointKind;
pub use infrastructure::DiscoveryContext;
