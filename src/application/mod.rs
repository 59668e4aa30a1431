//! Application Layer
//!
//! Use cases composing the domain with the outbound ports.

pub mod discovery_service;
pub mod endpoint_prober;
pub mod manifest_resolver;
pub mod options;

pub use discovery_service::{discover, discover_with, DiscoveryService};
pub use endpoint_prober::{EndpointProber, ProbePlan};
pub use manifest_resolver::{EndpointSource, ManifestResolver, ResolvedEndpoints};
pub use options::{DiscoveryOptions, DiscoverySettings, ResultObserver};
