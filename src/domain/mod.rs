//! Domain Layer
//!
//! Endpoint model, manifest validation, and the pure ranking logic.
//! Outbound ports are declared here and implemented by adapters.

pub mod catalog;
pub mod entities;
pub mod manifest;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{EndpointDescriptor, EndpointResult, ProbeSample, RankedSelection};
pub use manifest::{Manifest, ManifestError};
pub use value_objects::{EndpointKind, AUTO_REGION, UNREACHABLE};
