//! Infrastructure Layer
//!
//! Cross-call state shared between discovery runs.

pub mod context;
pub mod cooldown;
pub mod manifest_cache;

pub use context::DiscoveryContext;
pub use cooldown::{FailureCooldownTracker, DEFAULT_COOLDOWN};
pub use manifest_cache::{ManifestCache, DEFAULT_MANIFEST_TTL};
