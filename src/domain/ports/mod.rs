mod latency_probe;
mod manifest_source;

pub use latency_probe::LatencyProbe;
pub use manifest_source::{FetchError, ManifestSource};
