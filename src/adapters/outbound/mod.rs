mod http_latency_probe;
mod http_manifest_source;

pub use http_latency_probe::HttpLatencyProbe;
pub use http_manifest_source::HttpManifestSource;
