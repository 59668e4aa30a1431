//! edge-ranker - Endpoint latency discovery
//!
//! Composition root: loads configuration, runs one discovery, and prints
//! the ranked endpoints as JSON.

use edge_ranker::{load_config, DiscoveryService};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        "starting edge-ranker candidates={} manifest={}",
        if cfg.urls.is_empty() { "manifest" } else { "caller" },
        cfg.manifest_url.as_deref().unwrap_or("default")
    );

    let service = DiscoveryService::http()?;
    let ctx = cfg.to_context();

    let options = cfg.to_options().on_result(|result| {
        tracing::debug!(
            "measured {} region={} min={:.1}ms skipped={}",
            result.url(),
            result.region(),
            result.min_time(),
            result.sample.skipped
        );
    });

    let selection = service.discover_with(options, &ctx).await;

    println!("{}", serde_json::to_string_pretty(&selection)?);
    Ok(())
}
