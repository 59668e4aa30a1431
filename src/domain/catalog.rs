//! Static endpoint catalog
//!
//! Used whenever neither the caller nor the remote manifest supplies a
//! usable endpoint list.

use crate::domain::entities::EndpointDescriptor;
use crate::domain::value_objects::{EndpointKind, AUTO_ENDPOINT_URL, AUTO_REGION};

/// Default location of the remote manifest.
pub const DEFAULT_MANIFEST_URL: &str = "https://relay.edgerank.net/endpoints.json";

const STATIC_ENDPOINTS: &[(&str, &str, EndpointKind)] = &[
    (AUTO_ENDPOINT_URL, AUTO_REGION, EndpointKind::Auto),
    ("https://fra1.relay.edgerank.net", "fra", EndpointKind::Direct),
    ("https://ams1.relay.edgerank.net", "ams", EndpointKind::Direct),
    ("https://nyc1.relay.edgerank.net", "nyc", EndpointKind::Direct),
    ("https://sfo1.relay.edgerank.net", "sfo", EndpointKind::Direct),
    ("https://sgp1.relay.edgerank.net", "sgp", EndpointKind::Direct),
    ("https://tyo1.relay.edgerank.net", "tyo", EndpointKind::Direct),
    ("https://gru1.relay.edgerank.net", "gru", EndpointKind::Proxied),
];

/// The hardcoded fallback endpoint list.
pub fn static_endpoints() -> Vec<EndpointDescriptor> {
    STATIC_ENDPOINTS
        .iter()
        .map(|(url, region, kind)| EndpointDescriptor::new(*url, *region, *kind))
        .collect()
}
