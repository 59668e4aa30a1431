//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize};

/// Latency value meaning "did not respond successfully within the timeout".
pub const UNREACHABLE: f64 = f64::INFINITY;

/// Region key of the auto-routed endpoint.
pub const AUTO_REGION: &str = "auto";

/// Secure scheme every manifest endpoint URL must start with.
pub const SECURE_SCHEME: &str = "https://";

/// Fixed URL of the auto-routed endpoint.
pub const AUTO_ENDPOINT_URL: &str = "https://global.relay.edgerank.net";

/// Host of [`AUTO_ENDPOINT_URL`].
pub const AUTO_ENDPOINT_HOST: &str = "global.relay.edgerank.net";

/// Domain suffix shared by the regional endpoints in the static catalog.
pub const SERVICE_DOMAIN_SUFFIX: &str = ".relay.edgerank.net";

/// How an endpoint reaches the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    /// Anycast entry point that routes to the nearest region
    Auto,
    /// Regional endpoint served directly
    #[default]
    Direct,
    /// Regional endpoint fronted by a proxy
    Proxied,
}

impl EndpointKind {
    /// Parse a kind from its manifest spelling.
    ///
    /// Returns None for unknown values so callers can infer a kind instead.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "direct" => Some(Self::Direct),
            "proxied" => Some(Self::Proxied),
            _ => None,
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Direct => "direct",
            Self::Proxied => "proxied",
        }
    }
}

impl std::fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strip trailing path separators so URLs compare and concatenate cleanly.
pub fn normalize_url(url: &str) -> &str {
    url.trim().trim_end_matches('/')
}

/// Identity key of an endpoint URL.
///
/// Scheme and host are case-folded by URL parsing; the path keeps its case.
/// Unparseable input only loses its trailing separators.
pub fn endpoint_key(url: &str) -> String {
    match reqwest::Url::parse(url.trim()) {
        Ok(parsed) => normalize_url(parsed.as_str()).to_string(),
        Err(_) => normalize_url(url).to_string(),
    }
}

/// Build the probe target for an endpoint.
///
/// An empty `path` probes the bare base URL.
pub fn probe_target(base_url: &str, path: &str) -> String {
    format!("{}{}", normalize_url(base_url), path)
}

/// Derive a region key from an endpoint URL.
///
/// Best-effort: the host label in front of [`SERVICE_DOMAIN_SUFFIX`] with its
/// trailing digits stripped (`fra1` and `fra` both give `fra`). Any URL on
/// the auto host maps to [`AUTO_REGION`]. Anything else keys on the full URL so it is never
/// deduplicated against another endpoint.
pub fn infer_region(url: &str) -> String {
    let normalized = normalize_url(url);

    let host = match reqwest::Url::parse(normalized) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.to_lowercase(),
            None => return normalized.to_string(),
        },
        Err(_) => return normalized.to_string(),
    };

    if host == AUTO_ENDPOINT_HOST {
        return AUTO_REGION.to_string();
    }

    let Some(prefix) = host.strip_suffix(SERVICE_DOMAIN_SUFFIX) else {
        return normalized.to_string();
    };

    // Only the label directly in front of the suffix carries the region.
    let label = prefix.rsplit('.').next().unwrap_or(prefix);
    let region = label.trim_end_matches(|c: char| c.is_ascii_digit());

    if region.is_empty() {
        normalized.to_string()
    } else {
        region.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== EndpointKind Tests =====

    #[test]
    fn test_kind_parse() {
        let tests = vec![
            ("auto", Some(EndpointKind::Auto)),
            ("direct", Some(EndpointKind::Direct)),
            ("proxied", Some(EndpointKind::Proxied)),
            ("PROXIED", Some(EndpointKind::Proxied)),
            ("relay", None),
            ("", None),
        ];

        for (input, expected) in tests {
            assert_eq!(EndpointKind::parse(input), expected, "Failed for input: {}", input);
        }
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(format!("{}", EndpointKind::Auto), "auto");
        assert_eq!(format!("{}", EndpointKind::Direct), "direct");
        assert_eq!(format!("{}", EndpointKind::Proxied), "proxied");
    }

    #[test]
    fn test_kind_serde_lowercase() {
        let json = serde_json::to_string(&EndpointKind::Proxied).unwrap();
        assert_eq!(json, "\"proxied\"");
    }

    // ===== URL helpers =====

    #[test]
    fn test_probe_target_strips_trailing_slashes() {
        assert_eq!(probe_target("https://a.example///", "/ping"), "https://a.example/ping");
        assert_eq!(probe_target("https://a.example", "/ping"), "https://a.example/ping");
    }

    #[test]
    fn test_probe_target_empty_path_probes_base() {
        assert_eq!(probe_target("https://a.example/", ""), "https://a.example");
    }

    // ===== infer_region Tests =====

    #[test]
    fn test_infer_region_strips_trailing_digits() {
        assert_eq!(infer_region("https://fra1.relay.edgerank.net"), "fra");
        assert_eq!(infer_region("https://fra.relay.edgerank.net"), "fra");
        assert_eq!(infer_region("https://nyc12.relay.edgerank.net/"), "nyc");
    }

    #[test]
    fn test_infer_region_uses_label_before_suffix() {
        assert_eq!(infer_region("https://edge.sgp2.relay.edgerank.net"), "sgp");
    }

    #[test]
    fn test_infer_region_auto_url() {
        assert_eq!(infer_region(AUTO_ENDPOINT_URL), AUTO_REGION);
        assert_eq!(infer_region("https://global.relay.edgerank.net/"), AUTO_REGION);
    }

    #[test]
    fn test_infer_region_auto_host_with_path() {
        assert_eq!(infer_region("https://global.relay.edgerank.net/v1"), AUTO_REGION);
        assert_eq!(infer_region("HTTPS://Global.Relay.EdgeRank.net/v1/"), AUTO_REGION);
        assert_eq!(infer_region("https://global.relay.edgerank.net:8443"), AUTO_REGION);
        assert_ne!(infer_region("https://global1.relay.edgerank.net"), AUTO_REGION);
    }

    // ===== endpoint_key Tests =====

    #[test]
    fn test_endpoint_key_folds_scheme_and_host_only() {
        assert_eq!(endpoint_key("HTTPS://Fra1.Example.COM/"), "https://fra1.example.com");
        assert_eq!(endpoint_key("https://a.example/Path/"), "https://a.example/Path");
        assert_ne!(
            endpoint_key("https://a.example/Path"),
            endpoint_key("https://a.example/path")
        );
    }

    #[test]
    fn test_endpoint_key_unparseable_input() {
        assert_eq!(endpoint_key("not a url/"), "not a url");
    }

    #[test]
    fn test_infer_region_falls_back_to_full_url() {
        let inputs = vec![
            "https://api.other.example",
            "not a url",
            "https://123.relay.edgerank.net",
        ];

        for input in inputs {
            assert_eq!(infer_region(input), input, "Fallback failed for input: {}", input);
        }
    }
}
