//! Domain Entities - Core business objects
//!
//! These entities represent the endpoints being ranked and the latency
//! samples collected for them. They are created fresh per discovery call.

use crate::domain::value_objects::{
    endpoint_key, infer_region, EndpointKind, AUTO_ENDPOINT_URL, AUTO_REGION, UNREACHABLE,
};
use serde::{Deserialize, Deserializer, Serialize};

/// A candidate service endpoint.
///
/// Descriptors come from the caller, the remote manifest, or the static
/// catalog. The region is the deduplication key when ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Base URL of the endpoint
    pub url: String,
    /// Region key (`auto` for the auto-routed endpoint)
    pub region: String,
    /// How the endpoint reaches the service
    #[serde(default)]
    pub kind: EndpointKind,
}

impl EndpointDescriptor {
    /// Create a descriptor with an explicit region.
    pub fn new(url: impl Into<String>, region: impl Into<String>, kind: EndpointKind) -> Self {
        Self {
            url: url.into(),
            region: region.into(),
            kind,
        }
    }

    /// Create a descriptor from a bare URL, inferring region and kind.
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let region = infer_region(&url);
        let kind = if region == AUTO_REGION {
            EndpointKind::Auto
        } else {
            EndpointKind::Direct
        };
        Self { url, region, kind }
    }

    /// The built-in auto-routed endpoint.
    pub fn auto() -> Self {
        Self::new(AUTO_ENDPOINT_URL, AUTO_REGION, EndpointKind::Auto)
    }

    /// Whether this is the auto-routed endpoint.
    pub fn is_auto(&self) -> bool {
        self.region == AUTO_REGION
    }

    /// Identity key shared by candidate deduplication and the cooldown tracker.
    pub fn key(&self) -> String {
        endpoint_key(&self.url)
    }
}

/// Latency samples collected for one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeSample {
    /// Warmup timings in ms, never used for ranking
    #[serde(deserialize_with = "latencies")]
    pub warmup_times: Vec<f64>,
    /// Measurement timings in ms
    #[serde(deserialize_with = "latencies")]
    pub times: Vec<f64>,
    /// Minimum of `times`, or infinity when nothing was measured
    #[serde(deserialize_with = "latency")]
    pub min_time: f64,
    /// Probing was skipped because the endpoint is cooling down
    #[serde(default)]
    pub skipped: bool,
}

// JSON has no infinity; serde_json writes UNREACHABLE as null.
fn latency<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(UNREACHABLE))
}

fn latencies<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Option<f64>>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|v| v.unwrap_or(UNREACHABLE))
        .collect())
}

impl ProbeSample {
    /// Build a sample, deriving `min_time` from the measurements.
    pub fn from_measurements(warmup_times: Vec<f64>, times: Vec<f64>) -> Self {
        let min_time = times.iter().copied().fold(UNREACHABLE, f64::min);
        Self {
            warmup_times,
            times,
            min_time,
            skipped: false,
        }
    }

    /// An empty sample for an endpoint that was not probed at all.
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::unreachable()
        }
    }

    /// An empty sample marking the endpoint unreachable.
    pub fn unreachable() -> Self {
        Self {
            warmup_times: Vec::new(),
            times: Vec::new(),
            min_time: UNREACHABLE,
            skipped: false,
        }
    }

    /// Whether at least one measurement succeeded.
    pub fn is_reachable(&self) -> bool {
        self.min_time.is_finite()
    }
}

/// A descriptor combined with its probe sample, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointResult {
    #[serde(flatten)]
    pub endpoint: EndpointDescriptor,
    #[serde(flatten)]
    pub sample: ProbeSample,
}

impl EndpointResult {
    pub fn new(endpoint: EndpointDescriptor, sample: ProbeSample) -> Self {
        Self { endpoint, sample }
    }

    /// A result that was never measured.
    pub fn unmeasured(endpoint: EndpointDescriptor) -> Self {
        Self::new(endpoint, ProbeSample::unreachable())
    }

    pub fn url(&self) -> &str {
        &self.endpoint.url
    }

    pub fn region(&self) -> &str {
        &self.endpoint.region
    }

    pub fn min_time(&self) -> f64 {
        self.sample.min_time
    }

    pub fn is_auto(&self) -> bool {
        self.endpoint.is_auto()
    }
}

/// Ranked endpoints, fastest first.
///
/// Never empty: constructing one from an empty list yields the synthetic
/// auto-routed entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedSelection {
    results: Vec<EndpointResult>,
}

impl RankedSelection {
    /// Wrap a ranked list, substituting the auto fallback when it is empty.
    pub fn new(results: Vec<EndpointResult>) -> Self {
        if results.is_empty() {
            return Self::fallback(EndpointDescriptor::auto());
        }
        Self { results }
    }

    /// A selection holding only an unmeasured fallback entry.
    pub fn fallback(auto: EndpointDescriptor) -> Self {
        Self {
            results: vec![EndpointResult::unmeasured(auto)],
        }
    }

    /// The first (lowest latency) entry.
    pub fn fastest(&self) -> &EndpointResult {
        &self.results[0]
    }

    pub fn into_vec(self) -> Vec<EndpointResult> {
        self.results
    }
}

impl<'de> Deserialize<'de> for RankedSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<EndpointResult>::deserialize(deserializer).map(Self::new)
    }
}

impl std::ops::Deref for RankedSelection {
    type Target = [EndpointResult];

    fn deref(&self) -> &Self::Target {
        &self.results
    }
}

impl IntoIterator for RankedSelection {
    type Item = EndpointResult;
    type IntoIter = std::vec::IntoIter<EndpointResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a RankedSelection {
    type Item = &'a EndpointResult;
    type IntoIter = std::slice::Iter<'a, EndpointResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url_infers_region() {
        let d = EndpointDescriptor::from_url("https://ams2.relay.edgerank.net");
        assert_eq!(d.region, "ams");
        assert_eq!(d.kind, EndpointKind::Direct);
        assert!(!d.is_auto());
    }

    #[test]
    fn test_from_url_auto() {
        let d = EndpointDescriptor::from_url(AUTO_ENDPOINT_URL);
        assert!(d.is_auto());
        assert_eq!(d.kind, EndpointKind::Auto);
    }

    #[test]
    fn test_key_ignores_trailing_slash() {
        let a = EndpointDescriptor::from_url("https://x.example/");
        let b = EndpointDescriptor::from_url("https://x.example");
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_key_folds_host_case_but_not_path() {
        let upper = EndpointDescriptor::from_url("HTTPS://X.Example/Api");
        let lower = EndpointDescriptor::from_url("https://x.example/Api");
        let other_path = EndpointDescriptor::from_url("https://x.example/api");
        assert_eq!(upper.key(), lower.key());
        assert_ne!(lower.key(), other_path.key());
    }

    #[test]
    fn test_sample_min_time() {
        let sample = ProbeSample::from_measurements(vec![50.0], vec![12.0, 7.5, UNREACHABLE]);
        assert_eq!(sample.min_time, 7.5);
        assert!(sample.is_reachable());
    }

    #[test]
    fn test_sample_empty_times_is_unreachable() {
        let sample = ProbeSample::from_measurements(vec![3.0], Vec::new());
        assert!(sample.min_time.is_infinite());
        assert!(!sample.is_reachable());
    }

    #[test]
    fn test_sample_all_failed_is_unreachable() {
        let sample = ProbeSample::from_measurements(Vec::new(), vec![UNREACHABLE, UNREACHABLE]);
        assert_eq!(sample.min_time, UNREACHABLE);
    }

    #[test]
    fn test_skipped_sample() {
        let sample = ProbeSample::skipped();
        assert!(sample.skipped);
        assert!(sample.times.is_empty());
        assert!(sample.warmup_times.is_empty());
        assert_eq!(sample.min_time, UNREACHABLE);
    }

    #[test]
    fn test_result_serializes_flat_camel_case() {
        let result = EndpointResult::new(
            EndpointDescriptor::new("https://a.example", "eu", EndpointKind::Proxied),
            ProbeSample::from_measurements(vec![1.0], vec![2.0]),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["url"], "https://a.example");
        assert_eq!(json["region"], "eu");
        assert_eq!(json["kind"], "proxied");
        assert_eq!(json["minTime"], 2.0);
        assert_eq!(json["warmupTimes"][0], 1.0);
    }

    #[test]
    fn test_ranked_selection_never_empty() {
        let selection = RankedSelection::new(Vec::new());
        assert_eq!(selection.len(), 1);
        assert!(selection.fastest().is_auto());
        assert!(selection.fastest().min_time().is_infinite());
    }

    #[test]
    fn test_fallback_selection_reads_back_from_json() {
        let selection = RankedSelection::new(Vec::new());
        let json = serde_json::to_string(&selection).unwrap();
        assert!(json.contains("\"minTime\":null"));

        let parsed: RankedSelection = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, selection);
        assert_eq!(parsed.fastest().min_time(), UNREACHABLE);
    }

    #[test]
    fn test_partial_failures_read_back_as_unreachable() {
        let result = EndpointResult::new(
            EndpointDescriptor::new("https://a.example", "eu", EndpointKind::Direct),
            ProbeSample::from_measurements(vec![UNREACHABLE], vec![12.5, UNREACHABLE]),
        );
        let json = serde_json::to_string(&vec![result.clone()]).unwrap();

        let parsed: Vec<EndpointResult> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![result]);
        assert_eq!(parsed[0].sample.times[1], UNREACHABLE);
        assert_eq!(parsed[0].min_time(), 12.5);
    }

    #[test]
    fn test_empty_json_list_reads_back_as_fallback() {
        let parsed: RankedSelection = serde_json::from_str("[]").unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed.fastest().is_auto());
    }
}
