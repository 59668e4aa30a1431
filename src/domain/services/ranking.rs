//! Ranking Service
//!
//! Pure domain logic for ordering probed endpoints by latency.
//! This service has NO external dependencies and never fails.

use crate::domain::entities::{EndpointDescriptor, EndpointResult, RankedSelection};
use std::collections::HashSet;

/// Parameters controlling a ranking pass.
#[derive(Debug, Clone)]
pub struct RankingPolicy {
    /// Maximum number of non-auto entries to keep
    pub top_count: usize,
    /// Keep only the fastest endpoint per region
    pub dedupe_by_region: bool,
    /// Append the auto-routed entry last
    pub include_auto: bool,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            top_count: 2,
            dedupe_by_region: true,
            include_auto: true,
        }
    }
}

/// Ranking engine for probed endpoints.
///
/// Ordering rules:
/// 1. Unreachable results (non-finite latency) are dropped
/// 2. The rest are stable-sorted by minimum latency
/// 3. Only the fastest endpoint per region survives
/// 4. The auto-routed entry, when requested, always comes last
///
/// The returned selection is never empty.
pub struct RankingEngine;

impl RankingEngine {
    /// Rank probe results.
    ///
    /// # Arguments
    /// * `results` - One result per probed endpoint, in candidate order
    /// * `policy` - Truncation, deduplication and auto-entry settings
    /// * `auto` - Descriptor used when the auto entry has to be synthesized
    pub fn rank(
        results: &[EndpointResult],
        policy: &RankingPolicy,
        auto: &EndpointDescriptor,
    ) -> RankedSelection {
        let mut reachable: Vec<&EndpointResult> =
            results.iter().filter(|r| r.min_time().is_finite()).collect();

        // sort_by is stable, so equal latencies keep candidate order
        reachable.sort_by(|a, b| a.min_time().total_cmp(&b.min_time()));

        let mut ranked = if policy.include_auto {
            let others = reachable.into_iter().filter(|r| !r.is_auto());
            let mut top = Self::select(others, policy);

            let auto_entry = results
                .iter()
                .find(|r| r.is_auto())
                .cloned()
                .unwrap_or_else(|| EndpointResult::unmeasured(auto.clone()));
            top.push(auto_entry);
            top
        } else {
            Self::select(reachable.into_iter(), policy)
        };

        if ranked.is_empty() {
            tracing::debug!("no reachable endpoints, returning auto fallback");
            ranked.push(EndpointResult::unmeasured(auto.clone()));
        }

        RankedSelection::new(ranked)
    }

    /// Deduplicate (if enabled) and truncate an already sorted sequence.
    fn select<'a>(
        sorted: impl Iterator<Item = &'a EndpointResult>,
        policy: &RankingPolicy,
    ) -> Vec<EndpointResult> {
        let mut seen = HashSet::new();
        sorted
            .filter(|r| !policy.dedupe_by_region || seen.insert(r.region().to_string()))
            .take(policy.top_count)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ProbeSample;
    use crate::domain::value_objects::{EndpointKind, UNREACHABLE};

    // ===== Test Helpers =====

    fn result(url: &str, region: &str, times: &[f64]) -> EndpointResult {
        EndpointResult::new(
            EndpointDescriptor::new(url, region, EndpointKind::Direct),
            ProbeSample::from_measurements(Vec::new(), times.to_vec()),
        )
    }

    fn auto_result(times: &[f64]) -> EndpointResult {
        EndpointResult::new(
            EndpointDescriptor::auto(),
            ProbeSample::from_measurements(Vec::new(), times.to_vec()),
        )
    }

    fn policy(top_count: usize, include_auto: bool) -> RankingPolicy {
        RankingPolicy {
            top_count,
            dedupe_by_region: true,
            include_auto,
        }
    }

    fn urls(selection: &RankedSelection) -> Vec<&str> {
        selection.iter().map(|r| r.url()).collect()
    }

    // ===== Ordering Tests =====

    #[test]
    fn test_orders_by_min_time() {
        let results = vec![
            result("https://a", "a", &[10.0, 20.0]),
            result("https://b", "b", &[5.0, 15.0]),
            result("https://c", "c", &[30.0, 40.0]),
        ];

        let ranked = RankingEngine::rank(&results, &policy(2, false), &EndpointDescriptor::auto());
        assert_eq!(urls(&ranked), vec!["https://b", "https://a"]);
    }

    #[test]
    fn test_ties_keep_candidate_order() {
        let results = vec![
            result("https://first", "x", &[10.0]),
            result("https://second", "y", &[10.0]),
        ];

        let ranked = RankingEngine::rank(&results, &policy(2, false), &EndpointDescriptor::auto());
        assert_eq!(urls(&ranked), vec!["https://first", "https://second"]);
    }

    #[test]
    fn test_unreachable_filtered() {
        let results = vec![
            result("https://down", "a", &[UNREACHABLE]),
            result("https://up", "b", &[40.0]),
        ];

        let ranked = RankingEngine::rank(&results, &policy(5, false), &EndpointDescriptor::auto());
        assert_eq!(urls(&ranked), vec!["https://up"]);
    }

    // ===== Deduplication Tests =====

    #[test]
    fn test_dedupe_keeps_fastest_per_region() {
        let results = vec![
            result("https://fra1", "fra", &[30.0]),
            result("https://fra2", "fra", &[10.0]),
            result("https://ams1", "ams", &[20.0]),
        ];

        let ranked = RankingEngine::rank(&results, &policy(5, false), &EndpointDescriptor::auto());
        assert_eq!(urls(&ranked), vec!["https://fra2", "https://ams1"]);
    }

    #[test]
    fn test_dedupe_disabled_keeps_all() {
        let results = vec![
            result("https://fra1", "fra", &[30.0]),
            result("https://fra2", "fra", &[10.0]),
        ];
        let policy = RankingPolicy {
            top_count: 5,
            dedupe_by_region: false,
            include_auto: false,
        };

        let ranked = RankingEngine::rank(&results, &policy, &EndpointDescriptor::auto());
        assert_eq!(urls(&ranked), vec!["https://fra2", "https://fra1"]);
    }

    #[test]
    fn test_dedupe_happens_before_truncation() {
        let results = vec![
            result("https://fra1", "fra", &[1.0]),
            result("https://fra2", "fra", &[2.0]),
            result("https://ams1", "ams", &[3.0]),
        ];

        let ranked = RankingEngine::rank(&results, &policy(2, false), &EndpointDescriptor::auto());
        assert_eq!(urls(&ranked), vec!["https://fra1", "https://ams1"]);
    }

    // ===== Auto Entry Tests =====

    #[test]
    fn test_measured_auto_appended_last_even_if_fastest() {
        let results = vec![
            auto_result(&[1.0]),
            result("https://a", "a", &[10.0]),
            result("https://b", "b", &[20.0]),
            result("https://c", "c", &[30.0]),
        ];

        let ranked = RankingEngine::rank(&results, &policy(2, true), &EndpointDescriptor::auto());
        assert_eq!(ranked.len(), 3);
        assert_eq!(urls(&ranked)[..2], ["https://a", "https://b"]);

        let last = ranked.last().unwrap();
        assert!(last.is_auto());
        assert_eq!(last.min_time(), 1.0);
    }

    #[test]
    fn test_unreachable_auto_still_appended_with_its_sample() {
        let results = vec![auto_result(&[UNREACHABLE, UNREACHABLE]), result("https://a", "a", &[10.0])];

        let ranked = RankingEngine::rank(&results, &policy(2, true), &EndpointDescriptor::auto());
        let last = ranked.last().unwrap();
        assert!(last.is_auto());
        assert_eq!(last.sample.times.len(), 2);
        assert!(last.min_time().is_infinite());
    }

    #[test]
    fn test_synthetic_auto_when_not_probed() {
        let results = vec![result("https://a", "a", &[10.0])];

        let ranked = RankingEngine::rank(&results, &policy(2, true), &EndpointDescriptor::auto());
        assert_eq!(ranked.len(), 2);
        let last = ranked.last().unwrap();
        assert!(last.is_auto());
        assert!(last.min_time().is_infinite());
        assert!(last.sample.times.is_empty());
    }

    // ===== Fallback Tests =====

    #[test]
    fn test_all_unreachable_without_auto_returns_fallback() {
        let results = vec![
            result("https://a", "a", &[UNREACHABLE]),
            result("https://b", "b", &[]),
        ];

        let ranked = RankingEngine::rank(&results, &policy(2, false), &EndpointDescriptor::auto());
        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].is_auto());
        assert!(ranked[0].min_time().is_infinite());
    }

    #[test]
    fn test_empty_input_returns_fallback() {
        for include_auto in [true, false] {
            let ranked = RankingEngine::rank(&[], &policy(2, include_auto), &EndpointDescriptor::auto());
            assert_eq!(ranked.len(), 1);
            assert!(ranked[0].is_auto());
        }
    }

    #[test]
    fn test_nan_is_treated_as_unreachable() {
        let mut weird = result("https://nan", "n", &[1.0]);
        weird.sample.min_time = f64::NAN;
        let results = vec![weird, result("https://ok", "o", &[5.0])];

        let ranked = RankingEngine::rank(&results, &policy(5, false), &EndpointDescriptor::auto());
        assert_eq!(urls(&ranked), vec!["https://ok"]);
    }

    #[test]
    fn test_at_most_one_entry_per_region() {
        let results: Vec<_> = (0..20)
            .map(|i| result(&format!("https://e{}", i), &format!("r{}", i % 3), &[i as f64 + 1.0]))
            .collect();

        let ranked = RankingEngine::rank(&results, &policy(10, true), &EndpointDescriptor::auto());
        let regions: HashSet<_> = ranked.iter().filter(|r| !r.is_auto()).map(|r| r.region()).collect();
        assert_eq!(regions.len(), ranked.len() - 1);
        assert_eq!(ranked.len(), 4);
    }
}
