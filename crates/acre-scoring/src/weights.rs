use std::collections::{BTreeMap, BTreeSet};

use acre_core::{Platform, ScoringWeights};

/// Renormalizes the configured weights over the available platforms.
///
/// Relative proportions between available platforms are preserved and the result sums to 1.0.
/// Returns an empty map when nothing is available or the available weight mass is zero.
pub fn redistribute(
    weights: &ScoringWeights,
    available: &BTreeSet<Platform>,
) -> BTreeMap<Platform, f64> {
    let mass: f64 = available.iter().map(|p| weights.weight(*p)).sum();
    if mass <= 0.0 {
        return BTreeMap::new();
    }
    available
        .iter()
        .map(|p| (*p, weights.weight(*p) / mass))
        .collect()
}
