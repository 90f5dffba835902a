//! Adaptive scoring: weights follow the data that exists, confidence follows how much of it
//! exists, and rule-based adjustments are layered on top.

use std::collections::{BTreeMap, BTreeSet};

use acre_core::{CandidateBundle, JobRequirements, Platform, ScoringWeights};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adjustments::{self, AdjustmentItem, GateFailure};
use crate::aggregate::{assign_ranks, Rankable, RecommendationTier};
use crate::confidence::{self, ConfidenceInterval, ConfidenceLevel};
use crate::platform::score_platform;
use crate::weights::redistribute;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdjustmentBreakdown {
    /// `base * confidence - base`; zero or negative.
    pub confidence_delta: f64,
    pub bonus_total: f64,
    pub compensatory_total: f64,
    /// Magnitude of all penalties, subtracted from the score.
    pub penalty_total: f64,
    pub bonuses: Vec<AdjustmentItem>,
    pub compensatory: Vec<AdjustmentItem>,
    pub penalties: Vec<AdjustmentItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveResult {
    pub candidate_name: String,
    pub final_score: f64,
    pub base_score: f64,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub confidence_interval: ConfidenceInterval,
    pub available_platforms: BTreeSet<Platform>,
    pub missing_platforms: BTreeSet<Platform>,
    pub completeness: f64,
    pub platform_scores: BTreeMap<Platform, f64>,
    pub adjusted_weights: BTreeMap<Platform, f64>,
    pub adjustments: AdjustmentBreakdown,
    pub strengths: Vec<Platform>,
    pub weaknesses: Vec<Platform>,
    pub tier: RecommendationTier,
    pub recommendation: String,
    /// 1-based; 0 until the population is ranked.
    pub rank: usize,
    pub warnings: Vec<String>,
}

impl AdaptiveResult {
    /// The well-formed zero result for a candidate that fails the minimum-data gate.
    fn insufficient(name: &str, available: BTreeSet<Platform>, failure: GateFailure) -> Self {
        let tier = RecommendationTier::NotRecommended;
        Self {
            candidate_name: name.to_string(),
            final_score: 0.0,
            base_score: 0.0,
            confidence: 0.0,
            confidence_level: ConfidenceLevel::Insufficient,
            confidence_interval: ConfidenceInterval::default(),
            missing_platforms: missing(&available),
            available_platforms: available,
            completeness: 0.0,
            platform_scores: BTreeMap::new(),
            adjusted_weights: BTreeMap::new(),
            adjustments: AdjustmentBreakdown::default(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            tier,
            recommendation: format!("{} - Insufficient data", tier.label()),
            rank: 0,
            warnings: vec![format!("Insufficient data: {failure}")],
        }
    }

    pub fn is_insufficient(&self) -> bool {
        self.confidence_level == ConfidenceLevel::Insufficient
    }
}

impl Rankable for AdaptiveResult {
    fn ranking_score(&self) -> f64 {
        self.final_score
    }

    fn assign_rank(&mut self, rank: usize) {
        self.rank = rank;
    }
}

fn missing(available: &BTreeSet<Platform>) -> BTreeSet<Platform> {
    Platform::ALL
        .into_iter()
        .filter(|p| !available.contains(p))
        .collect()
}

/// Scores one candidate. Never fails: thin data yields a flagged, zero-score result.
pub fn score_adaptive(
    bundle: &CandidateBundle,
    weights: &ScoringWeights,
    job: &JobRequirements,
) -> AdaptiveResult {
    let available = bundle.available_platforms();
    if let Err(failure) = adjustments::check_minimum_data(&available) {
        debug!(candidate = %bundle.name, %failure, "minimum data gate failed");
        return AdaptiveResult::insufficient(&bundle.name, available, failure);
    }

    let platform_scores: BTreeMap<Platform, f64> = available
        .iter()
        .map(|p| (*p, score_platform(bundle, *p, job)))
        .collect();
    assemble(&bundle.name, &platform_scores, weights)
}

/// Combines already-computed scores for the available platforms into a final result.
///
/// The keys of `platform_scores` are taken as the available set.
pub fn assemble(
    name: &str,
    platform_scores: &BTreeMap<Platform, f64>,
    weights: &ScoringWeights,
) -> AdaptiveResult {
    let available: BTreeSet<Platform> = platform_scores.keys().copied().collect();
    if let Err(failure) = adjustments::check_minimum_data(&available) {
        return AdaptiveResult::insufficient(name, available, failure);
    }

    let adjusted_weights = redistribute(weights, &available);
    let base_score: f64 = adjusted_weights
        .iter()
        .map(|(p, w)| platform_scores.get(p).copied().unwrap_or(0.0) * w)
        .sum();

    let confidence = confidence::assess(available.len());
    let scaled = base_score * confidence.value;

    let bonuses = adjustments::bonuses(&available);
    let compensatory = adjustments::compensatory(platform_scores);
    let penalties = adjustments::penalties(&available);
    let bonus_total = adjustments::total(&bonuses);
    let compensatory_total = adjustments::total(&compensatory);
    let penalty_total = -adjustments::total(&penalties);

    let final_score =
        (scaled + bonus_total + compensatory_total - penalty_total).clamp(0.0, 100.0);

    let strengths = platform_scores
        .iter()
        .filter(|(_, s)| **s >= 70.0)
        .map(|(p, _)| *p)
        .collect();
    let weaknesses = platform_scores
        .iter()
        .filter(|(_, s)| **s < 50.0)
        .map(|(p, _)| *p)
        .collect();

    let tier = RecommendationTier::from_score(final_score);
    debug!(
        candidate = name,
        base_score,
        confidence = confidence.value,
        final_score,
        "adaptive score assembled"
    );

    AdaptiveResult {
        candidate_name: name.to_string(),
        final_score,
        base_score,
        confidence: confidence.value,
        confidence_level: confidence.level,
        confidence_interval: ConfidenceInterval::around(final_score, confidence.level),
        missing_platforms: missing(&available),
        completeness: confidence::completeness(available.len()),
        warnings: adjustments::warnings(&available, confidence.level),
        available_platforms: available,
        platform_scores: platform_scores.clone(),
        adjusted_weights,
        adjustments: AdjustmentBreakdown {
            confidence_delta: scaled - base_score,
            bonus_total,
            compensatory_total,
            penalty_total,
            bonuses,
            compensatory,
            penalties,
        },
        strengths,
        weaknesses,
        tier,
        recommendation: tier.adaptive_recommendation(confidence.level),
        rank: 0,
    }
}

/// Scores a population in parallel and ranks it. Output order is deterministic.
pub fn rank_adaptive(
    population: &[CandidateBundle],
    weights: &ScoringWeights,
    job: &JobRequirements,
) -> Vec<AdaptiveResult> {
    let results: Vec<AdaptiveResult> = population
        .par_iter()
        .map(|bundle| score_adaptive(bundle, weights, job))
        .collect();
    let insufficient = results.iter().filter(|r| r.is_insufficient()).count();
    info!(
        candidates = results.len(),
        insufficient, "adaptive ranking complete"
    );
    assign_ranks(results)
}
