//! Fixed-weight ranking without redistribution or confidence scaling.
//!
//! Missing coding and professional platforms contribute 0, missing resume and assessment
//! contribute the neutral 50.

use std::collections::BTreeMap;

use acre_core::{CandidateBundle, JobRequirements, Platform, ScoringWeights};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregate::{assign_ranks, Rankable, RecommendationTier};
use crate::platform::score_platform;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub candidate_name: String,
    pub total_score: f64,
    pub scores: BTreeMap<Platform, f64>,
    pub weighted: BTreeMap<Platform, f64>,
    pub strengths: Vec<Platform>,
    pub weaknesses: Vec<Platform>,
    pub tier: RecommendationTier,
    pub recommendation: String,
    pub rank: usize,
}

impl Rankable for CandidateScore {
    fn ranking_score(&self) -> f64 {
        self.total_score
    }

    fn assign_rank(&mut self, rank: usize) {
        self.rank = rank;
    }
}

pub fn score_simple(
    bundle: &CandidateBundle,
    weights: &ScoringWeights,
    job: &JobRequirements,
) -> CandidateScore {
    let scores: BTreeMap<Platform, f64> = Platform::ALL
        .into_iter()
        .map(|p| (p, score_platform(bundle, p, job)))
        .collect();
    let weighted: BTreeMap<Platform, f64> = scores
        .iter()
        .map(|(p, s)| (*p, s * weights.weight(*p)))
        .collect();
    let total_score = weighted.values().sum::<f64>().clamp(0.0, 100.0);

    let tier = RecommendationTier::from_score(total_score);
    CandidateScore {
        candidate_name: bundle.name.clone(),
        total_score,
        strengths: scores.iter().filter(|(_, s)| **s >= 70.0).map(|(p, _)| *p).collect(),
        weaknesses: scores.iter().filter(|(_, s)| **s < 50.0).map(|(p, _)| *p).collect(),
        scores,
        weighted,
        tier,
        recommendation: tier.simple_recommendation(),
        rank: 0,
    }
}

pub fn rank_simple(
    population: &[CandidateBundle],
    weights: &ScoringWeights,
    job: &JobRequirements,
) -> Vec<CandidateScore> {
    let results: Vec<CandidateScore> = population
        .par_iter()
        .map(|bundle| score_simple(bundle, weights, job))
        .collect();
    info!(candidates = results.len(), "simple ranking complete");
    assign_ranks(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use acre_core::{AssessmentResult, PlatformRecord};

    #[test]
    fn empty_candidate_gets_neutral_resume_and_assessment() {
        let score = score_simple(
            &CandidateBundle::new("blank"),
            &ScoringWeights::default(),
            &JobRequirements::default(),
        );
        // 50 * 0.15 resume + 50 * 0.10 assessment
        assert!((score.total_score - 12.5).abs() < 1e-9);
        assert_eq!(score.scores[&Platform::Github], 0.0);
        assert_eq!(score.tier, RecommendationTier::NotRecommended);
        assert_eq!(score.recommendation, "Not Recommended - Does not meet minimum criteria");
    }

    #[test]
    fn ranks_by_total_score() {
        let mut strong = CandidateBundle::new("strong");
        strong.assessment = PlatformRecord::Present(AssessmentResult {
            percentage_score: Some(100.0),
            ..Default::default()
        });
        let population = vec![CandidateBundle::new("blank"), strong];
        let ranked = rank_simple(&population, &ScoringWeights::default(), &JobRequirements::default());
        assert_eq!(ranked[0].candidate_name, "strong");
        assert_eq!(ranked[0].rank, 1);
        assert!((ranked[0].total_score - 17.5).abs() < 1e-9);
        assert_eq!(ranked[1].rank, 2);
    }
}
