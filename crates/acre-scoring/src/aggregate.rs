//! Recommendation tiers and population ranking.

use serde::{Deserialize, Serialize};

use crate::confidence::ConfidenceLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationTier {
    #[serde(rename = "Highly Recommended")]
    HighlyRecommended,
    Recommended,
    Consider,
    Marginal,
    #[serde(rename = "Not Recommended")]
    NotRecommended,
}

impl RecommendationTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            RecommendationTier::HighlyRecommended
        } else if score >= 70.0 {
            RecommendationTier::Recommended
        } else if score >= 60.0 {
            RecommendationTier::Consider
        } else if score >= 50.0 {
            RecommendationTier::Marginal
        } else {
            RecommendationTier::NotRecommended
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecommendationTier::HighlyRecommended => "Highly Recommended",
            RecommendationTier::Recommended => "Recommended",
            RecommendationTier::Consider => "Consider",
            RecommendationTier::Marginal => "Marginal",
            RecommendationTier::NotRecommended => "Not Recommended",
        }
    }

    fn summary(self) -> &'static str {
        match self {
            RecommendationTier::HighlyRecommended => "Strong candidate",
            RecommendationTier::Recommended => "Good candidate",
            RecommendationTier::Consider => "Decent candidate",
            RecommendationTier::Marginal => "Significant gaps",
            RecommendationTier::NotRecommended => "Does not meet criteria",
        }
    }

    fn detail(self) -> &'static str {
        match self {
            RecommendationTier::HighlyRecommended => "Strong candidate across all criteria",
            RecommendationTier::Recommended => "Good candidate with minor gaps",
            RecommendationTier::Consider => "Decent candidate, needs evaluation",
            RecommendationTier::Marginal => "Significant gaps in key areas",
            RecommendationTier::NotRecommended => "Does not meet minimum criteria",
        }
    }

    /// Text for adaptive results, flagging thin data for Low and Moderate confidence.
    pub fn adaptive_recommendation(self, level: ConfidenceLevel) -> String {
        let mut text = format!("{} - {}", self.label(), self.summary());
        if matches!(level, ConfidenceLevel::Low | ConfidenceLevel::Moderate) {
            text.push_str(&format!(" ({level} confidence - limited data)"));
        }
        text
    }

    /// Text for the fixed-weight ranking, which has no confidence model.
    pub fn simple_recommendation(self) -> String {
        format!("{} - {}", self.label(), self.detail())
    }
}

impl std::fmt::Display for RecommendationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A scored result that can take part in a population ranking.
pub trait Rankable {
    fn ranking_score(&self) -> f64;
    fn assign_rank(&mut self, rank: usize);
}

/// Sorts by score descending and numbers the results from 1.
///
/// The sort is stable: equal scores keep their input order. There is no secondary key.
pub fn assign_ranks<T: Rankable>(mut results: Vec<T>) -> Vec<T> {
    results.sort_by(|a, b| b.ranking_score().total_cmp(&a.ranking_score()));
    for (index, result) in results.iter_mut().enumerate() {
        result.assign_rank(index + 1);
    }
    results
}

pub fn top<T>(ranked: &[T], n: usize) -> &[T] {
    &ranked[..n.min(ranked.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Entry {
        id: &'static str,
        score: f64,
        rank: usize,
    }

    impl Rankable for Entry {
        fn ranking_score(&self) -> f64 {
            self.score
        }

        fn assign_rank(&mut self, rank: usize) {
            self.rank = rank;
        }
    }

    fn entry(id: &'static str, score: f64) -> Entry {
        Entry { id, score, rank: 0 }
    }

    #[test]
    fn tier_bands() {
        assert_eq!(RecommendationTier::from_score(80.0), RecommendationTier::HighlyRecommended);
        assert_eq!(RecommendationTier::from_score(79.99), RecommendationTier::Recommended);
        assert_eq!(RecommendationTier::from_score(60.0), RecommendationTier::Consider);
        assert_eq!(RecommendationTier::from_score(50.0), RecommendationTier::Marginal);
        assert_eq!(RecommendationTier::from_score(0.0), RecommendationTier::NotRecommended);
    }

    #[test]
    fn low_and_moderate_confidence_are_flagged() {
        let tier = RecommendationTier::Consider;
        assert_eq!(
            tier.adaptive_recommendation(ConfidenceLevel::Moderate),
            "Consider - Decent candidate (Moderate confidence - limited data)"
        );
        assert_eq!(
            tier.adaptive_recommendation(ConfidenceLevel::Good),
            "Consider - Decent candidate"
        );
        assert_eq!(
            RecommendationTier::Marginal.simple_recommendation(),
            "Marginal - Significant gaps in key areas"
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let ranked = assign_ranks(vec![
            entry("a", 55.0),
            entry("b", 72.0),
            entry("c", 55.0),
            entry("d", 72.0),
        ]);
        let order: Vec<&str> = ranked.iter().map(|e| e.id).collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
        let ranks: Vec<usize> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
        assert_eq!(top(&ranked, 10).len(), 4);
        assert_eq!(top(&ranked, 1)[0].id, "b");
    }
}
