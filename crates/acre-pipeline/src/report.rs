//! Serialized ranking reports. Numbers are rounded here and only here; the scoring crates keep
//! full precision.

use std::collections::BTreeMap;

use acre_core::{JobRequirements, Platform, ScoringWeights};
use acre_scoring::{AdaptiveResult, CandidateScore, ConfidenceLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SCORING_METHOD_ADAPTIVE: &str = "adaptive";
pub const SCORING_METHOD_SIMPLE: &str = "simple_weighted";

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn rounded_map(map: &BTreeMap<Platform, f64>, places: i32) -> BTreeMap<Platform, f64> {
    map.iter().map(|(p, v)| (*p, round_to(*v, places))).collect()
}

fn weights_map(weights: &ScoringWeights) -> BTreeMap<Platform, f64> {
    weights.iter().map(|(p, w)| (p, round_to(w, 3))).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentSummary {
    pub confidence: f64,
    pub bonuses: f64,
    pub compensatory: f64,
    pub penalties: f64,
    /// Rendered items, e.g. `+5 for having resume`.
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveRankingEntry {
    pub rank: usize,
    pub candidate_name: String,
    pub final_score: f64,
    pub base_score: f64,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub confidence_interval: [f64; 2],
    /// Percentage of the six platforms available.
    pub completeness: f64,
    pub available_platforms: Vec<Platform>,
    pub missing_platforms: Vec<Platform>,
    pub platform_scores: BTreeMap<Platform, f64>,
    pub adjusted_weights: BTreeMap<Platform, f64>,
    pub adjustments: AdjustmentSummary,
    pub strengths: Vec<Platform>,
    pub weaknesses: Vec<Platform>,
    pub recommendation: String,
    pub warnings: Vec<String>,
}

impl From<&AdaptiveResult> for AdaptiveRankingEntry {
    fn from(result: &AdaptiveResult) -> Self {
        let adjustments = &result.adjustments;
        let items = adjustments
            .bonuses
            .iter()
            .chain(&adjustments.compensatory)
            .chain(&adjustments.penalties)
            .map(ToString::to_string)
            .collect();
        Self {
            rank: result.rank,
            candidate_name: result.candidate_name.clone(),
            final_score: round_to(result.final_score, 2),
            base_score: round_to(result.base_score, 2),
            confidence: round_to(result.confidence, 2),
            confidence_level: result.confidence_level,
            confidence_interval: [
                round_to(result.confidence_interval.lower, 1),
                round_to(result.confidence_interval.upper, 1),
            ],
            completeness: round_to(result.completeness * 100.0, 1),
            available_platforms: result.available_platforms.iter().copied().collect(),
            missing_platforms: result.missing_platforms.iter().copied().collect(),
            platform_scores: rounded_map(&result.platform_scores, 2),
            adjusted_weights: rounded_map(&result.adjusted_weights, 3),
            adjustments: AdjustmentSummary {
                confidence: round_to(adjustments.confidence_delta, 2),
                bonuses: round_to(adjustments.bonus_total, 2),
                compensatory: round_to(adjustments.compensatory_total, 2),
                penalties: round_to(adjustments.penalty_total, 2),
                items,
            },
            strengths: result.strengths.clone(),
            weaknesses: result.weaknesses.clone(),
            recommendation: result.recommendation.clone(),
            warnings: result.warnings.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleRankingEntry {
    pub rank: usize,
    pub candidate_name: String,
    pub total_score: f64,
    pub scores: BTreeMap<Platform, f64>,
    pub weighted: BTreeMap<Platform, f64>,
    pub strengths: Vec<Platform>,
    pub weaknesses: Vec<Platform>,
    pub recommendation: String,
}

impl From<&CandidateScore> for SimpleRankingEntry {
    fn from(score: &CandidateScore) -> Self {
        Self {
            rank: score.rank,
            candidate_name: score.candidate_name.clone(),
            total_score: round_to(score.total_score, 2),
            scores: rounded_map(&score.scores, 2),
            weighted: rounded_map(&score.weighted, 2),
            strengths: score.strengths.clone(),
            weaknesses: score.weaknesses.clone(),
            recommendation: score.recommendation.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingReport<E> {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub total_candidates: usize,
    pub scoring_method: String,
    pub weights_used: BTreeMap<Platform, f64>,
    pub job: JobRequirements,
    pub rankings: Vec<E>,
}

pub type AdaptiveRankingReport = RankingReport<AdaptiveRankingEntry>;
pub type SimpleRankingReport = RankingReport<SimpleRankingEntry>;

/// The condensed row used by the markdown summary.
pub trait SummaryRow {
    fn row(&self) -> String;
}

impl SummaryRow for AdaptiveRankingEntry {
    fn row(&self) -> String {
        format!(
            "| {} | {} | {:.2} | {} | {} |",
            self.rank, self.candidate_name, self.final_score, self.confidence_level, self.recommendation
        )
    }
}

impl SummaryRow for SimpleRankingEntry {
    fn row(&self) -> String {
        format!(
            "| {} | {} | {:.2} | n/a | {} |",
            self.rank, self.candidate_name, self.total_score, self.recommendation
        )
    }
}

impl<E: SummaryRow> RankingReport<E> {
    pub fn new(
        run_id: Uuid,
        generated_at: DateTime<Utc>,
        scoring_method: &str,
        weights: &ScoringWeights,
        job: &JobRequirements,
        rankings: Vec<E>,
    ) -> Self {
        Self {
            run_id,
            generated_at,
            total_candidates: rankings.len(),
            scoring_method: scoring_method.to_string(),
            weights_used: weights_map(weights),
            job: job.clone(),
            rankings,
        }
    }

    pub fn summary_markdown(&self, top_k: usize) -> String {
        let mut lines = vec![
            "# ACRE Ranking Summary".to_string(),
            String::new(),
            format!("- Run ID: `{}`", self.run_id),
            format!("- Generated: {}", self.generated_at.to_rfc3339()),
            format!("- Scoring method: {}", self.scoring_method),
            format!("- Candidates: {}", self.total_candidates),
            String::new(),
            "## Weights".to_string(),
        ];
        lines.extend(
            self.weights_used
                .iter()
                .map(|(p, w)| format!("- {}: {:.3}", p.display_name(), w)),
        );
        lines.push(String::new());
        lines.push(format!("## Top {}", top_k.min(self.rankings.len())));
        lines.push("| Rank | Candidate | Score | Confidence | Recommendation |".to_string());
        lines.push("|---|---|---|---|---|".to_string());
        lines.extend(self.rankings.iter().take(top_k).map(SummaryRow::row));
        lines.push(String::new());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acre_scoring::assemble;
    use chrono::TimeZone;

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).single().unwrap()
    }

    #[test]
    fn adaptive_entry_rounding() {
        let scores = BTreeMap::from([(Platform::Resume, 80.0), (Platform::Github, 60.0)]);
        let mut result = assemble("scenario", &scores, &ScoringWeights::default());
        result.rank = 1;
        let entry = AdaptiveRankingEntry::from(&result);

        assert_eq!(entry.final_score, 62.0);
        assert_eq!(entry.confidence, 0.8);
        assert_eq!(entry.confidence_interval, [54.0, 70.0]);
        assert_eq!(entry.completeness, 33.3);
        assert_eq!(entry.adjusted_weights[&Platform::Github], 0.625);
        assert_eq!(entry.adjustments.confidence, -13.5);
        assert_eq!(
            entry.adjustments.items,
            vec![
                "+5 for having resume".to_string(),
                "+3 strong resume compensates for LinkedIn".to_string()
            ]
        );
    }

    #[test]
    fn report_serializes_platform_keys_and_summary() {
        let scores = BTreeMap::from([(Platform::Github, 90.0)]);
        let mut result = assemble("solo", &scores, &ScoringWeights::default());
        result.rank = 1;
        let report = AdaptiveRankingReport::new(
            Uuid::nil(),
            generated_at(),
            SCORING_METHOD_ADAPTIVE,
            &ScoringWeights::default(),
            &JobRequirements::default(),
            vec![AdaptiveRankingEntry::from(&result)],
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_candidates"], 1);
        assert_eq!(json["weights_used"]["assessment"], 0.1);
        assert_eq!(json["rankings"][0]["confidence_level"], "Low");

        let markdown = report.summary_markdown(10);
        assert!(markdown.contains("- Scoring method: adaptive"));
        assert!(markdown.contains("| 1 | solo |"));
        assert!(markdown.contains("- GitHub: 0.250"));
    }
}
