//! Semantic matching by embedding similarity.
//!
//! Independent of the multi-criteria scorers: it only looks at vector geometry. Embeddings are
//! expected to be L2-normalized by their producer, so the dot product is the cosine similarity.
//! Nothing here re-normalizes; unnormalized input silently yields wrong similarities.

use acre_core::{ConfigError, Embedding};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

pub const CRATE_NAME: &str = "acre-match";

pub const DEFAULT_TOP_K: usize = 10;

pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum()
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[derive(Debug, Clone)]
pub struct MatchCandidate<M> {
    pub id: String,
    pub embedding: Embedding,
    pub metadata: M,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatch<M> {
    pub id: String,
    /// Rounded to 4 decimals.
    pub similarity: f64,
    #[serde(flatten)]
    pub metadata: M,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOutcome<M> {
    pub total: usize,
    pub matches: Vec<SimilarityMatch<M>>,
}

/// Sorts `candidates` by similarity to `query`, descending, and keeps the best `top_k`
/// (default [`DEFAULT_TOP_K`], clamped to the population).
///
/// Entries whose dimension differs from the query are skipped. Ties keep input order.
pub fn rank_by_similarity<M>(
    query: &Embedding,
    candidates: &[MatchCandidate<M>],
    top_k: Option<usize>,
) -> Result<MatchOutcome<M>, ConfigError>
where
    M: Clone + Send + Sync,
{
    if query.is_empty() {
        return Err(ConfigError::InvalidDimension);
    }
    let dimension = query.dimension();

    let mut scored: Vec<(f64, &MatchCandidate<M>)> = candidates
        .par_iter()
        .filter_map(|candidate| {
            if candidate.embedding.dimension() != dimension {
                warn!(
                    id = %candidate.id,
                    expected = dimension,
                    found = candidate.embedding.dimension(),
                    "skipping embedding with mismatched dimension"
                );
                return None;
            }
            Some((dot(query.as_slice(), candidate.embedding.as_slice()), candidate))
        })
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    let total = scored.len();
    let keep = top_k.unwrap_or(DEFAULT_TOP_K).min(total);
    debug!(total, keep, "similarity ranking");

    let matches = scored
        .into_iter()
        .take(keep)
        .map(|(similarity, candidate)| SimilarityMatch {
            id: candidate.id.clone(),
            similarity: round4(similarity),
            metadata: candidate.metadata.clone(),
        })
        .collect();

    Ok(MatchOutcome { total, matches })
}
