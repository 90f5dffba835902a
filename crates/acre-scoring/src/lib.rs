//! Deterministic scoring and ranking of candidate bundles.

pub mod adaptive;
pub mod adjustments;
pub mod aggregate;
pub mod confidence;
pub mod platform;
pub mod simple;
pub mod weights;

pub use adaptive::{assemble, rank_adaptive, score_adaptive, AdaptiveResult, AdjustmentBreakdown};
pub use adjustments::{AdjustmentItem, GateFailure};
pub use aggregate::{assign_ranks, top, Rankable, RecommendationTier};
pub use confidence::{ConfidenceInterval, ConfidenceLevel};
pub use simple::{rank_simple, score_simple, CandidateScore};

pub const CRATE_NAME: &str = "acre-scoring";
