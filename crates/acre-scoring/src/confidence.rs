//! Confidence from data completeness.

use serde::{Deserialize, Serialize};

pub const MIN_CONFIDENCE: f64 = 0.70;
pub const MAX_CONFIDENCE: f64 = 1.0;
pub const TOTAL_PLATFORMS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Insufficient,
    Low,
    Moderate,
    Good,
    High,
}

impl ConfidenceLevel {
    /// `Insufficient` is never produced here; only the minimum-data gate assigns it.
    pub fn from_available(count: usize) -> Self {
        match count {
            c if c >= 5 => ConfidenceLevel::High,
            c if c >= 3 => ConfidenceLevel::Good,
            2 => ConfidenceLevel::Moderate,
            _ => ConfidenceLevel::Low,
        }
    }

    /// Half-width of the uncertainty band in score points.
    pub fn margin(self) -> f64 {
        match self {
            ConfidenceLevel::High => 3.0,
            ConfidenceLevel::Good => 5.0,
            ConfidenceLevel::Moderate => 8.0,
            ConfidenceLevel::Low => 12.0,
            ConfidenceLevel::Insufficient => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceLevel::Insufficient => "Insufficient",
            ConfidenceLevel::Low => "Low",
            ConfidenceLevel::Moderate => "Moderate",
            ConfidenceLevel::Good => "Good",
            ConfidenceLevel::High => "High",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Confidence {
    pub value: f64,
    pub level: ConfidenceLevel,
}

/// Linear in the number of available platforms: 1 platform is 0.75, all 6 is 1.0.
pub fn assess(available: usize) -> Confidence {
    let count = available.min(TOTAL_PLATFORMS);
    let ratio = count as f64 / TOTAL_PLATFORMS as f64;
    Confidence {
        value: MIN_CONFIDENCE + (MAX_CONFIDENCE - MIN_CONFIDENCE) * ratio,
        level: ConfidenceLevel::from_available(count),
    }
}

pub fn completeness(available: usize) -> f64 {
    available.min(TOTAL_PLATFORMS) as f64 / TOTAL_PLATFORMS as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn around(score: f64, level: ConfidenceLevel) -> Self {
        let margin = level.margin();
        Self {
            lower: (score - margin).max(0.0),
            upper: (score + margin).min(100.0),
        }
    }

    pub fn contains(&self, score: f64) -> bool {
        self.lower <= score && score <= self.upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_monotonic_and_bounded() {
        let mut previous = 0.0;
        for n in 1..=TOTAL_PLATFORMS {
            let c = assess(n);
            assert!(c.value >= MIN_CONFIDENCE && c.value <= MAX_CONFIDENCE);
            assert!(c.value > previous);
            previous = c.value;
        }
        assert!((assess(1).value - 0.75).abs() < 1e-12);
        assert!((assess(2).value - 0.8).abs() < 1e-12);
        assert!((assess(6).value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn levels_follow_available_count() {
        let levels: Vec<ConfidenceLevel> = (1..=6).map(ConfidenceLevel::from_available).collect();
        assert_eq!(
            levels,
            vec![
                ConfidenceLevel::Low,
                ConfidenceLevel::Moderate,
                ConfidenceLevel::Good,
                ConfidenceLevel::Good,
                ConfidenceLevel::High,
                ConfidenceLevel::High,
            ]
        );
        assert!(ConfidenceLevel::Insufficient < ConfidenceLevel::Low);
    }

    #[test]
    fn interval_is_clamped_to_score_range() {
        let low = ConfidenceInterval::around(4.0, ConfidenceLevel::Low);
        assert_eq!(low, ConfidenceInterval { lower: 0.0, upper: 16.0 });
        let high = ConfidenceInterval::around(99.0, ConfidenceLevel::Good);
        assert_eq!(high, ConfidenceInterval { lower: 94.0, upper: 100.0 });
        assert!(high.contains(99.0));
    }
}
