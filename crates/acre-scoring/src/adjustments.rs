//! Minimum-data gate plus the bonus, compensatory and penalty rules applied on top of the
//! confidence-scaled base score.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use acre_core::Platform;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::confidence::ConfidenceLevel;

pub const MIN_PLATFORMS_REQUIRED: usize = 1;
pub const MIN_PLATFORMS_RECOMMENDED: usize = 2;

/// Why a candidate cannot be scored at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateFailure {
    NoData,
    NoCriticalPlatform,
}

impl fmt::Display for GateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateFailure::NoData => f.write_str("No data available"),
            GateFailure::NoCriticalPlatform => {
                let names: Vec<&str> = Platform::CRITICAL.iter().map(|p| p.as_str()).collect();
                write!(f, "Need at least one of: {}", names.join(", "))
            }
        }
    }
}

pub fn check_minimum_data(available: &BTreeSet<Platform>) -> Result<(), GateFailure> {
    if available.len() < MIN_PLATFORMS_REQUIRED {
        return Err(GateFailure::NoData);
    }
    if !Platform::CRITICAL.iter().any(|p| available.contains(p)) {
        return Err(GateFailure::NoCriticalPlatform);
    }
    Ok(())
}

/// One signed adjustment with its rationale. Penalties carry negative points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentItem {
    pub points: f64,
    pub reason: String,
}

impl fmt::Display for AdjustmentItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+} {}", self.points, self.reason)
    }
}

fn item(kind: &'static str, points: f64, reason: impl Into<String>) -> AdjustmentItem {
    let item = AdjustmentItem {
        points,
        reason: reason.into(),
    };
    debug!(kind, points, reason = %item.reason, "adjustment applied");
    item
}

pub fn total(items: &[AdjustmentItem]) -> f64 {
    items.iter().map(|i| i.points).sum()
}

/// Fixed rewards for useful platform combinations.
pub fn bonuses(available: &BTreeSet<Platform>) -> Vec<AdjustmentItem> {
    let mut items = Vec::new();
    let has = |p: Platform| available.contains(&p);

    if has(Platform::Resume) {
        items.push(item("bonus", 5.0, "for having resume"));
    }
    if has(Platform::Github) && Platform::CONTEST.iter().any(|p| has(*p)) {
        items.push(item("bonus", 3.0, "for GitHub + coding platform"));
    }
    if has(Platform::Resume) && has(Platform::Linkedin) {
        items.push(item("bonus", 2.0, "for complete professional profile"));
    }
    items
}

/// A demonstrated strength offsets a weak or missing correlated signal.
///
/// `scores` holds only available platforms, so absence and "missing" coincide.
pub fn compensatory(scores: &BTreeMap<Platform, f64>) -> Vec<AdjustmentItem> {
    let mut items = Vec::new();
    let score = |p: Platform| scores.get(&p).copied();
    let weak_or_missing = |p: Platform| score(p).map_or(true, |s| s < 50.0);

    if score(Platform::Github).is_some_and(|s| s > 70.0) {
        if weak_or_missing(Platform::Leetcode) {
            items.push(item("compensatory", 5.0, "strong GitHub compensates for LeetCode"));
        }
        if weak_or_missing(Platform::Codeforces) {
            items.push(item("compensatory", 3.0, "strong GitHub compensates for Codeforces"));
        }
    }

    if score(Platform::Resume).is_some_and(|s| s > 70.0) && score(Platform::Linkedin).is_none() {
        items.push(item("compensatory", 3.0, "strong resume compensates for LinkedIn"));
    }

    let contest: Vec<f64> = Platform::CONTEST.iter().filter_map(|p| score(*p)).collect();
    if !contest.is_empty() {
        let average = contest.iter().sum::<f64>() / contest.len() as f64;
        if average > 70.0 && weak_or_missing(Platform::Github) {
            items.push(item(
                "compensatory",
                4.0,
                "strong coding platforms compensate for GitHub",
            ));
        }
    }
    items
}

pub fn penalties(available: &BTreeSet<Platform>) -> Vec<AdjustmentItem> {
    let mut items = Vec::new();
    if available.len() < MIN_PLATFORMS_RECOMMENDED {
        items.push(item(
            "penalty",
            -10.0,
            format!("for having only {} platform(s)", available.len()),
        ));
    }
    if !available.contains(&Platform::Resume) && !available.contains(&Platform::Github) {
        items.push(item("penalty", -5.0, "for missing both resume and GitHub"));
    }
    items
}

/// Advisory flags about data coverage. Never alter the score.
pub fn warnings(available: &BTreeSet<Platform>, level: ConfidenceLevel) -> Vec<String> {
    let mut warnings = Vec::new();
    let missing_all = |group: &[Platform]| group.iter().all(|p| !available.contains(p));

    if level == ConfidenceLevel::Low {
        warnings.push(format!(
            "Low confidence: Only {} platform(s) available",
            available.len()
        ));
    }
    if !available.contains(&Platform::Resume) {
        warnings.push("Missing resume - critical for evaluation".to_string());
    }
    if missing_all(&Platform::CODING) {
        warnings.push("No coding platforms - cannot assess technical skills".to_string());
    }
    if missing_all(&Platform::PROFESSIONAL) {
        warnings.push("No professional profile - limited background info".to_string());
    }
    if available.len() < 3 {
        warnings.push("Limited data - consider requesting more information".to_string());
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platforms(list: &[Platform]) -> BTreeSet<Platform> {
        list.iter().copied().collect()
    }

    #[test]
    fn gate_requires_data_and_a_critical_platform() {
        assert_eq!(check_minimum_data(&BTreeSet::new()), Err(GateFailure::NoData));
        assert_eq!(
            check_minimum_data(&platforms(&[Platform::Linkedin, Platform::Leetcode])),
            Err(GateFailure::NoCriticalPlatform)
        );
        assert!(check_minimum_data(&platforms(&[Platform::Github])).is_ok());
        assert_eq!(
            GateFailure::NoCriticalPlatform.to_string(),
            "Need at least one of: resume, github"
        );
    }

    #[test]
    fn bonuses_are_independent() {
        let all = platforms(&Platform::ALL);
        let items = bonuses(&all);
        assert_eq!(total(&items), 10.0);

        let github_only = platforms(&[Platform::Github]);
        assert!(bonuses(&github_only).is_empty());
    }

    #[test]
    fn strong_github_offsets_missing_contest_platforms() {
        let scores = BTreeMap::from([(Platform::Github, 82.0), (Platform::Leetcode, 65.0)]);
        let items = compensatory(&scores);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].to_string(), "+3 strong GitHub compensates for Codeforces");

        let github_alone = BTreeMap::from([(Platform::Github, 80.0)]);
        let reasons: Vec<String> = compensatory(&github_alone)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            reasons,
            vec![
                "+5 strong GitHub compensates for LeetCode".to_string(),
                "+3 strong GitHub compensates for Codeforces".to_string(),
            ]
        );

        let weak_leetcode = BTreeMap::from([
            (Platform::Github, 80.0),
            (Platform::Leetcode, 40.0),
            (Platform::Codeforces, 90.0),
        ]);
        let items = compensatory(&weak_leetcode);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].to_string(), "+5 strong GitHub compensates for LeetCode");
    }

    #[test]
    fn contest_average_uses_present_platforms_only() {
        let scores = BTreeMap::from([(Platform::Codeforces, 75.0), (Platform::Resume, 40.0)]);
        let items = compensatory(&scores);
        assert_eq!(total(&items), 4.0);

        let mixed = BTreeMap::from([
            (Platform::Codeforces, 90.0),
            (Platform::Leetcode, 40.0),
            (Platform::Github, 30.0),
        ]);
        assert!(compensatory(&mixed).is_empty());
    }

    #[test]
    fn penalties_for_thin_data() {
        let single = platforms(&[Platform::Linkedin]);
        let items = penalties(&single);
        assert_eq!(total(&items), -15.0);
        assert_eq!(items[0].to_string(), "-10 for having only 1 platform(s)");

        assert!(penalties(&platforms(&[Platform::Resume, Platform::Github])).is_empty());
    }

    #[test]
    fn warnings_describe_structural_gaps() {
        let resume_only = platforms(&[Platform::Resume]);
        let warnings = warnings(&resume_only, ConfidenceLevel::Low);
        assert_eq!(
            warnings,
            vec![
                "Low confidence: Only 1 platform(s) available".to_string(),
                "No coding platforms - cannot assess technical skills".to_string(),
                "Limited data - consider requesting more information".to_string(),
            ]
        );
    }

    #[test]
    fn github_only_candidate_lacks_resume_and_professional_profile() {
        let github_only = platforms(&[Platform::Github]);
        assert_eq!(
            warnings(&github_only, ConfidenceLevel::Low),
            vec![
                "Low confidence: Only 1 platform(s) available".to_string(),
                "Missing resume - critical for evaluation".to_string(),
                "No professional profile - limited background info".to_string(),
                "Limited data - consider requesting more information".to_string(),
            ]
        );
    }
}
