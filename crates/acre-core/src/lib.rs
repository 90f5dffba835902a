//! Core domain model for ACRE: platforms, job requirements, scoring weights and candidate bundles.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

mod lenient;
pub mod records;

pub use records::{
    AssessmentResult, CodeforcesProfile, EducationEntry, ExperienceEntry, GithubProfile,
    GithubRepository, Language, LeetcodeProfile, LinkedinProfile, PlatformData, PlatformRecord,
    ResumeAnalysis,
};

pub const CRATE_NAME: &str = "acre-core";

/// Allowed absolute drift of the weight sum away from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Codeforces,
    Leetcode,
    Github,
    Linkedin,
    Resume,
    #[serde(alias = "company_questions")]
    Assessment,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Codeforces,
        Platform::Leetcode,
        Platform::Github,
        Platform::Linkedin,
        Platform::Resume,
        Platform::Assessment,
    ];

    /// At least one of these must be available for a candidate to be ranked at all.
    pub const CRITICAL: [Platform; 2] = [Platform::Resume, Platform::Github];

    pub const CODING: [Platform; 3] = [Platform::Codeforces, Platform::Leetcode, Platform::Github];

    /// Competitive-programming sites, i.e. the coding platforms other than GitHub.
    pub const CONTEST: [Platform; 2] = [Platform::Codeforces, Platform::Leetcode];

    pub const PROFESSIONAL: [Platform; 2] = [Platform::Linkedin, Platform::Resume];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Codeforces => "codeforces",
            Platform::Leetcode => "leetcode",
            Platform::Github => "github",
            Platform::Linkedin => "linkedin",
            Platform::Resume => "resume",
            Platform::Assessment => "assessment",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Codeforces => "Codeforces",
            Platform::Leetcode => "LeetCode",
            Platform::Github => "GitHub",
            Platform::Linkedin => "LinkedIn",
            Platform::Resume => "Resume",
            Platform::Assessment => "Assessment",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal education ladder. Declaration order is the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EducationLevel {
    HighSchool,
    Bachelor,
    Master,
    Phd,
}

impl EducationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "High School",
            EducationLevel::Bachelor => "Bachelor's",
            EducationLevel::Master => "Master's",
            EducationLevel::Phd => "PhD",
        }
    }

    /// Accepts the usual spellings ("Bachelor's", "bachelor", "Ph.D", "high_school", ...).
    pub fn parse(input: &str) -> Option<Self> {
        let key = input
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "highschool" | "secondary" => Some(EducationLevel::HighSchool),
            "bachelor" | "bachelors" => Some(EducationLevel::Bachelor),
            "master" | "masters" => Some(EducationLevel::Master),
            "phd" | "doctorate" => Some(EducationLevel::Phd),
            _ => None,
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EducationLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EducationLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        EducationLevel::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown education level `{raw}`")))
    }
}

/// What the role asks for. Built once per ranking run and passed by reference into every scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRequirements {
    pub required_skills: BTreeSet<String>,
    pub preferred_skills: BTreeSet<String>,
    pub min_education: EducationLevel,
    pub min_experience_years: f64,
    pub domain_keywords: BTreeSet<String>,
    pub coding_platforms_important: bool,
    pub github_important: bool,
}

impl Default for JobRequirements {
    fn default() -> Self {
        Self {
            required_skills: BTreeSet::new(),
            preferred_skills: BTreeSet::new(),
            min_education: EducationLevel::Bachelor,
            min_experience_years: 0.0,
            domain_keywords: BTreeSet::new(),
            coding_platforms_important: true,
            github_important: true,
        }
    }
}

impl JobRequirements {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let value = self.min_experience_years;
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidExperience { value });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("scoring weights must sum to 1.0, got {total}")]
    WeightSum { total: f64 },
    #[error("weight for {platform} must be a non-negative number, got {value}")]
    NegativeWeight { platform: Platform, value: f64 },
    #[error("embedding dimension must be positive")]
    InvalidDimension,
    #[error("min_experience_years must be a non-negative number, got {value}")]
    InvalidExperience { value: f64 },
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct RawWeights {
    codeforces: f64,
    leetcode: f64,
    github: f64,
    linkedin: f64,
    resume: f64,
    #[serde(alias = "company_questions")]
    assessment: f64,
}

/// Per-platform importance. Always sums to 1.0 within [`WEIGHT_SUM_TOLERANCE`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeights")]
pub struct ScoringWeights {
    codeforces: f64,
    leetcode: f64,
    github: f64,
    linkedin: f64,
    resume: f64,
    assessment: f64,
}

impl ScoringWeights {
    pub fn new(
        codeforces: f64,
        leetcode: f64,
        github: f64,
        linkedin: f64,
        resume: f64,
        assessment: f64,
    ) -> Result<Self, ConfigError> {
        let weights = Self {
            codeforces,
            leetcode,
            github,
            linkedin,
            resume,
            assessment,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for platform in Platform::ALL {
            let value = self.weight(platform);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeWeight { platform, value });
            }
        }
        let total = self.sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum { total });
        }
        Ok(())
    }

    pub fn weight(&self, platform: Platform) -> f64 {
        match platform {
            Platform::Codeforces => self.codeforces,
            Platform::Leetcode => self.leetcode,
            Platform::Github => self.github,
            Platform::Linkedin => self.linkedin,
            Platform::Resume => self.resume,
            Platform::Assessment => self.assessment,
        }
    }

    pub fn sum(&self) -> f64 {
        Platform::ALL.iter().map(|p| self.weight(*p)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Platform, f64)> + '_ {
        Platform::ALL.into_iter().map(|p| (p, self.weight(p)))
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            codeforces: 0.15,
            leetcode: 0.20,
            github: 0.25,
            linkedin: 0.15,
            resume: 0.15,
            assessment: 0.10,
        }
    }
}

impl TryFrom<RawWeights> for ScoringWeights {
    type Error = ConfigError;

    fn try_from(raw: RawWeights) -> Result<Self, Self::Error> {
        ScoringWeights::new(
            raw.codeforces,
            raw.leetcode,
            raw.github,
            raw.linkedin,
            raw.resume,
            raw.assessment,
        )
    }
}

/// L2-normalized embedding produced by the external inference service.
///
/// Normalization is a precondition owned by the producer; nothing here re-normalizes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandidateBundle {
    pub name: String,
    #[serde(default)]
    pub codeforces: PlatformRecord<CodeforcesProfile>,
    #[serde(default)]
    pub leetcode: PlatformRecord<LeetcodeProfile>,
    #[serde(default)]
    pub github: PlatformRecord<GithubProfile>,
    #[serde(default)]
    pub linkedin: PlatformRecord<LinkedinProfile>,
    #[serde(default)]
    pub resume: PlatformRecord<ResumeAnalysis>,
    #[serde(default)]
    pub assessment: PlatformRecord<AssessmentResult>,
    #[serde(default)]
    pub embedding: Option<Embedding>,
}

impl CandidateBundle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_available(&self, platform: Platform) -> bool {
        match platform {
            Platform::Codeforces => self.codeforces.usable().is_some(),
            Platform::Leetcode => self.leetcode.usable().is_some(),
            Platform::Github => self.github.usable().is_some(),
            Platform::Linkedin => self.linkedin.usable().is_some(),
            Platform::Resume => self.resume.usable().is_some(),
            Platform::Assessment => self.assessment.usable().is_some(),
        }
    }

    pub fn available_platforms(&self) -> BTreeSet<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.is_available(*p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_are_valid() {
        let weights = ScoringWeights::default();
        assert!(weights.validate().is_ok());
        assert!((weights.sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn weights_summing_to_point_nine_are_rejected() {
        let err = ScoringWeights::new(0.10, 0.20, 0.25, 0.15, 0.10, 0.10).unwrap_err();
        match err {
            ConfigError::WeightSum { total } => assert!((total - 0.9).abs() < 1e-9),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn negative_weight_is_rejected() {
        let err = ScoringWeights::new(-0.05, 0.25, 0.25, 0.20, 0.20, 0.15).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NegativeWeight {
                platform: Platform::Codeforces,
                value: -0.05
            }
        );
    }

    #[test]
    fn weights_deserialize_through_validation() {
        let ok: ScoringWeights = serde_json::from_str(
            r#"{"codeforces":0.1,"leetcode":0.15,"github":0.3,"linkedin":0.15,"resume":0.2,"company_questions":0.1}"#,
        )
        .expect("valid weights");
        assert!((ok.weight(Platform::Assessment) - 0.1).abs() < 1e-12);

        let bad = serde_json::from_str::<ScoringWeights>(
            r#"{"codeforces":0.5,"leetcode":0.5,"github":0.5,"linkedin":0.0,"resume":0.0,"assessment":0.0}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn education_levels_parse_common_spellings() {
        assert_eq!(EducationLevel::parse("Bachelor's"), Some(EducationLevel::Bachelor));
        assert_eq!(EducationLevel::parse("masters"), Some(EducationLevel::Master));
        assert_eq!(EducationLevel::parse("Ph.D"), Some(EducationLevel::Phd));
        assert_eq!(EducationLevel::parse("High School"), Some(EducationLevel::HighSchool));
        assert_eq!(EducationLevel::parse("Unknown"), None);
        assert!(EducationLevel::HighSchool < EducationLevel::Bachelor);
        assert!(EducationLevel::Master < EducationLevel::Phd);
    }

    #[test]
    fn job_requirements_default_missing_fields() {
        let job: JobRequirements =
            serde_json::from_str(r#"{"required_skills":["python"],"min_education":"Master's"}"#)
                .expect("job");
        assert_eq!(job.min_education, EducationLevel::Master);
        assert!(job.domain_keywords.is_empty());
        assert_eq!(job.min_experience_years, 0.0);
        assert!(job.github_important);
        assert!(job.validate().is_ok());
    }

    #[test]
    fn negative_or_nan_experience_is_rejected() {
        let negative = JobRequirements {
            min_experience_years: -2.0,
            ..Default::default()
        };
        assert_eq!(
            negative.validate(),
            Err(ConfigError::InvalidExperience { value: -2.0 })
        );

        let nan = JobRequirements {
            min_experience_years: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(nan.validate(), Err(ConfigError::InvalidExperience { .. })));
    }

    #[test]
    fn empty_bundle_has_no_available_platforms() {
        let bundle = CandidateBundle::new("nobody");
        assert!(bundle.available_platforms().is_empty());
    }
}
