//! Typed per-platform records.
//!
//! Every scored key is optional and deserialized leniently, so a missing or malformed key is a
//! zero signal for its own sub-score and never an error for the record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::lenient;
use crate::EducationLevel;

/// Implemented by every platform record; decides whether a parsed record carries enough data
/// to count as an available platform.
pub trait PlatformData {
    fn has_signal(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformRecord<T> {
    #[default]
    Missing,
    /// The collaborator flagged the record with an `error` marker.
    Failed { reason: String },
    Present(T),
}

impl<T: PlatformData> PlatformRecord<T> {
    /// The record, if it is present and carries signal.
    pub fn usable(&self) -> Option<&T> {
        match self {
            PlatformRecord::Present(data) if data.has_signal() => Some(data),
            _ => None,
        }
    }
}

impl<T: PlatformData + DeserializeOwned> PlatformRecord<T> {
    pub fn from_json(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => PlatformRecord::Missing,
            JsonValue::Object(map) => {
                if let Some(marker) = map.get("error").filter(|v| is_truthy(v)) {
                    let reason = match marker {
                        JsonValue::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    return PlatformRecord::Failed { reason };
                }
                match T::deserialize(JsonValue::Object(map)) {
                    Ok(data) if data.has_signal() => PlatformRecord::Present(data),
                    Ok(_) => PlatformRecord::Missing,
                    Err(err) => PlatformRecord::Failed {
                        reason: format!("malformed record: {err}"),
                    },
                }
            }
            _ => PlatformRecord::Failed {
                reason: "malformed record: expected an object".to_string(),
            },
        }
    }
}

fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(o) => !o.is_empty(),
    }
}

pub fn filled(value: &Option<String>) -> bool {
    value.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CodeforcesProfile {
    #[serde(default, deserialize_with = "lenient::field")]
    pub handle: Option<String>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub max_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub rank: Option<String>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub contribution: Option<f64>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub contests_participated: Option<f64>,
}

impl PlatformData for CodeforcesProfile {
    fn has_signal(&self) -> bool {
        self.rating.is_some()
            || self.max_rating.is_some()
            || filled(&self.rank)
            || self.contribution.is_some()
            || self.contests_participated.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeetcodeProfile {
    #[serde(default, deserialize_with = "lenient::field")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub total_solved: Option<f64>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub easy_solved: Option<f64>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub medium_solved: Option<f64>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub hard_solved: Option<f64>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub acceptance_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub ranking: Option<f64>,
}

impl PlatformData for LeetcodeProfile {
    fn has_signal(&self) -> bool {
        self.total_solved.is_some()
            || self.easy_solved.is_some()
            || self.medium_solved.is_some()
            || self.hard_solved.is_some()
            || self.acceptance_rate.is_some()
            || self.ranking.is_some()
    }
}

/// GitHub reports languages either as bare names or as `{ "name": ... }` objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Language {
    Plain(String),
    Named { name: String },
}

impl Language {
    pub fn name(&self) -> &str {
        match self {
            Language::Plain(name) => name,
            Language::Named { name } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GithubRepository {
    #[serde(default, deserialize_with = "lenient::field")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub stars: Option<f64>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GithubProfile {
    #[serde(default, alias = "login", deserialize_with = "lenient::field")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub public_repos: Option<f64>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub total_stars_earned: Option<f64>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub followers: Option<f64>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub top_languages: Vec<Language>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub top_repositories: Vec<GithubRepository>,
}

impl PlatformData for GithubProfile {
    fn has_signal(&self) -> bool {
        self.public_repos.is_some()
            || self.total_stars_earned.is_some()
            || self.followers.is_some()
            || !self.top_languages.is_empty()
            || !self.top_repositories.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, deserialize_with = "lenient::field")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "lenient::field")]
    pub school: Option<String>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub field_of_study: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LinkedinProfile {
    #[serde(default, deserialize_with = "lenient::field")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub headline: Option<String>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub profile_pic_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub experiences: Vec<ExperienceEntry>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub education: Vec<EducationEntry>,
    /// Free text such as `"500+"`; numbers are accepted too.
    #[serde(default, deserialize_with = "lenient::text")]
    pub connections: Option<String>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub skills: Vec<String>,
}

impl PlatformData for LinkedinProfile {
    fn has_signal(&self) -> bool {
        filled(&self.full_name)
            || filled(&self.headline)
            || filled(&self.summary)
            || !self.experiences.is_empty()
            || !self.education.is_empty()
            || self.connections.is_some()
            || !self.skills.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    #[serde(default, deserialize_with = "lenient::field")]
    pub candidate_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub phone: Option<String>,
    /// Raw label as produced by the resume analyzer, e.g. `"Master's"` or `"Unknown"`.
    #[serde(default, deserialize_with = "lenient::field")]
    pub education_level: Option<String>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub total_experience_years: Option<f64>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub technical_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub certifications: Vec<String>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub projects: Vec<String>,
    /// Score precomputed by the analyzer against the same job requirements.
    #[serde(default, deserialize_with = "lenient::field")]
    pub score: Option<f64>,
}

impl ResumeAnalysis {
    pub fn education(&self) -> Option<EducationLevel> {
        self.education_level.as_deref().and_then(EducationLevel::parse)
    }
}

impl PlatformData for ResumeAnalysis {
    fn has_signal(&self) -> bool {
        self.score.is_some() || filled(&self.education_level)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssessmentResult {
    #[serde(default, deserialize_with = "lenient::field")]
    pub percentage_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub points_earned: Option<f64>,
    #[serde(default, deserialize_with = "lenient::field")]
    pub total_points: Option<f64>,
}

impl PlatformData for AssessmentResult {
    fn has_signal(&self) -> bool {
        self.percentage_score.is_some()
            || self.score.is_some()
            || (self.points_earned.is_some() && self.total_points.is_some())
    }
}
