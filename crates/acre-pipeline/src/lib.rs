//! Ranking and matching runs: configuration, profiles, orchestration and report output.

use std::path::{Path, PathBuf};

use acre_adapters::{
    list_jobs, load_candidate_embedding, load_candidate_embeddings, load_job_embedding,
    load_job_embeddings, CandidateContact, CandidateSource, DataDir, JobPosting, JobSummary,
};
use acre_core::{JobRequirements, ScoringWeights};
use acre_match::{rank_by_similarity, SimilarityMatch};
use acre_scoring::{rank_adaptive, rank_simple};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

pub mod report;

use report::{
    AdaptiveRankingEntry, AdaptiveRankingReport, SimpleRankingEntry, SimpleRankingReport,
    SCORING_METHOD_ADAPTIVE, SCORING_METHOD_SIMPLE,
};

pub const CRATE_NAME: &str = "acre-pipeline";

pub const REPORT_FILE: &str = "ranking_report.json";
pub const SUMMARY_FILE: &str = "summary.md";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub profile_path: Option<PathBuf>,
    pub top_k: usize,
    pub simple_ranking: bool,
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            data_dir: var("ACRE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            reports_dir: var("ACRE_REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./reports")),
            profile_path: var("ACRE_PROFILE").filter(|v| !v.is_empty()).map(PathBuf::from),
            top_k: var("ACRE_TOP_K")
                .and_then(|v| v.parse().ok())
                .unwrap_or(acre_match::DEFAULT_TOP_K),
            simple_ranking: var("ACRE_SIMPLE_RANKING")
                .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "True"))
                .unwrap_or(false),
        }
    }
}

fn default_profile_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingProfile {
    #[serde(default = "default_profile_version")]
    pub version: u32,
    #[serde(default)]
    pub weights: ScoringWeights,
    #[serde(default)]
    pub job: JobRequirements,
}

impl Default for RankingProfile {
    fn default() -> Self {
        Self {
            version: default_profile_version(),
            weights: ScoringWeights::default(),
            job: JobRequirements::default(),
        }
    }
}

/// Reads and validates a profile. Invalid weights or requirements fail here, before any candidate
/// is scored.
pub async fn load_profile(path: &Path) -> Result<RankingProfile> {
    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let profile: RankingProfile =
        serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    profile
        .job
        .validate()
        .with_context(|| format!("validating job requirements in {}", path.display()))?;
    Ok(profile)
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub scoring_method: String,
    pub total_candidates: usize,
    pub top_candidate: Option<String>,
    pub top_score: Option<f64>,
    pub reports_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobMatchReport {
    pub job_id: String,
    pub total_candidates: usize,
    pub matches: Vec<SimilarityMatch<CandidateContact>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateMatchReport {
    pub username: String,
    pub total_jobs: usize,
    pub matches: Vec<SimilarityMatch<JobSummary>>,
}

pub struct RankingPipeline {
    config: PipelineConfig,
    profile: RankingProfile,
    source: Box<dyn CandidateSource + Send + Sync>,
}

impl RankingPipeline {
    pub async fn new(config: PipelineConfig) -> Result<Self> {
        let profile = match &config.profile_path {
            Some(path) => load_profile(path).await?,
            None => RankingProfile::default(),
        };
        let source = Box::new(DataDir::new(config.data_dir.clone()));
        Ok(Self {
            config,
            profile,
            source,
        })
    }

    pub fn with_profile(mut self, profile: RankingProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_source(mut self, source: Box<dyn CandidateSource + Send + Sync>) -> Self {
        self.source = source;
        self
    }

    pub fn profile(&self) -> &RankingProfile {
        &self.profile
    }

    /// Scores and ranks the whole population, then writes `ranking_report.json` and
    /// `summary.md` under `<reports_dir>/<run_id>/`.
    pub async fn run_once(&self) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        let span = info_span!("ranking_run", %run_id);
        self.run_ranking(run_id).instrument(span).await
    }

    async fn run_ranking(&self, run_id: Uuid) -> Result<RunSummary> {
        let generated_at = Utc::now();
        let population = self.source.candidates()?;
        let weights = &self.profile.weights;
        let job = &self.profile.job;
        info!(candidates = population.len(), simple = self.config.simple_ranking, "ranking population");

        let reports_dir = self.config.reports_dir.join(run_id.to_string());
        fs::create_dir_all(&reports_dir)
            .await
            .with_context(|| format!("creating {}", reports_dir.display()))?;

        let (scoring_method, top, json, summary) = if self.config.simple_ranking {
            let ranked = rank_simple(&population, weights, job);
            let entries = ranked.iter().map(SimpleRankingEntry::from).collect();
            let report = SimpleRankingReport::new(
                run_id,
                generated_at,
                SCORING_METHOD_SIMPLE,
                weights,
                job,
                entries,
            );
            let top = report
                .rankings
                .first()
                .map(|e| (e.candidate_name.clone(), e.total_score));
            let json = serde_json::to_vec_pretty(&report).context("serializing ranking report")?;
            (SCORING_METHOD_SIMPLE, top, json, report.summary_markdown(self.config.top_k))
        } else {
            let ranked = rank_adaptive(&population, weights, job);
            let entries = ranked.iter().map(AdaptiveRankingEntry::from).collect();
            let report = AdaptiveRankingReport::new(
                run_id,
                generated_at,
                SCORING_METHOD_ADAPTIVE,
                weights,
                job,
                entries,
            );
            let top = report
                .rankings
                .first()
                .map(|e| (e.candidate_name.clone(), e.final_score));
            let json = serde_json::to_vec_pretty(&report).context("serializing ranking report")?;
            (SCORING_METHOD_ADAPTIVE, top, json, report.summary_markdown(self.config.top_k))
        };

        fs::write(reports_dir.join(REPORT_FILE), json)
            .await
            .with_context(|| format!("writing {REPORT_FILE}"))?;
        fs::write(reports_dir.join(SUMMARY_FILE), summary)
            .await
            .with_context(|| format!("writing {SUMMARY_FILE}"))?;

        if let Some((name, score)) = &top {
            info!(top_candidate = %name, score, "ranking run complete");
        }

        Ok(RunSummary {
            run_id,
            generated_at,
            scoring_method: scoring_method.to_string(),
            total_candidates: population.len(),
            top_candidate: top.as_ref().map(|(name, _)| name.clone()),
            top_score: top.map(|(_, score)| score),
            reports_dir,
        })
    }

    pub fn match_candidates_for_job(&self, job_id: &str, top_k: Option<usize>) -> Result<JobMatchReport> {
        let query = load_job_embedding(&self.config.data_dir, job_id)?;
        let candidates = load_candidate_embeddings(&self.config.data_dir)?;
        let outcome = rank_by_similarity(&query, &candidates, Some(top_k.unwrap_or(self.config.top_k)))?;
        if let Some(best) = outcome.matches.first() {
            info!(job_id, total = outcome.total, best = %best.id, similarity = best.similarity, "matched candidates");
        }
        Ok(JobMatchReport {
            job_id: job_id.to_string(),
            total_candidates: outcome.total,
            matches: outcome.matches,
        })
    }

    pub fn match_jobs_for_candidate(
        &self,
        username: &str,
        top_k: Option<usize>,
    ) -> Result<CandidateMatchReport> {
        let query = load_candidate_embedding(&self.config.data_dir, username)?;
        let jobs = load_job_embeddings(&self.config.data_dir)?;
        let outcome = rank_by_similarity(&query, &jobs, Some(top_k.unwrap_or(self.config.top_k)))?;
        if let Some(best) = outcome.matches.first() {
            info!(username, total = outcome.total, best = %best.id, similarity = best.similarity, "matched jobs");
        }
        Ok(CandidateMatchReport {
            username: username.to_string(),
            total_jobs: outcome.total,
            matches: outcome.matches,
        })
    }

    pub fn jobs(&self) -> Result<Vec<JobPosting>> {
        list_jobs(&self.config.data_dir)
    }
}

pub async fn run_ranking_once_from_env() -> Result<RunSummary> {
    let pipeline = RankingPipeline::new(PipelineConfig::from_env()).await?;
    pipeline.run_once().await
}

pub fn report_latest_markdown(runs: usize, reports_root: &Path) -> Result<String> {
    let mut dirs = std::fs::read_dir(reports_root)
        .with_context(|| format!("reading {}", reports_root.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false))
        .collect::<Vec<_>>();
    dirs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());
    dirs.reverse();
    let dirs = dirs.into_iter().take(runs.max(1)).collect::<Vec<_>>();

    let mut lines = vec!["# ACRE Ranking Runs".to_string(), String::new()];
    for dir in dirs {
        let run_id = dir.file_name().to_string_lossy().to_string();
        let report_path = dir.path().join(REPORT_FILE);
        if !report_path.exists() {
            continue;
        }
        let report: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(&report_path)
                .with_context(|| format!("reading {}", report_path.display()))?,
        )
        .with_context(|| format!("parsing {}", report_path.display()))?;

        let method = report
            .get("scoring_method")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        let total = report
            .get("total_candidates")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        let top = report
            .get("rankings")
            .and_then(|v| v.as_array())
            .and_then(|r| r.first());
        let top_name = top
            .and_then(|t| t.get("candidate_name"))
            .and_then(|v| v.as_str())
            .unwrap_or("-");
        let top_score = top
            .and_then(|t| t.get("final_score").or_else(|| t.get("total_score")))
            .and_then(|v| v.as_f64());

        lines.push(format!("## Run `{run_id}`"));
        lines.push(format!("- method: {method}"));
        lines.push(format!("- candidates: {total}"));
        match top_score {
            Some(score) => lines.push(format!("- top: {top_name} ({score:.2})")),
            None => lines.push(format!("- top: {top_name}")),
        }
        lines.push(format!("- report: `{}`", report_path.display()));
        let summary_path = dir.path().join(SUMMARY_FILE);
        if summary_path.exists() {
            lines.push(format!("- summary: `{}`", summary_path.display()));
        }
        lines.push(String::new());
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use acre_adapters::AdapterError;
    use acre_core::{CandidateBundle, Platform};
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn workspace_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
    }

    fn fixture_config(reports_dir: &Path) -> PipelineConfig {
        PipelineConfig {
            data_dir: workspace_root().join("fixtures").join("data"),
            reports_dir: reports_dir.to_path_buf(),
            profile_path: None,
            top_k: 10,
            simple_ranking: false,
        }
    }

    #[test]
    fn config_reads_overrides_and_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("ACRE_DATA_DIR", "/srv/acre/data"),
            ("ACRE_TOP_K", "5"),
            ("ACRE_SIMPLE_RANKING", "True"),
        ]);
        let config = PipelineConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.data_dir, PathBuf::from("/srv/acre/data"));
        assert_eq!(config.reports_dir, PathBuf::from("./reports"));
        assert_eq!(config.top_k, 5);
        assert!(config.simple_ranking);
        assert!(config.profile_path.is_none());

        let defaults = PipelineConfig::from_lookup(|_| None);
        assert_eq!(defaults.top_k, 10);
        assert!(!defaults.simple_ranking);
    }

    #[tokio::test]
    async fn profile_yaml_is_validated_on_load() {
        let profiles = workspace_root().join("fixtures").join("profiles");
        let profile = load_profile(&profiles.join("ml-engineer.yaml")).await.unwrap();
        assert!((profile.weights.weight(Platform::Github) - 0.30).abs() < 1e-12);
        assert!(profile.job.required_skills.contains("pytorch"));
        assert_eq!(profile.job.min_experience_years, 3.0);

        let err = load_profile(&profiles.join("bad-weights.yaml")).await.unwrap_err();
        assert!(format!("{err:#}").contains("must sum to 1.0"), "{err:#}");
    }

    #[tokio::test]
    async fn profile_with_negative_experience_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("negative.yaml");
        std::fs::write(&path, "version: 1\njob:\n  min_experience_years: -2\n").unwrap();

        let err = load_profile(&path).await.unwrap_err();
        assert!(format!("{err:#}").contains("min_experience_years"), "{err:#}");
        assert!(matches!(
            err.downcast_ref::<acre_core::ConfigError>(),
            Some(acre_core::ConfigError::InvalidExperience { .. })
        ));
    }

    #[tokio::test]
    async fn adaptive_run_writes_report_and_summary() {
        let dir = tempdir().unwrap();
        let pipeline = RankingPipeline::new(fixture_config(dir.path())).await.unwrap();
        let summary = pipeline.run_once().await.unwrap();

        assert_eq!(summary.scoring_method, SCORING_METHOD_ADAPTIVE);
        assert_eq!(summary.total_candidates, 3);
        assert_eq!(summary.top_candidate.as_deref(), Some("alice-full"));

        let text = std::fs::read_to_string(summary.reports_dir.join(REPORT_FILE)).unwrap();
        let report: AdaptiveRankingReport = serde_json::from_str(&text).unwrap();
        let names: Vec<&str> = report.rankings.iter().map(|e| e.candidate_name.as_str()).collect();
        assert_eq!(names, vec!["alice-full", "bob-resume-github", "carol-errors"]);
        let last = &report.rankings[2];
        assert_eq!(last.final_score, 0.0);
        assert!(last.warnings[0].starts_with("Insufficient data"));
        assert!(summary.reports_dir.join(SUMMARY_FILE).exists());

        let index = report_latest_markdown(5, dir.path()).unwrap();
        assert!(index.contains(&summary.run_id.to_string()));
        assert!(index.contains("- top: alice-full"));
    }

    #[tokio::test]
    async fn simple_run_uses_fixed_weights() {
        let dir = tempdir().unwrap();
        let mut config = fixture_config(dir.path());
        config.simple_ranking = true;
        let pipeline = RankingPipeline::new(config)
            .await
            .unwrap()
            .with_source(Box::new(vec![CandidateBundle::new("blank")]));
        let summary = pipeline.run_once().await.unwrap();
        assert_eq!(summary.scoring_method, SCORING_METHOD_SIMPLE);
        // Neutral resume and assessment only: 50 * 0.15 + 50 * 0.10
        assert_eq!(summary.top_score, Some(12.5));
    }

    #[tokio::test]
    async fn semantic_matching_in_both_directions() {
        let dir = tempdir().unwrap();
        let pipeline = RankingPipeline::new(fixture_config(dir.path())).await.unwrap();

        let by_job = pipeline.match_candidates_for_job("job-ml-001", Some(2)).unwrap();
        assert_eq!(by_job.total_candidates, 3);
        assert_eq!(by_job.matches.len(), 2);
        assert_eq!(by_job.matches[0].id, "alice-full");
        assert_eq!(by_job.matches[0].similarity, 0.8);

        let by_candidate = pipeline.match_jobs_for_candidate("bob-resume-github", None).unwrap();
        assert_eq!(by_candidate.total_jobs, 2);
        assert_eq!(by_candidate.matches[0].id, "job-web-002");
        assert_eq!(by_candidate.matches[0].metadata.company.as_deref(), Some("Shoply"));

        let err = pipeline.match_candidates_for_job("job-404", None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AdapterError>(),
            Some(AdapterError::NotFound { .. })
        ));
    }
}
