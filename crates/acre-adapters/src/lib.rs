//! Collaborator boundary: reads candidate bundles, job postings and stored embeddings from the
//! on-disk interchange layout.
//!
//! ```text
//! <data>/candidates/<name>/{codeforces,leetcode,github,linkedin,resume_analysis,company_questions}.json
//! <data>/candidates/<name>/{resume,embedding}.json
//! <data>/jobs/<job_id>/{job,embedding}.json
//! ```
//!
//! Per-platform problems never fail a candidate: an absent file is `Missing`, an `error`-flagged
//! or unreadable file is `Failed`.

use std::fs;
use std::path::{Path, PathBuf};

use acre_core::{CandidateBundle, Embedding, Platform, PlatformData, PlatformRecord};
use acre_match::MatchCandidate;
use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{debug, warn};

pub const CRATE_NAME: &str = "acre-adapters";

pub const CANDIDATES_DIR: &str = "candidates";
pub const JOBS_DIR: &str = "jobs";
pub const EMBEDDING_FILE: &str = "embedding.json";
pub const RESUME_FILE: &str = "resume.json";
pub const JOB_FILE: &str = "job.json";

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("{kind} `{id}` not found")]
    NotFound { kind: &'static str, id: String },
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub trait CandidateSource {
    fn candidates(&self) -> Result<Vec<CandidateBundle>>;
}

impl CandidateSource for Vec<CandidateBundle> {
    fn candidates(&self) -> Result<Vec<CandidateBundle>> {
        Ok(self.clone())
    }
}

pub fn platform_file(platform: Platform) -> &'static str {
    match platform {
        Platform::Codeforces => "codeforces.json",
        Platform::Leetcode => "leetcode.json",
        Platform::Github => "github.json",
        Platform::Linkedin => "linkedin.json",
        Platform::Resume => "resume_analysis.json",
        Platform::Assessment => "company_questions.json",
    }
}

fn read_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
}

/// Identifiers become directory names; refuse anything that could escape the data dir.
fn checked_id<'a>(kind: &'static str, id: &'a str) -> Result<&'a str, AdapterError> {
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
        return Err(AdapterError::Message(format!("invalid {kind} identifier `{id}`")));
    }
    Ok(id)
}

/// Sub-directories of `dir` in lexicographic order. A missing `dir` is an empty listing.
fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        warn!(path = %dir.display(), "directory not found");
        return Ok(Vec::new());
    }
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn load_platform_record<T>(path: &Path) -> PlatformRecord<T>
where
    T: PlatformData + DeserializeOwned,
{
    if !path.exists() {
        return PlatformRecord::Missing;
    }
    match read_json_file::<JsonValue>(path) {
        Ok(value) => PlatformRecord::from_json(value),
        Err(err) => {
            warn!(path = %path.display(), error = %format!("{err:#}"), "unreadable platform record");
            PlatformRecord::Failed {
                reason: format!("{err:#}"),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingFile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
    pub embedding: Embedding,
    #[serde(default)]
    pub dimension: Option<usize>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn load_embedding_file(path: &Path) -> Result<EmbeddingFile> {
    let file: EmbeddingFile = read_json_file(path)?;
    if let Some(declared) = file.dimension {
        if declared != file.embedding.dimension() {
            warn!(
                path = %path.display(),
                declared,
                actual = file.embedding.dimension(),
                "embedding dimension field disagrees with vector length"
            );
        }
    }
    Ok(file)
}

/// Loads one candidate directory. The directory name is the candidate's identity.
pub fn load_candidate(dir: &Path) -> Result<CandidateBundle, AdapterError> {
    if !dir.is_dir() {
        return Err(AdapterError::NotFound {
            kind: "candidate",
            id: dir.display().to_string(),
        });
    }

    let file = |p: Platform| dir.join(platform_file(p));
    let mut bundle = CandidateBundle::new(dir_name(dir));
    bundle.codeforces = load_platform_record(&file(Platform::Codeforces));
    bundle.leetcode = load_platform_record(&file(Platform::Leetcode));
    bundle.github = load_platform_record(&file(Platform::Github));
    bundle.linkedin = load_platform_record(&file(Platform::Linkedin));
    bundle.resume = load_platform_record(&file(Platform::Resume));
    bundle.assessment = load_platform_record(&file(Platform::Assessment));

    let embedding_path = dir.join(EMBEDDING_FILE);
    if embedding_path.exists() {
        match load_embedding_file(&embedding_path) {
            Ok(stored) => bundle.embedding = Some(stored.embedding),
            Err(err) => warn!(candidate = %bundle.name, error = %format!("{err:#}"), "skipping embedding"),
        }
    }

    debug!(
        candidate = %bundle.name,
        available = bundle.available_platforms().len(),
        "candidate loaded"
    );
    Ok(bundle)
}

pub fn load_population(data_dir: &Path) -> Result<Vec<CandidateBundle>> {
    let mut population = Vec::new();
    for dir in sorted_subdirs(&data_dir.join(CANDIDATES_DIR))? {
        population.push(load_candidate(&dir)?);
    }
    Ok(population)
}

#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CandidateSource for DataDir {
    fn candidates(&self) -> Result<Vec<CandidateBundle>> {
        load_population(&self.root)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandidateContact {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, alias = "linkedinUrl")]
    pub linkedin: Option<String>,
    #[serde(default, alias = "githubUrl")]
    pub github: Option<String>,
}

/// A posted job as stored in `job.json`. Unknown keys are preserved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[serde(default, rename = "job_id", skip_deserializing)]
    pub job_id: String,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub salary: Option<JsonValue>,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

impl JobPosting {
    pub fn summary(&self) -> JobSummary {
        JobSummary {
            job_title: self.job_title.clone(),
            company: self.company.clone(),
            location: self.location.clone(),
            job_type: self.job_type.clone(),
            salary: self.salary.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary: Option<JsonValue>,
}

fn load_job_posting(dir: &Path) -> Result<JobPosting> {
    let mut job: JobPosting = read_json_file(dir.join(JOB_FILE))?;
    job.job_id = dir_name(dir);
    Ok(job)
}

/// All posted jobs, newest `submittedAt` first; jobs without a date go last. Unreadable
/// postings are skipped.
pub fn list_jobs(data_dir: &Path) -> Result<Vec<JobPosting>> {
    let mut jobs = Vec::new();
    for dir in sorted_subdirs(&data_dir.join(JOBS_DIR))? {
        if !dir.join(JOB_FILE).exists() {
            continue;
        }
        match load_job_posting(&dir) {
            Ok(job) => jobs.push(job),
            Err(err) => warn!(path = %dir.display(), error = %format!("{err:#}"), "skipping job"),
        }
    }
    jobs.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    Ok(jobs)
}

pub fn load_job_embedding(data_dir: &Path, job_id: &str) -> Result<Embedding, AdapterError> {
    let job_id = checked_id("job", job_id)?;
    let path = data_dir.join(JOBS_DIR).join(job_id).join(EMBEDDING_FILE);
    if !path.exists() {
        return Err(AdapterError::NotFound {
            kind: "job",
            id: job_id.to_string(),
        });
    }
    Ok(load_embedding_file(&path)?.embedding)
}

pub fn load_candidate_embedding(data_dir: &Path, username: &str) -> Result<Embedding, AdapterError> {
    let username = checked_id("candidate", username)?;
    let path = data_dir.join(CANDIDATES_DIR).join(username).join(EMBEDDING_FILE);
    if !path.exists() {
        return Err(AdapterError::NotFound {
            kind: "candidate",
            id: username.to_string(),
        });
    }
    Ok(load_embedding_file(&path)?.embedding)
}

/// Candidates that have both an embedding and a `resume.json`. Unreadable entries are skipped.
pub fn load_candidate_embeddings(data_dir: &Path) -> Result<Vec<MatchCandidate<CandidateContact>>> {
    let mut entries = Vec::new();
    for dir in sorted_subdirs(&data_dir.join(CANDIDATES_DIR))? {
        let embedding_path = dir.join(EMBEDDING_FILE);
        let resume_path = dir.join(RESUME_FILE);
        if !embedding_path.exists() || !resume_path.exists() {
            continue;
        }
        let loaded = load_embedding_file(&embedding_path)
            .and_then(|stored| Ok((stored, read_json_file::<CandidateContact>(&resume_path)?)));
        match loaded {
            Ok((stored, contact)) => entries.push(MatchCandidate {
                id: stored.username.unwrap_or_else(|| dir_name(&dir)),
                embedding: stored.embedding,
                metadata: contact,
            }),
            Err(err) => warn!(path = %dir.display(), error = %format!("{err:#}"), "skipping candidate"),
        }
    }
    Ok(entries)
}

/// Jobs that have both an embedding and a `job.json`. Unreadable entries are skipped.
pub fn load_job_embeddings(data_dir: &Path) -> Result<Vec<MatchCandidate<JobSummary>>> {
    let mut entries = Vec::new();
    for dir in sorted_subdirs(&data_dir.join(JOBS_DIR))? {
        let embedding_path = dir.join(EMBEDDING_FILE);
        if !embedding_path.exists() || !dir.join(JOB_FILE).exists() {
            continue;
        }
        let loaded = load_embedding_file(&embedding_path)
            .and_then(|stored| Ok((stored, load_job_posting(&dir)?)));
        match loaded {
            Ok((stored, job)) => entries.push(MatchCandidate {
                id: stored.job_id.unwrap_or_else(|| job.job_id.clone()),
                embedding: stored.embedding,
                metadata: job.summary(),
            }),
            Err(err) => warn!(path = %dir.display(), error = %format!("{err:#}"), "skipping job"),
        }
    }
    Ok(entries)
}
