use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// A GitLab CI/CD pipeline run.
///
/// Only the fields the span synthesis needs are typed; everything else the
/// API returns travels in the raw bag of [`PipelineData`].
#[derive(Debug, Clone, Deserialize)]
pub struct Pipeline {
    /// Numeric pipeline id
    pub id: u64,
    /// Final pipeline status (e.g. "success", "failed")
    pub status: String,
    /// When the pipeline was created; absent for malformed records
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the pipeline was last updated
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// User that triggered the pipeline
    #[serde(default)]
    pub user: Option<User>,
}

/// The user a pipeline run was triggered by.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: u64,
}

/// A job within a pipeline run.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    /// Numeric job id
    pub id: u64,
    /// Job name as defined in .gitlab-ci.yml
    pub name: String,
    /// Stage this job belongs to
    pub stage: String,
    /// Final job status (e.g. "success", "failed", "skipped")
    pub status: String,
    /// Web URL of the job
    #[serde(default)]
    pub web_url: String,
    /// When the job started executing; absent for jobs that never ran
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// When the job finished executing
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Pipeline with the sanitized raw API record alongside the typed view.
#[derive(Debug, Clone)]
pub struct PipelineData {
    pub pipeline: Pipeline,
    pub raw: Map<String, Value>,
}

/// Job with the sanitized raw API record alongside the typed view.
#[derive(Debug, Clone)]
pub struct JobData {
    pub job: Job,
    pub raw: Map<String, Value>,
}

/// A CI variable attached to a pipeline run.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineVariable {
    pub key: String,
    pub value: String,
}
