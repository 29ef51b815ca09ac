use log::warn;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

use crate::config::Config;
use crate::error::{CiTraceError, Result};
use crate::sanitize;

use super::types::{Job, JobData, Pipeline, PipelineData, PipelineVariable};

/// GitLab REST API client scoped to one pipeline run.
pub struct GitLabClient {
    client: reqwest::Client,
    base_url: Url,
    project_id: String,
    pipeline_id: u64,
}

impl GitLabClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(token)
                .map_err(|_| CiTraceError::Config("GitLab token contains invalid characters".to_string()))?;
            value.set_sensitive(true);
            headers.insert("JOB-TOKEN", value);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("citrace/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| CiTraceError::Config(format!("Failed to create HTTP client: {e}")))?;

        let base_url = Url::parse(&config.server_url)
            .map_err(|e| CiTraceError::Config(format!("Invalid GitLab server URL: {e}")))?;

        Ok(Self {
            client,
            base_url,
            project_id: config.project_id.clone(),
            pipeline_id: config.pipeline_id,
        })
    }

    /// Fetch the pipeline record, typed and raw.
    pub async fn fetch_pipeline(&self) -> Result<PipelineData> {
        let mut raw: Map<String, Value> = self.get_json(self.pipeline_url("")?).await?;
        sanitize::clean_raw(&mut raw);

        let pipeline: Pipeline = serde_json::from_value(Value::Object(raw.clone()))?;
        Ok(PipelineData { pipeline, raw })
    }

    /// Fetch all jobs of the pipeline, in API order.
    ///
    /// An individually malformed job entry is logged and skipped; it never
    /// fails the whole fetch.
    pub async fn fetch_jobs(&self) -> Result<Vec<JobData>> {
        let entries: Vec<Map<String, Value>> = self.get_json(self.pipeline_url("/jobs")?).await?;

        let mut jobs = Vec::with_capacity(entries.len());
        for mut raw in entries {
            sanitize::clean_raw(&mut raw);
            match serde_json::from_value::<Job>(Value::Object(raw.clone())) {
                Ok(job) => jobs.push(JobData { job, raw }),
                Err(e) => {
                    let id = raw.get("id").map_or_else(|| "unknown".to_string(), Value::to_string);
                    warn!("Skipping malformed job record {id}: {e}");
                }
            }
        }

        Ok(jobs)
    }

    /// Fetch the CI variables of the pipeline.
    ///
    /// Used only for best-effort trace-context correlation; callers treat
    /// any error as "no variables".
    pub async fn fetch_pipeline_variables(&self) -> Result<Vec<PipelineVariable>> {
        self.get_json(self.pipeline_url("/variables")?).await
    }

    fn pipeline_url(&self, suffix: &str) -> Result<Url> {
        let path = format!(
            "api/v4/projects/{}/pipelines/{}{}",
            self.project_id, self.pipeline_id, suffix
        );
        self.base_url
            .join(&path)
            .map_err(|e| CiTraceError::Config(format!("Invalid API URL: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(CiTraceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
