//! CI/CD semantic-convention attributes.
//!
//! Fixed attribute sets derived from the resolved [`Config`] and the typed
//! records, independent of the flattened raw data. Callers concatenate
//! these with the flattened raw bag; duplicate keys are retained.

use opentelemetry::KeyValue;

use crate::config::Config;
use crate::flatten;
use crate::gitlab::types::{JobData, PipelineData};

/// The fixed attribute set of a pipeline span.
pub fn pipeline_attributes(config: &Config) -> Vec<KeyValue> {
    vec![
        KeyValue::new("cicd.pipeline.name", config.pipeline_name.clone()),
        KeyValue::new("cicd.pipeline.run.id", config.pipeline_id.to_string()),
        KeyValue::new("vcs.repository.url.full", config.project_url.clone()),
        KeyValue::new("vcs.repository.ref.name", config.commit_ref_name.clone()),
        KeyValue::new("vcs.repository.ref.revision", config.commit_sha.clone()),
        KeyValue::new("vcs.repository.ref.type", ref_type(config)),
        KeyValue::new("cicd.pipeline.trigger.type", trigger_type(config)),
    ]
}

/// The attribute set of a job span: five fixed attributes followed by the
/// flattened raw record.
pub fn job_attributes(job: &JobData) -> Vec<KeyValue> {
    let mut attrs = vec![
        KeyValue::new("cicd.pipeline.task.name", job.job.name.clone()),
        KeyValue::new("cicd.pipeline.task.run.id", job.job.id.to_string()),
        KeyValue::new("cicd.pipeline.task.run.url.full", job.job.web_url.clone()),
        KeyValue::new("cicd.pipeline.task.type", "build"),
        KeyValue::new("stage", job.job.stage.clone()),
    ];

    attrs.extend(flatten::flatten_map("", &job.raw));
    attrs
}

/// Correlation attributes pointing at the upstream pipeline.
///
/// Only emitted for pipelines triggered by another pipeline; a simpler
/// signal than the W3C context and emitted alongside it.
pub fn parent_pipeline_attributes(config: &Config, pipeline: &PipelineData) -> Vec<KeyValue> {
    let mut attrs = Vec::new();

    if config.pipeline_source != "pipeline" && config.pipeline_source != "trigger" {
        return attrs;
    }

    if !config.parent_pipeline_id.is_empty() {
        attrs.push(KeyValue::new(
            "cicd.pipeline.parent.id",
            config.parent_pipeline_id.clone(),
        ));
    }
    if !config.parent_project_id.is_empty() {
        attrs.push(KeyValue::new(
            "cicd.pipeline.parent.project.id",
            config.parent_project_id.clone(),
        ));
    }

    if let Some(user) = &pipeline.pipeline.user {
        if user.id != 0 {
            attrs.push(KeyValue::new(
                "cicd.pipeline.trigger.user.id",
                user.id.to_string(),
            ));
        }
    }

    attrs
}

/// Whether the pipeline ref is a branch or a tag.
pub fn ref_type(config: &Config) -> &'static str {
    if config.commit_tag.is_empty() {
        "branch"
    } else {
        "tag"
    }
}

/// Canonical trigger type for the pipeline source.
pub fn trigger_type(config: &Config) -> &'static str {
    match config.pipeline_source.as_str() {
        "push" => "scm.push",
        "merge_request_event" => "scm.pull_request",
        "schedule" => "schedule",
        "trigger" | "pipeline" => "other_pipeline",
        _ => "manual",
    }
}
