use clap::Parser;

use crate::config::{Config, Protocol};

/// Command-line interface.
///
/// Every flag is bound to the GitLab CI environment variable the runner
/// exports, so inside a CI job the tool normally runs with no arguments at
/// all. Flags exist for local runs and for overriding single values.
#[derive(Parser)]
#[command(name = "citrace")]
#[command(author, version, about = "Export GitLab CI/CD pipelines as OpenTelemetry traces", long_about = None)]
pub struct Cli {
    /// OTLP transport used to deliver spans
    #[arg(long, value_enum, env = "OTEL_EXPORTER_OTLP_PROTOCOL", default_value = "http")]
    protocol: Protocol,

    /// OTLP endpoint; defaults to the standard port for the protocol
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    endpoint: Option<String>,

    /// GitLab job or personal access token
    #[arg(short, long, env = "GITLAB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitLab instance base URL
    #[arg(short, long, env = "CI_SERVER_URL", default_value = "https://gitlab.com")]
    url: String,

    /// Project the pipeline belongs to
    #[arg(short = 'P', long, env = "CI_PROJECT_ID")]
    project: String,

    /// Pipeline run to export
    #[arg(short, long, env = "CI_PIPELINE_ID")]
    pipeline: u64,

    #[arg(long, env = "CI_PIPELINE_NAME", default_value = "", hide = true)]
    pipeline_name: String,

    #[arg(long, env = "CI_PIPELINE_SOURCE", default_value = "", hide = true)]
    pipeline_source: String,

    #[arg(long, env = "CI_PROJECT_NAMESPACE", default_value = "", hide = true)]
    project_namespace: String,

    #[arg(long, env = "CI_PROJECT_NAME", default_value = "", hide = true)]
    project_name: String,

    #[arg(long, env = "CI_PROJECT_URL", default_value = "", hide = true)]
    project_url: String,

    #[arg(long, env = "CI_COMMIT_REF_NAME", default_value = "", hide = true)]
    commit_ref_name: String,

    #[arg(long, env = "CI_COMMIT_SHA", default_value = "", hide = true)]
    commit_sha: String,

    #[arg(long, env = "CI_COMMIT_TAG", default_value = "", hide = true)]
    commit_tag: String,

    #[arg(long, env = "CI_PARENT_PIPELINE_ID", default_value = "", hide = true)]
    parent_pipeline_id: String,

    #[arg(long, env = "CI_PARENT_PROJECT_ID", default_value = "", hide = true)]
    parent_project_id: String,

    /// Inbound W3C traceparent token from an upstream pipeline
    #[arg(long, env = "TRACEPARENT")]
    traceparent: Option<String>,

    /// Print span attributes and propagation details
    #[arg(short, long, env = "DEBUG")]
    debug: bool,
}

impl Cli {
    pub fn into_config(self) -> Config {
        Config {
            protocol: self.protocol,
            endpoint: self.endpoint,
            token: self.token,
            server_url: self.url,
            project_id: self.project,
            pipeline_id: self.pipeline,
            pipeline_name: self.pipeline_name,
            pipeline_source: self.pipeline_source,
            project_namespace: self.project_namespace,
            project_name: self.project_name,
            project_url: self.project_url,
            commit_ref_name: self.commit_ref_name,
            commit_sha: self.commit_sha,
            commit_tag: self.commit_tag,
            parent_pipeline_id: self.parent_pipeline_id,
            parent_project_id: self.parent_project_id,
            traceparent: self.traceparent,
            debug: self.debug,
        }
    }
}
