use clap::ValueEnum;

/// OTLP transport used to deliver finished spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Grpc,
    Stdout,
}

impl Protocol {
    /// Standard endpoint for the protocol when none is configured.
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Protocol::Http => "localhost:4318",
            Protocol::Grpc => "localhost:4317",
            Protocol::Stdout => "stdout",
        }
    }
}

/// Runtime configuration, resolved once at startup.
///
/// All GitLab CI metadata is captured here at the process boundary so the
/// attribute mapping and propagation code never reads ambient environment
/// state. Empty strings mean the corresponding CI variable was unset.
#[derive(Debug, Clone)]
pub struct Config {
    /// OTLP transport selection
    pub protocol: Protocol,
    /// Explicit OTLP endpoint, overriding the protocol default
    pub endpoint: Option<String>,

    /// GitLab job or personal access token
    pub token: Option<String>,
    /// GitLab instance base URL
    pub server_url: String,
    /// Project the pipeline belongs to
    pub project_id: String,
    /// Pipeline run to export
    pub pipeline_id: u64,

    /// Pipeline name (`CI_PIPELINE_NAME`)
    pub pipeline_name: String,
    /// Trigger source (`CI_PIPELINE_SOURCE`, e.g. "push", "pipeline")
    pub pipeline_source: String,
    /// Project namespace (`CI_PROJECT_NAMESPACE`)
    pub project_namespace: String,
    /// Project name (`CI_PROJECT_NAME`)
    pub project_name: String,
    /// Project web URL (`CI_PROJECT_URL`)
    pub project_url: String,
    /// Git ref name (`CI_COMMIT_REF_NAME`)
    pub commit_ref_name: String,
    /// Commit SHA (`CI_COMMIT_SHA`)
    pub commit_sha: String,
    /// Tag name when the pipeline runs for a tag (`CI_COMMIT_TAG`)
    pub commit_tag: String,
    /// Upstream pipeline id for triggered pipelines (`CI_PARENT_PIPELINE_ID`)
    pub parent_pipeline_id: String,
    /// Upstream project id for triggered pipelines (`CI_PARENT_PROJECT_ID`)
    pub parent_project_id: String,
    /// Inbound W3C traceparent token from an upstream pipeline
    pub traceparent: Option<String>,

    /// Print span attributes and propagation details
    pub debug: bool,
}

impl Config {
    /// Resolved OTLP endpoint: the explicit one if set, else the protocol default.
    pub fn otlp_endpoint(&self) -> &str {
        match &self.endpoint {
            Some(endpoint) if !endpoint.is_empty() => endpoint,
            _ => self.protocol.default_endpoint(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            protocol: Protocol::Http,
            endpoint: None,
            token: None,
            server_url: "https://gitlab.com".to_string(),
            project_id: String::new(),
            pipeline_id: 0,
            pipeline_name: String::new(),
            pipeline_source: String::new(),
            project_namespace: String::new(),
            project_name: String::new(),
            project_url: String::new(),
            commit_ref_name: String::new(),
            commit_sha: String::new(),
            commit_tag: String::new(),
            parent_pipeline_id: String::new(),
            parent_project_id: String::new(),
            traceparent: None,
            debug: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint_per_protocol() {
        assert_eq!(Protocol::Http.default_endpoint(), "localhost:4318");
        assert_eq!(Protocol::Grpc.default_endpoint(), "localhost:4317");
        assert_eq!(Protocol::Stdout.default_endpoint(), "stdout");
    }

    #[test]
    fn test_otlp_endpoint_prefers_explicit_value() {
        let config = Config {
            protocol: Protocol::Grpc,
            endpoint: Some("collector.internal:4317".to_string()),
            ..Default::default()
        };
        assert_eq!(config.otlp_endpoint(), "collector.internal:4317");
    }

    #[test]
    fn test_otlp_endpoint_falls_back_to_protocol_default() {
        let config = Config::default();
        assert_eq!(config.otlp_endpoint(), "localhost:4318");

        let config = Config {
            endpoint: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.otlp_endpoint(), "localhost:4318");
    }
}
