//! W3C trace-context propagation across pipeline boundaries.
//!
//! A pipeline triggered by another pipeline picks up the upstream trace
//! through the `TRACEPARENT` variable; the pipeline span's own context is
//! re-exported so downstream pipelines can continue the same trace.

use log::debug;
use opentelemetry::propagation::TextMapPropagator;
use opentelemetry::Context;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use std::collections::HashMap;

use crate::config::Config;
use crate::gitlab::GitLabClient;

const TRACEPARENT_KEY: &str = "traceparent";

/// Resolve the parent context for the pipeline span.
///
/// Pipelines not triggered by another pipeline keep the given context
/// unchanged. Triggered pipelines take the inbound traceparent token from
/// the configuration when present, otherwise best-effort from the
/// pipeline's CI variables. Lookup failures fall back to the unchanged
/// context; propagation is never fatal.
pub async fn extract_parent_context(
    config: &Config,
    client: &GitLabClient,
    cx: Context,
) -> Context {
    if config.pipeline_source != "pipeline" && config.pipeline_source != "trigger" {
        return cx;
    }

    if let Some(token) = config.traceparent.as_deref().filter(|t| !t.is_empty()) {
        return extract_traceparent(&cx, token);
    }

    match client.fetch_pipeline_variables().await {
        Ok(variables) => {
            if let Some(variable) = variables.iter().find(|v| v.key == "TRACEPARENT") {
                return extract_traceparent(&cx, &variable.value);
            }
        }
        Err(e) => debug!("Pipeline variables lookup failed: {e}"),
    }

    cx
}

/// Serialize the active trace context to a traceparent token, if any.
pub fn export_trace_context(cx: &Context) -> Option<String> {
    let mut carrier = HashMap::new();
    TraceContextPropagator::new().inject_context(cx, &mut carrier);
    carrier.remove(TRACEPARENT_KEY).filter(|t| !t.is_empty())
}

fn extract_traceparent(cx: &Context, token: &str) -> Context {
    let mut carrier = HashMap::new();
    carrier.insert(TRACEPARENT_KEY.to_string(), token.to_string());
    TraceContextPropagator::new().extract_with_context(cx, &carrier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::TraceContextExt;

    const TRACEPARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

    fn test_config(source: &str, traceparent: Option<&str>) -> Config {
        Config {
            pipeline_source: source.to_string(),
            traceparent: traceparent.map(String::from),
            project_id: "42".to_string(),
            pipeline_id: 123,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_extract_is_identity_for_untriggered_pipelines() {
        let config = test_config("push", Some(TRACEPARENT));
        let client = GitLabClient::new(&config).unwrap();

        let cx = extract_parent_context(&config, &client, Context::new()).await;
        assert!(!cx.span().span_context().is_valid());
    }

    #[tokio::test]
    async fn test_extract_uses_inbound_traceparent() {
        let config = test_config("pipeline", Some(TRACEPARENT));
        let client = GitLabClient::new(&config).unwrap();

        let cx = extract_parent_context(&config, &client, Context::new()).await;
        let span_context = cx.span().span_context().clone();
        assert!(span_context.is_valid());
        assert!(span_context.is_remote());
        assert_eq!(
            span_context.trace_id().to_string(),
            "4bf92f3577b34da6a3ce929d0e0e4736"
        );
        assert_eq!(span_context.span_id().to_string(), "00f067aa0ba902b7");
    }

    #[tokio::test]
    async fn test_extract_falls_back_to_pipeline_variables() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/v4/projects/42/pipelines/123/variables")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"[{{"key": "TRACEPARENT", "value": "{TRACEPARENT}"}}]"#
            ))
            .create_async()
            .await;

        let mut config = test_config("trigger", None);
        config.server_url = server.url();
        let client = GitLabClient::new(&config).unwrap();

        let cx = extract_parent_context(&config, &client, Context::new()).await;
        assert_eq!(
            cx.span().span_context().trace_id().to_string(),
            "4bf92f3577b34da6a3ce929d0e0e4736"
        );
    }

    #[tokio::test]
    async fn test_extract_survives_variables_lookup_failure() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/v4/projects/42/pipelines/123/variables")
            .with_status(403)
            .with_body("insufficient permissions")
            .create_async()
            .await;

        let mut config = test_config("pipeline", None);
        config.server_url = server.url();
        let client = GitLabClient::new(&config).unwrap();

        let cx = extract_parent_context(&config, &client, Context::new()).await;
        assert!(!cx.span().span_context().is_valid());
    }

    #[tokio::test]
    async fn test_export_round_trips_extracted_context() {
        let config = test_config("pipeline", Some(TRACEPARENT));
        let client = GitLabClient::new(&config).unwrap();

        let cx = extract_parent_context(&config, &client, Context::new()).await;
        let token = export_trace_context(&cx).unwrap();
        assert_eq!(token, TRACEPARENT);
    }

    #[test]
    fn test_export_is_empty_without_active_span() {
        assert!(export_trace_context(&Context::new()).is_none());
    }
}
