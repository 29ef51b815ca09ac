use log::info;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::{runtime, Resource};

use crate::config::{Config, Protocol};
use crate::error::{CiTraceError, Result};

/// Initialize the OpenTelemetry tracer provider for the configured
/// transport and install it, together with the W3C propagator, globally.
///
/// The returned provider is also kept by the caller so spans can be
/// flushed at shutdown.
pub fn init_tracer(config: &Config) -> Result<TracerProvider> {
    let endpoint = config.otlp_endpoint();
    info!(
        "Connecting to OTLP endpoint: {endpoint} (protocol: {:?})",
        config.protocol
    );

    let resource = Resource::new([
        KeyValue::new(
            "service.name",
            format!("{}/{}", config.project_namespace, config.project_name),
        ),
        KeyValue::new("service.version", config.commit_sha.clone()),
    ]);

    let builder = TracerProvider::builder().with_resource(resource);

    let provider = match config.protocol {
        Protocol::Http => {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_http()
                .with_endpoint(http_endpoint(endpoint))
                .build()
                .map_err(|e| CiTraceError::Trace(e.to_string()))?;
            builder.with_batch_exporter(exporter, runtime::Tokio).build()
        }
        Protocol::Grpc => {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(grpc_endpoint(endpoint))
                .build()
                .map_err(|e| CiTraceError::Trace(e.to_string()))?;
            builder.with_batch_exporter(exporter, runtime::Tokio).build()
        }
        Protocol::Stdout => builder
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build(),
    };

    global::set_tracer_provider(provider.clone());
    global::set_text_map_propagator(TraceContextPropagator::new());

    Ok(provider)
}

/// Flush remaining spans and tear down the provider.
pub fn shutdown_tracer(provider: TracerProvider) -> Result<()> {
    provider
        .shutdown()
        .map_err(|e| CiTraceError::Trace(e.to_string()))
}

/// Full OTLP/HTTP trace URL for a configured endpoint, which may be a bare
/// `host:port` or already carry a scheme.
fn http_endpoint(endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        format!("{}/v1/traces", endpoint.trim_end_matches('/'))
    } else {
        format!("http://{endpoint}/v1/traces")
    }
}

fn grpc_endpoint(endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_endpoint_normalization() {
        assert_eq!(
            http_endpoint("localhost:4318"),
            "http://localhost:4318/v1/traces"
        );
        assert_eq!(
            http_endpoint("https://collector.example.com/"),
            "https://collector.example.com/v1/traces"
        );
    }

    #[test]
    fn test_grpc_endpoint_normalization() {
        assert_eq!(grpc_endpoint("localhost:4317"), "http://localhost:4317");
        assert_eq!(
            grpc_endpoint("https://collector.example.com"),
            "https://collector.example.com"
        );
    }
}
