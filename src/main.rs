mod cli;
mod config;
mod error;
mod flatten;
mod gitlab;
mod output;
mod propagation;
mod sanitize;
mod semconv;
mod spans;
mod tracer;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use log::info;
use opentelemetry::global;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let config = Cli::parse().into_config();
    info!(
        "Starting citrace for pipeline {} of project {}",
        config.pipeline_id, config.project_id
    );

    let provider = tracer::init_tracer(&config).context("Failed to initialize tracer")?;

    let client = gitlab::GitLabClient::new(&config).context("Failed to create GitLab client")?;

    let exporter = spans::PipelineTracer::new(&config, &client, global::tracer("citrace"));
    exporter
        .export_pipeline()
        .await
        .context("Failed to export pipeline trace")?;

    tracer::shutdown_tracer(provider).context("Failed to flush spans")?;
    info!("Traces exported successfully");

    Ok(())
}
