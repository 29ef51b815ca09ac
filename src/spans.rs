use log::{debug, info};
use opentelemetry::trace::{Span, SpanKind, Status, TraceContextExt, Tracer};
use opentelemetry::Context;
use std::time::SystemTime;

use crate::config::Config;
use crate::error::Result;
use crate::gitlab::types::{JobData, PipelineData};
use crate::gitlab::GitLabClient;
use crate::flatten;
use crate::output;
use crate::propagation;
use crate::semconv;

/// Builds the span tree for one pipeline run and hands it to the
/// configured exporter.
///
/// Generic over the tracer so tests can inject an in-memory provider.
pub struct PipelineTracer<'a, T> {
    config: &'a Config,
    client: &'a GitLabClient,
    tracer: T,
}

impl<'a, T> PipelineTracer<'a, T>
where
    T: Tracer,
    T::Span: Send + Sync + 'static,
{
    pub fn new(config: &'a Config, client: &'a GitLabClient, tracer: T) -> Self {
        Self {
            config,
            client,
            tracer,
        }
    }

    /// Export the whole pipeline as one trace segment.
    ///
    /// Fetch failures are fatal; everything after the fetches processes to
    /// completion. One span per eligible job, in fetch order, then the
    /// root span closes with the pipeline's final status.
    pub async fn export_pipeline(&self) -> Result<()> {
        info!("Fetching pipeline data from GitLab API");
        let pipeline = self.client.fetch_pipeline().await?;

        let parent_cx =
            propagation::extract_parent_context(self.config, self.client, Context::current()).await;

        let jobs = self.client.fetch_jobs().await?;
        info!("Found {} jobs in pipeline", jobs.len());

        let cx = self.open_pipeline_span(&parent_cx, &pipeline);

        // Emitted right after the root span opens so the invoking runner can
        // forward it to downstream pipelines.
        if let Some(token) = propagation::export_trace_context(&cx) {
            println!("TRACE_PARENT={token}");
            if self.config.debug {
                println!("   Use this in downstream pipeline variables");
            }
        }

        for job in &jobs {
            if job.job.status == "skipped" {
                continue;
            }
            self.record_job_span(&cx, job);
        }

        self.close_pipeline_span(&cx, &pipeline);
        Ok(())
    }

    fn open_pipeline_span(&self, parent_cx: &Context, pipeline: &PipelineData) -> Context {
        let name = format!(
            "{}/{} #{}",
            self.config.project_namespace, self.config.project_name, pipeline.pipeline.id
        );

        let mut attrs = semconv::pipeline_attributes(self.config);
        attrs.extend(flatten::flatten_map("", &pipeline.raw));
        attrs.extend(semconv::parent_pipeline_attributes(self.config, pipeline));

        output::print_pipeline_span(&name);
        if self.config.debug {
            println!("   Attributes: {attrs:?}");
        }

        let mut builder = self
            .tracer
            .span_builder(name)
            .with_kind(SpanKind::Server)
            .with_attributes(attrs);
        if let Some(created_at) = pipeline.pipeline.created_at {
            builder = builder.with_start_time(SystemTime::from(created_at));
        }

        let span = builder.start_with_context(&self.tracer, parent_cx);
        parent_cx.with_span(span)
    }

    fn record_job_span(&self, cx: &Context, job: &JobData) {
        // A job without both timestamps cannot be faithfully time-bounded.
        let (Some(started_at), Some(finished_at)) = (job.job.started_at, job.job.finished_at)
        else {
            debug!("Job {} has no start/finish timestamps, skipping", job.job.id);
            return;
        };

        let name = format!("Stage: {} - job_id: {}", job.job.name, job.job.id);
        let attrs = semconv::job_attributes(job);

        output::print_job_span(&job.job.name, &job.job.status);
        if self.config.debug {
            println!("      Attributes: {attrs:?}");
        }

        let mut span = self
            .tracer
            .span_builder(name)
            .with_kind(SpanKind::Consumer)
            .with_start_time(SystemTime::from(started_at))
            .with_attributes(attrs)
            .start_with_context(&self.tracer, cx);

        if job.job.status == "failed" {
            span.set_status(Status::error("job failed"));
        } else {
            span.set_status(Status::Ok);
        }
        span.end_with_timestamp(SystemTime::from(finished_at));
    }

    fn close_pipeline_span(&self, cx: &Context, pipeline: &PipelineData) {
        let span = cx.span();

        if pipeline.pipeline.status == "failed" {
            span.set_status(Status::error("pipeline failed"));
        } else {
            span.set_status(Status::Ok);
        }

        match pipeline.pipeline.updated_at {
            Some(updated_at) => span.end_with_timestamp(SystemTime::from(updated_at)),
            None => span.end(),
        }
    }
}
