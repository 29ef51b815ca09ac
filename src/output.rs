use console::style;

/// Prints the `citrace` banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        style("citrace").magenta().bold(),
        style(env!("CARGO_PKG_VERSION")).dim(),
        style("GitLab CI/CD pipelines as OpenTelemetry traces").dim()
    );
}

pub fn print_pipeline_span(name: &str) {
    println!("Creating pipeline span: {}", style(name).cyan());
}

pub fn print_job_span(name: &str, status: &str) {
    let styled_status = match status {
        "success" => style(status.to_string()).green(),
        "failed" => style(status.to_string()).red(),
        _ => style(status.to_string()).dim(),
    };
    println!("   ├─ Job: {name} (status: {styled_status})");
}
