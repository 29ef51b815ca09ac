use thiserror::Error;

#[derive(Error, Debug)]
pub enum CiTraceError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("GitLab API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Trace exporter error: {0}")]
    Trace(String),
}

pub type Result<T> = std::result::Result<T, CiTraceError>;
