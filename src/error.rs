use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned status {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    #[error("Unexpected payload format: {0}")]
    Format(String),

    #[error("Source returned no readings")]
    EmptyPayload,

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown chart slot: {0}")]
    UnknownChartSlot(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Transport and payload failures are reported to the dashboard user;
    /// everything else is a programming or configuration problem.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            AppError::Http(_)
                | AppError::UpstreamStatus { .. }
                | AppError::Format(_)
                | AppError::EmptyPayload
                | AppError::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
