use std::path::PathBuf;
use thiserror::Error;

/// Failures a crust command can run into.
///
/// Pricing failures never escape a single lookup; they are logged and the
/// resource is priced at zero. Every other variant aborts the analysis that
/// produced it.
#[derive(Debug, Error)]
pub enum CrustError {
    /// No configuration file and not enough overrides to run without one
    #[error("configuration file not found at {}", path.display())]
    ConfigMissing { path: PathBuf },

    /// The configuration file exists but could not be used
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// The plan command could not be spawned or exited unsuccessfully
    #[error("plan command `{command}` failed: {reason}")]
    PlanExecution { command: String, reason: String },

    /// The model API could not be reached or answered with an error status
    #[error("language model request failed: {0}")]
    ModelRequest(String),

    /// The model answered, but not in the shape we asked for
    #[error("language model response invalid: {0}")]
    ModelResponseInvalid(String),

    #[error("prompt template error: {0}")]
    Prompt(String),

    #[error("pricing lookup failed: {0}")]
    Pricing(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for CrustError {
    fn from(err: reqwest::Error) -> Self {
        CrustError::ModelRequest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CrustError>;
