use crate::form::ValidationError;
use thiserror::Error;

/// Shown when the backend rejects or fails a generation without a usable `detail`.
pub const GENERIC_FAILURE_MESSAGE: &str = "generation failed, please retry";

/// Shown when any of the required catalog/health requests fails.
pub const CONNECTIVITY_MESSAGE: &str = "cannot reach backend service";

#[derive(Error, Debug)]
pub enum IllustError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Non-success HTTP status. `detail` is the backend's string `detail` field, if any.
    #[error("Backend returned HTTP {status}{}", detail_suffix(.detail))]
    Http { status: u16, detail: Option<String> },

    #[error("{context}: {source}")]
    Network {
        context: String,
        source: reqwest::Error,
    },

    #[error("Response error: {0}")]
    Response(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl IllustError {
    /// The backend-provided detail message, when the failure carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            IllustError::Http { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Text to put in the error panel after a failed generate or refine.
    pub fn user_message(&self) -> String {
        match self {
            IllustError::Validation(e) => e.to_string(),
            other => other
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, IllustError>;
