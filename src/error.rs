use thiserror::Error;

pub type Result<T> = std::result::Result<T, InsightError>;

/// Failure taxonomy for one tool invocation. Each variant's Display string is
/// the message callers see inside the `Error: ...` envelope text.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("{0}")]
    Config(String),

    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error("Invalid datetime format. Please use ISO8601 format (YYYY-MM-DDTHH:MM:SSZ)")]
    InvalidDatetime,

    #[error("API request failed: {status} {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Unexpected response format: {body}")]
    UnexpectedFormat { body: String },

    #[error("{0}")]
    Transport(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
