use reqwest::StatusCode;
use thiserror::Error;

/// Failures of a single oracle call.
#[derive(Error, Debug)]
pub enum JudgeError {
    /// Connection, timeout or body-read failure.
    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-2xx response.
    #[error("oracle returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Body could not be parsed into a chat completion.
    #[error("failed to parse oracle response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl JudgeError {
    /// Transient failures are retried; everything else resolves the pair as a draw.
    pub fn is_transient(&self) -> bool {
        matches!(self, JudgeError::Transport(_) | JudgeError::Status { .. })
    }
}

impl From<reqwest::Error> for JudgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            JudgeError::Unexpected(err.to_string())
        } else {
            JudgeError::Transport(err)
        }
    }
}

/// Preconditions checked before the first oracle call.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error(
        "Missing objective. Check if there is a line that starts with an alphanumeric character in the objective file"
    )]
    MissingObjective,

    #[error("Need at least 2 distinct symbols to rank, got {0}")]
    TooFewSymbols(usize),
}
