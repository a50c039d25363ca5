use std::result::Result as StdResult;

use thiserror::Error;

/// Error type that captures ledger, parsing, and advisor failures.
#[derive(Debug, Error)]
pub enum CashFlowError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed ledger row at line {line}: {message}")]
    Parse { line: u64, message: String },
    #[error("Advice service failed: {0}")]
    Service(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, CashFlowError>;

impl CashFlowError {
    pub fn validation(message: impl Into<String>) -> Self {
        CashFlowError::Validation(message.into())
    }

    pub fn service(message: impl Into<String>) -> Self {
        CashFlowError::Service(message.into())
    }

    /// Returns `true` when the failure happened before any storage or network access.
    pub fn is_validation(&self) -> bool {
        matches!(self, CashFlowError::Validation(_))
    }
}

impl From<serde_json::Error> for CashFlowError {
    fn from(err: serde_json::Error) -> Self {
        CashFlowError::Config(err.to_string())
    }
}

impl From<csv::Error> for CashFlowError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|pos| pos.line()).unwrap_or(0);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => CashFlowError::Io(io),
            _ => CashFlowError::Parse { line, message },
        }
    }
}

impl From<reqwest::Error> for CashFlowError {
    fn from(err: reqwest::Error) -> Self {
        CashFlowError::Service(err.to_string())
    }
}
