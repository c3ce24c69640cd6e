//! Error types for the quiz services.

use thiserror::Error;

/// Errors raised while loading the question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("question bank is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question #{index} is invalid: {reason}")]
    InvalidQuestion { index: usize, reason: String },
}

/// Errors emitted by `QuizController`.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available for this topic")]
    NoQuestions,
    #[error("quiz already completed")]
    Completed,
    #[error("quiz is not completed yet")]
    NotComplete,
    #[error("choice {chosen} is out of range (expected 1 to {max})")]
    InvalidChoice { chosen: usize, max: usize },
}

/// Errors emitted by `GroqExplainer` before they are turned into fallback text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExplainError {
    #[error("explanation service returned an empty response")]
    EmptyResponse,
    #[error("explanation service failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("explanation request timed out")]
    Timeout,
    #[error(transparent)]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for ExplainError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExplainError::Timeout
        } else {
            ExplainError::Http(err)
        }
    }
}
