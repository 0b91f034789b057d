//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::DataInsufficientError;
use quiz_core::model::{QuizSummaryError, WordError};

use crate::sessions::QuizPhase;

/// Errors emitted by word providers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("word API returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("word API response is not a word list: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("word {index} is invalid: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: WordError,
    },
}

/// Errors emitted by the quiz session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("cannot {action} while the quiz is {phase}")]
    InvalidPhase {
        action: &'static str,
        phase: QuizPhase,
    },
    #[error("question already submitted")]
    AlreadySubmitted,
    #[error("question has not been submitted yet")]
    NotSubmitted,
    #[error("option {index} does not exist ({len} options offered)")]
    OptionOutOfRange { index: usize, len: usize },
    #[error("quiz controller has stopped")]
    Closed,
    #[error(transparent)]
    DataInsufficient(#[from] DataInsufficientError),
    #[error(transparent)]
    Summary(#[from] QuizSummaryError),
}
