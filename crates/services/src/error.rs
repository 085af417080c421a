//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionId, SessionSummaryError};
use quiz_core::schema::BankImportError;
use storage::StorageError;

use crate::quiz::QuizPhase;

/// Errors emitted while loading a question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("cannot read bank file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("bank request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("bank source unreachable: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Import(#[from] BankImportError),
}

/// Errors emitted by the quiz engine and controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("question bank is empty")]
    EmptyBank,
    #[error("question limit {limit} exceeds bank size {bank_size}")]
    InvalidLimit { limit: usize, bank_size: usize },
    #[error("operation not allowed while quiz is {actual}")]
    InvalidState { actual: QuizPhase },
    #[error("a question is already awaiting an answer")]
    AwaitingAnswer,
    #[error("no question is currently presented")]
    NoQuestionPresented,
    #[error("question {0} is not the one currently presented")]
    NotPresented(QuestionId),
    #[error("option {choice} does not exist (question has {count} options)")]
    InvalidChoice { choice: usize, count: usize },
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while browsing stored session records.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecordsError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
