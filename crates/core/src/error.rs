use thiserror::Error;

use crate::model::{QuestionError, QuizSettingsError, SessionSummaryError};
use crate::schema::BankImportError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Import(#[from] BankImportError),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
    #[error(transparent)]
    Settings(#[from] QuizSettingsError),
}
