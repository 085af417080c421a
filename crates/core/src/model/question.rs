use serde::Serialize;
use thiserror::Error;

/// Minimum number of options a multiple-choice question must offer.
pub const MIN_OPTIONS: usize = 2;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("a question needs at least {MIN_OPTIONS} options, got {count}")]
    TooFewOptions { count: usize },

    #[error("answer index {answer} is out of range for {count} options")]
    AnswerOutOfRange { answer: usize, count: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question.
///
/// `answer` always indexes into `options`; construction goes through
/// [`Question::new`] so an item with no selectable correct option cannot exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    text: String,
    options: Vec<String>,
    answer: usize,
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` for blank question text,
    /// `QuestionError::TooFewOptions` for fewer than two options, and
    /// `QuestionError::AnswerOutOfRange` when `answer` does not index an option.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        answer: usize,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() < MIN_OPTIONS {
            return Err(QuestionError::TooFewOptions {
                count: options.len(),
            });
        }
        if answer >= options.len() {
            return Err(QuestionError::AnswerOutOfRange {
                answer,
                count: options.len(),
            });
        }
        Ok(Self {
            text,
            options,
            answer,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> usize {
        self.answer
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        // `answer` is bounds-checked in `new`.
        &self.options[self.answer]
    }

    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.answer
    }
}
