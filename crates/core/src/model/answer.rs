use serde::Serialize;

use crate::model::question::Question;

/// One answered question, captured by option text rather than index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    question_text: String,
    user_answer_text: String,
    correct_answer_text: String,
    is_correct: bool,
}

impl AnswerRecord {
    /// Snapshot the answer to `question` given the chosen option index.
    ///
    /// Returns `None` if `choice` does not index an option.
    #[must_use]
    pub fn capture(question: &Question, choice: usize) -> Option<Self> {
        let user_answer_text = question.option(choice)?.to_owned();
        Some(Self {
            question_text: question.text().to_owned(),
            user_answer_text,
            correct_answer_text: question.correct_option().to_owned(),
            is_correct: question.is_correct(choice),
        })
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub fn user_answer_text(&self) -> &str {
        &self.user_answer_text
    }

    #[must_use]
    pub fn correct_answer_text(&self) -> &str {
        &self.correct_answer_text
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}
