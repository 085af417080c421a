use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::answer::AnswerRecord;
use crate::time::whole_seconds_between;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("score ({score}) exceeds total questions ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },

    #[error("total questions ({total}) does not match answer count ({answers})")]
    CountMismatch { total: u32, answers: usize },

    #[error("score ({score}) does not match correct answers ({correct})")]
    ScoreMismatch { score: u32, correct: usize },
}

//
// ─── LIVE SESSION STATE ────────────────────────────────────────────────────────
//

/// Mutable bookkeeping for the quiz run in progress.
///
/// Reset, never rebuilt, between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    score: u32,
    total_questions: u32,
    elapsed_seconds: u64,
    answers: Vec<AnswerRecord>,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an answer and append it to the log.
    pub fn record(&mut self, answer: AnswerRecord) {
        if answer.is_correct() {
            self.score = self.score.saturating_add(1);
        }
        self.total_questions = self.total_questions.saturating_add(1);
        self.answers.push(answer);
    }

    /// One second of quiz time has passed.
    pub fn tick(&mut self) {
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.total_questions = 0;
        self.elapsed_seconds = 0;
        self.answers.clear();
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }
}

//
// ─── COMPLETED SESSION SUMMARY ─────────────────────────────────────────────────
//

/// Immutable result of one finished quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    score: u32,
    total_questions: u32,
    elapsed_seconds: u64,
    answers: Vec<AnswerRecord>,
    question_limit: Option<u32>,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl SessionSummary {
    /// Snapshot a live session at completion time.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError` if the bookkeeping is inconsistent or the
    /// time range is inverted.
    pub fn from_state(
        state: &SessionState,
        question_limit: Option<u32>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, SessionSummaryError> {
        Self::from_parts(
            state.score,
            state.total_questions,
            state.elapsed_seconds,
            state.answers.clone(),
            question_limit,
            started_at,
            completed_at,
        )
    }

    /// Assemble and validate a summary from its raw parts.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `completed_at` precedes
    /// `started_at`, `ScoreExceedsTotal`/`ScoreMismatch` if the score disagrees
    /// with the answers, and `CountMismatch` if the answer log length differs
    /// from `total_questions`.
    pub fn from_parts(
        score: u32,
        total_questions: u32,
        elapsed_seconds: u64,
        answers: Vec<AnswerRecord>,
        question_limit: Option<u32>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        if score > total_questions {
            return Err(SessionSummaryError::ScoreExceedsTotal {
                score,
                total: total_questions,
            });
        }
        if usize::try_from(total_questions).ok() != Some(answers.len()) {
            return Err(SessionSummaryError::CountMismatch {
                total: total_questions,
                answers: answers.len(),
            });
        }
        let correct = answers.iter().filter(|a| a.is_correct()).count();
        if usize::try_from(score).ok() != Some(correct) {
            return Err(SessionSummaryError::ScoreMismatch { score, correct });
        }

        Ok(Self {
            score,
            total_questions,
            elapsed_seconds,
            answers,
            question_limit,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// The cap requested at start, `None` when the session ran until the bank was exhausted.
    #[must_use]
    pub fn question_limit(&self) -> Option<u32> {
        self.question_limit
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Wall-clock duration between start and completion.
    #[must_use]
    pub fn wall_clock_seconds(&self) -> u64 {
        whole_seconds_between(self.started_at, self.completed_at)
    }
}
