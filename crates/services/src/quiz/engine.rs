use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use std::fmt;
use std::num::NonZeroUsize;
use tracing::debug;

use quiz_core::model::{
    AnswerRecord, QuestionBank, QuestionId, SessionState, SessionSummary,
};

use crate::Clock;
use crate::error::QuizError;

//
// ─── PHASES & OUTCOMES ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuizPhase {
    Idle,
    InProgress,
    Completed,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizPhase::Idle => write!(f, "idle"),
            QuizPhase::InProgress => write!(f, "in progress"),
            QuizPhase::Completed => write!(f, "completed"),
        }
    }
}

/// Scoreboard numbers: answered so far against the session target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizProgress {
    pub answered: u32,
    /// The question limit, or the bank size when no limit was given.
    pub target: usize,
    pub score: u32,
}

/// What the presentation layer needs to render one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentedQuestion {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    pub progress: QuizProgress,
}

/// Result of drawing the next question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Presented(PresentedQuestion),
    Completed(SessionSummary),
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Quiz state machine: `Idle → InProgress → Completed`.
///
/// The engine owns the session bookkeeping and borrows the bank on each call,
/// so the bank's `seen` flags stay the single source of truth. It never
/// sleeps or spawns; the display pause between questions belongs to the
/// controller, which calls [`QuizEngine::advance`] when the pause is over.
pub struct QuizEngine {
    clock: Clock,
    rng: StdRng,
    phase: QuizPhase,
    limit: Option<NonZeroUsize>,
    bank_size: usize,
    state: SessionState,
    current: Option<QuestionId>,
    started_at: Option<DateTime<Utc>>,
}

impl QuizEngine {
    /// Engine with an entropy-seeded RNG; every run draws independently.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self::with_rng(clock, StdRng::from_os_rng())
    }

    #[must_use]
    pub fn with_rng(clock: Clock, rng: StdRng) -> Self {
        Self {
            clock,
            rng,
            phase: QuizPhase::Idle,
            limit: None,
            bank_size: 0,
            state: SessionState::new(),
            current: None,
            started_at: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn limit(&self) -> Option<NonZeroUsize> {
        self.limit
    }

    /// The question awaiting an answer, if any.
    #[must_use]
    pub fn current_question(&self) -> Option<QuestionId> {
        self.current
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            answered: self.state.total_questions(),
            target: self.limit.map_or(self.bank_size, NonZeroUsize::get),
            score: self.state.score(),
        }
    }

    /// Begin a new session and present its first question.
    ///
    /// `limit` caps the number of questions; `None` asks until the bank is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` while another session is in progress,
    /// `QuizError::EmptyBank` for an empty bank, and `QuizError::InvalidLimit`
    /// when `limit` exceeds the bank size.
    pub fn start(
        &mut self,
        bank: &mut QuestionBank,
        limit: Option<NonZeroUsize>,
    ) -> Result<Advance, QuizError> {
        if self.phase == QuizPhase::InProgress {
            return Err(QuizError::InvalidState { actual: self.phase });
        }
        if bank.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        if let Some(limit) = limit.filter(|limit| limit.get() > bank.len()) {
            return Err(QuizError::InvalidLimit {
                limit: limit.get(),
                bank_size: bank.len(),
            });
        }

        bank.reset();
        self.state.reset();
        self.current = None;
        self.limit = limit;
        self.bank_size = bank.len();
        self.started_at = Some(self.clock.now());
        self.phase = QuizPhase::InProgress;
        debug!(bank_size = bank.len(), limit = ?limit, "quiz session started");

        self.advance(bank)
    }

    /// Present a random unseen question, or complete the session.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` unless a session is in progress,
    /// `QuizError::AwaitingAnswer` if the presented question has not been
    /// answered yet, and `QuizError::Summary` if the final bookkeeping is inconsistent.
    pub fn advance(&mut self, bank: &QuestionBank) -> Result<Advance, QuizError> {
        if self.phase != QuizPhase::InProgress {
            return Err(QuizError::InvalidState { actual: self.phase });
        }
        if self.current.is_some() {
            return Err(QuizError::AwaitingAnswer);
        }

        let answered = usize::try_from(self.state.total_questions()).unwrap_or(usize::MAX);
        if self.limit.is_some_and(|limit| answered >= limit.get()) {
            return self.complete();
        }

        let unseen = bank.unseen();
        let Some(entry) = unseen.choose(&mut self.rng) else {
            return self.complete();
        };

        let question = entry.question();
        self.current = Some(entry.id());
        debug!(question = %entry.id(), remaining = unseen.len(), "question presented");

        Ok(Advance::Presented(PresentedQuestion {
            id: entry.id(),
            text: question.text().to_owned(),
            options: question.options().to_vec(),
            progress: self.progress(),
        }))
    }

    /// Answer the presented question with the option at `choice`.
    ///
    /// Does not draw the next question; call [`QuizEngine::advance`] for that.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` unless a session is in progress,
    /// `QuizError::NotPresented` if `question` is not the presented one, and
    /// `QuizError::InvalidChoice` if `choice` does not index an option.
    pub fn submit(
        &mut self,
        bank: &mut QuestionBank,
        question: QuestionId,
        choice: usize,
    ) -> Result<AnswerRecord, QuizError> {
        if self.phase != QuizPhase::InProgress {
            return Err(QuizError::InvalidState { actual: self.phase });
        }
        if self.current != Some(question) {
            return Err(QuizError::NotPresented(question));
        }
        let entry = bank.get(question).ok_or(QuizError::NotPresented(question))?;
        let record = AnswerRecord::capture(entry.question(), choice).ok_or(
            QuizError::InvalidChoice {
                choice,
                count: entry.question().options().len(),
            },
        )?;

        bank.mark_seen(question);
        self.state.record(record.clone());
        self.current = None;
        debug!(
            question = %question,
            correct = record.is_correct(),
            score = self.state.score(),
            total = self.state.total_questions(),
            "answer recorded"
        );
        Ok(record)
    }

    /// Count one elapsed second. Returns the new total while in progress.
    pub fn tick(&mut self) -> Option<u64> {
        if self.phase != QuizPhase::InProgress {
            return None;
        }
        self.state.tick();
        Some(self.state.elapsed_seconds())
    }

    /// Drop the current run and return to `Idle` (user navigated away).
    pub fn abandon(&mut self, bank: &mut QuestionBank) {
        bank.reset();
        self.state.reset();
        self.current = None;
        self.limit = None;
        self.started_at = None;
        self.phase = QuizPhase::Idle;
    }

    fn complete(&mut self) -> Result<Advance, QuizError> {
        let completed_at = self.clock.now();
        let started_at = self.started_at.unwrap_or(completed_at);
        let limit = self
            .limit
            .map(|limit| u32::try_from(limit.get()).unwrap_or(u32::MAX));
        let summary = SessionSummary::from_state(&self.state, limit, started_at, completed_at)?;

        self.phase = QuizPhase::Completed;
        debug!(
            score = summary.score(),
            total = summary.total_questions(),
            elapsed = summary.elapsed_seconds(),
            "quiz session completed"
        );
        Ok(Advance::Completed(summary))
    }
}

impl fmt::Debug for QuizEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizEngine")
            .field("phase", &self.phase)
            .field("limit", &self.limit)
            .field("current", &self.current)
            .field("score", &self.state.score())
            .field("total", &self.state.total_questions())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
