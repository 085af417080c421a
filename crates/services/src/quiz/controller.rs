use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use quiz_core::model::{
    AnswerRecord, BankEntry, QuestionBank, QuestionId, RecordId, SessionState, SessionSummary,
};
use storage::SessionRecordRepository;

use super::engine::{Advance, PresentedQuestion, QuizEngine, QuizPhase, QuizProgress};
use super::timers::{SessionTimers, TimerEvent};
use crate::error::QuizError;

/// Everything the presentation layer is told about a running quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizEvent {
    Presented(PresentedQuestion),
    Answered {
        question: QuestionId,
        record: AnswerRecord,
        progress: QuizProgress,
    },
    Tick {
        elapsed_seconds: u64,
    },
    Completed {
        record_id: RecordId,
        summary: SessionSummary,
    },
}

/// Single logical actor for one quiz: owns the bank, the engine and the
/// session timers, and appends finished sessions to the record store.
///
/// Every mutation goes through `&mut self`, so timer callbacks never touch
/// state directly; they queue events that [`QuizController::next_event`]
/// applies in order.
pub struct QuizController {
    bank: QuestionBank,
    engine: QuizEngine,
    records: Arc<dyn SessionRecordRepository>,
    timers: SessionTimers,
    display_delay: Duration,
    unsaved: Option<SessionSummary>,
    last_completed: Option<(RecordId, SessionSummary)>,
}

impl QuizController {
    #[must_use]
    pub fn new(
        bank: QuestionBank,
        engine: QuizEngine,
        records: Arc<dyn SessionRecordRepository>,
        display_delay: Duration,
    ) -> Self {
        Self {
            bank,
            engine,
            records,
            timers: SessionTimers::new(),
            display_delay,
            unsaved: None,
            last_completed: None,
        }
    }

    #[must_use]
    pub fn with_timers(mut self, timers: SessionTimers) -> Self {
        self.timers = timers;
        self
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.engine.phase()
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        self.engine.state()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        self.engine.progress()
    }

    /// The question awaiting an answer, if any.
    #[must_use]
    pub fn current_question(&self) -> Option<&BankEntry> {
        self.engine
            .current_question()
            .and_then(|id| self.bank.get(id))
    }

    /// Summary of the most recently completed session.
    #[must_use]
    pub fn last_completed(&self) -> Option<(RecordId, &SessionSummary)> {
        self.last_completed
            .as_ref()
            .map(|(id, summary)| (*id, summary))
    }

    /// True when a finished session is waiting to be stored.
    ///
    /// Happens when a store attempt failed or its future was dropped;
    /// [`QuizController::next_event`] retries it.
    #[must_use]
    pub fn has_unsaved_completion(&self) -> bool {
        self.unsaved.is_some()
    }

    /// Swap in a freshly loaded bank.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` while a session is in progress.
    pub fn replace_bank(&mut self, bank: QuestionBank) -> Result<(), QuizError> {
        if self.engine.phase() == QuizPhase::InProgress {
            return Err(QuizError::InvalidState {
                actual: QuizPhase::InProgress,
            });
        }
        info!(questions = bank.len(), "question bank replaced");
        self.bank = bank;
        Ok(())
    }

    /// Start a session, present its first question and start the elapsed-time ticker.
    ///
    /// # Errors
    ///
    /// Propagates `QuizError` from [`QuizEngine::start`], and `QuizError::Storage`
    /// if the session completes and the summary cannot be stored.
    pub async fn start(&mut self, limit: Option<NonZeroUsize>) -> Result<QuizEvent, QuizError> {
        let step = self.engine.start(&mut self.bank, limit)?;
        self.discard_unsaved();
        self.timers.cancel_all();
        self.timers.start_ticker();
        info!(
            bank_size = self.bank.len(),
            limit = limit.map(NonZeroUsize::get),
            "quiz started"
        );
        self.apply(step).await
    }

    /// Answer the presented question and schedule the next one after the display delay.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` outside a running session,
    /// `QuizError::NoQuestionPresented` while waiting for the next question,
    /// and `QuizError::InvalidChoice` for an option index out of range.
    pub fn submit(&mut self, choice: usize) -> Result<QuizEvent, QuizError> {
        let phase = self.engine.phase();
        if phase != QuizPhase::InProgress {
            return Err(QuizError::InvalidState { actual: phase });
        }
        let question = self
            .engine
            .current_question()
            .ok_or(QuizError::NoQuestionPresented)?;
        let record = self.engine.submit(&mut self.bank, question, choice)?;
        self.timers.schedule_advance(self.display_delay);

        Ok(QuizEvent::Answered {
            question,
            record,
            progress: self.engine.progress(),
        })
    }

    /// Draw the next question now, skipping any pending display delay.
    ///
    /// # Errors
    ///
    /// Propagates `QuizError` from [`QuizEngine::advance`], and `QuizError::Storage`
    /// if the session completes and the summary cannot be stored.
    pub async fn advance(&mut self) -> Result<QuizEvent, QuizError> {
        self.timers.cancel_advance();
        let step = self.engine.advance(&self.bank)?;
        self.apply(step).await
    }

    /// Wait for the next timer event and apply it.
    ///
    /// Yields `Tick` once a second while a session runs and `Presented` or
    /// `Completed` once a scheduled display delay is over. Stale events from
    /// cancelled timers are skipped. Pends while no timer is running.
    ///
    /// Safe to drop at any await point: a completion whose summary was not
    /// stored yet is kept and stored by the next call.
    ///
    /// # Errors
    ///
    /// Same as [`QuizController::advance`].
    pub async fn next_event(&mut self) -> Result<QuizEvent, QuizError> {
        if self.unsaved.is_some() {
            return self.store_completed().await;
        }
        loop {
            let event = self.timers.recv().await;
            if !self.timers.is_current(event) {
                warn!(?event, "ignoring stale timer event");
                continue;
            }
            match event {
                TimerEvent::Tick { .. } => {
                    if let Some(elapsed_seconds) = self.engine.tick() {
                        return Ok(QuizEvent::Tick { elapsed_seconds });
                    }
                }
                TimerEvent::AdvanceDue { .. } => {
                    self.timers.advance_fired();
                    let step = self.engine.advance(&self.bank)?;
                    return self.apply(step).await;
                }
            }
        }
    }

    /// Leave the quiz: stop timers and reset the session and bank flags.
    pub fn abandon(&mut self) {
        self.timers.cancel_all();
        self.discard_unsaved();
        if self.engine.phase() == QuizPhase::InProgress {
            info!(
                answered = self.engine.state().total_questions(),
                "quiz abandoned"
            );
        }
        self.engine.abandon(&mut self.bank);
    }

    async fn apply(&mut self, step: Advance) -> Result<QuizEvent, QuizError> {
        match step {
            Advance::Presented(question) => Ok(QuizEvent::Presented(question)),
            Advance::Completed(summary) => {
                self.timers.cancel_all();
                self.unsaved = Some(summary);
                self.store_completed().await
            }
        }
    }

    async fn store_completed(&mut self) -> Result<QuizEvent, QuizError> {
        // Stays in `unsaved` until the append succeeds.
        let Some(summary) = self.unsaved.clone() else {
            return Err(QuizError::InvalidState {
                actual: self.engine.phase(),
            });
        };
        let record_id = self.records.append_summary(&summary).await?;
        self.unsaved = None;
        info!(
            record = %record_id,
            score = summary.score(),
            total = summary.total_questions(),
            elapsed_seconds = summary.elapsed_seconds(),
            "quiz completed"
        );
        self.last_completed = Some((record_id, summary.clone()));
        Ok(QuizEvent::Completed { record_id, summary })
    }

    fn discard_unsaved(&mut self) {
        if let Some(summary) = self.unsaved.take() {
            warn!(
                score = summary.score(),
                total = summary.total_questions(),
                "discarding unsaved quiz summary"
            );
        }
    }
}
