use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{Question, QuestionBank, RecordId, SessionSummary};
use quiz_core::time::fixed_clock;
use services::{QuizController, QuizEngine, QuizError, QuizEvent, QuizPhase};
use storage::{SessionRecordRepository, SessionRecordRow, StorageError};

struct UnavailableStore;

#[async_trait]
impl SessionRecordRepository for UnavailableStore {
    async fn append_summary(&self, _summary: &SessionSummary) -> Result<RecordId, StorageError> {
        Err(StorageError::Connection("store offline".into()))
    }

    async fn get_summary(&self, _id: RecordId) -> Result<SessionSummary, StorageError> {
        Err(StorageError::NotFound)
    }

    async fn count_summaries(&self) -> Result<usize, StorageError> {
        Ok(0)
    }

    async fn list_summaries(
        &self,
        _offset: usize,
        _limit: usize,
    ) -> Result<Vec<SessionRecordRow>, StorageError> {
        Ok(Vec::new())
    }
}

#[tokio::test(start_paused = true)]
async fn storage_failure_surfaces_on_completion() {
    let bank = QuestionBank::from_questions(vec![
        Question::new("2+2?", vec!["3".into(), "4".into(), "5".into()], 1).unwrap(),
    ]);
    let mut quiz = QuizController::new(
        bank,
        QuizEngine::new(fixed_clock()),
        Arc::new(UnavailableStore),
        Duration::ZERO,
    );

    assert!(matches!(
        quiz.start(None).await.unwrap(),
        QuizEvent::Presented(_)
    ));
    quiz.submit(1).unwrap();

    let err = quiz.advance().await.unwrap_err();
    assert!(matches!(
        err,
        QuizError::Storage(StorageError::Connection(_))
    ));
    assert_eq!(quiz.phase(), QuizPhase::Completed);
    assert!(quiz.last_completed().is_none());
    assert!(quiz.has_unsaved_completion());

    assert!(matches!(
        quiz.next_event().await,
        Err(QuizError::Storage(StorageError::Connection(_)))
    ));
    assert!(quiz.has_unsaved_completion());

    quiz.start(None).await.unwrap();
    assert!(!quiz.has_unsaved_completion());
}
