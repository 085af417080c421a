use async_trait::async_trait;
use quiz_core::model::{RecordId, SessionSummary};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),
}

/// A stored summary together with its assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecordRow {
    pub id: RecordId,
    pub summary: SessionSummary,
}

impl SessionRecordRow {
    #[must_use]
    pub fn new(id: RecordId, summary: SessionSummary) -> Self {
        Self { id, summary }
    }
}

/// Append-only store of completed session summaries.
///
/// Ids are assigned in insertion order starting at 1, and rows are always
/// listed in insertion order. There is deliberately no delete or clear.
#[async_trait]
pub trait SessionRecordRepository: Send + Sync {
    /// Store a finished session and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the summary cannot be stored.
    async fn append_summary(&self, summary: &SessionSummary) -> Result<RecordId, StorageError>;

    /// Fetch one summary by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no record has this id.
    async fn get_summary(&self, id: RecordId) -> Result<SessionSummary, StorageError>;

    /// Number of stored summaries.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn count_summaries(&self) -> Result<usize, StorageError>;

    /// List up to `limit` rows starting at `offset`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_summaries(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SessionRecordRow>, StorageError>;
}

/// Memory-resident record store; lives as long as the process.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    summaries: Arc<Mutex<Vec<SessionSummary>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            summaries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

fn record_id_for(position: usize) -> RecordId {
    RecordId::new(u64::try_from(position).unwrap_or(u64::MAX).saturating_add(1))
}

fn position_of(id: RecordId) -> Option<usize> {
    id.value()
        .checked_sub(1)
        .and_then(|pos| usize::try_from(pos).ok())
}

#[async_trait]
impl SessionRecordRepository for InMemoryRepository {
    async fn append_summary(&self, summary: &SessionSummary) -> Result<RecordId, StorageError> {
        let mut guard = self
            .summaries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(summary.clone());
        Ok(record_id_for(guard.len() - 1))
    }

    async fn get_summary(&self, id: RecordId) -> Result<SessionSummary, StorageError> {
        let guard = self
            .summaries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        position_of(id)
            .and_then(|pos| guard.get(pos))
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn count_summaries(&self) -> Result<usize, StorageError> {
        let guard = self
            .summaries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len())
    }

    async fn list_summaries(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SessionRecordRow>, StorageError> {
        let guard = self
            .summaries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .enumerate()
            .skip(offset)
            .take(limit)
            .map(|(pos, summary)| SessionRecordRow::new(record_id_for(pos), summary.clone()))
            .collect())
    }
}

/// Repository handles behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub session_records: Arc<dyn SessionRecordRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let records: Arc<dyn SessionRecordRepository> = Arc::new(InMemoryRepository::new());
        Self {
            session_records: records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerRecord, Question};
    use quiz_core::time::fixed_now;

    fn build_summary(correct: bool) -> SessionSummary {
        let q = Question::new("2+2?", vec!["3".into(), "4".into(), "5".into()], 1).unwrap();
        let answer = AnswerRecord::capture(&q, if correct { 1 } else { 0 }).unwrap();
        let now = fixed_now();
        SessionSummary::from_parts(
            u32::from(correct),
            1,
            4,
            vec![answer],
            Some(1),
            now,
            now + chrono::Duration::seconds(4),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn ids_follow_insertion_order() {
        let repo = InMemoryRepository::new();
        let first = repo.append_summary(&build_summary(true)).await.unwrap();
        let second = repo.append_summary(&build_summary(false)).await.unwrap();
        assert_eq!(first, RecordId::new(1));
        assert_eq!(second, RecordId::new(2));
        assert_eq!(repo.count_summaries().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn round_trips_summary_fields() {
        let repo = InMemoryRepository::new();
        let summary = build_summary(false);
        let id = repo.append_summary(&summary).await.unwrap();

        let fetched = repo.get_summary(id).await.unwrap();
        assert_eq!(fetched, summary);
        assert_eq!(fetched.answers()[0].user_answer_text(), "3");
        assert_eq!(fetched.answers()[0].correct_answer_text(), "4");
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let repo = InMemoryRepository::new();
        repo.append_summary(&build_summary(true)).await.unwrap();
        assert!(matches!(
            repo.get_summary(RecordId::new(0)).await,
            Err(StorageError::NotFound)
        ));
        assert!(matches!(
            repo.get_summary(RecordId::new(2)).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn lists_windows_in_order() {
        let repo = InMemoryRepository::new();
        for i in 0..7 {
            repo.append_summary(&build_summary(i % 2 == 0)).await.unwrap();
        }
        let rows = repo.list_summaries(5, 5).await.unwrap();
        let ids: Vec<u64> = rows.iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![6, 7]);
        assert!(repo.list_summaries(10, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clones_share_the_same_store() {
        let repo = InMemoryRepository::new();
        let storage = Storage {
            session_records: Arc::new(repo.clone()),
        };
        storage
            .session_records
            .append_summary(&build_summary(true))
            .await
            .unwrap();
        assert_eq!(repo.count_summaries().await.unwrap(), 1);
    }
}
