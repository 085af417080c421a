use chrono::{DateTime, Utc};
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::Arc;

use quiz_core::model::{AnswerRecord, QuizSettings, RecordId, SessionSummary};
use quiz_core::pagination::{Page, PageWindow, paginate};
use storage::SessionRecordRepository;

use crate::error::RecordsError;

/// One row of the records table.
///
/// Carries raw values only; formatting the timestamp or the elapsed time is
/// left to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordListItem {
    pub id: RecordId,
    pub score: u32,
    pub total_questions: u32,
    pub elapsed_seconds: u64,
    pub question_limit: Option<u32>,
    pub completed_at: DateTime<Utc>,
}

impl RecordListItem {
    #[must_use]
    pub fn from_summary(id: RecordId, summary: &SessionSummary) -> Self {
        Self {
            id,
            score: summary.score(),
            total_questions: summary.total_questions(),
            elapsed_seconds: summary.elapsed_seconds(),
            question_limit: summary.question_limit(),
            completed_at: summary.completed_at(),
        }
    }
}

/// Paged, read-only view of the stored session records.
#[derive(Clone)]
pub struct RecordsService {
    records: Arc<dyn SessionRecordRepository>,
    page_size: NonZeroUsize,
    detail_page_size: NonZeroUsize,
}

impl RecordsService {
    #[must_use]
    pub fn new(records: Arc<dyn SessionRecordRepository>, settings: &QuizSettings) -> Self {
        Self {
            records,
            page_size: settings.record_page_size(),
            detail_page_size: settings.detail_page_size(),
        }
    }

    /// One page of records in insertion order; `requested` is clamped.
    ///
    /// # Errors
    ///
    /// Returns `RecordsError::Storage` on repository failures.
    pub async fn page(&self, requested: usize) -> Result<Page<RecordListItem>, RecordsError> {
        let total = self.records.count_summaries().await?;
        let window = PageWindow::resolve(total, self.page_size, requested);
        let rows = self
            .records
            .list_summaries(window.offset(), window.len())
            .await?;
        let items = rows
            .iter()
            .map(|row| RecordListItem::from_summary(row.id, &row.summary))
            .collect();
        Ok(Page::new(items, window))
    }

    /// One page of a record's per-question answers; `requested` is clamped.
    ///
    /// # Errors
    ///
    /// Returns `RecordsError::Storage(StorageError::NotFound)` for an unknown record.
    pub async fn detail_page(
        &self,
        id: RecordId,
        requested: usize,
    ) -> Result<Page<AnswerRecord>, RecordsError> {
        let summary = self.records.get_summary(id).await?;
        Ok(paginate(summary.answers(), self.detail_page_size, requested))
    }

    /// The full stored summary.
    ///
    /// # Errors
    ///
    /// Returns `RecordsError::Storage(StorageError::NotFound)` for an unknown record.
    pub async fn summary(&self, id: RecordId) -> Result<SessionSummary, RecordsError> {
        Ok(self.records.get_summary(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Question;
    use quiz_core::time::fixed_now;
    use storage::{InMemoryRepository, StorageError};

    fn summary_with(answers: usize) -> SessionSummary {
        let q = Question::new("2+2?", vec!["3".into(), "4".into()], 1).unwrap();
        let records: Vec<AnswerRecord> = (0..answers)
            .map(|i| AnswerRecord::capture(&q, i % 2).unwrap())
            .collect();
        let score = u32::try_from(answers / 2).unwrap();
        let total = u32::try_from(answers).unwrap();
        let now = fixed_now();
        SessionSummary::from_parts(score, total, 30, records, None, now, now).unwrap()
    }

    async fn service_with(records: usize, answers: usize) -> RecordsService {
        let repo = InMemoryRepository::new();
        for _ in 0..records {
            repo.append_summary(&summary_with(answers)).await.unwrap();
        }
        RecordsService::new(Arc::new(repo), &QuizSettings::default())
    }

    #[tokio::test]
    async fn pages_hold_five_records() {
        let service = service_with(7, 1).await;

        let first = service.page(1).await.unwrap();
        assert_eq!(first.items.len(), 5);
        assert_eq!(first.total_pages(), 2);
        assert_eq!(first.items[0].id, RecordId::new(1));

        let second = service.page(2).await.unwrap();
        let ids: Vec<u64> = second.items.iter().map(|item| item.id.value()).collect();
        assert_eq!(ids, vec![6, 7]);
    }

    #[tokio::test]
    async fn requested_page_is_clamped() {
        let service = service_with(7, 1).await;
        assert_eq!(service.page(9).await.unwrap().page(), 2);
        assert_eq!(service.page(0).await.unwrap().page(), 1);
    }

    #[tokio::test]
    async fn empty_store_has_one_empty_page() {
        let service = service_with(0, 0).await;
        let page = service.page(3).await.unwrap();
        assert_eq!(page.page(), 1);
        assert_eq!(page.total_pages(), 1);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn detail_pages_slice_answers() {
        let service = service_with(1, 12).await;
        let id = RecordId::new(1);

        let last = service.detail_page(id, 3).await.unwrap();
        assert_eq!(last.items.len(), 2);
        assert_eq!(last.total_pages(), 3);

        let clamped = service.detail_page(id, 40).await.unwrap();
        assert_eq!(clamped.page(), 3);
        assert_eq!(clamped.items, last.items);
    }

    #[tokio::test]
    async fn unknown_record_is_not_found() {
        let service = service_with(1, 1).await;
        assert!(matches!(
            service.detail_page(RecordId::new(5), 1).await,
            Err(RecordsError::Storage(StorageError::NotFound))
        ));
    }

    #[tokio::test]
    async fn summaries_read_back_identically() {
        let repo = InMemoryRepository::new();
        let stored = summary_with(3);
        let id = repo.append_summary(&stored).await.unwrap();
        let service = RecordsService::new(Arc::new(repo), &QuizSettings::default());

        assert_eq!(service.summary(id).await.unwrap(), stored);
        let item = &service.page(1).await.unwrap().items[0];
        assert_eq!(item.score, stored.score());
        assert_eq!(item.elapsed_seconds, 30);
    }
}
