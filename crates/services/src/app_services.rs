use std::sync::Arc;

use quiz_core::model::{BankEntry, QuestionBank, QuizSettings};
use quiz_core::pagination::Page;
use storage::Storage;

use crate::Clock;
use crate::bank_service::{BankService, BankSource};
use crate::browse::browse_bank;
use crate::error::BankLoadError;
use crate::quiz::{QuizController, QuizEngine};
use crate::records::RecordsService;

/// Assembles the app-facing services over one shared record store.
#[derive(Clone)]
pub struct QuizServices {
    clock: Clock,
    settings: QuizSettings,
    storage: Storage,
    bank_service: Arc<BankService>,
    records: Arc<RecordsService>,
}

impl QuizServices {
    /// Build services backed by the process-lifetime in-memory store.
    #[must_use]
    pub fn in_memory(settings: QuizSettings, clock: Clock) -> Self {
        Self::new(settings, clock, Storage::in_memory())
    }

    #[must_use]
    pub fn new(settings: QuizSettings, clock: Clock, storage: Storage) -> Self {
        let records = Arc::new(RecordsService::new(
            Arc::clone(&storage.session_records),
            &settings,
        ));
        Self {
            clock,
            settings,
            storage,
            bank_service: Arc::new(BankService::new()),
            records,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[must_use]
    pub fn bank_service(&self) -> Arc<BankService> {
        Arc::clone(&self.bank_service)
    }

    #[must_use]
    pub fn records(&self) -> Arc<RecordsService> {
        Arc::clone(&self.records)
    }

    /// Load the bank named by the configured location.
    ///
    /// # Errors
    ///
    /// Returns `BankLoadError` if the bank cannot be read or is invalid.
    pub async fn load_default_bank(&self) -> Result<QuestionBank, BankLoadError> {
        let source = BankSource::from(self.settings.bank_location().clone());
        self.bank_service.load(source).await
    }

    /// A fresh controller over `bank` that stores completed sessions here.
    #[must_use]
    pub fn controller(&self, bank: QuestionBank) -> QuizController {
        QuizController::new(
            bank,
            QuizEngine::new(self.clock),
            Arc::clone(&self.storage.session_records),
            self.settings.display_delay(),
        )
    }

    /// Browse `bank` with the configured bank page size.
    #[must_use]
    pub fn browse(&self, bank: &QuestionBank, keyword: &str, requested: usize) -> Page<BankEntry> {
        browse_bank(bank, keyword, self.settings.bank_page_size(), requested)
    }
}
