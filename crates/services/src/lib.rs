#![forbid(unsafe_code)]

pub mod app_services;
pub mod bank_service;
pub mod browse;
pub mod error;
pub mod quiz;
pub mod records;

pub use quiz_core::Clock;

pub use app_services::QuizServices;
pub use bank_service::{BankService, BankSource};
pub use browse::browse_bank;
pub use error::{BankLoadError, QuizError, RecordsError};
pub use quiz::{QuizController, QuizEngine, QuizEvent, QuizPhase, QuizProgress};
pub use records::{RecordListItem, RecordsService};
