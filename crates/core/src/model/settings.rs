use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default bank file looked up next to the binary.
pub const DEFAULT_BANK_LOCATION: &str = "mid.json";
pub const DEFAULT_DISPLAY_DELAY_MS: u64 = 1_000;
pub const MAX_DISPLAY_DELAY_MS: u64 = 60_000;
pub const DEFAULT_BANK_PAGE_SIZE: usize = 1;
pub const DEFAULT_RECORD_PAGE_SIZE: usize = 5;
pub const DEFAULT_DETAIL_PAGE_SIZE: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSettingsError {
    #[error("bank location cannot be empty")]
    EmptyBankLocation,

    #[error("invalid bank URL: {0}")]
    InvalidBankUrl(String),

    #[error("{field} page size must be > 0")]
    InvalidPageSize { field: &'static str },

    #[error("display delay must be at most {MAX_DISPLAY_DELAY_MS} ms, got {0} ms")]
    DisplayDelayTooLong(u64),
}

/// Where the default question bank comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankLocation {
    Path(PathBuf),
    Url(Url),
}

impl BankLocation {
    /// Interpret `raw` as a URL when it has an http(s) scheme, otherwise as a file path.
    ///
    /// # Errors
    ///
    /// Returns `QuizSettingsError::EmptyBankLocation` for blank input and
    /// `QuizSettingsError::InvalidBankUrl` for a malformed http(s) URL.
    pub fn parse(raw: &str) -> Result<Self, QuizSettingsError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QuizSettingsError::EmptyBankLocation);
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Url::parse(trimmed)
                .map(Self::Url)
                .map_err(|_| QuizSettingsError::InvalidBankUrl(trimmed.to_owned()));
        }
        Ok(Self::Path(PathBuf::from(trimmed)))
    }
}

/// Runtime configuration for the quiz runner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizSettings {
    bank_location: BankLocation,
    display_delay: Duration,
    bank_page_size: NonZeroUsize,
    record_page_size: NonZeroUsize,
    detail_page_size: NonZeroUsize,
}

/// Unvalidated settings as gathered from flags and environment.
#[derive(Clone, Debug, Default)]
pub struct QuizSettingsDraft {
    pub bank_location: Option<String>,
    pub display_delay_ms: Option<u64>,
    pub bank_page_size: Option<usize>,
    pub record_page_size: Option<usize>,
    pub detail_page_size: Option<usize>,
}

impl QuizSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill unset fields and validate.
    ///
    /// # Errors
    ///
    /// Returns `QuizSettingsError` if the bank location is blank or a malformed
    /// URL, a page size is zero, or the display delay exceeds the maximum.
    pub fn validate(self) -> Result<QuizSettings, QuizSettingsError> {
        let bank_location = BankLocation::parse(
            self.bank_location
                .as_deref()
                .unwrap_or(DEFAULT_BANK_LOCATION),
        )?;

        let delay_ms = self.display_delay_ms.unwrap_or(DEFAULT_DISPLAY_DELAY_MS);
        if delay_ms > MAX_DISPLAY_DELAY_MS {
            return Err(QuizSettingsError::DisplayDelayTooLong(delay_ms));
        }

        Ok(QuizSettings {
            bank_location,
            display_delay: Duration::from_millis(delay_ms),
            bank_page_size: page_size(self.bank_page_size, DEFAULT_BANK_PAGE_SIZE, "bank")?,
            record_page_size: page_size(
                self.record_page_size,
                DEFAULT_RECORD_PAGE_SIZE,
                "record",
            )?,
            detail_page_size: page_size(
                self.detail_page_size,
                DEFAULT_DETAIL_PAGE_SIZE,
                "detail",
            )?,
        })
    }
}

fn page_size(
    value: Option<usize>,
    default: usize,
    field: &'static str,
) -> Result<NonZeroUsize, QuizSettingsError> {
    NonZeroUsize::new(value.unwrap_or(default)).ok_or(QuizSettingsError::InvalidPageSize { field })
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            bank_location: BankLocation::Path(PathBuf::from(DEFAULT_BANK_LOCATION)),
            display_delay: Duration::from_millis(DEFAULT_DISPLAY_DELAY_MS),
            bank_page_size: NonZeroUsize::MIN,
            record_page_size: NonZeroUsize::new(DEFAULT_RECORD_PAGE_SIZE)
                .unwrap_or(NonZeroUsize::MIN),
            detail_page_size: NonZeroUsize::new(DEFAULT_DETAIL_PAGE_SIZE)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl QuizSettings {
    #[must_use]
    pub fn bank_location(&self) -> &BankLocation {
        &self.bank_location
    }

    /// Pause between showing the correctness of an answer and the next question.
    #[must_use]
    pub fn display_delay(&self) -> Duration {
        self.display_delay
    }

    #[must_use]
    pub fn with_display_delay(mut self, delay: Duration) -> Self {
        self.display_delay = delay;
        self
    }

    #[must_use]
    pub fn bank_page_size(&self) -> NonZeroUsize {
        self.bank_page_size
    }

    #[must_use]
    pub fn record_page_size(&self) -> NonZeroUsize {
        self.record_page_size
    }

    #[must_use]
    pub fn detail_page_size(&self) -> NonZeroUsize {
        self.detail_page_size
    }
}
