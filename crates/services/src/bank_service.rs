use std::path::PathBuf;

use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use quiz_core::model::{BankLocation, QuestionBank};
use quiz_core::schema;

use crate::error::BankLoadError;

/// Where a bank's JSON text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankSource {
    Path(PathBuf),
    Url(Url),
    /// Raw file text handed over by an upload.
    Text(String),
}

impl From<BankLocation> for BankSource {
    fn from(location: BankLocation) -> Self {
        match location {
            BankLocation::Path(path) => Self::Path(path),
            BankLocation::Url(url) => Self::Url(url),
        }
    }
}

impl BankSource {
    fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Url(url) => url.to_string(),
            Self::Text(_) => "uploaded text".to_owned(),
        }
    }
}

/// Fetches and parses question banks.
///
/// Loading returns a new bank and never touches the one in use, so a failed
/// load leaves the current quiz untouched.
#[derive(Clone, Default)]
pub struct BankService {
    client: Client,
}

impl BankService {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Read and validate a bank from `source`.
    ///
    /// # Errors
    ///
    /// Returns `BankLoadError::Io` if a file cannot be read,
    /// `BankLoadError::Http`/`HttpStatus` if a URL cannot be fetched, and
    /// `BankLoadError::Import` if the text is not a valid bank.
    pub async fn load(&self, source: BankSource) -> Result<QuestionBank, BankLoadError> {
        let origin = source.describe();
        let text = match source {
            BankSource::Path(path) => {
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|source| BankLoadError::Io {
                        path: path.display().to_string(),
                        source,
                    })?
            }
            BankSource::Url(url) => self.fetch(url).await?,
            BankSource::Text(text) => text,
        };

        let bank = schema::parse_bank(&text).inspect_err(|err| {
            debug!(%origin, error = %err, "bank rejected");
        })?;
        if bank.is_empty() {
            warn!(%origin, "question bank is empty");
        } else {
            info!(%origin, questions = bank.len(), "question bank loaded");
        }
        Ok(bank)
    }

    async fn fetch(&self, url: Url) -> Result<String, BankLoadError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(BankLoadError::HttpStatus(response.status()));
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::schema::{BankImportError, ValidationReason};

    const CANONICAL: &str = r#"[
        {"question": "2+2?", "options": ["3", "4", "5"], "answer": 1},
        {"question": "Capital of France?", "options": ["Rome", "Paris"], "answer": 1}
    ]"#;

    #[tokio::test]
    async fn loads_uploaded_text() {
        let bank = BankService::new()
            .load(BankSource::Text(CANONICAL.to_owned()))
            .await
            .unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.unseen_count(), 2);
    }

    #[tokio::test]
    async fn loads_legacy_text_from_file() {
        let path = std::env::temp_dir().join(format!("quiz-bank-{}.json", std::process::id()));
        tokio::fs::write(
            &path,
            r#"[{"question": "2+2?", "choices": ["3", "4"], "answer": "4"}]"#,
        )
        .await
        .unwrap();

        let loaded = BankService::new().load(BankSource::Path(path.clone())).await;
        let _ = tokio::fs::remove_file(&path).await;

        let bank = loaded.unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.entries()[0].question().answer(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("quiz-bank-does-not-exist.json");
        let err = BankService::new()
            .load(BankSource::Path(path))
            .await
            .unwrap_err();
        assert!(matches!(err, BankLoadError::Io { .. }));
    }

    #[tokio::test]
    async fn invalid_text_reports_position() {
        let err = BankService::new()
            .load(BankSource::Text(
                r#"[{"question": "ok?", "options": ["a", "b"], "answer": 0}, {"question": "bad?"}]"#
                    .to_owned(),
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BankLoadError::Import(BankImportError::Validation { position: 2, .. })
        ));
    }

    #[tokio::test]
    async fn legacy_answer_must_be_a_choice() {
        let err = BankService::new()
            .load(BankSource::Text(
                r#"[{"question": "2+2?", "choices": ["3", "5"], "answer": "4"}]"#.to_owned(),
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BankLoadError::Import(BankImportError::Validation {
                reason: ValidationReason::AnswerNotInChoices(_),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn empty_array_is_an_empty_bank() {
        let bank = BankService::new()
            .load(BankSource::Text("[]".to_owned()))
            .await
            .unwrap();
        assert!(bank.is_empty());
    }

    #[test]
    fn locations_map_to_sources() {
        let url = Url::parse("https://example.com/bank.json").unwrap();
        assert_eq!(
            BankSource::from(BankLocation::Url(url.clone())),
            BankSource::Url(url)
        );
        assert_eq!(
            BankSource::from(BankLocation::Path("mid.json".into())),
            BankSource::Path("mid.json".into())
        );
    }
}
