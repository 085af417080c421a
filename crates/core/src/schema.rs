//! JSON question-bank import.
//!
//! Two layouts are accepted per element:
//!
//! | Layout    | Options key | `answer`                         |
//! |-----------|-------------|----------------------------------|
//! | canonical | `options`   | integer index into `options`     |
//! | legacy    | `choices`   | literal text of the correct choice |
//!
//! Legacy elements are migrated to the canonical [`Question`] by locating the
//! answer text among the choices. Import is all-or-nothing: the first invalid
//! element rejects the whole array.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{Question, QuestionBank, QuestionError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankImportError {
    #[error("bank is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("bank must be a JSON array of questions")]
    NotAnArray,

    #[error("question #{position}: {reason}")]
    Validation {
        /// 1-based position of the offending element.
        position: usize,
        reason: ValidationReason,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationReason {
    #[error("element is not an object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("answer `{0}` is not one of the choices")]
    AnswerNotInChoices(String),

    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// Which layout an element was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Canonical,
    Legacy,
}

/// Parse and validate a bank from raw JSON text.
///
/// # Errors
///
/// Returns `BankImportError::Parse` for malformed JSON, `NotAnArray` when the
/// top level is not an array, and `Validation` for the first bad element.
pub fn parse_bank(text: &str) -> Result<QuestionBank, BankImportError> {
    let value: Value = serde_json::from_str(text)?;
    Ok(QuestionBank::from_questions(questions_from_value(&value)?))
}

/// Validate an already-parsed JSON value into questions.
///
/// # Errors
///
/// Same as [`parse_bank`] minus `Parse`.
pub fn questions_from_value(value: &Value) -> Result<Vec<Question>, BankImportError> {
    let items = value.as_array().ok_or(BankImportError::NotAnArray)?;
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            question_from_item(item).map_err(|reason| BankImportError::Validation {
                position: idx + 1,
                reason,
            })
        })
        .collect()
}

/// Detect the layout of a single element.
///
/// # Errors
///
/// Returns `ValidationReason::MissingField("options")` when neither key is present.
pub fn detect_kind(object: &Map<String, Value>) -> Result<SchemaKind, ValidationReason> {
    if object.contains_key("options") {
        Ok(SchemaKind::Canonical)
    } else if object.contains_key("choices") {
        Ok(SchemaKind::Legacy)
    } else {
        Err(ValidationReason::MissingField("options"))
    }
}

fn question_from_item(item: &Value) -> Result<Question, ValidationReason> {
    let object = item.as_object().ok_or(ValidationReason::NotAnObject)?;
    let text = string_field(object, "question")?;

    match detect_kind(object)? {
        SchemaKind::Canonical => {
            let options = string_list_field(object, "options")?;
            let answer = required(object, "answer")?;
            let index = answer.as_u64().ok_or(ValidationReason::WrongType {
                field: "answer",
                expected: "a non-negative integer index",
            })?;
            let index = usize::try_from(index).unwrap_or(usize::MAX);
            Ok(Question::new(text, options, index)?)
        }
        SchemaKind::Legacy => {
            let choices = string_list_field(object, "choices")?;
            let answer = string_field(object, "answer")?;
            let index = choices
                .iter()
                .position(|choice| *choice == answer)
                .ok_or(ValidationReason::AnswerNotInChoices(answer))?;
            Ok(Question::new(text, choices, index)?)
        }
    }
}

fn required<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, ValidationReason> {
    object
        .get(field)
        .ok_or(ValidationReason::MissingField(field))
}

fn string_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<String, ValidationReason> {
    required(object, field)?
        .as_str()
        .map(str::to_owned)
        .ok_or(ValidationReason::WrongType {
            field,
            expected: "a string",
        })
}

fn string_list_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, ValidationReason> {
    let wrong_type = ValidationReason::WrongType {
        field,
        expected: "an array of strings",
    };
    let items = required(object, field)?
        .as_array()
        .ok_or_else(|| wrong_type.clone())?;
    items
        .iter()
        .map(|v| v.as_str().map(str::to_owned).ok_or_else(|| wrong_type.clone()))
        .collect()
}
