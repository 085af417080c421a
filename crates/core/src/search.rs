//! Keyword search over question text and options.
//!
//! Matching is case-insensitive and ignores whitespace entirely, so
//! `"two plus"` finds `"TwoPlus two?"`. A blank keyword matches everything.

use crate::model::Question;

/// Lowercase `text` and drop every whitespace character.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A normalized keyword, ready to test many questions against.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Keyword(String);

impl Keyword {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    /// True when the keyword is empty after normalization (match-all).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        if self.is_blank() {
            return true;
        }
        normalize(question.text()).contains(&self.0)
            || question
                .options()
                .iter()
                .any(|option| normalize(option).contains(&self.0))
    }
}

/// True if `question` matches the raw `keyword`.
#[must_use]
pub fn matches(question: &Question, keyword: &str) -> bool {
    Keyword::new(keyword).matches(question)
}

/// Keep the items whose question matches `keyword`, preserving order.
pub fn filter<'a, T, F>(items: &'a [T], keyword: &str, question_of: F) -> Vec<&'a T>
where
    F: Fn(&T) -> &Question,
{
    let keyword = Keyword::new(keyword);
    items
        .iter()
        .filter(|item| keyword.matches(question_of(item)))
        .collect()
}
