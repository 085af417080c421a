use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position of a question within its bank (0-based).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(u64);

impl QuestionId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Index into the owning bank's entry list.
    #[must_use]
    pub fn index(&self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }

    /// 1-based number shown to users.
    #[must_use]
    pub fn ordinal(&self) -> u64 {
        self.0.saturating_add(1)
    }
}

/// Sequence number of a stored session summary, starting at 1.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(u64);

impl RecordId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ordinal())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        Ok(Self(digits.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_id_displays_one_based() {
        let id = QuestionId::new(0);
        assert_eq!(id.to_string(), "1");
        assert_eq!(id.index(), 0);
    }

    #[test]
    fn record_id_parses_with_or_without_hash() {
        assert_eq!("#3".parse::<RecordId>().unwrap(), RecordId::new(3));
        assert_eq!(" 12 ".parse::<RecordId>().unwrap(), RecordId::new(12));
        assert!("abc".parse::<RecordId>().is_err());
        assert_eq!(RecordId::new(7).to_string(), "#7");
    }
}
