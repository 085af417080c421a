use serde::Serialize;

use crate::model::ids::QuestionId;
use crate::model::question::Question;
use crate::search::Keyword;

/// A question together with its per-session "seen" marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankEntry {
    id: QuestionId,
    question: Question,
    seen: bool,
}

impl BankEntry {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }

    #[must_use]
    pub fn is_seen(&self) -> bool {
        self.seen
    }
}

/// Ordered collection of questions; the only owner of the `seen` flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    entries: Vec<BankEntry>,
}

impl QuestionBank {
    /// Build a bank with every entry unseen. Ids follow input order.
    #[must_use]
    pub fn from_questions(questions: Vec<Question>) -> Self {
        let entries = questions
            .into_iter()
            .zip(0_u64..)
            .map(|(question, idx)| BankEntry {
                id: QuestionId::new(idx),
                question,
                seen: false,
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[BankEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&BankEntry> {
        self.entries.get(id.index())
    }

    /// Clear every `seen` flag.
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.seen = false;
        }
    }

    /// Entries not yet presented in the current session, in bank order.
    #[must_use]
    pub fn unseen(&self) -> Vec<&BankEntry> {
        self.entries.iter().filter(|entry| !entry.seen).collect()
    }

    #[must_use]
    pub fn unseen_count(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.seen).count()
    }

    /// Mark an entry as presented and answered.
    ///
    /// Returns `false` when the id is unknown or the entry was already seen.
    pub fn mark_seen(&mut self, id: QuestionId) -> bool {
        match self.entries.get_mut(id.index()) {
            Some(entry) if !entry.seen => {
                entry.seen = true;
                true
            }
            _ => false,
        }
    }

    /// Entries whose question text or options match `keyword`, in bank order.
    #[must_use]
    pub fn search(&self, keyword: &str) -> Vec<&BankEntry> {
        let keyword = Keyword::new(keyword);
        self.entries
            .iter()
            .filter(|entry| keyword.matches(&entry.question))
            .collect()
    }
}
