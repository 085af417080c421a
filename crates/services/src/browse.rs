use std::num::NonZeroUsize;

use quiz_core::model::{BankEntry, QuestionBank};
use quiz_core::pagination::{Page, paginate};

/// Filter the bank by `keyword`, then return page `requested` (clamped).
///
/// A blank keyword browses the whole bank. Entries keep bank order.
#[must_use]
pub fn browse_bank(
    bank: &QuestionBank,
    keyword: &str,
    page_size: NonZeroUsize,
    requested: usize,
) -> Page<BankEntry> {
    let matches = bank.search(keyword);
    paginate(&matches, page_size, requested).map(BankEntry::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Question;

    fn bank() -> QuestionBank {
        QuestionBank::from_questions(
            ["2+2?", "Capital of France?", "3+3?", "Largest ocean?"]
                .into_iter()
                .map(|text| Question::new(text, vec!["a".into(), "b".into()], 0).unwrap())
                .collect(),
        )
    }

    fn one() -> NonZeroUsize {
        NonZeroUsize::MIN
    }

    #[test]
    fn blank_keyword_browses_everything() {
        let bank = bank();
        let page = browse_bank(&bank, "  \t", one(), 1);
        assert_eq!(page.total_pages(), 4);
        assert_eq!(page.items[0].question().text(), "2+2?");
    }

    #[test]
    fn single_item_pages_reconstruct_the_bank() {
        let bank = bank();
        let first = browse_bank(&bank, "", one(), 1);
        let texts: Vec<String> = (1..=first.total_pages())
            .flat_map(|n| browse_bank(&bank, "", one(), n).items)
            .map(|entry| entry.question().text().to_owned())
            .collect();
        let expected: Vec<String> = bank
            .entries()
            .iter()
            .map(|entry| entry.question().text().to_owned())
            .collect();
        assert_eq!(texts, expected);
    }

    #[test]
    fn keyword_filters_before_paging() {
        let bank = bank();
        let page = browse_bank(&bank, "+ 3", one(), 7);
        assert_eq!(page.total_pages(), 1);
        assert_eq!(page.page(), 1);
        assert_eq!(page.items[0].question().text(), "3+3?");
    }

    #[test]
    fn no_matches_yield_one_empty_page() {
        let bank = bank();
        let page = browse_bank(&bank, "volcano", one(), 2);
        assert_eq!(page.page(), 1);
        assert!(page.items.is_empty());
    }
}
