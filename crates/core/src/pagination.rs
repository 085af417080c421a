//! Page slicing shared by bank browsing, record browsing and answer details.
//!
//! There is always at least one page, and a requested page number is clamped
//! into `1..=total_pages` before slicing. Callers must read the resolved page
//! number back from the result instead of assuming the request was honoured.

use std::num::NonZeroUsize;
use std::ops::Range;

use serde::Serialize;

/// Resolved position of one page within a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
    start: usize,
    end: usize,
}

impl PageWindow {
    /// Clamp `requested` and compute the slice bounds for a collection of `total_items`.
    #[must_use]
    pub fn resolve(total_items: usize, page_size: NonZeroUsize, requested: usize) -> Self {
        let size = page_size.get();
        let total_pages = total_items.div_ceil(size).max(1);
        let page = requested.clamp(1, total_pages);
        let start = ((page - 1) * size).min(total_items);
        let end = start.saturating_add(size).min(total_items);
        Self {
            page,
            total_pages,
            total_items,
            page_size: size,
            start,
            end,
        }
    }

    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Offset of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.start
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// One page of items plus its window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, window: PageWindow) -> Self {
        Self { items, window }
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.window.page
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.window.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            window: self.window,
        }
    }
}

/// Slice `items` into the clamped page `requested` of `page_size`.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page_size: NonZeroUsize, requested: usize) -> Page<T> {
    let window = PageWindow::resolve(items.len(), page_size, requested);
    Page::new(items[window.range()].to_vec(), window)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn empty_collection_has_one_empty_page() {
        let page = paginate::<u32>(&[], size(5), 3);
        assert_eq!(page.page(), 1);
        assert_eq!(page.total_pages(), 1);
        assert!(page.items.is_empty());
        assert!(!page.window.has_next());
    }

    #[test]
    fn counts_partial_last_page() {
        let items: Vec<u32> = (1..=12).collect();
        let page = paginate(&items, size(5), 3);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.items, vec![11, 12]);
        assert!(page.window.has_previous());
        assert!(!page.window.has_next());
    }

    #[test]
    fn clamps_page_past_the_end_and_zero() {
        let items: Vec<u32> = (1..=7).collect();
        let last = paginate(&items, size(5), 2);
        let beyond = paginate(&items, size(5), 99);
        assert_eq!(beyond, last);

        let zero = paginate(&items, size(5), 0);
        assert_eq!(zero.page(), 1);
        assert_eq!(zero.items, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn single_item_pages_reconstruct_sequence() {
        let items = vec!["a", "b", "c", "d"];
        let first = paginate(&items, size(1), 1);
        let rebuilt: Vec<&str> = (1..=first.total_pages())
            .flat_map(|n| paginate(&items, size(1), n).items)
            .collect();
        assert_eq!(rebuilt, items);
    }

    #[test]
    fn window_offset_and_len() {
        let window = PageWindow::resolve(11, size(5), 2);
        assert_eq!(window.offset(), 5);
        assert_eq!(window.len(), 5);
        assert_eq!(window.range(), 5..10);
    }

    #[test]
    fn map_keeps_window() {
        let page = paginate(&[1, 2, 3], size(2), 1).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total_pages(), 2);
    }
}
