//! Pagination over the filtered game list.
//!
//! Pages are 1-indexed and hold `PAGE_SIZE` games. The current page is always
//! within `[1, total_pages]`, and replacing the underlying item count resets it
//! to page 1.

use std::ops::Range;

/// Games shown per page
pub const PAGE_SIZE: usize = 12;

/// Number of page buttons shown at once
pub const WINDOW: usize = 5;

/// Page position over a list of `total_items`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    total_items: usize,
    current: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Paginator {
    pub fn new(total_items: usize) -> Self {
        Self {
            total_items,
            current: 1,
        }
    }

    /// Replace the item count and go back to page 1
    pub fn reset(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current = 1;
    }

    /// Total page count, at least 1 even when there are no items
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(PAGE_SIZE).max(1)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Jump to `page`, clamped to `[1, total_pages]`
    pub fn go_to(&mut self, page: usize) {
        self.current = page.clamp(1, self.total_pages());
    }

    /// Advance one page. No-op on the last page.
    pub fn next(&mut self) {
        if self.current < self.total_pages() {
            self.current += 1;
        }
    }

    /// Go back one page. No-op on the first page.
    pub fn previous(&mut self) {
        if self.current > 1 {
            self.current -= 1;
        }
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    /// Index range of the current page's items
    pub fn range(&self) -> Range<usize> {
        let start = ((self.current - 1) * PAGE_SIZE).min(self.total_items);
        let end = (start + PAGE_SIZE).min(self.total_items);
        start..end
    }

    /// Slice of `items` on the current page
    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        &items[range.start.min(items.len())..range.end.min(items.len())]
    }

    /// Page numbers to show as buttons
    pub fn window(&self) -> Vec<usize> {
        page_window(self.current, self.total_pages())
    }
}

/// Compute the visible page numbers for a bounded set of `WINDOW` buttons.
///
/// Shows every page when there are at most `WINDOW`. Otherwise the window is
/// pinned to the start for pages 1-3, pinned to the end for the last three
/// pages, and centred on `current` in between.
pub fn page_window(current: usize, total: usize) -> Vec<usize> {
    if total <= WINDOW {
        return (1..=total).collect();
    }

    let half = WINDOW / 2;
    let first = if current <= half + 1 {
        1
    } else if current + half >= total {
        total + 1 - WINDOW
    } else {
        current - half
    };

    (first..first + WINDOW).collect()
}
