//! Pagination engine: partitions an ordered catalog into fixed-size pages.
//!
//! Free functions hold the arithmetic; [`Paginator`] bundles it with the
//! active page index so the picker state can carry one value around.
//! Everything here is total: out-of-range moves saturate instead of failing.

use std::ops::Range;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ============================================================================
// PURE ARITHMETIC
// ============================================================================

/// Number of pages needed for `total_items` rows.
///
/// An empty catalog still has one (empty) page, so a current page index
/// always exists. A zero page size is treated as one.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if total_items == 0 {
        1
    } else {
        total_items.div_ceil(page_size.max(1))
    }
}

/// Half-open `[start, end)` catalog slice covered by `page`.
///
/// Both ends are clamped to `total_items`, so the last page is never
/// over-read and an out-of-range page yields an empty slice.
pub fn bounds(page: usize, page_size: usize, total_items: usize) -> (usize, usize) {
    let page_size = page_size.max(1);
    let start = page.saturating_mul(page_size).min(total_items);
    let end = start.saturating_add(page_size).min(total_items);
    (start, end)
}

/// Next page index, saturating at the last page.
pub fn advance(page: usize, page_count: usize) -> usize {
    let last = page_count.saturating_sub(1);
    page.saturating_add(1).min(last)
}

/// Previous page index, saturating at the first page.
pub fn retreat(page: usize) -> usize {
    page.saturating_sub(1)
}

// ============================================================================
// PAGINATOR
// ============================================================================

/// Active page over a catalog of fixed length.
///
/// Invariant: `page < total_pages()`. Fields are private so the only way
/// to move is through [`Paginator::next_page`] / [`Paginator::prev_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    total_items: usize,
    total_pages: usize,
    page: usize,
}

impl Paginator {
    /// Start on the first page.
    pub fn new(total_items: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Paginator {
            page_size,
            total_items,
            total_pages: total_pages(total_items, page_size),
            page: 0,
        }
    }

    /// Zero-based index of the active page.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Catalog bounds of the active page.
    pub fn bounds(&self) -> (usize, usize) {
        bounds(self.page, self.page_size, self.total_items)
    }

    /// Catalog indices of the active page, for slicing.
    pub fn range(&self) -> Range<usize> {
        let (start, end) = self.bounds();
        start..end
    }

    /// Number of rows on the active page. Only the last page may be short.
    pub fn items_on_page(&self) -> usize {
        let (start, end) = self.bounds();
        end - start
    }

    pub fn on_first_page(&self) -> bool {
        self.page == 0
    }

    pub fn on_last_page(&self) -> bool {
        self.page + 1 >= self.total_pages
    }

    /// Move forward one page. Returns false when already on the last page.
    pub fn next_page(&mut self) -> bool {
        let next = advance(self.page, self.total_pages);
        let moved = next != self.page;
        self.page = next;
        moved
    }

    /// Move back one page. Returns false when already on the first page.
    pub fn prev_page(&mut self) -> bool {
        let prev = retreat(self.page);
        let moved = prev != self.page;
        self.page = prev;
        moved
    }
}

// ============================================================================
// TESTS
// ============================================================================
