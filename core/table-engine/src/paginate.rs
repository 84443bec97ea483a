//! FILENAME: core/table-engine/src/paginate.rs
//! Table Paginator - Fixed-size windows over the filtered set.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// `ceil(count / size)`; zero when either is zero.
pub fn total_pages(count: usize, size: usize) -> usize {
    if size == 0 {
        0
    } else {
        count.div_ceil(size)
    }
}

/// A 1-based page index clamped to `[1, total_pages]`.
/// With no pages at all the index stays at 1 and every window is empty.
pub fn clamp_page_index(index: usize, count: usize, size: usize) -> usize {
    index.clamp(1, total_pages(count, size).max(1))
}

/// The slice of `items` shown on page `index` (1-based, clamped).
pub fn paginate<T>(items: &[T], size: usize, index: usize) -> &[T] {
    &items[Page::new(index, size, items.len()).range()]
}

/// `{index, size, totalItems}` for one window of the filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// 1-based
    pub index: usize,
    pub size: usize,
    pub total_items: usize,
}

impl Page {
    pub fn new(index: usize, size: usize, total_items: usize) -> Self {
        Page {
            index: clamp_page_index(index, total_items, size),
            size,
            total_items,
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.size)
    }

    /// Offset of the first row of this page in the filtered set.
    pub fn start(&self) -> usize {
        (self.index - 1) * self.size
    }

    /// Positions in the filtered set covered by this page.
    pub fn range(&self) -> Range<usize> {
        if self.total_pages() == 0 {
            return 0..0;
        }
        let start = self.start().min(self.total_items);
        let end = (start + self.size).min(self.total_items);
        start..end
    }

    pub fn len(&self) -> usize {
        self.range().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(index - 1) * size + row`, or None when `row` is not on this page.
    pub fn absolute_index(&self, row: usize) -> Option<usize> {
        (row < self.len()).then(|| self.start() + row)
    }

    pub fn has_previous(&self) -> bool {
        self.index > 1
    }

    pub fn has_next(&self) -> bool {
        self.index < self.total_pages()
    }
}
