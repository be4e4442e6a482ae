//! Pagination metadata and paged results

use serde::{Deserialize, Serialize};

/// Server-reported pagination metadata
///
/// Replaced wholesale on every successful fetch — never computed client-side
/// from partial data. Wire form is camelCase, matching the backend envelope
/// `{data, meta: {currentPage, totalPages, totalItems, itemsPerPage}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Current page number (starts at 1)
    pub current_page: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Total number of items (after filters)
    pub total_items: usize,

    /// Number of items per page
    pub items_per_page: usize,
}

impl PageMeta {
    /// Metadata for a snapshot that has not loaded yet
    pub fn initial(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            total_items: 0,
            items_per_page,
        }
    }

    /// Metadata synthesized for endpoints that return a bare JSON array.
    ///
    /// Everything fits on a single page. This mirrors the backend contract
    /// for endpoints that do not paginate and is the canonical fallback, not
    /// a best-effort guess.
    pub fn for_unpaged(len: usize) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_items: len,
            items_per_page: len,
        }
    }

    /// Whether there is a next page
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Whether there is a previous page
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}

/// One page of a collection plus its metadata
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paged<T> {
    /// Wrap items from an endpoint without pagination
    pub fn unpaged(items: Vec<T>) -> Self {
        let meta = PageMeta::for_unpaged(items.len());
        Self { items, meta }
    }
}
