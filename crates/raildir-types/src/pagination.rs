//! Pagination metadata and page arithmetic.

use serde::{Deserialize, Serialize};

/// Default page number for listing operations.
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size for listing operations.
pub const DEFAULT_LIMIT: u32 = 50;

/// Page and page size requested from a listing endpoint.
///
/// Values are passed to the backend as-is; the backend is authoritative on
/// bounds, so nothing here clamps them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub limit: u32,
}

impl PageRequest {
    /// Creates a request for `page` with `limit` items per page.
    #[must_use]
    pub const fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Creates a request for `page` with the default page size.
    #[must_use]
    pub const fn page(page: u32) -> Self {
        Self::new(page, DEFAULT_LIMIT)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

/// Pagination block of a paginated response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page (1-based).
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Item count across all pages.
    pub total: u64,
    /// `ceil(total / limit)`.
    pub total_pages: u32,
}

impl PaginationMeta {
    /// Builds metadata for `page` of a result set of `total` items.
    #[must_use]
    pub fn from_total(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }

    /// Metadata for a result that holds exactly one item.
    #[must_use]
    pub const fn single() -> Self {
        Self {
            page: 1,
            limit: 1,
            total: 1,
            total_pages: 1,
        }
    }

    /// Whether previous/next controls should be shown at all.
    #[must_use]
    pub const fn shows_controls(&self) -> bool {
        self.total_pages > 1
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Page number behind the "Previous" control, if it is enabled.
    #[must_use]
    pub const fn previous_page(&self) -> Option<u32> {
        if self.has_previous() {
            Some(self.page - 1)
        } else {
            None
        }
    }

    /// Page number behind the "Next" control, if it is enabled.
    #[must_use]
    pub const fn next_page(&self) -> Option<u32> {
        if self.has_next() {
            Some(self.page + 1)
        } else {
            None
        }
    }

    /// Checks the response invariants for a page holding `len` items:
    /// `len <= limit` and `1 <= page <= max(1, total_pages)`.
    #[must_use]
    pub fn is_consistent_with(&self, len: usize) -> bool {
        let fits = u64::try_from(len).map_or(false, |len| len <= u64::from(self.limit));
        fits && self.page >= 1 && self.page <= self.total_pages.max(1)
    }
}

/// One page of results.
///
/// Deserializes directly from the backend's `{ success, data, pagination }`
/// envelope; the `success` flag is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Position of this page in the full result set.
    pub pagination: PaginationMeta,
}

impl<T> Paginated<T> {
    /// Wraps a single item as a one-item page.
    #[must_use]
    pub fn single(item: T) -> Self {
        Self {
            data: vec![item],
            pagination: PaginationMeta::single(),
        }
    }
}
