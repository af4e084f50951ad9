//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Hard cap on page size, regardless of what the client asks for.
pub const MAX_PER_PAGE: u32 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    25
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * self.limit()
    }

    /// Returns the capped limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page.clamp(1, MAX_PER_PAGE))
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(u64::from(per_page))
        };

        Self {
            data,
            meta: PageMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_for_first_page() {
        let req = PageRequest {
            page: 1,
            per_page: 25,
        };
        assert_eq!(req.offset(), 0);
        assert_eq!(req.limit(), 25);
    }

    #[test]
    fn offset_advances_by_capped_limit() {
        let req = PageRequest {
            page: 3,
            per_page: 500,
        };
        // per_page is capped at MAX_PER_PAGE before computing the offset
        assert_eq!(req.limit(), u64::from(MAX_PER_PAGE));
        assert_eq!(req.offset(), 2 * u64::from(MAX_PER_PAGE));
    }

    #[test]
    fn page_zero_is_treated_as_first_page() {
        let req = PageRequest {
            page: 0,
            per_page: 10,
        };
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn empty_result_set_has_one_page() {
        let resp: PageResponse<u8> = PageResponse::new(vec![], 1, 25, 0);
        assert_eq!(resp.meta.total_pages, 1);
        assert_eq!(resp.meta.total, 0);
    }

    #[test]
    fn total_pages_rounds_up() {
        let resp: PageResponse<u8> = PageResponse::new(vec![], 1, 25, 51);
        assert_eq!(resp.meta.total_pages, 3);
    }
}
