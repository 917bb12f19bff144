//! Pagination helpers and the standard list envelope.
//!
//! Paginated endpoints accept `?page=&per_page=` and respond with
//! `{items, total, page, per_page, total_pages}`. The helpers here clamp
//! user input to sane bounds and compute the derived fields.

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints.
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Maximum page size for list endpoints.
pub const MAX_PER_PAGE: i64 = 100;

/// Raw pagination query parameters (`?page=&per_page=`).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageParams {
    /// Clamp to valid bounds: `page >= 1`, `1 <= per_page <= max`.
    pub fn clamp(self, default_per_page: i64, max_per_page: i64) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(default_per_page)
            .max(1)
            .min(max_per_page);
        (page, per_page)
    }

    /// Clamp with the standard defaults and return `(limit, offset, page, per_page)`.
    pub fn to_limit_offset(self) -> (i64, i64, i64, i64) {
        let (page, per_page) = self.clamp(DEFAULT_PER_PAGE, MAX_PER_PAGE);
        (per_page, (page - 1) * per_page, page, per_page)
    }
}

/// Standard paginated response envelope.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T: Serialize> Page<T> {
    /// Build the envelope; `total_pages = ceil(total / per_page)`.
    pub fn new(items: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        Self {
            items,
            total,
            page,
            per_page,
            total_pages: total_pages(total, per_page),
        }
    }
}

/// Number of pages needed to hold `total` items at `per_page` each.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if per_page <= 0 {
        return 0;
    }
    (total + per_page - 1) / per_page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_defaults() {
        let (page, per_page) = PageParams::default().clamp(DEFAULT_PER_PAGE, MAX_PER_PAGE);
        assert_eq!(page, 1);
        assert_eq!(per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn clamp_floors_page_at_one() {
        let params = PageParams {
            page: Some(0),
            per_page: Some(-3),
        };
        let (page, per_page) = params.clamp(DEFAULT_PER_PAGE, MAX_PER_PAGE);
        assert_eq!(page, 1);
        assert_eq!(per_page, 1);
    }

    #[test]
    fn clamp_caps_per_page_at_max() {
        let params = PageParams {
            page: Some(3),
            per_page: Some(1000),
        };
        let (page, per_page) = params.clamp(DEFAULT_PER_PAGE, MAX_PER_PAGE);
        assert_eq!(page, 3);
        assert_eq!(per_page, MAX_PER_PAGE);
    }

    #[test]
    fn limit_offset_from_page() {
        let params = PageParams {
            page: Some(3),
            per_page: Some(10),
        };
        let (limit, offset, page, per_page) = params.to_limit_offset();
        assert_eq!(limit, 10);
        assert_eq!(offset, 20);
        assert_eq!(page, 3);
        assert_eq!(per_page, 10);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(41, 20), 3);
    }

    #[test]
    fn total_pages_zero_per_page_is_zero() {
        assert_eq!(total_pages(10, 0), 0);
    }
}
