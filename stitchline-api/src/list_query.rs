//! List query options support.
//!
//! This module provides parsing and validation for the query options shared
//! by every list endpoint: `page`, `per_page`, `sort`, and `dir`, plus the
//! paged response envelope.

use rocket::form::FromForm;
use serde::Serialize;
use ts_rs::TS;

pub const DEFAULT_PER_PAGE: i64 = 25;
pub const MAX_PER_PAGE: i64 = 200;

/// Query options accepted by list endpoints
#[derive(FromForm, Debug, Clone, Default)]
pub struct ListQuery {
    /// 1-based page number
    pub page: Option<i64>,

    /// Rows per page (1..=200, default 25)
    pub per_page: Option<i64>,

    /// Property to sort by (entity-specific; unknown values are rejected
    /// by the endpoint)
    pub sort: Option<String>,

    /// Sort direction: "asc" (default) or "desc"
    pub dir: Option<String>,
}

impl ListQuery {
    /// Validate query options
    pub fn validate(&self) -> Result<(), String> {
        if let Some(page) = self.page {
            if page < 1 {
                return Err("page must be at least 1".to_string());
            }
        }

        if let Some(per_page) = self.per_page {
            if !(1..=MAX_PER_PAGE).contains(&per_page) {
                return Err(format!("per_page must be between 1 and {}", MAX_PER_PAGE));
            }
        }

        if let Some(dir) = &self.dir {
            if !dir.eq_ignore_ascii_case("asc") && !dir.eq_ignore_ascii_case("desc") {
                return Err("dir must be 'asc' or 'desc'".to_string());
            }
        }

        Ok(())
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }

    pub fn direction(&self) -> OrderDirection {
        match &self.dir {
            Some(d) if d.eq_ignore_ascii_case("desc") => OrderDirection::Desc,
            _ => OrderDirection::Asc,
        }
    }

    pub fn sort_key(&self) -> Option<&str> {
        self.sort.as_deref()
    }
}

/// Sort direction for list queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// Paged response envelope returned by list endpoints.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct Page<T: TS> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T: TS> Page<T> {
    pub fn new(items: Vec<T>, total: i64, query: &ListQuery) -> Self {
        let per_page = query.per_page();
        Page {
            items,
            total,
            page: query.page(),
            per_page,
            total_pages: total_pages(total, per_page),
        }
    }
}

/// `ceil(total / per_page)`; zero rows means zero pages.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if total == 0 { 0 } else { (total + per_page - 1) / per_page }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let q = <ListQuery as Default>::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.per_page(), DEFAULT_PER_PAGE);
        assert_eq!(q.offset(), 0);
        assert_eq!(q.direction(), OrderDirection::Asc);
        assert!(q.validate().is_ok());
    }

    #[test]
    fn test_offset_advances_by_page() {
        let q = ListQuery {
            page: Some(3),
            per_page: Some(10),
            ..Default::default()
        };
        assert_eq!(q.offset(), 20);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let q = ListQuery { page: Some(0), ..Default::default() };
        assert!(q.validate().is_err());

        let q = ListQuery { per_page: Some(0), ..Default::default() };
        assert!(q.validate().is_err());

        let q = ListQuery { per_page: Some(MAX_PER_PAGE + 1), ..Default::default() };
        assert!(q.validate().is_err());

        let q = ListQuery { dir: Some("sideways".to_string()), ..Default::default() };
        assert!(q.validate().is_err());
    }

    #[test]
    fn test_direction_is_case_insensitive() {
        let q = ListQuery { dir: Some("DESC".to_string()), ..Default::default() };
        assert_eq!(q.direction(), OrderDirection::Desc);
        assert!(q.validate().is_ok());
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(total_pages(0, 25), 0);
        assert_eq!(total_pages(1, 25), 1);
        assert_eq!(total_pages(25, 25), 1);
        assert_eq!(total_pages(26, 25), 2);
        assert_eq!(total_pages(100, 7), 15);
    }
}
