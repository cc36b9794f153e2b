//! Pagination and sort direction types.

use serde::{Deserialize, Serialize};

/// Generic sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sort {
    #[default]
    Desc,
    Asc,
}

impl Sort {
    /// `"asc"` in any case selects ascending; anything else is descending.
    pub fn from_query(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest page or page size a query can carry. Storage addresses rows with
/// signed 64-bit offsets, so larger numeric values saturate here.
pub const MAX_QUERY_VALUE: u64 = i64::MAX as u64;

/// Pagination parameters shared across all list operations.
///
/// - `page_size`: ≥ 1, default 10
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page_size", rename = "page-size")]
    pub page_size: u64,
    #[serde(default = "default_page")]
    pub page: u64,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn default_page() -> u64 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            page: default_page(),
        }
    }
}

impl PageRequest {
    /// Build from raw query-string values. Missing, non-numeric and
    /// non-positive values fall back to the defaults instead of failing.
    pub fn from_query(page: Option<&str>, page_size: Option<&str>) -> Self {
        fn positive(raw: Option<&str>) -> Option<u64> {
            let digits = raw?.trim();
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            // Only overflow can fail here.
            let value = digits.parse::<u64>().unwrap_or(u64::MAX);
            (value > 0).then_some(value)
        }
        Self {
            page_size: positive(page_size).unwrap_or_else(default_page_size),
            page: positive(page).unwrap_or_else(default_page),
        }
        .clamped()
    }

    /// Clamp both fields to `1..=MAX_QUERY_VALUE`.
    pub fn clamped(self) -> Self {
        Self {
            page_size: self.page_size.clamp(1, MAX_QUERY_VALUE),
            page: self.page.clamp(1, MAX_QUERY_VALUE),
        }
    }

    /// Number of records skipped before this page.
    pub fn offset(self) -> u64 {
        let PageRequest { page_size, page } = self.clamped();
        (page - 1).saturating_mul(page_size).min(MAX_QUERY_VALUE)
    }

    pub fn limit(self) -> u64 {
        self.clamped().page_size
    }
}

/// One page of a filtered, sorted result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Size of the filtered set before pagination.
    pub total_count: u64,
    pub page_number: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        let request = request.clamped();
        Self {
            items,
            total_count,
            page_number: request.page,
            page_size: request.page_size,
        }
    }

    /// `ceil(total_count / page_size)`.
    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(self.page_size.max(1))
    }
}
