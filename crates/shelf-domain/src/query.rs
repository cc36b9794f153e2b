//! List criteria: visibility scope, text search, sort and page.

use crate::pagination::{PageRequest, Sort};

/// A field a list query may be ordered by.
///
/// `Default` is the field used when the caller names none or names one the
/// kind does not support.
pub trait SortField: Copy + Default {
    /// Parse a caller-supplied field name (`created_at`, `createdAt`, `name`, ...).
    fn parse(name: &str) -> Option<Self>;
}

/// Raw, unvalidated list parameters as received from the API layer.
#[derive(Debug, Clone, Default)]
pub struct ListCriteria {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Normalized list query over the visible records of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<F> {
    pub page: PageRequest,
    /// Trimmed, non-blank substring matched case-insensitively against the name.
    pub search: Option<String>,
    pub sort_field: F,
    pub sort: Sort,
}

impl<F: SortField> Default for ListQuery<F> {
    fn default() -> Self {
        Self {
            page: PageRequest::default(),
            search: None,
            sort_field: F::default(),
            sort: Sort::Desc,
        }
    }
}

impl<F: SortField> ListQuery<F> {
    /// Normalize raw criteria. Never fails: anything unusable falls back to its default.
    pub fn from_criteria(criteria: &ListCriteria) -> Self {
        let search = criteria
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        let sort_field = criteria
            .sort_by
            .as_deref()
            .and_then(|s| F::parse(s.trim()))
            .unwrap_or_default();
        let sort = criteria
            .sort_order
            .as_deref()
            .map(Sort::from_query)
            .unwrap_or_default();
        Self {
            page: PageRequest::from_query(criteria.page.as_deref(), criteria.page_size.as_deref()),
            search,
            sort_field,
            sort,
        }
    }

    /// Whether `name` passes the text-search filter.
    pub fn matches_name(&self, name: &str) -> bool {
        match &self.search {
            Some(needle) => name.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        }
    }
}
