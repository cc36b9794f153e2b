pub mod categories;
pub mod maintenance;
pub mod products;
pub mod users;

use serde::{Deserialize, Serialize};

use shelf_domain::id::SequenceId;
use shelf_domain::pagination::Page;
use shelf_domain::query::ListCriteria;

use crate::error::CatalogError;

// ── Query params ─────────────────────────────────────────────────────────────

/// `?page=&limit=&search=&sortBy=&sortOrder=`. Kept as raw strings so bad
/// numbers fall back to defaults instead of rejecting the request.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl From<ListParams> for ListCriteria {
    fn from(params: ListParams) -> Self {
        ListCriteria {
            page: params.page,
            page_size: params.limit,
            search: params.search,
            sort_by: params.sort_by,
            sort_order: params.sort_order,
        }
    }
}

// ── List envelope ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> ListResponse<T> {
    pub fn from_page<U>(page: Page<U>, to_response: impl FnMut(U) -> T) -> Self {
        let pagination = PaginationMeta {
            total: page.total_count,
            page: page.page_number,
            limit: page.page_size,
            total_pages: page.total_pages(),
        };
        Self {
            data: page.items.into_iter().map(to_response).collect(),
            pagination,
        }
    }
}

/// Parse a path segment as an id of type `I`.
pub fn parse_id<I>(raw: &str) -> Result<I, CatalogError>
where
    I: SequenceId + std::str::FromStr,
{
    raw.parse()
        .map_err(|_| CatalogError::InvalidInput("malformed id"))
}
