//! Pagination-related DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};
use crate::models::UserSearch;

/// Page size used when `limit` is not supplied
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Larger `limit` values are capped to this
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters for `GET /api/users`.
///
/// Numbers are taken as raw strings so that malformed values produce the
/// same 400 messages as out-of-range ones.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Username glob, `*` matches any run of characters
    #[param(example = "ad*")]
    pub username: Option<String>,

    /// Email glob, `*` matches any run of characters
    #[param(example = "*@example.com")]
    pub email: Option<String>,

    /// Page size (default 20, capped at 100)
    #[param(value_type = Option<u32>, minimum = 1, example = 20)]
    pub limit: Option<String>,

    /// Page number (1-based)
    #[param(value_type = Option<u32>, minimum = 1, example = 1)]
    pub page: Option<String>,
}

impl SearchParams {
    pub fn into_search(self) -> AppResult<UserSearch> {
        let page_size = parse_positive(self.limit.as_deref(), DEFAULT_PAGE_SIZE)
            .ok_or_else(|| AppError::bad_request("page size must be a positive number"))?
            .min(MAX_PAGE_SIZE);

        let page = parse_positive(self.page.as_deref(), 1)
            .ok_or_else(|| AppError::bad_request("page must be a positive number"))?;

        Ok(UserSearch {
            username: glob_or_all(self.username),
            email: glob_or_all(self.email),
            page_size,
            page,
        })
    }
}

/// `None` when the value is present but not a positive integer.
fn parse_positive(raw: Option<&str>, default: u32) -> Option<u32> {
    let Some(raw) = raw else {
        return Some(default);
    };

    match raw.parse::<i64>() {
        Ok(n) if n > 0 => Some(u32::try_from(n).unwrap_or(u32::MAX)),
        _ => None,
    }
}

fn glob_or_all(filter: Option<String>) -> String {
    filter
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "*".to_string())
}

/// Generic paged response wrapper.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PagedResponse<T> {
    /// The data items for this page
    pub data: Vec<T>,

    pub pagination: PageMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    /// Current page number (1-based)
    #[schema(example = 1)]
    pub page: u32,

    /// Effective page size after capping
    #[schema(example = 20)]
    pub page_size: u32,

    /// Largest page size the server accepts
    #[schema(example = 100)]
    pub max_size: u32,

    /// Total number of matches across all pages
    #[schema(example = 42)]
    pub total: u64,

    #[schema(example = 3)]
    pub total_pages: u64,

    #[schema(example = true)]
    pub has_next: bool,

    #[schema(example = false)]
    pub has_prev: bool,
}

impl PageMeta {
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        let total_pages = total.div_ceil(u64::from(page_size.max(1)));

        Self {
            page,
            page_size,
            max_size: MAX_PAGE_SIZE,
            total,
            total_pages,
            has_next: u64::from(page) < total_pages,
            has_prev: page > 1,
        }
    }
}

impl<T> PagedResponse<T> {
    pub fn new(data: Vec<T>, search: &UserSearch, total: u64) -> Self {
        Self {
            data,
            pagination: PageMeta::new(search.page, search.page_size, total),
        }
    }
}
