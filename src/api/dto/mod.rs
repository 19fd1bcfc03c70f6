//! Data Transfer Objects for API requests and responses.
//!
//! - `user` - The user view model
//! - `error` - Common error response body
//! - `pagination` - Search parameters and page metadata
//! - `health` - Liveness response

mod error;
mod health;
mod pagination;
mod user;

pub use error::ErrorResponse;
pub use health::{HealthResponse, HealthStatus};
pub use pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageMeta, PagedResponse, SearchParams};
pub use user::UserViewModel;
