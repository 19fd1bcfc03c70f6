//! Middleware and extractors applied around the handlers.

mod auth;
mod error_handler;
mod logging;
mod request_id;
mod timeout;

pub use auth::{AuthUser, OAuth2, Scope, UsersEdit, UsersView, WILDCARD_SCOPE};
pub use error_handler::{error_to_status_code, global_error_handler};
pub use logging::logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use timeout::request_timeout_middleware;
