//! Shared state handed to every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::config::JwtConfig;
use crate::services::UserService;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cloned per request; the service sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserService>,
    /// Secret and lifetime used to validate bearer tokens
    pub jwt_config: JwtConfig,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(users: Arc<dyn UserService>, jwt_config: JwtConfig) -> Self {
        Self {
            users,
            jwt_config,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
