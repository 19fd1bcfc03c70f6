//! OAuth2 scope guard.
//!
//! `OAuth2<S>` is an extractor: listing it first in a handler's arguments
//! rejects the request before the handler body runs.
//!
//! ```ignore
//! async fn get_user(_auth: OAuth2<UsersView>, ...) -> AppResult<...>
//! ```

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt::{Claims, validate_access_token};

/// Scope string that grants every scope
pub const WILDCARD_SCOPE: &str = "*";

/// A named OAuth2 scope required by an endpoint.
pub trait Scope: Send + Sync + 'static {
    const NAME: &'static str;
}

/// `users.edit`: search, create, update and delete users
pub struct UsersEdit;

impl Scope for UsersEdit {
    const NAME: &'static str = "users.edit";
}

/// `users.view`: read a single user
pub struct UsersView;

impl Scope for UsersView {
    const NAME: &'static str = "users.view";
}

/// Caller identity taken from a validated bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    pub scopes: Vec<String>,
}

impl AuthUser {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes
            .iter()
            .any(|granted| granted == WILDCARD_SCOPE || granted == scope)
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            scopes: claims.scopes,
        }
    }
}

/// Extractor that admits only callers holding scope `S`.
///
/// - Missing, malformed, expired or badly signed token: 401
/// - Valid token without `S` (or `*`): 403
pub struct OAuth2<S: Scope> {
    pub user: AuthUser,
    _scope: PhantomData<S>,
}

impl<S: Scope> FromRequestParts<AppState> for OAuth2<S> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized {
                message: "Missing authorization header".to_string(),
            })?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized {
                message: "Invalid authorization header format. Expected: Bearer <token>".to_string(),
            })?;

        let user = AuthUser::from(validate_access_token(token, &state.jwt_config.secret)?);

        if !user.has_scope(S::NAME) {
            tracing::debug!(username = %user.username, scope = S::NAME, "Missing scope");
            return Err(AppError::Forbidden {
                message: format!("missing required scope {}", S::NAME),
            });
        }

        parts.extensions.insert(user.clone());

        Ok(Self {
            user,
            _scope: PhantomData,
        })
    }
}
