//! Service layer: the user store port that handlers depend on.
//!
//! Handlers only see `Arc<dyn UserService>`, so the HTTP layer can be driven
//! by the Postgres-backed `DbUserService` in production and by an in-memory
//! store in tests.

mod user_service;

pub use user_service::DbUserService;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{User, UserSearch};

#[async_trait]
pub trait UserService: Send + Sync {
    /// One page of matching users ordered by username, plus the total match count.
    async fn search(&self, search: &UserSearch) -> AppResult<(Vec<User>, u64)>;

    async fn get(&self, username: &str) -> AppResult<Option<User>>;

    /// Persists a new user and returns it with its assigned id.
    ///
    /// Fails with `AppError::Duplicate` when the username or email is taken.
    async fn create(&self, user: User) -> AppResult<User>;

    /// Persists every field of `user` by id; the username may change.
    async fn update(&self, user: User) -> AppResult<User>;

    /// Removes the user, failing with `AppError::NotFound` when absent.
    async fn delete(&self, username: &str) -> AppResult<()>;
}
