//! Postgres-backed user service.

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::models::{User, UserSearch};
use crate::repositories::UserRepository;
use crate::services::UserService;

/// `UserService` over `UserRepository`.
///
/// Since `UserRepository` uses `Arc` internally via the connection pool,
/// cloning is cheap.
#[derive(Clone)]
pub struct DbUserService {
    repo: UserRepository,
}

impl DbUserService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for DbUserService {
    async fn search(&self, search: &UserSearch) -> AppResult<(Vec<User>, u64)> {
        self.repo.search(search).await
    }

    async fn get(&self, username: &str) -> AppResult<Option<User>> {
        self.repo.find_by_username(username).await
    }

    async fn create(&self, user: User) -> AppResult<User> {
        let created = self.repo.insert(&user).await?;
        tracing::info!(user_id = created.id, username = %created.username, "User created");
        Ok(created)
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let updated = self.repo.update(&user).await?.ok_or_else(|| AppError::NotFound {
            entity: "user".to_string(),
            field: "id".to_string(),
            value: user.id.to_string(),
        })?;
        tracing::info!(user_id = updated.id, username = %updated.username, "User updated");
        Ok(updated)
    }

    async fn delete(&self, username: &str) -> AppResult<()> {
        match self.repo.delete_by_username(username).await? {
            0 => Err(AppError::user_not_found(username)),
            _ => {
                tracing::info!(username = %username, "User deleted");
                Ok(())
            }
        }
    }
}
