//! Test fixtures shared by unit tests across the crate.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::models::{User, UserSearch};
use crate::services::UserService;
use crate::state::AppState;
use crate::utils::jwt::issue_access_token;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-at-least-32-characters";

/// `UserService` over a vector, with the same uniqueness and ordering rules
/// as the Postgres store.
#[derive(Default)]
pub struct InMemoryUserService {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserService {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    pub async fn snapshot(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    fn check_unique(users: &[User], candidate: &User) -> AppResult<()> {
        let clash = |field: &str, value: &str| AppError::Duplicate {
            entity: "user".to_string(),
            field: field.to_string(),
            value: value.to_string(),
        };

        for existing in users.iter().filter(|u| u.id != candidate.id) {
            if existing.username == candidate.username {
                return Err(clash("username", &candidate.username));
            }
            if existing.email == candidate.email {
                return Err(clash("email", &candidate.email));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserService for InMemoryUserService {
    async fn search(&self, search: &UserSearch) -> AppResult<(Vec<User>, u64)> {
        let users = self.users.read().await;
        let mut matched: Vec<User> = users.iter().filter(|u| search.matches(u)).cloned().collect();
        matched.sort_by(|a, b| a.username.cmp(&b.username));

        let total = matched.len() as u64;
        let page = matched
            .into_iter()
            .skip(search.offset() as usize)
            .take(search.limit() as usize)
            .collect();
        Ok((page, total))
    }

    async fn get(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, mut user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        user.id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        Self::check_unique(&users, &user)?;
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        Self::check_unique(&users, &user)?;
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| AppError::NotFound {
                entity: "user".to_string(),
                field: "id".to_string(),
                value: user.id.to_string(),
            })?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, username: &str) -> AppResult<()> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.username != username);
        if users.len() == before {
            return Err(AppError::user_not_found(username));
        }
        Ok(())
    }
}

pub fn user(id: i32, username: &str, email: &str) -> User {
    User {
        id,
        username: username.to_string(),
        email: email.to_string(),
        password_hash: format!("$argon2id$fixture${username}"),
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiration: 1,
    }
}

pub fn app_state(users: Arc<InMemoryUserService>) -> AppState {
    AppState::new(users, jwt_config())
}

/// Bearer header value carrying `scopes`.
pub fn bearer(scopes: &[&str]) -> String {
    let scopes = scopes.iter().map(|s| s.to_string()).collect();
    let token = issue_access_token("operator", scopes, TEST_JWT_SECRET, 1)
        .expect("test token should sign");
    format!("Bearer {token}")
}
