//! User repository for async database operations.
//!
//! Provides search and CRUD operations for the users table using diesel_async.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{User, UserSearch};

/// User repository holding an async connection pool.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap
/// (just reference count increment). No need for `Arc<UserRepository>`.
#[derive(Clone)]
pub struct UserRepository {
    pool: AsyncDbPool,
}

impl UserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Returns one page of users matching `search`, ordered by username,
    /// together with the total number of matches.
    pub async fn search(&self, search: &UserSearch) -> Result<(Vec<User>, u64), AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let username_pattern = search.username_pattern();
        let email_pattern = search.email_pattern();

        let total: i64 = users
            .filter(username.ilike(&username_pattern))
            .filter(email.ilike(&email_pattern))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|e| AppError::Database {
                operation: "count users".to_string(),
                source: anyhow::Error::from(e),
            })?;

        let page = users
            .filter(username.ilike(&username_pattern))
            .filter(email.ilike(&email_pattern))
            .order(username.asc())
            .offset(search.offset())
            .limit(search.limit())
            .select(User::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| AppError::Database {
                operation: "search users".to_string(),
                source: anyhow::Error::from(e),
            })?;

        Ok((page, u64::try_from(total).unwrap_or_default()))
    }

    /// `Some(User)` if found, `None` otherwise.
    pub async fn find_by_username(&self, name: &str) -> Result<Option<User>, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(username.eq(name))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Inserts `user` and returns the stored row with its generated id.
    ///
    /// Unique violations surface as `AppError::Duplicate`.
    pub async fn insert(&self, user: &User) -> Result<User, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(users)
            .values(user.to_new_user())
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Rewrites the row with `user.id` and bumps `updated_at`.
    ///
    /// Returns `None` when no row has that id.
    pub async fn update(&self, user: &User) -> Result<Option<User>, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(users.filter(id.eq(user.id)))
            .set((user.to_changeset(), updated_at.eq(diesel::dsl::now)))
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Returns the number of affected rows (0 or 1).
    pub async fn delete_by_username(&self, name: &str) -> Result<usize, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(users.filter(username.eq(name)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
