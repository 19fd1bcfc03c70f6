use diesel::prelude::*;

use crate::error::AppResult;
use crate::utils::password::hash_password;

/// User entity as stored in `users`.
///
/// Timestamps are maintained by the database and are not part of the entity.
#[derive(Debug, Queryable, Selectable, Clone, Default, PartialEq, Eq)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl User {
    /// Hashes `password` and stores the resulting PHC string.
    pub fn set_password(&mut self, password: &str) -> AppResult<()> {
        self.password_hash = hash_password(password)?;
        Ok(())
    }

    pub fn to_new_user(&self) -> NewUser<'_> {
        NewUser {
            username: &self.username,
            email: &self.email,
            password_hash: &self.password_hash,
        }
    }

    pub fn to_changeset(&self) -> UserChangeset<'_> {
        UserChangeset {
            username: &self.username,
            email: &self.email,
            password_hash: &self.password_hash,
        }
    }
}

/// Insertable projection; `id` comes from the serial column.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Full-row update keyed by `id`, so a username can be renamed.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct UserChangeset<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Filter and page selection for a user search.
///
/// `username` and `email` are glob patterns where `*` matches any run of
/// characters. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSearch {
    pub username: String,
    pub email: String,
    pub page_size: u32,
    /// 1-based
    pub page: u32,
}

impl UserSearch {
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// SQL `LIKE` pattern for the username filter.
    pub fn username_pattern(&self) -> String {
        glob_to_like(&self.username)
    }

    /// SQL `LIKE` pattern for the email filter.
    pub fn email_pattern(&self) -> String {
        glob_to_like(&self.email)
    }

    /// Case-insensitive glob match used by in-memory stores.
    pub fn matches(&self, user: &User) -> bool {
        glob_matches(&self.username, &user.username) && glob_matches(&self.email, &user.email)
    }
}

/// Translates a `*` glob into a `LIKE` pattern with `\` as the escape character.
fn glob_to_like(glob: &str) -> String {
    let mut pattern = String::with_capacity(glob.len());
    for ch in glob.chars() {
        match ch {
            '\\' | '%' | '_' => {
                pattern.push('\\');
                pattern.push(ch);
            }
            '*' => pattern.push('%'),
            _ => pattern.push(ch),
        }
    }
    pattern
}

fn glob_matches(glob: &str, value: &str) -> bool {
    let glob = glob.to_lowercase();
    let value = value.to_lowercase();

    let parts: Vec<&str> = glob.split('*').collect();
    if parts.len() == 1 {
        return glob == value;
    }

    let (first, rest) = (parts[0], &parts[1..]);
    let Some(mut remaining) = value.strip_prefix(first) else {
        return false;
    };

    let (last, middle) = match rest.split_last() {
        Some((last, middle)) => (*last, middle),
        None => return true,
    };

    for part in middle {
        match remaining.find(part) {
            Some(idx) => remaining = &remaining[idx + part.len()..],
            None => return false,
        }
    }

    remaining.len() >= last.len() && remaining.ends_with(last)
}
