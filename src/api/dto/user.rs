//! User view model: the JSON shape of a user on the wire.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{AppError, AppResult};
use crate::models::User;

/// Fields reported in this order when several are invalid.
const FIELD_PRIORITY: [&str; 3] = ["username", "email", "password"];

/// Serialization-facing projection of a `User`.
///
/// Every field is optional so the same shape serves create, update and
/// responses. Empty strings in a request are treated as absent, and absent
/// fields are omitted from responses. The password is accepted on input and
/// never emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[schema(example = json!({"id": 1, "username": "alice", "email": "alice@example.com"}))]
pub struct UserViewModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,

    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(
        length(min = 1, max = 100, message = "username must be between 1 and 100 characters"),
        custom(function = "printable_ascii")
    )]
    #[schema(max_length = 100, example = "alice")]
    pub username: Option<String>,

    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(
        email(message = "email is not a valid format"),
        length(max = 255, message = "email must be at most 255 characters")
    )]
    #[schema(format = "email", max_length = 255, example = "alice@example.com")]
    pub email: Option<String>,

    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    #[schema(format = "password", min_length = 8, write_only)]
    pub password: Option<String>,
}

impl UserViewModel {
    /// Checks the present fields; with `allow_empty == false` username and
    /// email must also be present.
    pub fn valid(&self, allow_empty: bool) -> AppResult<()> {
        if !allow_empty {
            if self.username.is_none() {
                return Err(validation("username", "username is required"));
            }
            if self.email.is_none() {
                return Err(validation("email", "email is required"));
            }
        }

        self.validate().map_err(first_error)
    }

    /// Copies present fields onto `user`, hashing a present password.
    pub fn copy_to_model(&self, user: &mut User) -> AppResult<()> {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(password) = &self.password {
            user.set_password(password)?;
        }
        Ok(())
    }

    pub fn from_user(user: &User) -> Self {
        Self {
            id: Some(user.id),
            username: Some(user.username.clone()),
            email: Some(user.email.clone()),
            password: None,
        }
    }

    pub fn from_users(users: &[User]) -> Vec<Self> {
        users.iter().map(Self::from_user).collect()
    }
}

fn validation(field: &str, reason: &str) -> AppError {
    AppError::Validation {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn first_error(errors: ValidationErrors) -> AppError {
    let field_errors = errors.field_errors();

    FIELD_PRIORITY
        .iter()
        .find_map(|field| {
            let first = field_errors.get(*field)?.first()?;
            let reason = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{field} is invalid"));
            Some(validation(field, &reason))
        })
        .unwrap_or_else(|| AppError::from(errors.clone()))
}

/// Visible ASCII only: no spaces, control characters or non-ASCII.
fn printable_ascii(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_graphic()) {
        Ok(())
    } else {
        Err(ValidationError::new("printable_ascii")
            .with_message(Cow::Borrowed("username must be printable ascii characters")))
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn view(username: Option<&str>, email: Option<&str>, password: Option<&str>) -> UserViewModel {
        UserViewModel {
            id: None,
            username: username.map(str::to_string),
            email: email.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    fn reason(result: AppResult<()>) -> (String, String) {
        match result {
            Err(AppError::Validation { field, reason }) => (field, reason),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_strings_deserialize_as_absent() {
        let vm: UserViewModel =
            serde_json::from_value(json!({"username": "", "email": "a@b.io", "password": ""}))
                .unwrap();
        assert_eq!(vm.username, None);
        assert_eq!(vm.email.as_deref(), Some("a@b.io"));
        assert_eq!(vm.password, None);
    }

    #[test]
    fn test_required_fields_when_not_allow_empty() {
        assert_eq!(
            reason(view(None, Some("a@b.io"), None).valid(false)),
            ("username".to_string(), "username is required".to_string())
        );
        assert_eq!(
            reason(view(Some("alice"), None, None).valid(false)),
            ("email".to_string(), "email is required".to_string())
        );
        assert!(view(None, None, None).valid(true).is_ok());
    }

    #[test]
    fn test_username_must_be_printable_ascii() {
        for bad in ["al ice", "tab\tbed", "ålice"] {
            assert_eq!(
                reason(view(Some(bad), Some("a@b.io"), None).valid(false)).1,
                "username must be printable ascii characters"
            );
        }
        assert!(view(Some("alice.o'neil-2"), Some("a@b.io"), None).valid(false).is_ok());
    }

    #[test]
    fn test_username_reported_before_email() {
        assert_eq!(
            reason(view(Some("bad name"), Some("not-an-email"), None).valid(false)).0,
            "username"
        );
    }

    #[test]
    fn test_email_format() {
        assert_eq!(
            reason(view(Some("alice"), Some("not-an-email"), None).valid(false)),
            ("email".to_string(), "email is not a valid format".to_string())
        );
    }

    #[test]
    fn test_email_longer_than_column_rejected() {
        let long = format!("{}@{}", "a".repeat(64), vec!["b".repeat(60); 4].join("."));
        assert!(long.len() > 255);

        assert_eq!(
            reason(view(Some("alice"), Some(&long), None).valid(false)),
            (
                "email".to_string(),
                "email must be at most 255 characters".to_string()
            )
        );
    }

    #[test]
    fn test_short_password_rejected() {
        assert_eq!(
            reason(view(None, None, Some("short")).valid(true)).0,
            "password"
        );
    }

    #[test]
    fn test_copy_to_model_only_touches_present_fields() {
        let mut user = User {
            id: 7,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "old-hash".to_string(),
        };

        view(None, Some("new@example.com"), None)
            .copy_to_model(&mut user)
            .unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "new@example.com");
        assert_eq!(user.password_hash, "old-hash");

        view(None, None, Some("longenough")).copy_to_model(&mut user).unwrap();
        assert!(user.password_hash.starts_with("$argon2"));
        assert_eq!(user.id, 7);
    }

    #[test]
    fn test_from_user_never_exposes_password() {
        let user = User {
            id: 3,
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
        };
        let body = serde_json::to_value(UserViewModel::from_user(&user)).unwrap();
        assert_eq!(
            body,
            json!({"id": 3, "username": "bob", "email": "bob@example.com"})
        );
        assert_eq!(UserViewModel::from_users(&[user.clone(), user]).len(), 2);
    }
}
