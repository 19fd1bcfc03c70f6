use crate::error::AppError;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Utility for converting database errors to structured AppError variants.
///
/// Unique violations become `Duplicate` so the client gets a 409 carrying the
/// offending field; everything else is wrapped as `Database` and only the
/// operation name leaves the process.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        match kind {
            DatabaseErrorKind::UniqueViolation => {
                let parsed = info.constraint_name().and_then(Self::parse_constraint_name);
                match parsed {
                    Some((entity, field)) => {
                        let value = info
                            .details()
                            .and_then(Self::parse_key_value)
                            .map(|(_, v)| v)
                            .unwrap_or_else(|| "duplicate_value".to_string());
                        AppError::Duplicate { entity, field, value }
                    }
                    None => AppError::Database {
                        operation: operation.to_string(),
                        source: anyhow::Error::msg(format!(
                            "Unique constraint violation: {}",
                            info.message()
                        )),
                    },
                }
            }
            DatabaseErrorKind::NotNullViolation => AppError::Validation {
                field: info.column_name().unwrap_or("unknown").to_string(),
                reason: "Field is required".to_string(),
            },
            _ => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::msg(format!("Database error: {}", info.message())),
            },
        }
    }

    /// Splits a Postgres constraint name such as `users_email_key` into a
    /// singular entity and the column name: `("user", "email")`.
    pub fn parse_constraint_name(constraint: &str) -> Option<(String, String)> {
        let trimmed = constraint
            .strip_suffix("_key")
            .or_else(|| constraint.strip_suffix("_unique"))
            .or_else(|| constraint.strip_suffix("_idx"))?;
        let (table, field) = trimmed.split_once('_')?;
        if table.is_empty() || field.is_empty() {
            return None;
        }
        let entity = table.strip_suffix('s').unwrap_or(table);
        Some((entity.to_string(), field.to_string()))
    }

    /// Extracts `(field, value)` from a detail line like
    /// `Key (email)=(a@b.c) already exists.`
    pub fn parse_key_value(detail: &str) -> Option<(String, String)> {
        let rest = detail.split_once("Key (")?.1;
        let (field, rest) = rest.split_once(")=(")?;
        let (value, _) = rest.split_once(')')?;
        Some((field.to_string(), value.to_string()))
    }
}
