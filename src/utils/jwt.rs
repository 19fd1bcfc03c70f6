use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Presented on API requests
    Access,
    /// Only exchanged with the issuing authority, never accepted by the API
    Refresh,
}

/// Claims carried by a bearer token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (the caller's username)
    pub sub: String,
    /// OAuth2 scopes granted to the caller; `*` grants all of them
    #[serde(default)]
    pub scopes: Vec<String>,
    pub token_type: TokenType,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn new(
        subject: impl Into<String>,
        scopes: Vec<String>,
        token_type: TokenType,
        expiration_hours: i64,
    ) -> Self {
        let now = Timestamp::now();
        let exp = now
            .checked_add(SignedDuration::from_hours(expiration_hours))
            .unwrap_or(now);

        Self {
            sub: subject.into(),
            scopes,
            token_type,
            iat: now.as_second(),
            exp: exp.as_second(),
        }
    }
}

/// Signs an HS256 access token.
///
/// # Example
/// ```ignore
/// let token = issue_access_token("admin", vec!["users.edit".into()], &secret, 1)?;
/// ```
pub fn issue_access_token(
    subject: &str,
    scopes: Vec<String>,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    let claims = Claims::new(subject, scopes, TokenType::Access, expiration_hours);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Validates signature, expiry and token type, returning the claims.
pub fn validate_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Unauthorized {
            message: "Token has expired".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidToken => AppError::Unauthorized {
            message: "Invalid token".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::Unauthorized {
            message: "Invalid token signature".to_string(),
        },
        _ => AppError::Unauthorized {
            message: format!("Token validation failed: {}", e),
        },
    })?;

    if claims.token_type != TokenType::Access {
        return Err(AppError::Unauthorized {
            message: format!(
                "Invalid token type: expected {:?}, got {:?}",
                TokenType::Access,
                claims.token_type
            ),
        });
    }

    Ok(claims)
}
