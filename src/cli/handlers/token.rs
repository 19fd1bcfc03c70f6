//! `token`: sign an access token with the configured secret.

use crate::config::Settings;
use crate::error::AppResult;
use crate::utils::jwt::issue_access_token;

pub struct TokenCommandHandler {
    config: Settings,
}

impl TokenCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Prints the signed token on stdout so it can be captured by scripts.
    pub fn execute(&self, subject: &str, scopes: &[String], hours: Option<i64>) -> AppResult<()> {
        let token = self.issue(subject, scopes, hours)?;
        println!("{token}");
        Ok(())
    }

    pub fn issue(&self, subject: &str, scopes: &[String], hours: Option<i64>) -> AppResult<String> {
        self.config.jwt.validate()?;

        let hours = hours.unwrap_or(self.config.jwt.access_token_expiration);
        tracing::info!(subject = %subject, scopes = ?scopes, hours, "Issuing access token");

        issue_access_token(subject, scopes.to_vec(), &self.config.jwt.secret, hours)
    }
}
