//! Dispatches a parsed command to its handler.

use super::handlers::{MigrateCommandHandler, ServeCommandHandler, TokenCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;

/// Runs the selected subcommand; no subcommand means `serve`.
pub async fn execute_command(cli: &Cli, settings: Settings) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(*dry_run).await
        }
        None => ServeCommandHandler::new(settings).execute(false).await,
        Some(Commands::Migrate { dry_run, rollback }) => {
            if let Some(steps) = rollback.filter(|steps| *steps > 50) {
                tracing::warn!(steps, "Rolling back a large number of migrations");
            }
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await?;
            Ok(())
        }
        Some(Commands::Token {
            subject,
            scopes,
            hours,
        }) => {
            TokenCommandHandler::new(settings).execute(subject, scopes, *hours)?;
            Ok(())
        }
    }
}
