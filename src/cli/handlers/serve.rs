//! `serve`: start the HTTP server, or only check the configuration.

use crate::config::Settings;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            return self.validate_only();
        }

        Server::new(self.config).run().await
    }

    /// Checks everything `serve` needs, including the JWT section that
    /// `Settings::validate` leaves out.
    pub fn validate_only(&self) -> anyhow::Result<()> {
        self.config.validate()?;
        self.config.jwt.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!(
            "✓ Access tokens validated with a {}-character secret",
            self.config.jwt.secret.len()
        );
        if self.config.database.auto_migrate {
            println!("✓ Pending migrations would be applied on startup");
        }
        println!("Dry run completed successfully - configuration is ready for deployment");

        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
