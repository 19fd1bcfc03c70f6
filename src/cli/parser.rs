//! CLI argument parsing with clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use super::validation::{
    validate_config_file_path, validate_host_address, validate_port, validate_rollback_steps,
    validate_scope, validate_token_hours,
};

/// User management API with OAuth2 scopes
#[derive(Parser, Debug)]
#[command(name = "roster-rs")]
#[command(about = "User management API with OAuth2 scopes")]
#[command(long_about = "
roster-rs serves a user CRUD API over HTTP. Every user endpoint is guarded by
a bearer token carrying OAuth2 scopes (users.view, users.edit or *).

EXAMPLES:
    # Start the server with default configuration
    roster-rs serve

    # Bind to all interfaces on port 8080
    roster-rs serve --host 0.0.0.0 --port 8080

    # Use a single configuration file
    roster-rs --config /etc/roster/roster.toml serve

    # Check configuration without starting the server
    roster-rs serve --dry-run

    # Apply, preview or roll back migrations
    roster-rs migrate
    roster-rs migrate --dry-run
    roster-rs migrate --rollback 1

    # Sign an operator token with the configured secret
    roster-rs token --subject ops --scope users.edit --scope users.view
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Load only this TOML file (plus ROSTER_* environment variables)
    #[arg(short, long, value_name = "FILE", value_parser = validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override ROSTER_APP_ENV when selecting `{environment}.toml`
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Log errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    Serve {
        /// Address to bind, e.g. 127.0.0.1 or 0.0.0.0
        #[arg(long, value_name = "ADDRESS", value_parser = validate_host_address)]
        host: Option<String>,

        /// TCP port to listen on (1-65535)
        #[arg(short, long, value_name = "PORT", value_parser = validate_port)]
        port: Option<u16>,

        /// Log level for this run; wins over --verbose and --quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },

    /// Database migration operations
    Migrate {
        /// List pending migrations without applying them
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Revert the most recent STEPS migrations (1-100)
        #[arg(long, value_name = "STEPS", conflicts_with = "dry_run", value_parser = validate_rollback_steps)]
        rollback: Option<u32>,
    },

    /// Sign an access token with the configured JWT secret
    ///
    /// Tokens normally come from an external authority; this exists for
    /// operators and local testing.
    Token {
        /// Token subject (`sub` claim)
        #[arg(long, value_name = "NAME")]
        subject: String,

        /// Scope to grant; repeat for several
        #[arg(long = "scope", value_name = "SCOPE", required = true, value_parser = validate_scope)]
        scopes: Vec<String>,

        /// Lifetime in hours (defaults to jwt.access_token_expiration)
        #[arg(long, value_name = "HOURS", value_parser = validate_token_hours)]
        hours: Option<i64>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}
