use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Cannot open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid log level '{value}'. Valid levels are: trace, debug, info, warn, error")]
    InvalidLevel { value: String },

    #[error("Invalid log format '{value}'. Valid formats are: full, compact, json")]
    InvalidFormat { value: String },

    #[error("At least one output (console or file) must be enabled")]
    NoOutput,

    #[error("File path cannot be empty when file output is enabled")]
    MissingFilePath,

    /// A global subscriber was installed earlier in this process
    #[error("Logger already initialized: {0}")]
    AlreadyInitialized(String),
}
