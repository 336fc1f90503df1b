use thiserror::Error;

use crate::BusError;

/// Errors that can occur during CLI command execution.
///
/// Each variant provides enough context for the user to see which part of
/// the command line or which bus operation went wrong.
#[derive(Error, Debug)]
pub enum CliError {
    /// An operation argument could not be parsed.
    ///
    /// Returned when an `eval` operation is empty or has an empty key.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// An error occurred in the configuration bus or while loading settings.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] BusError),

    /// Output could not be serialized.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Type alias for command execution results.
///
/// All CLI commands return this type, providing either the text to print
/// or a CliError describing what went wrong.
pub type CommandResult = Result<String, CliError>;
