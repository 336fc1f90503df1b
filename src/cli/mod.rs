//! Command-line interface for the configuration bus.
//!
//! Inspects bus settings and evaluates sequences of bus operations against a
//! throwaway bus, printing every listener dispatch they cause.

mod eval;
pub mod formatting;
mod operation;
mod types;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use eval::Evaluator;
pub use operation::Operation;
pub use types::{CliError, CommandResult};

use crate::config::BusSettings;

/// Command-line arguments for `figura`.
#[derive(Debug, Parser)]
#[command(name = "figura")]
#[command(about = "Inspect and exercise a reactive configuration bus")]
pub struct Cli {
    /// Settings file to use instead of the default location.
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the resolved settings.
    Settings {
        /// Print JSON instead of TOML.
        #[arg(long)]
        json: bool,
    },
    /// Print the JSON schema of the settings file.
    Schema,
    /// Apply operations to a fresh bus: `key=value` sets, `key` gets,
    /// `!key` removes, `*` reads everything.
    Eval {
        /// Name of the environment that owns the bus.
        #[arg(long, default_value = "cli")]
        environment: String,

        /// Operations, applied in order.
        #[arg(required = true)]
        operations: Vec<Operation>,
    },
}

impl Cli {
    /// Loads the settings selected by `--file`, or the default settings file.
    ///
    /// # Errors
    /// * `CliError::ConfigError` - If the settings file cannot be read or parsed
    pub fn settings(&self) -> Result<BusSettings, CliError> {
        let settings = match &self.file {
            Some(path) => BusSettings::load(path)?,
            None => BusSettings::load_default()?,
        };
        Ok(settings)
    }
}

/// Executes `command` with already loaded `settings`.
///
/// # Errors
/// Returns an error if serialization fails or a bus operation fails.
pub fn execute(command: &Commands, settings: &BusSettings) -> CommandResult {
    match command {
        Commands::Settings { json } => {
            if *json {
                serde_json::to_string_pretty(settings)
                    .map_err(|e| CliError::SerializationError(e.to_string()))
            } else {
                toml::to_string_pretty(settings)
                    .map_err(|e| CliError::SerializationError(e.to_string()))
            }
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(BusSettings);
            serde_json::to_string_pretty(&schema)
                .map_err(|e| CliError::SerializationError(e.to_string()))
        }
        Commands::Eval {
            environment,
            operations,
        } => Evaluator::new(environment, settings).run(operations),
    }
}
