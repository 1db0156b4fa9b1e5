//! Error types for command processing and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Why a console command was rejected. Every variant is recoverable: it is
/// reported to the output sink and the session keeps running.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// Argument unparsable or out of range.
    #[error("{0}")]
    Validation(String),

    /// Wrong argument shape, e.g. two color components or a bad hex token.
    #[error("{0}")]
    Format(String),

    #[error("Unknown command '{0}'. Type 'help' for options.")]
    UnknownCommand(String),

    /// Anything that went wrong outside the designed validation paths.
    #[error("Error processing command: {0}")]
    Unexpected(String),
}

impl CommandError {
    /// Text shown on the console, with the `Error: ` prefix for designed
    /// failures.
    pub fn console_message(&self) -> String {
        match self {
            CommandError::Unexpected(_) => self.to_string(),
            _ => format!("Error: {self}"),
        }
    }
}

/// Errors while loading `motes.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, CommandError>;
