use std::io;
use std::path::PathBuf;

use ocm_config::ConfigurationError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the OCM CLI application.
///
/// Any of these aborts the current command; a partially merged
/// configuration is never used.
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration file could not be read.
    ///
    /// Wraps the underlying I/O error, such as a missing file or a
    /// permission problem.
    #[error("Failed to read configuration file {path:?}: {source}")]
    LoadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configuration file could not be decoded, merged or overlaid.
    #[error("Configuration error in {origin}: {source}")]
    Config {
        origin: String,
        #[source]
        source: ConfigurationError,
    },

    /// The logging subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    /// Failed to write command output.
    #[error("Failed to write output: {0}")]
    Output(io::Error),
}

impl Error {
    /// Wraps a configuration error with the place it came from.
    pub fn config(origin: impl Into<String>, source: ConfigurationError) -> Self {
        Error::Config {
            origin: origin.into(),
            source,
        }
    }
}
