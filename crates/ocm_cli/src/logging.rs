//! Logging setup.
//!
//! The log level and format come from the logging setting block of the
//! effective configuration, which already contains any `--loglevel` and
//! `--logformat` overrides. `OCM_LOG` takes precedence over the level when set.

use clap::ValueEnum;
use ocm_config::overlay::{FORMAT_KEY, LEVEL_KEY};
use ocm_config::{ConfigurationDocument, KindTag};
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::errors::Error;

/// Environment variable holding an explicit tracing filter.
pub const LOG_ENV_VAR: &str = "OCM_LOG";

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        }
    }
}

/// Logging settings resolved from a configuration document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl LoggingSettings {
    /// Reads the logging block of `document`.
    ///
    /// A missing block or missing key falls back to the default. Values that
    /// are not recognized are ignored with a warning once logging is up.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the logging block is not a string mapping.
    pub fn from_document(document: &ConfigurationDocument) -> Result<(Self, Vec<String>), Error> {
        let mut settings = Self::default();
        let mut ignored = Vec::new();

        let Some(block) = document
            .setting_attributes(&KindTag::logging_v1())
            .map_err(|e| Error::config("logging configuration", e))?
        else {
            return Ok((settings, ignored));
        };

        if let Some(level) = block.get(LEVEL_KEY) {
            match LogLevel::from_str(level, true) {
                Ok(level) => settings.level = level,
                Err(_) => ignored.push(format!("unknown log level '{}'", level)),
            }
        }
        if let Some(format) = block.get(FORMAT_KEY) {
            match LogFormat::from_str(format, true) {
                Ok(format) => settings.format = format,
                Err(_) => ignored.push(format!("unknown log format '{}'", format)),
            }
        }

        Ok((settings, ignored))
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
    }
}

/// Installs the global tracing subscriber for the effective configuration.
pub fn init_logging(document: &ConfigurationDocument) -> Result<LoggingSettings, Error> {
    let (settings, ignored) = LoggingSettings::from_document(document)?;

    let registry = tracing_subscriber::registry().with(settings.filter());
    let result = match settings.format {
        LogFormat::Text => registry.with(fmt::layer().with_writer(std::io::stderr)).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
    result.map_err(|e| Error::Logging(e.to_string()))?;

    for message in ignored {
        warn!("Ignoring logging configuration: {}", message);
    }
    Ok(settings)
}
