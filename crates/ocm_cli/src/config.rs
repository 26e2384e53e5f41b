//! Configuration loading for the OCM CLI.
//!
//! Reads one or more configuration files (JSON or YAML), merges them in the
//! order given, and folds the command line overrides into the result. The
//! document produced here is the one handed to every other part of the
//! program.

use std::{
    env,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use clap::Args;
use ocm_config::{
    apply_cli_overrides, CliOverrides, ConfigurationDocument, ConfigurationMerger,
};
use tracing::debug;

use crate::errors::Error;
use crate::logging::{LogFormat, LogLevel};

/// Environment variable listing configuration files.
pub const CONFIG_ENV_VAR: &str = "OCM_CONFIG";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Global options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file to load; may be repeated, later files are appended.
    /// Without this option the files listed in OCM_CONFIG are used
    #[arg(long = "config", global = true)]
    pub config: Vec<PathBuf>,

    /// Log level
    #[arg(long = "loglevel", global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Log output format
    #[arg(long = "logformat", global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Temporary folder location for the library and plugins
    #[arg(long = "temp-folder", global = true)]
    pub temp_folder: Option<String>,
}

impl GlobalArgs {
    /// The overrides these options contribute to the configuration.
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            level: self.log_level.map(|level| level.as_str().to_string()),
            format: self.log_format.map(|format| format.as_str().to_string()),
            temp_folder: self.temp_folder.clone(),
        }
    }

    /// The configuration files to load, in order.
    ///
    /// Files given on the command line win. Otherwise `OCM_CONFIG` is read as
    /// a path list in the platform's `PATH` syntax.
    pub fn config_paths(&self) -> Vec<PathBuf> {
        self.config_paths_from(env::var_os(CONFIG_ENV_VAR))
    }

    fn config_paths_from(&self, env_value: Option<OsString>) -> Vec<PathBuf> {
        if !self.config.is_empty() {
            return self.config.clone();
        }
        match env_value {
            Some(value) => env::split_paths(&value)
                .filter(|path| !path.as_os_str().is_empty())
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Loads one configuration document from a file.
///
/// Files ending in `.json` are read as JSON; anything else is read as YAML
/// (which also accepts JSON).
///
/// # Errors
///
/// - `Error::LoadFile` if the file cannot be read
/// - `Error::Config` if the content is not a valid configuration document
pub fn load_document(path: &Path) -> Result<ConfigurationDocument, Error> {
    debug!("Loading configuration from {:?}", path);

    let content = fs::read_to_string(path).map_err(|e| Error::LoadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let origin = path.display().to_string();
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => ConfigurationDocument::from_json(&content),
        _ => ConfigurationDocument::from_yaml(&content),
    }
    .map_err(|e| Error::config(origin, e))
}

/// Loads and merges every configuration file in order.
///
/// Without any file the result is an empty document, so that command line
/// overrides still have a document to land in.
pub fn load_merged(paths: &[PathBuf]) -> Result<ConfigurationDocument, Error> {
    if paths.is_empty() {
        debug!("No configuration files given; starting from an empty configuration");
        return Ok(ConfigurationDocument::default());
    }

    let documents = paths
        .iter()
        .map(|path| load_document(path))
        .collect::<Result<Vec<_>, _>>()?;

    ConfigurationMerger::new()
        .merge(&documents)
        .map_err(|e| Error::config("merged configuration files", e))
}

/// Builds the effective configuration for this invocation.
///
/// Loads and merges the configuration files, then applies the command line
/// overrides.
pub fn load_effective(args: &GlobalArgs) -> Result<ConfigurationDocument, Error> {
    let merged = load_merged(&args.config_paths())?;
    let effective = apply_cli_overrides(&merged, &args.overrides())
        .map_err(|e| Error::config("command line overrides", e))?;
    Ok(effective.into_owned())
}
