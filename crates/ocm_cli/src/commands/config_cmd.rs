use std::io::Write;

use clap::{Subcommand, ValueEnum};
use ocm_config::{ConfigurationDocument, KindTag, TypeRegistry, TypedValue};
use tracing::{debug, info, instrument};

use crate::errors::Error;

#[cfg(test)]
#[path = "config_cmd_tests.rs"]
mod tests;

/// Subcommands for the config command
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Show the effective configuration after merging files and flags
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        output: OutputFormat,
    },

    /// Check that the effective configuration decodes cleanly
    Validate,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Counts gathered while validating a configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    pub repositories: usize,
    pub consumers: usize,
    pub known_values: usize,
    pub opaque_values: usize,
    pub setting_blocks: usize,
}

/// Execute the config command, writing its output to `out`.
#[instrument(skip(document, out))]
pub fn execute(
    cmd: &ConfigCommands,
    document: &ConfigurationDocument,
    out: &mut impl Write,
) -> Result<(), Error> {
    match cmd {
        ConfigCommands::Show { output } => {
            let rendered = render(document, *output)?;
            write!(out, "{}", rendered).map_err(Error::Output)
        }
        ConfigCommands::Validate => {
            let summary = validate(document, &TypeRegistry::with_defaults())?;
            info!(
                repositories = summary.repositories,
                consumers = summary.consumers,
                known = summary.known_values,
                opaque = summary.opaque_values,
                setting_blocks = summary.setting_blocks,
                "Configuration is valid"
            );
            writeln!(
                out,
                "configuration is valid: {} repositories, {} consumers, {} typed values ({} known, {} opaque), {} setting blocks",
                summary.repositories,
                summary.consumers,
                summary.known_values + summary.opaque_values,
                summary.known_values,
                summary.opaque_values,
                summary.setting_blocks
            )
            .map_err(Error::Output)
        }
    }
}

/// Renders the document in the requested format.
pub fn render(document: &ConfigurationDocument, output: OutputFormat) -> Result<String, Error> {
    let rendered = match output {
        OutputFormat::Yaml => document.to_yaml(),
        OutputFormat::Json => document.to_json_pretty().map(|json| json + "\n"),
    };
    rendered.map_err(|e| Error::config("configuration output", e))
}

/// Resolves every typed value against `registry` and checks the setting
/// blocks the CLI itself consumes.
///
/// # Errors
///
/// Returns `Error::Config` if a value of a registered kind does not decode,
/// or if the logging or attributes block is not a string mapping.
pub fn validate(
    document: &ConfigurationDocument,
    registry: &TypeRegistry,
) -> Result<ValidationSummary, Error> {
    let resolved = registry
        .resolve_document(document)
        .map_err(|e| Error::config("typed values", e))?;

    for kind in [KindTag::logging_v1(), KindTag::attributes_v1()] {
        document
            .setting_attributes(&kind)
            .map_err(|e| Error::config("setting blocks", e))?;
    }

    let values: Vec<&TypedValue> = resolved
        .repositories
        .iter()
        .map(|entry| &entry.repository)
        .chain(
            resolved
                .consumers
                .iter()
                .flat_map(|consumer| consumer.credentials.iter()),
        )
        .collect();
    let known_values = values.iter().filter(|value| value.is_known()).count();

    for value in values.iter().filter(|value| !value.is_known()) {
        debug!(kind = %value.kind(), "No structure registered; kept opaque");
    }

    Ok(ValidationSummary {
        repositories: resolved.repositories.len(),
        consumers: resolved.consumers.len(),
        known_values,
        opaque_values: values.len() - known_values,
        setting_blocks: resolved.configurations.len(),
    })
}
