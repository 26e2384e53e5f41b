//! Command line overlay.
//!
//! Folds command line overrides (log level and format, temp folder) into a
//! configuration document as setting blocks, so that every consumer of the
//! document sees the same effective settings.
//!
//! Overrides are applied with a kind-keyed upsert: an existing block of the
//! target kind has only the overridden keys replaced, otherwise a new block is
//! appended.

use crate::{
    Attributes, ConfigurationDocument, ConfigurationError, ConfigurationResult, KindTag,
    SettingBlock,
};
use std::borrow::Cow;
use tracing::debug;

/// Name of the log level flag.
pub const LEVEL_FLAG: &str = "loglevel";

/// Name of the log format flag.
pub const FORMAT_FLAG: &str = "logformat";

/// Name of the temp folder flag.
pub const TEMP_FOLDER_FLAG: &str = "temp-folder";

/// Key of the logging block holding the level.
pub const LEVEL_KEY: &str = "level";

/// Key of the logging block holding the format.
pub const FORMAT_KEY: &str = "format";

/// Key of the attributes block holding the temp folder.
pub const TEMP_FOLDER_KEY: &str = "tempFolder";

/// Override values taken from the command line.
///
/// `None` and empty strings both mean "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub level: Option<String>,
    pub format: Option<String>,
    pub temp_folder: Option<String>,
}

fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl CliOverrides {
    /// Builds overrides from `(flag name, value)` pairs.
    ///
    /// Unrecognized flag names are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use ocm_config::CliOverrides;
    ///
    /// let overrides = CliOverrides::from_flags([("loglevel", "debug"), ("verbose", "1")]);
    /// assert_eq!(overrides.level.as_deref(), Some("debug"));
    /// assert!(overrides.temp_folder.is_none());
    /// ```
    pub fn from_flags<K, V>(flags: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut overrides = Self::default();
        for (name, value) in flags {
            match name.as_ref() {
                LEVEL_FLAG => overrides.level = Some(value.into()),
                FORMAT_FLAG => overrides.format = Some(value.into()),
                TEMP_FOLDER_FLAG => overrides.temp_folder = Some(value.into()),
                _ => {}
            }
        }
        overrides
    }

    /// Whether no override was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.logging().is_empty() && self.attributes().is_empty()
    }

    /// The logging block entries carried by these overrides.
    pub fn logging(&self) -> Attributes {
        let mut values = Attributes::new();
        if let Some(level) = supplied(&self.level) {
            values.insert(LEVEL_KEY.to_string(), level.to_string());
        }
        if let Some(format) = supplied(&self.format) {
            values.insert(FORMAT_KEY.to_string(), format.to_string());
        }
        values
    }

    /// The attributes block entries carried by these overrides.
    pub fn attributes(&self) -> Attributes {
        let mut values = Attributes::new();
        if let Some(folder) = supplied(&self.temp_folder) {
            values.insert(TEMP_FOLDER_KEY.to_string(), folder.to_string());
        }
        values
    }
}

/// Applies command line overrides to `base`.
///
/// When no override is supplied, `base` itself is returned borrowed and no
/// copy is made. Otherwise a copy of `base` receives an upsert of the logging
/// block (`logging.config.ocm.software/v1`) and/or the attributes block
/// (`attributes.config.ocm.software/v1`). `base` is never modified.
///
/// # Errors
///
/// Returns `ConfigurationError::DecodeSettingBlock` if a block of a target
/// kind already exists but is not a string mapping.
///
/// # Examples
///
/// ```
/// use ocm_config::{apply_cli_overrides, CliOverrides, ConfigurationDocument, KindTag};
/// use std::borrow::Cow;
///
/// let base = ConfigurationDocument::default();
///
/// let unchanged = apply_cli_overrides(&base, &CliOverrides::default())?;
/// assert!(matches!(unchanged, Cow::Borrowed(_)));
///
/// let overrides = CliOverrides::from_flags([("temp-folder", "/tmp/x")]);
/// let effective = apply_cli_overrides(&base, &overrides)?;
/// let block = effective.find_setting_block(&KindTag::attributes_v1()).unwrap();
/// assert_eq!(block.data(), r#"{"tempFolder":"/tmp/x"}"#);
/// # Ok::<(), ocm_config::ConfigurationError>(())
/// ```
pub fn apply_cli_overrides<'a>(
    base: &'a ConfigurationDocument,
    overrides: &CliOverrides,
) -> ConfigurationResult<Cow<'a, ConfigurationDocument>> {
    if overrides.is_empty() {
        debug!("No command line overrides supplied; using base configuration");
        return Ok(Cow::Borrowed(base));
    }

    let mut merged = base.clone();

    let logging = overrides.logging();
    if !logging.is_empty() {
        upsert_setting_block(&mut merged.configurations, &KindTag::logging_v1(), &logging)?;
    }

    let attributes = overrides.attributes();
    if !attributes.is_empty() {
        upsert_setting_block(
            &mut merged.configurations,
            &KindTag::attributes_v1(),
            &attributes,
        )?;
    }

    Ok(Cow::Owned(merged))
}

/// Updates or inserts the setting block of kind `kind`.
///
/// If a block with exactly that kind exists, its data is decoded as a string
/// mapping, the keys in `values` are overwritten, and the re-encoded block
/// replaces the old one at the same position. Keys not in `values` are kept.
/// Otherwise a new block holding only `values` is appended.
///
/// Keys are written sorted.
///
/// # Errors
///
/// Returns `ConfigurationError::DecodeSettingBlock` if the existing block's
/// data is not a string mapping.
pub fn upsert_setting_block(
    blocks: &mut Vec<SettingBlock>,
    kind: &KindTag,
    values: &Attributes,
) -> ConfigurationResult<()> {
    let Some(index) = blocks.iter().position(|block| block.kind() == kind) else {
        debug!(kind = %kind, keys = values.len(), "Appending new setting block");
        blocks.push(SettingBlock::new(kind.clone(), values)?);
        return Ok(());
    };

    let mut existing: Attributes =
        blocks[index]
            .decode_data()
            .map_err(|e| ConfigurationError::DecodeSettingBlock {
                kind: kind.to_string(),
                index,
                reason: e.to_string(),
            })?;
    existing.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));

    debug!(kind = %kind, index, keys = values.len(), "Updating existing setting block");
    blocks[index] = SettingBlock::new(kind.clone(), &existing)?;
    Ok(())
}

#[cfg(test)]
#[path = "overlay_tests.rs"]
mod tests;
