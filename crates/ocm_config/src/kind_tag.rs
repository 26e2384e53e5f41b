//! Kind tags.
//!
//! A kind tag is the `(group, version)` discriminator every typed value
//! carries in its `type` field. It is written as `"<group>/<version>"`, or as
//! a bare `"<group>"` when the value is unversioned.

use crate::{ConfigurationError, ConfigurationResult};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Group of the configuration document itself.
pub const CONFIG_TYPE: &str = "credentials.config.ocm.software";

/// Group of directly embedded credentials.
pub const CREDENTIALS_TYPE: &str = "Credentials";

/// Group of the logging setting block.
pub const LOGGING_CONFIG_TYPE: &str = "logging.config.ocm.software";

/// Group of the attributes setting block.
pub const ATTRIBUTES_CONFIG_TYPE: &str = "attributes.config.ocm.software";

/// Version used by every built-in kind.
pub const VERSION_V1: &str = "v1";

/// A `(group, version)` discriminator.
///
/// Two tags are equal only when both components are equal, so `Credentials`
/// and `Credentials/v1` are distinct tags.
///
/// # Examples
///
/// ```
/// use ocm_config::KindTag;
///
/// let tag: KindTag = "logging.config.ocm.software/v1".parse()?;
/// assert_eq!(tag.group(), "logging.config.ocm.software");
/// assert_eq!(tag.version(), Some("v1"));
///
/// let bare: KindTag = "Credentials".parse()?;
/// assert_eq!(bare.version(), None);
/// assert_eq!(bare.to_string(), "Credentials");
/// # Ok::<(), ocm_config::ConfigurationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KindTag {
    group: String,
    version: Option<String>,
}

impl KindTag {
    /// Create a versioned kind tag.
    pub fn new(group: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: Some(version.into()),
        }
    }

    /// Create a kind tag without a version.
    pub fn unversioned(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: None,
        }
    }

    /// Parse and validate a kind tag string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidKindTag` if:
    /// - The string is empty or the group part is empty
    /// - The string ends with `/` (empty version)
    ///
    /// Any other text is accepted as is; tags of unregistered kinds are
    /// carried without interpretation.
    pub fn try_new(value: &str) -> ConfigurationResult<Self> {
        let invalid = |reason: &str| ConfigurationError::InvalidKindTag {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let (group, version) = match value.rsplit_once('/') {
            Some((group, version)) => {
                if version.is_empty() {
                    return Err(invalid("version cannot be empty"));
                }
                (group, Some(version.to_string()))
            }
            None => (value, None),
        };

        if group.is_empty() {
            return Err(invalid("group cannot be empty"));
        }

        Ok(Self {
            group: group.to_string(),
            version,
        })
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Whether the tag carries a version.
    pub fn is_versioned(&self) -> bool {
        self.version.is_some()
    }

    /// The tag of the configuration document, `credentials.config.ocm.software/v1`.
    pub fn config_v1() -> Self {
        Self::new(CONFIG_TYPE, VERSION_V1)
    }

    /// The tag of directly embedded credentials, `Credentials/v1`.
    pub fn credentials_v1() -> Self {
        Self::new(CREDENTIALS_TYPE, VERSION_V1)
    }

    /// The tag of the logging setting block, `logging.config.ocm.software/v1`.
    pub fn logging_v1() -> Self {
        Self::new(LOGGING_CONFIG_TYPE, VERSION_V1)
    }

    /// The tag of the attributes setting block, `attributes.config.ocm.software/v1`.
    pub fn attributes_v1() -> Self {
        Self::new(ATTRIBUTES_CONFIG_TYPE, VERSION_V1)
    }
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}/{}", self.group, version),
            None => write!(f, "{}", self.group),
        }
    }
}

impl FromStr for KindTag {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s)
    }
}

impl Serialize for KindTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KindTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        KindTag::try_new(&value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
#[path = "kind_tag_tests.rs"]
mod tests;
