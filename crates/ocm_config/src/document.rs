//! Configuration documents.
//!
//! A configuration document is an immutable value tree: a kind tag,
//! repository entries, consumer entries and named setting blocks. Documents
//! are produced by decoding, by [`ConfigurationMerger`](crate::ConfigurationMerger)
//! and by [`apply_cli_overrides`](crate::apply_cli_overrides); none of those
//! operations modify their inputs.
//!
//! # Wire Format
//!
//! ```yaml
//! type: credentials.config.ocm.software/v1
//! repositories:
//!   - repository:
//!       type: DockerConfig/v1
//!       dockerConfigFile: ~/.docker/config.json
//! consumers:
//!   - identities:
//!       - type: OCIRegistry
//!         hostname: ghcr.io
//!     credentials:
//!       - type: Credentials/v1
//!         properties:
//!           username: me
//! configurations:
//!   - type: logging.config.ocm.software/v1
//!     data:
//!       level: info
//! ```
//!
//! YAML input is converted to JSON before decoding, so typed values and
//! setting block data are always held as JSON text.

use crate::{
    Attributes, ConfigurationError, ConfigurationResult, Consumer, KindTag, TypedValue,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// One repository entry wrapping a typed repository specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryConfigEntry {
    pub repository: TypedValue,
}

/// A named, kind-tagged setting payload.
///
/// The data is never interpreted at this layer; it is held as the JSON text
/// it was decoded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingBlock {
    #[serde(rename = "type")]
    kind: KindTag,
    data: Box<RawValue>,
}

impl SettingBlock {
    /// Creates a block by serializing `data` as JSON.
    ///
    /// Maps must serialize with sorted keys (`BTreeMap`) for the output to
    /// be stable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Encode` if `data` cannot be serialized.
    pub fn new<T: Serialize>(kind: KindTag, data: &T) -> ConfigurationResult<Self> {
        let encoded = serde_json::to_string(data).map_err(|e| ConfigurationError::Encode {
            what: format!("setting block of kind '{}'", kind),
            reason: e.to_string(),
        })?;
        Self::from_json(kind, encoded)
    }

    /// Creates a block from JSON text, kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Decode` if `json` is not valid JSON.
    pub fn from_json(kind: KindTag, json: impl Into<String>) -> ConfigurationResult<Self> {
        let data =
            RawValue::from_string(json.into()).map_err(|e| ConfigurationError::Decode {
                reason: format!("invalid data for setting block of kind '{}': {}", kind, e),
            })?;
        Ok(Self { kind, data })
    }

    pub fn kind(&self) -> &KindTag {
        &self.kind
    }

    /// The block data as JSON text.
    pub fn data(&self) -> &str {
        self.data.get()
    }

    /// Decodes the block data into `T`.
    pub fn decode_data<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(self.data.get())
    }
}

impl PartialEq for SettingBlock {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.data.get() == other.data.get()
    }
}

/// The top-level configuration aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationDocument {
    #[serde(rename = "type")]
    pub kind: KindTag,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<RepositoryConfigEntry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumers: Vec<Consumer>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configurations: Vec<SettingBlock>,
}

impl Default for ConfigurationDocument {
    fn default() -> Self {
        Self::new(KindTag::config_v1())
    }
}

impl ConfigurationDocument {
    /// Creates an empty document of the given kind.
    pub fn new(kind: KindTag) -> Self {
        Self {
            kind,
            repositories: Vec::new(),
            consumers: Vec::new(),
            configurations: Vec::new(),
        }
    }

    /// Decodes a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Decode` if the text is not a valid
    /// document. Unknown kind tags inside the document are not errors.
    pub fn from_json(json: &str) -> ConfigurationResult<Self> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::Decode {
            reason: e.to_string(),
        })
    }

    /// Decodes a document from YAML text.
    ///
    /// The YAML is first converted to JSON so typed values keep a JSON
    /// encoding.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Decode` if the text is not valid YAML or
    /// not a valid document.
    pub fn from_yaml(yaml: &str) -> ConfigurationResult<Self> {
        let value: serde_json::Value =
            serde_yaml::from_str(yaml).map_err(|e| ConfigurationError::Decode {
                reason: format!("invalid YAML: {}", e),
            })?;
        let json = serde_json::to_string(&value).map_err(|e| ConfigurationError::Decode {
            reason: format!("YAML cannot be represented as JSON: {}", e),
        })?;
        Self::from_json(&json)
    }

    /// Decodes a document given as either JSON or YAML.
    ///
    /// Input that looks like a JSON object is read as JSON first so typed
    /// values keep their exact bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use ocm_config::ConfigurationDocument;
    ///
    /// let yaml = b"type: credentials.config.ocm.software/v1\nrepositories: []\n";
    /// let json = br#"{"type":"credentials.config.ocm.software/v1"}"#;
    ///
    /// assert_eq!(
    ///     ConfigurationDocument::from_slice(yaml)?,
    ///     ConfigurationDocument::from_slice(json)?
    /// );
    /// # Ok::<(), ocm_config::ConfigurationError>(())
    /// ```
    pub fn from_slice(bytes: &[u8]) -> ConfigurationResult<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| ConfigurationError::Decode {
            reason: format!("configuration is not valid UTF-8: {}", e),
        })?;
        if text.trim_start().starts_with('{') {
            // A flow mapping is YAML too; keep the JSON error when neither parses.
            Self::from_json(text)
                .or_else(|json_error| Self::from_yaml(text).map_err(|_| json_error))
        } else {
            Self::from_yaml(text)
        }
    }

    /// Encodes the document as compact JSON.
    pub fn to_json(&self) -> ConfigurationResult<String> {
        serde_json::to_string(self).map_err(|e| ConfigurationError::Encode {
            what: "configuration document".to_string(),
            reason: e.to_string(),
        })
    }

    /// Encodes the document as indented JSON.
    pub fn to_json_pretty(&self) -> ConfigurationResult<String> {
        let value = self.to_value()?;
        serde_json::to_string_pretty(&value).map_err(|e| ConfigurationError::Encode {
            what: "configuration document".to_string(),
            reason: e.to_string(),
        })
    }

    /// Encodes the document as YAML.
    pub fn to_yaml(&self) -> ConfigurationResult<String> {
        let value = self.to_value()?;
        serde_yaml::to_string(&value).map_err(|e| ConfigurationError::Encode {
            what: "configuration document".to_string(),
            reason: e.to_string(),
        })
    }

    fn to_value(&self) -> ConfigurationResult<serde_json::Value> {
        serde_json::from_str(&self.to_json()?).map_err(|e| ConfigurationError::Encode {
            what: "configuration document".to_string(),
            reason: e.to_string(),
        })
    }

    /// Finds the first setting block with exactly the given kind.
    pub fn find_setting_block(&self, kind: &KindTag) -> Option<&SettingBlock> {
        self.configurations.iter().find(|block| block.kind() == kind)
    }

    /// Reads the setting block of the given kind as a string mapping.
    ///
    /// Returns `Ok(None)` when no such block exists, which callers treat as
    /// "no override".
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::DecodeSettingBlock` if the block exists
    /// but its data is not a string-keyed mapping of strings.
    pub fn setting_attributes(&self, kind: &KindTag) -> ConfigurationResult<Option<Attributes>> {
        let Some((index, block)) = self
            .configurations
            .iter()
            .enumerate()
            .find(|(_, block)| block.kind() == kind)
        else {
            return Ok(None);
        };

        block
            .decode_data::<Attributes>()
            .map(Some)
            .map_err(|e| ConfigurationError::DecodeSettingBlock {
                kind: kind.to_string(),
                index,
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
