//! Directly embedded credentials.

use crate::{KindTag, TypedObject};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// String key to string value mapping.
///
/// Used for credential properties and for the contents of the logging and
/// attributes setting blocks. Keys are kept sorted so that encoding is stable.
pub type Attributes = BTreeMap<String, String>;

/// Credentials given inline as plain properties, kind `Credentials/v1`.
///
/// # Examples
///
/// ```
/// use ocm_config::DirectCredentials;
///
/// let creds = DirectCredentials::new([("username", "admin"), ("password", "secret")]);
/// assert_eq!(creds.property("username"), Some("admin"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectCredentials {
    #[serde(rename = "type")]
    pub kind: KindTag,

    #[serde(default)]
    pub properties: Attributes,
}

impl DirectCredentials {
    pub fn new<K, V>(properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            kind: KindTag::credentials_v1(),
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

impl TypedObject for DirectCredentials {
    fn kind(&self) -> &KindTag {
        &self.kind
    }
}
