//! Consumer entries.
//!
//! A consumer binds one or more identities to the credentials that apply to
//! them. Older configuration files name a single `identity`; newer ones use
//! an `identities` list. Both decode to the list form, and only the list
//! form is ever written back.

use crate::TypedValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute map describing a consumer, used for matching only.
pub type Identity = BTreeMap<String, String>;

/// A binding of identities to typed credential values.
///
/// # Examples
///
/// ```
/// use ocm_config::Consumer;
///
/// let consumer: Consumer = serde_json::from_str(
///     r#"{"identity":{"type":"OCIRegistry","hostname":"ghcr.io"},"credentials":[]}"#,
/// )?;
/// assert_eq!(consumer.identities.len(), 1);
/// assert_eq!(consumer.identities[0]["hostname"], "ghcr.io");
///
/// let encoded = serde_json::to_string(&consumer)?;
/// assert!(!encoded.contains("\"identity\""));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "ConsumerInput")]
pub struct Consumer {
    pub identities: Vec<Identity>,
    pub credentials: Vec<TypedValue>,
}

// Wire shape accepted on decode, including the legacy singular field.
#[derive(Deserialize)]
struct ConsumerInput {
    #[serde(default)]
    identity: Option<Identity>,
    #[serde(default)]
    identities: Option<Vec<Identity>>,
    #[serde(default)]
    credentials: Option<Vec<TypedValue>>,
}

impl From<ConsumerInput> for Consumer {
    fn from(input: ConsumerInput) -> Self {
        let mut identities = Vec::new();
        // The legacy identity counts as the first identity.
        if let Some(identity) = input.identity.filter(|identity| !identity.is_empty()) {
            identities.push(identity);
        }
        identities.extend(input.identities.unwrap_or_default());

        Consumer {
            identities,
            credentials: input.credentials.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[path = "consumer_tests.rs"]
mod tests;
