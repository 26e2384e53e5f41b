//! Registry of concrete structures for kind tags.
//!
//! The registry is populated once during start-up and then only read. It is
//! passed explicitly to the calls that need it, so independent registries can
//! coexist (for example one per test).

use crate::typed::{ErasedObject, Known};
use crate::{
    ConfigurationDocument, ConfigurationError, ConfigurationResult, Consumer, DirectCredentials,
    KindTag, Raw, RepositoryConfigEntry, TypedObject, TypedValue,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type DecodeFn = fn(&str) -> serde_json::Result<Arc<dyn ErasedObject>>;

fn decode_object<T: TypedObject>(json: &str) -> serde_json::Result<Arc<dyn ErasedObject>> {
    let object: T = serde_json::from_str(json)?;
    Ok(Arc::new(object))
}

/// Maps kind tags to the concrete structure that decodes them.
///
/// # Examples
///
/// ```
/// use ocm_config::{DirectCredentials, TypeRegistry};
///
/// let registry = TypeRegistry::with_defaults();
///
/// let known = registry.decode(br#"{"type":"Credentials/v1","properties":{"user":"me"}}"#)?;
/// assert!(known.downcast_ref::<DirectCredentials>().is_some());
///
/// let unknown = registry.decode(br#"{"type":"OCIRepository/v1","baseUrl":"ghcr.io"}"#)?;
/// assert!(!unknown.is_known());
/// # Ok::<(), ocm_config::ConfigurationError>(())
/// ```
#[derive(Clone, Default)]
pub struct TypeRegistry {
    decoders: HashMap<KindTag, DecodeFn>,
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<String> = self.decoders.keys().map(ToString::to_string).collect();
        kinds.sort();
        f.debug_struct("TypeRegistry").field("kinds", &kinds).finish()
    }
}

impl TypeRegistry {
    /// Creates an empty registry; every value decodes as opaque.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the structures the core ships with.
    ///
    /// `DirectCredentials` is registered as `Credentials` and `Credentials/v1`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert::<DirectCredentials>(&[
            KindTag::credentials_v1(),
            KindTag::unversioned(crate::kind_tag::CREDENTIALS_TYPE),
        ]);
        registry
    }

    /// Registers `T` under every tag in `kinds` (primary tag and aliases).
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::AlreadyRegistered` if any of the tags is
    /// already taken. In that case the registry is left unchanged.
    pub fn register<T: TypedObject>(&mut self, kinds: &[KindTag]) -> ConfigurationResult<()> {
        if let Some(taken) = kinds.iter().find(|kind| self.decoders.contains_key(*kind)) {
            return Err(ConfigurationError::AlreadyRegistered {
                kind: taken.to_string(),
            });
        }
        self.insert::<T>(kinds);
        Ok(())
    }

    fn insert<T: TypedObject>(&mut self, kinds: &[KindTag]) {
        for kind in kinds {
            debug!(kind = %kind, "Registering typed value structure");
            self.decoders.insert(kind.clone(), decode_object::<T>);
        }
    }

    pub fn is_registered(&self, kind: &KindTag) -> bool {
        self.decoders.contains_key(kind)
    }

    /// Decodes a typed value from JSON bytes.
    ///
    /// The kind tag is read first. A registered tag decodes into its
    /// concrete structure; any other tag yields an opaque capsule holding the
    /// input unchanged.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError::Decode` if the input is not a JSON object with
    ///   a `type` field
    /// - `ConfigurationError::DecodeTyped` if the tag is registered but the
    ///   payload does not fit the structure
    pub fn decode(&self, bytes: &[u8]) -> ConfigurationResult<TypedValue> {
        let text = std::str::from_utf8(bytes).map_err(|e| ConfigurationError::Decode {
            reason: format!("typed value is not valid UTF-8: {}", e),
        })?;
        self.resolve_raw(Raw::from_json(text)?)
    }

    /// Upgrades an opaque value if its kind is registered.
    ///
    /// Known values and unregistered kinds are returned as they are.
    pub fn resolve(&self, value: &TypedValue) -> ConfigurationResult<TypedValue> {
        match value {
            TypedValue::Opaque(raw) => self.resolve_raw(raw.clone()),
            TypedValue::Known(_) => Ok(value.clone()),
        }
    }

    fn resolve_raw(&self, raw: Raw) -> ConfigurationResult<TypedValue> {
        let Some(decode) = self.decoders.get(raw.kind()) else {
            return Ok(TypedValue::Opaque(raw));
        };
        let object = decode(raw.as_str()).map_err(|e| ConfigurationError::DecodeTyped {
            kind: raw.kind().to_string(),
            reason: e.to_string(),
        })?;
        Ok(TypedValue::Known(Known::decoded(object, raw.into_string())))
    }

    /// Returns a copy of `document` with every repository and credential
    /// value upgraded where its kind is registered.
    ///
    /// Setting blocks are left opaque; their consumers interpret them.
    pub fn resolve_document(
        &self,
        document: &ConfigurationDocument,
    ) -> ConfigurationResult<ConfigurationDocument> {
        let repositories = document
            .repositories
            .iter()
            .map(|entry| {
                Ok(RepositoryConfigEntry {
                    repository: self.resolve(&entry.repository)?,
                })
            })
            .collect::<ConfigurationResult<Vec<_>>>()?;

        let consumers = document
            .consumers
            .iter()
            .map(|consumer| {
                let credentials = consumer
                    .credentials
                    .iter()
                    .map(|credential| self.resolve(credential))
                    .collect::<ConfigurationResult<Vec<_>>>()?;
                Ok(Consumer {
                    identities: consumer.identities.clone(),
                    credentials,
                })
            })
            .collect::<ConfigurationResult<Vec<_>>>()?;

        Ok(ConfigurationDocument {
            kind: document.kind.clone(),
            repositories,
            consumers,
            configurations: document.configurations.clone(),
        })
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
