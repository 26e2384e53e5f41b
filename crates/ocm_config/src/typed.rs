//! Typed values.
//!
//! A typed value is a JSON object whose `type` field names its kind. When a
//! concrete structure is registered for that kind the value can be decoded
//! into it ([`TypedValue::Known`]); otherwise it is kept as a [`Raw`] capsule
//! holding the exact source text ([`TypedValue::Opaque`]). Either way the
//! value survives an encode/decode cycle unchanged.
//!
//! Values found inside a configuration document always start out opaque.
//! Use a [`TypeRegistry`](crate::TypeRegistry) to upgrade them.

use crate::{ConfigurationError, ConfigurationResult, KindTag};
use serde::de::DeserializeOwned;
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A concrete payload structure that can be registered for a kind tag.
///
/// Implementors carry their kind tag inline, normally as a field
/// serialized under `type`.
pub trait TypedObject: Serialize + DeserializeOwned + fmt::Debug + Send + Sync + 'static {
    fn kind(&self) -> &KindTag;
}

/// Object-safe view over any [`TypedObject`].
pub(crate) trait ErasedObject: fmt::Debug + Send + Sync {
    fn kind(&self) -> &KindTag;
    fn to_json(&self) -> serde_json::Result<String>;
    fn as_any(&self) -> &dyn Any;
}

impl<T: TypedObject> ErasedObject for T {
    fn kind(&self) -> &KindTag {
        TypedObject::kind(self)
    }

    fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The part of a typed value read before its kind is known. Other fields are
/// skipped unparsed.
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: Option<Value>,
}

/// An untyped capsule: the kind tag plus the verbatim JSON of the object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raw {
    kind: KindTag,
    data: String,
}

impl Raw {
    /// Capture a JSON object, reading only its `type` field.
    ///
    /// The text is stored unmodified. Fields other than `type` are never
    /// inspected, so any payload shape is accepted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Decode` if the text is not a JSON object
    /// or has no valid `type` field.
    ///
    /// # Examples
    ///
    /// ```
    /// use ocm_config::Raw;
    ///
    /// let raw = Raw::from_json(r#"{"type":"unknown.type/v9","anything":[1,2]}"#)?;
    /// assert_eq!(raw.kind().to_string(), "unknown.type/v9");
    /// assert_eq!(raw.as_str(), r#"{"type":"unknown.type/v9","anything":[1,2]}"#);
    /// # Ok::<(), ocm_config::ConfigurationError>(())
    /// ```
    pub fn from_json(json: impl Into<String>) -> ConfigurationResult<Self> {
        let data = json.into();
        let decode_error = |reason: String| ConfigurationError::Decode {
            reason: format!("invalid typed value: {}", reason),
        };

        if !data.trim_start().starts_with('{') {
            return Err(decode_error("expected a JSON object".to_string()));
        }
        let envelope: Envelope =
            serde_json::from_str(&data).map_err(|e| decode_error(e.to_string()))?;
        let kind = match envelope.kind {
            Some(Value::String(kind)) => {
                KindTag::try_new(&kind).map_err(|e| decode_error(e.to_string()))?
            }
            Some(_) => return Err(decode_error("field 'type' must be a string".to_string())),
            None => return Err(decode_error("missing field 'type'".to_string())),
        };

        Ok(Self { kind, data })
    }

    pub fn kind(&self) -> &KindTag {
        &self.kind
    }

    /// The captured JSON text.
    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn into_string(self) -> String {
        self.data
    }
}

impl Serialize for Raw {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw: &RawValue = serde_json::from_str(&self.data).map_err(ser::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Raw {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Raw::from_json(raw.get()).map_err(de::Error::custom)
    }
}

/// A decoded value of a registered kind.
#[derive(Debug, Clone)]
pub struct Known {
    object: Arc<dyn ErasedObject>,
    // Text the value was decoded from; re-emitted as is on encode.
    source: Option<String>,
}

impl Known {
    pub(crate) fn decoded(object: Arc<dyn ErasedObject>, source: String) -> Self {
        Self {
            object,
            source: Some(source),
        }
    }
}

/// A value paired with its kind tag.
///
/// # Examples
///
/// ```
/// use ocm_config::{DirectCredentials, TypedValue};
///
/// let value = TypedValue::known(DirectCredentials::new([("username", "admin")]));
/// assert_eq!(value.kind().to_string(), "Credentials/v1");
/// assert_eq!(
///     value.encode()?,
///     r#"{"type":"Credentials/v1","properties":{"username":"admin"}}"#
/// );
/// # Ok::<(), ocm_config::ConfigurationError>(())
/// ```
#[derive(Debug, Clone)]
pub enum TypedValue {
    /// Decoded into a registered concrete structure.
    Known(Known),
    /// No structure registered for the kind; the source is kept verbatim.
    Opaque(Raw),
}

impl TypedValue {
    /// Wrap an in-memory concrete value.
    pub fn known<T: TypedObject>(value: T) -> Self {
        TypedValue::Known(Known {
            object: Arc::new(value),
            source: None,
        })
    }

    pub fn kind(&self) -> &KindTag {
        match self {
            TypedValue::Known(known) => known.object.kind(),
            TypedValue::Opaque(raw) => raw.kind(),
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, TypedValue::Known(_))
    }

    /// Borrow the concrete structure if the value holds a `T`.
    pub fn downcast_ref<T: TypedObject>(&self) -> Option<&T> {
        match self {
            TypedValue::Known(known) => known.object.as_any().downcast_ref::<T>(),
            TypedValue::Opaque(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&Raw> {
        match self {
            TypedValue::Opaque(raw) => Some(raw),
            TypedValue::Known(_) => None,
        }
    }

    /// Encode the value as JSON.
    ///
    /// Decoded values re-emit the text they were decoded from, byte for byte.
    /// Values built in memory are serialized with their kind tag inline.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Encode` if serialization of an in-memory
    /// structure fails.
    pub fn encode(&self) -> ConfigurationResult<String> {
        match self {
            TypedValue::Opaque(raw) => Ok(raw.as_str().to_string()),
            TypedValue::Known(Known {
                source: Some(source),
                ..
            }) => Ok(source.clone()),
            TypedValue::Known(Known {
                object,
                source: None,
            }) => object.to_json().map_err(|e| ConfigurationError::Encode {
                what: format!("typed value of kind '{}'", object.kind()),
                reason: e.to_string(),
            }),
        }
    }

    /// Demote the value to an opaque capsule.
    pub fn to_raw(&self) -> ConfigurationResult<Raw> {
        match self {
            TypedValue::Opaque(raw) => Ok(raw.clone()),
            TypedValue::Known(_) => Raw::from_json(self.encode()?),
        }
    }
}

impl From<Raw> for TypedValue {
    fn from(raw: Raw) -> Self {
        TypedValue::Opaque(raw)
    }
}

impl PartialEq for TypedValue {
    fn eq(&self, other: &Self) -> bool {
        if self.kind() != other.kind() {
            return false;
        }
        match (self.encode(), other.encode()) {
            (Ok(left), Ok(right)) => left == right,
            _ => false,
        }
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let json = self.encode().map_err(ser::Error::custom)?;
        let raw: &RawValue = serde_json::from_str(&json).map_err(ser::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TypedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Raw::deserialize(deserializer).map(TypedValue::Opaque)
    }
}

#[cfg(test)]
#[path = "typed_tests.rs"]
mod tests;
