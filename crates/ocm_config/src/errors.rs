//! Configuration core error types.
//!
//! Every failure carries enough context (offending kind tag, offending block
//! index) for the caller to log it and abort. Nothing here is recovered or
//! swallowed inside the core: an unrecognized kind tag is not an error, but a
//! recognized tag with corrupted content is.

use thiserror::Error;

/// Configuration core errors.
///
/// These errors occur while decoding typed values and configuration
/// documents, merging documents, or applying command line overrides.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// The outer envelope is not well-formed structured text.
    #[error("Failed to decode configuration: {reason}")]
    Decode { reason: String },

    /// A value with a registered kind tag did not decode as its concrete type.
    #[error("Failed to decode typed value of kind '{kind}': {reason}")]
    DecodeTyped { kind: String, reason: String },

    /// A setting block claiming a known kind tag holds incompatible content.
    #[error("Failed to decode setting block {index} of kind '{kind}': {reason}")]
    DecodeSettingBlock {
        kind: String,
        index: usize,
        reason: String,
    },

    /// A value could not be serialized.
    #[error("Failed to encode {what}: {reason}")]
    Encode { what: String, reason: String },

    /// The operation received input it cannot work with.
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Invalid kind tag '{value}': {reason}")]
    InvalidKindTag { value: String, reason: String },

    #[error("Kind '{kind}' is already registered")]
    AlreadyRegistered { kind: String },
}

/// Result type alias for configuration operations.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
