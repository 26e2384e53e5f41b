//! Configuration core for the OCM command line tool.
//!
//! This crate models a configuration document that carries an open-ended set
//! of typed payloads (repository specifications, credentials, setting blocks)
//! and defines how several documents combine into one effective
//! configuration:
//!
//! - [`TypedValue`] keeps any payload whose kind is not registered as an
//!   opaque [`Raw`] capsule, so unknown kinds survive decode and encode.
//! - [`TypeRegistry`] maps kind tags to concrete structures.
//! - [`ConfigurationMerger`] concatenates documents.
//! - [`apply_cli_overrides`] folds command line settings into setting blocks.
//! - [`Consumer`] accepts the legacy single `identity` field and exposes only
//!   the `identities` list.
//!
//! All operations are synchronous and never modify their inputs.

pub mod consumer;
pub mod credentials;
pub mod document;
pub mod errors;
pub mod kind_tag;
pub mod merger;
pub mod overlay;
pub mod registry;
pub mod typed;

// Re-export for convenient access
pub use consumer::{Consumer, Identity};
pub use credentials::{Attributes, DirectCredentials};
pub use document::{ConfigurationDocument, RepositoryConfigEntry, SettingBlock};
pub use errors::{ConfigurationError, ConfigurationResult};
pub use kind_tag::KindTag;
pub use merger::ConfigurationMerger;
pub use overlay::{apply_cli_overrides, upsert_setting_block, CliOverrides};
pub use registry::TypeRegistry;
pub use typed::{Known, Raw, TypedObject, TypedValue};
