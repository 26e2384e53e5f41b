//! Configuration merging engine.
//!
//! Combines several configuration documents (user file, project file, ...)
//! into one. Every list is concatenated in document order with the order
//! inside each document preserved. Nothing is de-duplicated or overridden;
//! callers that need per-kind override semantics for setting blocks use
//! [`apply_cli_overrides`](crate::apply_cli_overrides) or
//! [`upsert_setting_block`](crate::upsert_setting_block) on the result.
//!
//! # Examples
//!
//! ```rust
//! use ocm_config::{ConfigurationDocument, ConfigurationMerger};
//!
//! let user = ConfigurationDocument::from_json(
//!     r#"{"type":"credentials.config.ocm.software/v1","repositories":[{"repository":{"type":"A/v1"}}]}"#,
//! )?;
//! let project = ConfigurationDocument::from_json(
//!     r#"{"type":"credentials.config.ocm.software/v1","repositories":[{"repository":{"type":"B/v1"}}]}"#,
//! )?;
//!
//! let merged = ConfigurationMerger::new().merge(&[user, project])?;
//! assert_eq!(merged.repositories.len(), 2);
//! # Ok::<(), ocm_config::ConfigurationError>(())
//! ```

use crate::{ConfigurationDocument, ConfigurationError, ConfigurationResult};
use tracing::debug;

/// Configuration merging engine.
///
/// This is a stateless component: it takes documents and produces a new
/// merged document without touching its inputs.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationMerger {}

impl ConfigurationMerger {
    /// Creates a new configuration merger.
    pub fn new() -> Self {
        Self {}
    }

    /// Merges documents into a new one.
    ///
    /// The result takes the kind tag of the first document. Repositories,
    /// consumers and setting blocks are the concatenation of the inputs'
    /// lists, in input order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidInput` if `documents` is empty.
    pub fn merge(
        &self,
        documents: &[ConfigurationDocument],
    ) -> ConfigurationResult<ConfigurationDocument> {
        let first = documents
            .first()
            .ok_or_else(|| ConfigurationError::InvalidInput {
                reason: "at least one configuration document is required for a merge".to_string(),
            })?;

        let mut merged = ConfigurationDocument::new(first.kind.clone());
        for (index, document) in documents.iter().enumerate() {
            if document.kind != merged.kind {
                debug!(
                    index,
                    kind = %document.kind,
                    merged_kind = %merged.kind,
                    "Merging document with a different kind; keeping the first kind"
                );
            }
            merged
                .repositories
                .extend(document.repositories.iter().cloned());
            merged.consumers.extend(document.consumers.iter().cloned());
            merged
                .configurations
                .extend(document.configurations.iter().cloned());
        }

        debug!(
            documents = documents.len(),
            repositories = merged.repositories.len(),
            consumers = merged.consumers.len(),
            configurations = merged.configurations.len(),
            "Merged configuration documents"
        );
        Ok(merged)
    }
}

#[cfg(test)]
#[path = "merger_tests.rs"]
mod tests;
