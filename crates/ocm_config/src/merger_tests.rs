//! Tests for configuration merging engine.

use super::*;
use crate::{Consumer, KindTag, Raw, RepositoryConfigEntry, SettingBlock, TypedValue};

// ============================================================================
// Test Helpers
// ============================================================================

fn repository(kind: &str, url: &str) -> RepositoryConfigEntry {
    RepositoryConfigEntry {
        repository: TypedValue::from(
            Raw::from_json(format!(r#"{{"type":"{}","url":"{}"}}"#, kind, url)).unwrap(),
        ),
    }
}

fn consumer(name: &str) -> Consumer {
    Consumer {
        identities: vec![[("name".to_string(), name.to_string())].into_iter().collect()],
        credentials: vec![],
    }
}

fn document(kind: KindTag, repos: &[(&str, &str)], consumers: &[&str]) -> ConfigurationDocument {
    let mut doc = ConfigurationDocument::new(kind);
    doc.repositories = repos.iter().map(|(k, u)| repository(k, u)).collect();
    doc.consumers = consumers.iter().map(|name| consumer(name)).collect();
    doc
}

// ============================================================================
// Merge Tests
// ============================================================================

/// Verify ConfigurationMerger can be created.
#[test]
fn test_merger_creation() {
    let merger = ConfigurationMerger::new();
    assert!(format!("{:?}", merger).contains("ConfigurationMerger"));
}

#[test]
fn test_merge_empty_input_fails() {
    let result = ConfigurationMerger::new().merge(&[]);
    assert!(matches!(
        result,
        Err(ConfigurationError::InvalidInput { .. })
    ));
}

#[test]
fn test_merge_single_document_is_equal_copy() {
    let doc = document(KindTag::config_v1(), &[("OCI/v1", "a")], &["x"]);
    let merged = ConfigurationMerger::new().merge(std::slice::from_ref(&doc)).unwrap();
    assert_eq!(merged, doc);
}

/// Lists are concatenated in document order for any number of documents.
#[test]
fn test_merge_concatenates_lists_in_order() {
    let a = document(KindTag::config_v1(), &[("OCI/v1", "a1"), ("OCI/v1", "a2")], &["a"]);
    let b = document(KindTag::config_v1(), &[], &["b1", "b2"]);
    let c = document(KindTag::config_v1(), &[("CTF/v1", "c1")], &[]);

    let merged = ConfigurationMerger::new()
        .merge(&[a.clone(), b.clone(), c.clone()])
        .unwrap();

    let expected_repositories: Vec<_> = [&a, &b, &c]
        .iter()
        .flat_map(|doc| doc.repositories.iter().cloned())
        .collect();
    let expected_consumers: Vec<_> = [&a, &b, &c]
        .iter()
        .flat_map(|doc| doc.consumers.iter().cloned())
        .collect();

    assert_eq!(merged.repositories, expected_repositories);
    assert_eq!(merged.consumers, expected_consumers);
}

/// Identical entries in different documents are both kept.
#[test]
fn test_merge_does_not_deduplicate() {
    let a = document(KindTag::config_v1(), &[("OCI/v1", "same")], &["same"]);
    let merged = ConfigurationMerger::new().merge(&[a.clone(), a]).unwrap();

    assert_eq!(merged.repositories.len(), 2);
    assert_eq!(merged.repositories[0], merged.repositories[1]);
    assert_eq!(merged.consumers.len(), 2);
}

#[test]
fn test_merge_uses_first_kind() {
    let a = document(KindTag::config_v1(), &[], &[]);
    let b = document(KindTag::new("other.config", "v2"), &[], &[]);

    let merged = ConfigurationMerger::new().merge(&[a, b]).unwrap();
    assert_eq!(merged.kind, KindTag::config_v1());
}

#[test]
fn test_merge_appends_setting_blocks_verbatim() {
    let mut a = document(KindTag::config_v1(), &[], &[]);
    a.configurations.push(
        SettingBlock::from_json(KindTag::logging_v1(), r#"{"level":"info"}"#).unwrap(),
    );
    let mut b = document(KindTag::config_v1(), &[], &[]);
    b.configurations.push(
        SettingBlock::from_json(KindTag::new("unknown.type", "v9"), r#"{ "keep" : [ 1 , 2 ] }"#)
            .unwrap(),
    );
    b.configurations.push(
        SettingBlock::from_json(KindTag::logging_v1(), r#"{"level":"debug"}"#).unwrap(),
    );

    let merged = ConfigurationMerger::new().merge(&[a, b]).unwrap();

    assert_eq!(merged.configurations.len(), 3);
    assert_eq!(merged.configurations[0].data(), r#"{"level":"info"}"#);
    assert_eq!(merged.configurations[1].data(), r#"{ "keep" : [ 1 , 2 ] }"#);
    assert_eq!(merged.configurations[2].data(), r#"{"level":"debug"}"#);
}

#[test]
fn test_merge_leaves_inputs_untouched() {
    let a = document(KindTag::config_v1(), &[("OCI/v1", "a")], &["a"]);
    let b = document(KindTag::config_v1(), &[("OCI/v1", "b")], &["b"]);
    let inputs = vec![a.clone(), b.clone()];

    let _ = ConfigurationMerger::new().merge(&inputs).unwrap();

    assert_eq!(inputs[0], a);
    assert_eq!(inputs[1], b);
}
