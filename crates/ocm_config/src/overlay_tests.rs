//! Tests for the command line overlay.

use super::*;

// ============================================================================
// Test Helpers
// ============================================================================

/// Creates a base document with the given logging and temp folder settings.
fn create_test_config(level: &str, format: &str, temp_folder: &str) -> ConfigurationDocument {
    let mut doc = ConfigurationDocument::default();

    let mut logging = Attributes::new();
    if !level.is_empty() {
        logging.insert(LEVEL_KEY.to_string(), level.to_string());
    }
    if !format.is_empty() {
        logging.insert(FORMAT_KEY.to_string(), format.to_string());
    }
    if !logging.is_empty() {
        doc.configurations
            .push(SettingBlock::new(KindTag::logging_v1(), &logging).unwrap());
    }

    if !temp_folder.is_empty() {
        let attributes: Attributes = [(TEMP_FOLDER_KEY.to_string(), temp_folder.to_string())]
            .into_iter()
            .collect();
        doc.configurations
            .push(SettingBlock::new(KindTag::attributes_v1(), &attributes).unwrap());
    }

    doc
}

fn attributes(doc: &ConfigurationDocument, kind: &KindTag) -> Attributes {
    doc.setting_attributes(kind).unwrap().unwrap()
}

// ============================================================================
// Overlay Tests
// ============================================================================

#[test]
fn test_no_overrides_returns_base() {
    let base = create_test_config("info", "text", "/tmp/base");

    let result = apply_cli_overrides(&base, &CliOverrides::default()).unwrap();

    match result {
        Cow::Borrowed(doc) => assert!(std::ptr::eq(doc, &base)),
        Cow::Owned(_) => panic!("Expected the base document to be returned"),
    }
}

/// Empty values count as not supplied.
#[test]
fn test_empty_override_values_return_base() {
    let base = create_test_config("info", "", "");
    let overrides = CliOverrides {
        level: Some(String::new()),
        format: None,
        temp_folder: Some(String::new()),
    };

    let result = apply_cli_overrides(&base, &overrides).unwrap();
    assert!(matches!(result, Cow::Borrowed(_)));
}

#[test]
fn test_overrides_update_existing_blocks() {
    let base = create_test_config("info", "text", "/tmp/base");
    let overrides = CliOverrides::from_flags([
        (LEVEL_FLAG, "debug"),
        (TEMP_FOLDER_FLAG, "/tmp/override"),
    ]);

    let result = apply_cli_overrides(&base, &overrides).unwrap();

    assert_eq!(result.configurations.len(), 2);
    let logging = attributes(&result, &KindTag::logging_v1());
    assert_eq!(logging[LEVEL_KEY], "debug");
    assert_eq!(logging[FORMAT_KEY], "text");
    assert_eq!(
        attributes(&result, &KindTag::attributes_v1())[TEMP_FOLDER_KEY],
        "/tmp/override"
    );
}

/// Keys absent from the override are preserved.
#[test]
fn test_override_preserves_untouched_keys() {
    let base = create_test_config("info", "text", "");
    let overrides = CliOverrides::from_flags([(LEVEL_FLAG, "debug")]);

    let result = apply_cli_overrides(&base, &overrides).unwrap();

    assert_eq!(
        result.configurations[0].data(),
        r#"{"format":"text","level":"debug"}"#
    );
}

#[test]
fn test_override_creates_missing_block() {
    let base = ConfigurationDocument::default();
    let overrides = CliOverrides::from_flags([(TEMP_FOLDER_FLAG, "/tmp/x")]);

    let result = apply_cli_overrides(&base, &overrides).unwrap();

    assert_eq!(result.configurations.len(), 1);
    assert_eq!(result.configurations[0].kind(), &KindTag::attributes_v1());
    assert_eq!(
        result.configurations[0].kind().to_string(),
        "attributes.config.ocm.software/v1"
    );
    assert_eq!(result.configurations[0].data(), r#"{"tempFolder":"/tmp/x"}"#);
}

/// A second application with the same overrides changes nothing further.
#[test]
fn test_overlay_is_idempotent() {
    let base = create_test_config("info", "", "");
    let overrides = CliOverrides::from_flags([
        (LEVEL_FLAG, "warn"),
        (FORMAT_FLAG, "json"),
        (TEMP_FOLDER_FLAG, "/tmp/x"),
    ]);

    let once = apply_cli_overrides(&base, &overrides).unwrap().into_owned();
    let twice = apply_cli_overrides(&once, &overrides).unwrap().into_owned();

    assert_eq!(once, twice);
    assert_eq!(twice.configurations.len(), 2);
}

#[test]
fn test_overlay_does_not_mutate_base() {
    let base = create_test_config("info", "text", "/tmp/base");
    let snapshot = base.clone();

    let first = apply_cli_overrides(&base, &CliOverrides::from_flags([(LEVEL_FLAG, "debug")]))
        .unwrap()
        .into_owned();
    let second = apply_cli_overrides(&base, &CliOverrides::from_flags([(FORMAT_FLAG, "json")]))
        .unwrap()
        .into_owned();

    assert_eq!(base, snapshot);
    assert_eq!(attributes(&first, &KindTag::logging_v1())[FORMAT_KEY], "text");
    assert_eq!(attributes(&second, &KindTag::logging_v1())[LEVEL_KEY], "info");
}

#[test]
fn test_unknown_block_survives_overlay_verbatim() {
    let mut base = create_test_config("info", "", "");
    let unknown =
        SettingBlock::from_json(KindTag::new("unknown.type", "v9"), r#"{"b": [1, 2],"a":null}"#)
            .unwrap();
    base.configurations.insert(0, unknown.clone());

    let result = apply_cli_overrides(
        &base,
        &CliOverrides::from_flags([(LEVEL_FLAG, "error"), (TEMP_FOLDER_FLAG, "/t")]),
    )
    .unwrap();

    assert_eq!(result.configurations.len(), 3);
    assert_eq!(result.configurations[0], unknown);
    assert_eq!(result.configurations[0].data(), r#"{"b": [1, 2],"a":null}"#);
    assert_eq!(result.configurations[1].kind(), &KindTag::logging_v1());
    assert_eq!(result.configurations[2].kind(), &KindTag::attributes_v1());
}

#[test]
fn test_corrupt_existing_block_is_reported() {
    let mut base = ConfigurationDocument::default();
    base.configurations.push(
        SettingBlock::from_json(KindTag::new("unknown.type", "v9"), "{}").unwrap(),
    );
    base.configurations
        .push(SettingBlock::from_json(KindTag::logging_v1(), r#"{"level":5}"#).unwrap());

    let err = apply_cli_overrides(&base, &CliOverrides::from_flags([(LEVEL_FLAG, "debug")]))
        .unwrap_err();

    match err {
        ConfigurationError::DecodeSettingBlock { kind, index, .. } => {
            assert_eq!(kind, "logging.config.ocm.software/v1");
            assert_eq!(index, 1);
        }
        other => panic!("Expected DecodeSettingBlock, got {:?}", other),
    }
}

/// Only the first block of the target kind is updated.
#[test]
fn test_upsert_updates_first_matching_block_in_place() {
    let mut blocks = vec![
        SettingBlock::from_json(KindTag::logging_v1(), r#"{"level":"info"}"#).unwrap(),
        SettingBlock::from_json(KindTag::new("other", "v1"), r#"{}"#).unwrap(),
        SettingBlock::from_json(KindTag::logging_v1(), r#"{"level":"warn"}"#).unwrap(),
    ];
    let values: Attributes = [("level".to_string(), "debug".to_string())]
        .into_iter()
        .collect();

    upsert_setting_block(&mut blocks, &KindTag::logging_v1(), &values).unwrap();

    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].data(), r#"{"level":"debug"}"#);
    assert_eq!(blocks[2].data(), r#"{"level":"warn"}"#);
}

/// An unversioned tag is a different kind and is not matched.
#[test]
fn test_upsert_matches_exact_kind_only() {
    let mut blocks = vec![SettingBlock::from_json(
        KindTag::unversioned(crate::kind_tag::LOGGING_CONFIG_TYPE),
        r#"{"level":"info"}"#,
    )
    .unwrap()];
    let values: Attributes = [("level".to_string(), "debug".to_string())]
        .into_iter()
        .collect();

    upsert_setting_block(&mut blocks, &KindTag::logging_v1(), &values).unwrap();

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].data(), r#"{"level":"info"}"#);
}

#[test]
fn test_from_flags_ignores_unknown_flags() {
    let overrides = CliOverrides::from_flags([("config", "x.yaml"), ("verbose", "true")]);
    assert!(overrides.is_empty());
}
