//! Unit tests for key selection and configuration

use crate::common::text_table;
use tabrecon::config::ConfigFile;
use tabrecon::keys::{CandidateGroup, KeyCandidates, KeyPair, KeySelector};
use tabrecon::normalize::Normalizer;
use tabrecon::TabreconError;

#[test]
fn test_default_candidate_groups() {
    let candidates = KeyCandidates::default();
    let names: Vec<&str> = candidates.groups().iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["document", "line", "vendor"]);
    assert!(candidates.groups()[0].synonyms.iter().any(|s| s == "單號"));
    assert!(candidates.groups()[1].synonyms.iter().any(|s| s == "序號"));
}

#[test]
fn test_automatic_keys_follow_group_order() {
    let normalizer = Normalizer::default();
    let left = normalizer.normalize(&text_table(&["序號", "amount", "單號"], &[]));
    let right = normalizer.normalize(&text_table(&["單號", "序號", "amount"], &[]));

    let candidates = KeyCandidates::default();
    let keys = KeySelector::new(&candidates).automatic(&left, &right);
    assert_eq!(keys, KeyPair::same(["單號", "序號"]));
}

#[test]
fn test_automatic_keys_ignore_case_of_column_names() {
    let normalizer = Normalizer::default();
    let left = normalizer.normalize(&text_table(&["ORDERID", "amount"], &[]));
    let right = normalizer.normalize(&text_table(&["OrderId", "amount"], &[]));

    let candidates = KeyCandidates::new(vec![CandidateGroup::new("order", ["OrderId"])]);
    let keys = KeySelector::new(&candidates).automatic(&left, &right);
    assert_eq!(keys.left, vec!["ORDERID".to_string()]);
    assert_eq!(keys.right, vec!["OrderId".to_string()]);
}

#[test]
fn test_group_found_on_one_side_only_is_skipped() {
    let normalizer = Normalizer::default();
    let left = normalizer.normalize(&text_table(&["單號", "序號"], &[]));
    let right = normalizer.normalize(&text_table(&["單號", "line"], &[]));

    let candidates = KeyCandidates::default();
    let keys = KeySelector::new(&candidates).automatic(&left, &right);
    assert_eq!(keys, KeyPair::same(["單號"]));
}

#[test]
fn test_explicit_keys_missing_from_right() {
    let normalizer = Normalizer::default();
    let left = normalizer.normalize(&text_table(&["id", "amount"], &[]));
    let right = normalizer.normalize(&text_table(&["ref", "amount"], &[]));

    let keys = vec!["id".to_string()];
    let err = KeySelector::explicit(&left, &right, &keys).unwrap_err();
    match err {
        TabreconError::KeyColumnMissing { column, missing_from } => {
            assert_eq!(column, "id");
            assert!(missing_from.contains("right"));
        }
        other => panic!("Expected KeyColumnMissing, got {:?}", other),
    }
}

#[test]
fn test_config_file_keys_must_not_be_empty() {
    let file = ConfigFile {
        keys: Some(Vec::new()),
        ..ConfigFile::default()
    };
    let err = file.into_config().unwrap_err();
    assert!(matches!(err, TabreconError::Config { .. }));
}

#[test]
fn test_config_file_rejects_empty_candidate_group() {
    let file = ConfigFile {
        key_candidates: Some(KeyCandidates::new(vec![CandidateGroup::new(
            "empty",
            Vec::<String>::new(),
        )])),
        ..ConfigFile::default()
    };
    assert!(file.into_config().is_err());
}

#[test]
fn test_config_file_bad_placeholder_pattern() {
    let file = ConfigFile {
        placeholder_pattern: Some("(".to_string()),
        ..ConfigFile::default()
    };
    assert!(matches!(file.into_config(), Err(TabreconError::Regex(_))));
}
