//! Functional tests for the reconciliation pipeline

use crate::common::text_table;
use tabrecon::{CellValue, RawTable, ReconcileConfig, Reconciler};

fn keyed(keys: &[&str]) -> Reconciler {
    Reconciler::new(ReconcileConfig::default().with_keys(keys.iter().copied()))
}

#[test]
fn test_single_changed_amount() {
    let left = text_table(&["id", "amt"], &[&["1", "100"], &["2", "50"]]);
    let right = text_table(&["id", "amt"], &[&["1", "100"], &["2", "75"]]);

    let report = keyed(&["id"]).reconcile(&left, &right).unwrap();

    assert!(report.only_left.is_empty());
    assert!(report.only_right.is_empty());
    assert_eq!(report.matched_count, 2);

    let diffs = report.diff_records();
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].key, vec!["2".to_string()]);
    assert_eq!(diffs[0].column, "amt");
    assert_eq!(diffs[0].left_value, "50");
    assert_eq!(diffs[0].right_value, "75");

    assert_eq!(report.summary.keys_used, vec!["id".to_string()]);
    assert_eq!(report.summary.column_diff_count, 1);
    assert!(!report.is_identical());
}

#[test]
fn test_duplicate_key_surplus_is_unmatched() {
    let left = text_table(&["id", "amt"], &[&["1", "10"], &["1", "20"]]);
    let right = text_table(&["id", "amt"], &[&["1", "10"]]);

    let report = keyed(&["id"]).reconcile(&left, &right).unwrap();

    assert_eq!(report.matched_count, 1);
    assert!(report.diff_records().is_empty());
    assert_eq!(report.only_left.row_count(), 1);
    assert_eq!(report.only_left.value(0, "id"), "1");
    assert_eq!(report.only_left.value(0, "amt"), "20");
    assert!(report.only_right.is_empty());
}

#[test]
fn test_text_date_matches_serial_date() {
    let left = RawTable::from_rows(
        ["id", "date"],
        vec![vec![CellValue::from("1"), CellValue::from("2024/01/05")]],
    )
    .unwrap();
    let right = RawTable::from_rows(
        ["id", "date"],
        vec![vec![CellValue::from("1"), CellValue::Int(45297)]],
    )
    .unwrap();

    let report = keyed(&["id"]).reconcile(&left, &right).unwrap();
    assert!(report.diff_records().is_empty());
    assert!(report.is_identical());
}

#[test]
fn test_iso_and_native_dates_compare_equal() {
    let native = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let left = RawTable::from_rows(
        ["單號", "日期"],
        vec![vec![CellValue::from("A1"), CellValue::DateTime(native)]],
    )
    .unwrap();
    let right = RawTable::from_rows(
        ["單號", "日期"],
        vec![vec![CellValue::from("A1"), CellValue::from("2024-03-01")]],
    )
    .unwrap();

    let report = Reconciler::default().reconcile(&left, &right).unwrap();
    assert!(report.used_keys());
    assert!(report.is_identical());
}

#[test]
fn test_composite_automatic_key() {
    let left = text_table(
        &["單號", "序號", "amount"],
        &[&["A001", "1", "100"], &["A001", "2", "50"], &["A002", "1", "75"]],
    );
    let right = text_table(
        &["單號", "序號", "amount"],
        &[&["A002", "1", "75"], &["A001", "2", "55"], &["A001", "1", "100"]],
    );

    let report = Reconciler::default().reconcile(&left, &right).unwrap();

    assert_eq!(report.summary.keys_used, vec!["單號".to_string(), "序號".to_string()]);
    assert_eq!(report.matched_count, 3);
    let diffs = report.diff_records();
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].key, vec!["A001".to_string(), "2".to_string()]);
    assert_eq!(diffs[0].column, "amount");
}

#[test]
fn test_only_shared_columns_are_compared() {
    let left = text_table(&["id", "amt", "memo"], &[&["1", "10", "a"]]);
    let right = text_table(&["id", "amt", "approved_by"], &[&["1", "10", "kim"]]);

    let report = keyed(&["id"]).reconcile(&left, &right).unwrap();
    assert!(report.is_identical());
}

#[test]
fn test_whitespace_is_not_a_difference() {
    let left = text_table(&["id", "memo"], &[&[" 1", "rent  "]]);
    let right = text_table(&["id", "memo"], &[&["1 ", "rent"]]);

    let report = keyed(&["id"]).reconcile(&left, &right).unwrap();
    assert_eq!(report.matched_count, 1);
    assert!(report.is_identical());
}

#[test]
fn test_integral_float_matches_integer_text() {
    let left = RawTable::from_rows(
        ["id", "amt"],
        vec![vec![CellValue::from("1"), CellValue::Float(100.0)]],
    )
    .unwrap();
    let right = text_table(&["id", "amt"], &[&["1", "100"]]);

    let report = keyed(&["id"]).reconcile(&left, &right).unwrap();
    assert!(report.is_identical());
}

#[test]
fn test_whole_row_fallback_without_keys() {
    let left = text_table(&["a", "b"], &[&["1", "x"], &["2", "y"], &["2", "y"]]);
    let right = text_table(&["a", "b", "c"], &[&["1", "x", ""], &["2", "y", ""]]);

    let report = Reconciler::default().reconcile(&left, &right).unwrap();

    assert!(!report.used_keys());
    assert!(report.column_diff.is_none());
    assert_eq!(report.summary.only_left_count, 1);
    assert_eq!(report.only_left.value(0, "a"), "2");
    assert_eq!(report.summary.only_right_count, 0);
}

#[test]
fn test_different_key_names_under_config_candidates() {
    use tabrecon::keys::{CandidateGroup, KeyCandidates};

    let candidates = KeyCandidates::new(vec![CandidateGroup::new("order", ["OrderId", "Order No"])]);
    let reconciler = Reconciler::new(ReconcileConfig::default().with_key_candidates(candidates));

    let left = text_table(&["orderid", "qty"], &[&["7", "1"], &["8", "2"]]);
    let right = text_table(&["ORDERID", "qty"], &[&["8", "3"], &["9", "1"]]);

    let report = reconciler.reconcile(&left, &right).unwrap();
    assert_eq!(report.summary.keys_used, vec!["orderid".to_string()]);
    assert_eq!(report.keys.right, vec!["ORDERID".to_string()]);
    assert_eq!(report.only_left.value(0, "orderid"), "7");
    assert_eq!(report.only_right.value(0, "ORDERID"), "9");
    assert_eq!(report.diff_records().len(), 1);
    assert_eq!(report.diff_records()[0].left_value, "2");
    assert_eq!(report.diff_records()[0].right_value, "3");
}
