//! Multiset row matching over join keys, with a whole-row fallback

use crate::keys::KeyPair;
use crate::table::NormalizedTable;
use indexmap::IndexMap;
use serde::Serialize;

/// A row's values in the key columns, in key order
pub type KeyValue = Vec<String>;

/// Row indices of one left row and the right row it was paired with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchedPair {
    pub left: usize,
    pub right: usize,
}

/// Partition of both tables' rows into matched pairs and unmatched rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchOutcome {
    /// Grouped by key value in order of first appearance on the left
    pub pairs: Vec<MatchedPair>,
    /// Ascending row indices into the left table
    pub only_left: Vec<usize>,
    /// Ascending row indices into the right table
    pub only_right: Vec<usize>,
}

impl MatchOutcome {
    pub fn matched_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn has_unmatched(&self) -> bool {
        !self.only_left.is_empty() || !self.only_right.is_empty()
    }
}

/// Matches rows by key multiset; duplicate keys pair up in source row order
pub struct MultisetMatcher;

impl MultisetMatcher {
    /// Match rows on the given key columns.
    ///
    /// For a key value seen `L` times on the left and `R` times on the right,
    /// the first `min(L, R)` occurrences on each side pair up positionally and
    /// the trailing surplus on the larger side is unmatched.
    pub fn match_keys(left: &NormalizedTable, right: &NormalizedTable, keys: &KeyPair) -> MatchOutcome {
        let left_groups = group_rows(left, &keys.left);
        let right_groups = group_rows(right, &keys.right);

        let outcome = pair_groups(&left_groups, &right_groups);
        log::debug!(
            "Key match: {} distinct left keys, {} distinct right keys, {} pairs",
            left_groups.len(),
            right_groups.len(),
            outcome.pairs.len()
        );
        outcome
    }

    /// Whole-row multiset difference used when no key is available.
    ///
    /// Signatures span the union of both tables' columns (left order first,
    /// then right-only columns); a column missing from a table reads as "".
    pub fn match_whole_rows(left: &NormalizedTable, right: &NormalizedTable) -> MatchOutcome {
        let mut union: Vec<String> = left.column_names().map(str::to_string).collect();
        for column in right.column_names() {
            if !left.has_column(column) {
                union.push(column.to_string());
            }
        }

        let left_groups = group_rows(left, &union);
        let right_groups = group_rows(right, &union);
        pair_groups(&left_groups, &right_groups)
    }
}

/// Values of `columns` in `row`; a column the table lacks contributes ""
pub fn key_value(table: &NormalizedTable, row: usize, columns: &[String]) -> KeyValue {
    columns
        .iter()
        .map(|column| table.value(row, column).to_string())
        .collect()
}

/// Row indices per key value, in order of first appearance
fn group_rows(table: &NormalizedTable, columns: &[String]) -> IndexMap<KeyValue, Vec<usize>> {
    let indices: Vec<Option<usize>> = columns.iter().map(|c| table.column_index(c)).collect();

    let mut groups: IndexMap<KeyValue, Vec<usize>> = IndexMap::new();
    for (row_idx, row) in table.rows().iter().enumerate() {
        let key = indices
            .iter()
            .map(|idx| idx.and_then(|i| row.get(i)).cloned().unwrap_or_default())
            .collect();
        groups.entry(key).or_default().push(row_idx);
    }
    groups
}

fn pair_groups(
    left_groups: &IndexMap<KeyValue, Vec<usize>>,
    right_groups: &IndexMap<KeyValue, Vec<usize>>,
) -> MatchOutcome {
    let mut outcome = MatchOutcome::default();

    for (key, left_rows) in left_groups {
        let right_rows = right_groups.get(key).map(Vec::as_slice).unwrap_or(&[]);
        let matched = left_rows.len().min(right_rows.len());

        outcome.pairs.extend(
            left_rows[..matched]
                .iter()
                .zip(&right_rows[..matched])
                .map(|(&left, &right)| MatchedPair { left, right }),
        );
        outcome.only_left.extend_from_slice(&left_rows[matched..]);
    }

    for (key, right_rows) in right_groups {
        let matched = left_groups
            .get(key)
            .map_or(0, Vec::len)
            .min(right_rows.len());
        outcome.only_right.extend_from_slice(&right_rows[matched..]);
    }

    outcome.only_left.sort_unstable();
    outcome.only_right.sort_unstable();
    outcome
}
