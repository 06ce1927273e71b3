//! Column-level differences between matched rows

use crate::keys::KeyPair;
use crate::matcher::{key_value, KeyValue, MatchedPair};
use crate::table::NormalizedTable;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One differing cell of one matched pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRecord {
    pub key: KeyValue,
    pub column: String,
    pub left_value: String,
    pub right_value: String,
}

impl DiffRecord {
    /// Header for a flattened record: `key_1..key_N, column, left_value, right_value`
    pub fn headers(key_len: usize) -> Vec<String> {
        (1..=key_len)
            .map(|i| format!("key_{}", i))
            .chain(["column", "left_value", "right_value"].map(String::from))
            .collect()
    }

    /// Values in the order given by [`DiffRecord::headers`]
    pub fn flatten(&self) -> Vec<&str> {
        self.key
            .iter()
            .map(String::as_str)
            .chain([
                self.column.as_str(),
                self.left_value.as_str(),
                self.right_value.as_str(),
            ])
            .collect()
    }

    /// The same discrepancy seen from the other table
    pub fn swapped(&self) -> Self {
        Self {
            key: self.key.clone(),
            column: self.column.clone(),
            left_value: self.right_value.clone(),
            right_value: self.left_value.clone(),
        }
    }
}

impl Serialize for DiffRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.key.len() + 3))?;
        for (i, component) in self.key.iter().enumerate() {
            map.serialize_entry(&format!("key_{}", i + 1), component)?;
        }
        map.serialize_entry("column", &self.column)?;
        map.serialize_entry("left_value", &self.left_value)?;
        map.serialize_entry("right_value", &self.right_value)?;
        map.end()
    }
}

/// Compares shared non-key columns of matched rows
pub struct ColumnDiffer<'a> {
    left: &'a NormalizedTable,
    right: &'a NormalizedTable,
    keys: &'a KeyPair,
    /// (column name, left index, right index)
    compared: Vec<(&'a str, usize, usize)>,
}

impl<'a> ColumnDiffer<'a> {
    pub fn new(left: &'a NormalizedTable, right: &'a NormalizedTable, keys: &'a KeyPair) -> Self {
        let compared = left
            .column_names()
            .enumerate()
            .filter(|(_, name)| !keys.contains(name))
            .filter_map(|(li, name)| right.column_index(name).map(|ri| (name, li, ri)))
            .collect();
        Self {
            left,
            right,
            keys,
            compared,
        }
    }

    /// Columns present in both tables and in neither key list, in left column order
    pub fn compared_columns(&self) -> Vec<&'a str> {
        self.compared.iter().map(|(name, _, _)| *name).collect()
    }

    /// One record per differing compared cell of each pair, in pair order
    pub fn diff(&self, pairs: &[MatchedPair]) -> Vec<DiffRecord> {
        let mut records = Vec::new();
        for pair in pairs {
            self.diff_pair(*pair, &mut records);
        }
        log::debug!(
            "Compared {} columns over {} matched pairs: {} differences",
            self.compared.len(),
            pairs.len(),
            records.len()
        );
        records
    }

    fn diff_pair(&self, pair: MatchedPair, out: &mut Vec<DiffRecord>) {
        let (Some(left_row), Some(right_row)) = (self.left.row(pair.left), self.right.row(pair.right)) else {
            return;
        };

        let mut key: Option<KeyValue> = None;
        for &(column, li, ri) in &self.compared {
            let (l, r) = (&left_row[li], &right_row[ri]);
            if l == r {
                continue;
            }
            let key = key
                .get_or_insert_with(|| key_value(self.left, pair.left, &self.keys.left))
                .clone();
            out.push(DiffRecord {
                key,
                column: column.to_string(),
                left_value: l.clone(),
                right_value: r.clone(),
            });
        }
    }
}
