//! Join key selection, either explicit or by probing candidate column groups

use crate::error::{Result, TabreconError};
use crate::table::NormalizedTable;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Synonym column names that denote the same key component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateGroup {
    pub name: String,
    pub synonyms: Vec<String>,
}

impl CandidateGroup {
    pub fn new<I, S>(name: impl Into<String>, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            synonyms: synonyms.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered candidate groups probed by automatic key selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCandidates {
    groups: Vec<CandidateGroup>,
}

impl KeyCandidates {
    pub fn new(groups: Vec<CandidateGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[CandidateGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for KeyCandidates {
    /// Document number, then line sequence, then vendor code
    fn default() -> Self {
        Self::new(vec![
            CandidateGroup::new(
                "document",
                [
                    "憑單單", "憑單號", "憑單編號", "憑單No", "憑單NO", "單號", "單據號", "單據編號",
                    "DocumentNo", "DocNo",
                ],
            ),
            CandidateGroup::new("line", ["序號", "項次", "行號", "Line", "line"]),
            CandidateGroup::new(
                "vendor",
                ["供應商代碼", "廠商代碼", "廠商代碼(代號)", "廠商代號", "VendorCode"],
            ),
        ])
    }
}

/// Parallel key column lists; position `i` names the same key component on both sides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyPair {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl KeyPair {
    pub fn new(left: Vec<String>, right: Vec<String>) -> Self {
        debug_assert_eq!(left.len(), right.len());
        Self { left, right }
    }

    /// The same names on both sides
    pub fn same<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let left: Vec<String> = names.into_iter().map(Into::into).collect();
        Self {
            right: left.clone(),
            left,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// True when `column` is a key column on either side
    pub fn contains(&self, column: &str) -> bool {
        self.left.iter().chain(&self.right).any(|k| k == column)
    }

    /// Swap the roles of the two tables
    pub fn swapped(&self) -> Self {
        Self {
            left: self.right.clone(),
            right: self.left.clone(),
        }
    }
}

/// Picks the join key for a pair of normalized tables
pub struct KeySelector<'a> {
    candidates: &'a KeyCandidates,
}

impl<'a> KeySelector<'a> {
    pub fn new(candidates: &'a KeyCandidates) -> Self {
        Self { candidates }
    }

    /// Explicit keys win when given; otherwise probe the candidate groups.
    ///
    /// An empty result means no key could be established.
    pub fn select(
        &self,
        left: &NormalizedTable,
        right: &NormalizedTable,
        explicit: Option<&[String]>,
    ) -> Result<KeyPair> {
        match explicit {
            Some(names) if !names.is_empty() => Self::explicit(left, right, names),
            _ => Ok(self.automatic(left, right)),
        }
    }

    /// Every explicit name must exist, case-sensitively, in both tables
    pub fn explicit(
        left: &NormalizedTable,
        right: &NormalizedTable,
        names: &[String],
    ) -> Result<KeyPair> {
        let mut seen = HashSet::new();
        for name in names {
            if !seen.insert(name.as_str()) {
                return Err(TabreconError::invalid_input(format!(
                    "Key column '{}' given more than once",
                    name
                )));
            }

            let missing_from = match (left.has_column(name), right.has_column(name)) {
                (true, true) => continue,
                (false, true) => "the left table",
                (true, false) => "the right table",
                (false, false) => "either table",
            };
            return Err(TabreconError::KeyColumnMissing {
                column: name.clone(),
                missing_from: missing_from.to_string(),
            });
        }

        log::debug!("Using explicit key columns: {}", names.join(", "));
        Ok(KeyPair::same(names.iter().cloned()))
    }

    /// Probe each candidate group in order, taking the first synonym present in both tables
    pub fn automatic(&self, left: &NormalizedTable, right: &NormalizedTable) -> KeyPair {
        let mut pair = KeyPair::default();

        for group in self.candidates.groups() {
            let found = group.synonyms.iter().find_map(|synonym| {
                let l = find_column_ignore_case(left, synonym)?;
                let r = find_column_ignore_case(right, synonym)?;
                Some((l, r))
            });

            match found {
                Some((l, r)) if !pair.left.iter().any(|k| k == l) && !pair.right.iter().any(|k| k == r) => {
                    log::debug!("Key group '{}' matched columns '{}' / '{}'", group.name, l, r);
                    pair.left.push(l.to_string());
                    pair.right.push(r.to_string());
                }
                Some(_) => {
                    log::debug!("Key group '{}' only matched columns already in the key", group.name);
                }
                None => {}
            }
        }

        pair
    }
}

/// Exact name first, then the first column equal ignoring case
fn find_column_ignore_case<'t>(table: &'t NormalizedTable, name: &str) -> Option<&'t str> {
    if let Some(idx) = table.column_index(name) {
        return table.columns().get_index(idx).map(String::as_str);
    }
    let wanted = name.to_lowercase();
    table
        .column_names()
        .find(|column| column.to_lowercase() == wanted)
}
