//! Reconciliation pipeline: normalize, select keys, match, diff

use crate::config::ReconcileConfig;
use crate::differ::{ColumnDiffer, DiffRecord};
use crate::error::Result;
use crate::keys::{KeyPair, KeySelector};
use crate::matcher::MultisetMatcher;
use crate::normalize::Normalizer;
use crate::table::{NormalizedTable, RawTable};
use serde::Serialize;

/// Counts describing one reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    /// Left table's key column names; empty in whole-row fallback mode
    pub keys_used: Vec<String>,
    pub only_left_count: usize,
    pub only_right_count: usize,
    pub column_diff_count: usize,
    pub identical: bool,
}

/// Full result of comparing two tables
#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub summary: ReconSummary,
    pub keys: KeyPair,
    pub matched_count: usize,
    pub only_left: NormalizedTable,
    pub only_right: NormalizedTable,
    /// `None` when no key was established and rows were compared whole
    pub column_diff: Option<Vec<DiffRecord>>,
}

impl ReconReport {
    pub fn is_identical(&self) -> bool {
        self.summary.identical
    }

    /// True when rows were joined on key columns rather than compared whole
    pub fn used_keys(&self) -> bool {
        !self.keys.is_empty()
    }

    pub fn diff_records(&self) -> &[DiffRecord] {
        self.column_diff.as_deref().unwrap_or(&[])
    }
}

/// Runs reconciliations with a fixed configuration
pub struct Reconciler {
    config: ReconcileConfig,
    normalizer: Normalizer,
}

impl Reconciler {
    pub fn new(config: ReconcileConfig) -> Self {
        let normalizer = Normalizer::new(config.normalize.clone());
        Self { config, normalizer }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    pub fn normalize(&self, table: &RawTable) -> NormalizedTable {
        self.normalizer.normalize(table)
    }

    /// Normalize both raw tables and reconcile them
    pub fn reconcile(&self, left: &RawTable, right: &RawTable) -> Result<ReconReport> {
        let left = self.normalize(left);
        let right = self.normalize(right);
        self.reconcile_normalized(&left, &right)
    }

    /// Key selection failures are the only error; everything after is infallible
    pub fn select_keys(&self, left: &NormalizedTable, right: &NormalizedTable) -> Result<KeyPair> {
        KeySelector::new(&self.config.key_candidates).select(
            left,
            right,
            self.config.explicit_keys.as_deref(),
        )
    }

    pub fn reconcile_normalized(
        &self,
        left: &NormalizedTable,
        right: &NormalizedTable,
    ) -> Result<ReconReport> {
        let keys = self.select_keys(left, right)?;

        let (outcome, column_diff) = if keys.is_empty() {
            log::warn!(
                "No key columns could be determined; comparing whole rows without column-level diff"
            );
            (MultisetMatcher::match_whole_rows(left, right), None)
        } else {
            log::info!("Joining on key columns: {}", keys.left.join(", "));
            let outcome = MultisetMatcher::match_keys(left, right, &keys);
            let records = ColumnDiffer::new(left, right, &keys).diff(&outcome.pairs);
            (outcome, Some(records))
        };

        let only_left = left.select_rows(&outcome.only_left);
        let only_right = right.select_rows(&outcome.only_right);
        let column_diff_count = column_diff.as_ref().map_or(0, Vec::len);

        let summary = ReconSummary {
            keys_used: keys.left.clone(),
            only_left_count: only_left.row_count(),
            only_right_count: only_right.row_count(),
            column_diff_count,
            identical: only_left.is_empty() && only_right.is_empty() && column_diff_count == 0,
        };

        log::info!(
            "Reconciled {} left rows against {} right rows: {} only left, {} only right, {} cell differences",
            left.row_count(),
            right.row_count(),
            summary.only_left_count,
            summary.only_right_count,
            summary.column_diff_count
        );

        Ok(ReconReport {
            summary,
            keys,
            matched_count: outcome.matched_count(),
            only_left,
            only_right,
            column_diff,
        })
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(ReconcileConfig::default())
    }
}
