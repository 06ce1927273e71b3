//! # tabrecon
//!
//! Reconciles two tabular spreadsheet exports that should describe the same
//! records: rows found on only one side are reported whole, and rows matched
//! on a join key are compared column by column.

pub mod cli;
pub mod error;
pub mod table;
pub mod normalize;
pub mod keys;
pub mod matcher;
pub mod differ;
pub mod config;
pub mod engine;
pub mod loader;
pub mod report;
pub mod commands;
pub mod output;
pub mod progress;

pub use config::ReconcileConfig;
pub use engine::{ReconReport, ReconSummary, Reconciler};
pub use error::{Result, TabreconError};
pub use table::{CellValue, NormalizedTable, RawTable, Table};
