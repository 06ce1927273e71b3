//! Error types for tabrecon operations

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TabreconError>;

#[derive(Error, Debug)]
pub enum TabreconError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet read error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Workbook write error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Sheet '{sheet}' not found in {path} (available: {available})")]
    SheetNotFound {
        path: PathBuf,
        sheet: String,
        available: String,
    },

    #[error("Key column '{column}' is not present in {missing_from}")]
    KeyColumnMissing {
        column: String,
        missing_from: String,
    },

    #[error("Unsupported file type: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl TabreconError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn sheet_not_found(path: impl Into<PathBuf>, sheet: impl Into<String>, available: &[String]) -> Self {
        Self::SheetNotFound {
            path: path.into(),
            sheet: sheet.into(),
            available: available.join(", "),
        }
    }

    /// Usage errors abort the run before any output is produced
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::SheetNotFound { .. }
                | Self::KeyColumnMissing { .. }
                | Self::UnsupportedFormat { .. }
                | Self::Config { .. }
                | Self::InvalidInput { .. }
        )
    }
}
