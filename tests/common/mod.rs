//! Common test utilities and helpers

use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};
use tabrecon::{CellValue, RawTable, Result};
use tempfile::TempDir;

/// Test fixture manager for creating temporary test environments
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Get the root path of the test fixture
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Create a test CSV file; the first row is the header
    pub fn create_csv(&self, name: &str, data: &[Vec<&str>]) -> Result<PathBuf> {
        let path = self.path(name);
        let mut writer = csv::Writer::from_path(&path)?;
        for row in data {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(path)
    }

    /// Create a workbook with one sheet per `(sheet name, header, rows)`
    pub fn create_xlsx(&self, name: &str, sheets: &[(&str, Vec<&str>, Vec<Vec<CellValue>>)]) -> Result<PathBuf> {
        let path = self.path(name);
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        for (sheet_name, header, rows) in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(*sheet_name)?;
            for (c, column) in header.iter().enumerate() {
                worksheet.write_string(0, c as u16, *column)?;
            }
            for (r, row) in rows.iter().enumerate() {
                let r = r as u32 + 1;
                for (c, cell) in row.iter().enumerate() {
                    let c = c as u16;
                    match cell {
                        CellValue::Empty => {}
                        CellValue::Text(s) => {
                            worksheet.write_string(r, c, s)?;
                        }
                        CellValue::Int(i) => {
                            worksheet.write_number(r, c, *i as f64)?;
                        }
                        CellValue::Float(f) => {
                            worksheet.write_number(r, c, *f)?;
                        }
                        CellValue::Bool(b) => {
                            worksheet.write_boolean(r, c, *b)?;
                        }
                        CellValue::DateTime(dt) => {
                            let serial = (dt.date() - tabrecon::normalize::spreadsheet_epoch()).num_days();
                            worksheet.write_number_with_format(r, c, serial as f64, &date_format)?;
                        }
                    }
                }
            }
        }

        workbook.save(&path)?;
        Ok(path)
    }
}

/// Build a raw text table from string literals
pub fn text_table(columns: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::from_text(columns, rows).expect("valid table")
}

/// Helper for running CLI commands in tests
pub struct CliTestRunner {
    fixture: TestFixture,
}

impl CliTestRunner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fixture: TestFixture::new()?,
        })
    }

    pub fn fixture(&self) -> &TestFixture {
        &self.fixture
    }

    /// Run a tabrecon command and return the result
    pub fn run_command(&self, args: &[&str]) -> Result<()> {
        use clap::Parser;
        use tabrecon::cli::Cli;
        use tabrecon::commands::execute_command;

        let mut cmd_args = vec!["tabrecon"];
        cmd_args.extend(args);

        let cli = Cli::try_parse_from(cmd_args)
            .map_err(|e| tabrecon::TabreconError::invalid_input(e.to_string()))?;
        execute_command(cli.command)
    }

    /// Run a command and expect it to succeed
    pub fn expect_success(&self, args: &[&str]) {
        self.run_command(args).expect("Command should succeed");
    }

    /// Run a command and expect it to fail
    pub fn expect_failure(&self, args: &[&str]) -> tabrecon::TabreconError {
        self.run_command(args).expect_err("Command should fail")
    }

    /// Read a JSON report written by `compare --format json`
    pub fn read_json(&self, path: &Path) -> serde_json::Value {
        let content = std::fs::read_to_string(path).expect("report should exist");
        serde_json::from_str(&content).expect("report should be valid JSON")
    }
}

/// Sample data generators for testing
pub mod sample_data {
    pub fn left_ledger() -> Vec<Vec<&'static str>> {
        vec![
            vec!["單號", "序號", "amount", "memo"],
            vec!["A001", "1", "100", "rent"],
            vec!["A001", "2", "50", "utilities"],
            vec!["A002", "1", "75", "Supplies"],
            vec!["A003", "1", "20", "misc"],
        ]
    }

    pub fn right_ledger() -> Vec<Vec<&'static str>> {
        vec![
            vec!["單號", "序號", "amount", "memo", "approved_by"],
            vec!["A002", "1", "75", "supplies ", "kim"],
            vec!["A001", "1", "100", "rent", "kim"],
            vec!["A001", "2", "55", "utilities", "lee"],
            vec!["A004", "1", "10", "misc", "lee"],
        ]
    }
}
