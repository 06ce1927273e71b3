//! Writing reconciliation reports as xlsx workbooks or JSON

use crate::differ::DiffRecord;
use crate::engine::ReconReport;
use crate::error::{Result, TabreconError};
use crate::table::NormalizedTable;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde::Serialize;
use std::path::Path;

pub const SUMMARY_SHEET: &str = "SUMMARY";
pub const ONLY_LEFT_SHEET: &str = "ONLY_IN_LEFT";
pub const ONLY_RIGHT_SHEET: &str = "ONLY_IN_RIGHT";
pub const COLUMN_DIFF_SHEET: &str = "COLUMN_DIFF";

/// Placeholder written to `keys_used` in fallback mode
pub const NO_KEYS: &str = "(none)";

/// Where the two compared tables came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSources {
    pub left_file: String,
    pub left_sheet: String,
    pub right_file: String,
    pub right_sheet: String,
}

/// Report file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Xlsx,
    Json,
}

impl ReportFormat {
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid report format: {}. Use 'xlsx' or 'json'", s)),
        }
    }

    /// Guess from the output file extension, defaulting to xlsx
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Xlsx,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    sources: &'a ReportSources,
    #[serde(flatten)]
    report: &'a ReconReport,
}

/// Renders a report into one named section per artifact
pub struct ReportWriter;

impl ReportWriter {
    pub fn write(
        report: &ReconReport,
        sources: &ReportSources,
        path: &Path,
        format: ReportFormat,
    ) -> Result<()> {
        match format {
            ReportFormat::Xlsx => Self::write_xlsx(report, sources, path),
            ReportFormat::Json => Self::write_json(report, sources, path),
        }?;
        log::info!("Report written to {}", path.display());
        Ok(())
    }

    pub fn to_json(report: &ReconReport, sources: &ReportSources) -> Result<String> {
        Ok(serde_json::to_string_pretty(&JsonReport { sources, report })?)
    }

    pub fn write_json(report: &ReconReport, sources: &ReportSources, path: &Path) -> Result<()> {
        std::fs::write(path, Self::to_json(report, sources)?)?;
        Ok(())
    }

    /// SUMMARY, ONLY_IN_LEFT and ONLY_IN_RIGHT always; COLUMN_DIFF only when non-empty
    pub fn write_xlsx(report: &ReconReport, sources: &ReportSources, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SUMMARY_SHEET)?;
        Self::write_summary(worksheet, &header, report, sources)?;

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(ONLY_LEFT_SHEET)?;
        Self::write_table(worksheet, &header, &report.only_left)?;

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(ONLY_RIGHT_SHEET)?;
        Self::write_table(worksheet, &header, &report.only_right)?;

        let records = report.diff_records();
        if !records.is_empty() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(COLUMN_DIFF_SHEET)?;
            Self::write_column_diff(worksheet, &header, report.keys.len(), records)?;
        }

        workbook.save(path)?;
        Ok(())
    }

    fn write_summary(
        worksheet: &mut Worksheet,
        header: &Format,
        report: &ReconReport,
        sources: &ReportSources,
    ) -> Result<()> {
        let summary = &report.summary;
        let keys_used = if summary.keys_used.is_empty() {
            NO_KEYS.to_string()
        } else {
            summary.keys_used.join(", ")
        };

        let text_fields = [
            ("left_file", sources.left_file.as_str()),
            ("left_sheet", sources.left_sheet.as_str()),
            ("right_file", sources.right_file.as_str()),
            ("right_sheet", sources.right_sheet.as_str()),
            ("keys_used", keys_used.as_str()),
        ];
        let count_fields = [
            ("only_in_left_rows", summary.only_left_count),
            ("only_in_right_rows", summary.only_right_count),
            ("column_diff_rows", summary.column_diff_count),
        ];

        let mut col: u16 = 0;
        for (name, value) in text_fields {
            worksheet.write_string_with_format(0, col, name, header)?;
            worksheet.write_string(1, col, value)?;
            col += 1;
        }
        worksheet.write_string_with_format(0, col, "same", header)?;
        worksheet.write_boolean(1, col, summary.identical)?;
        col += 1;
        for (name, value) in count_fields {
            worksheet.write_string_with_format(0, col, name, header)?;
            worksheet.write_number(1, col, value as f64)?;
            col += 1;
        }

        worksheet.autofit();
        Ok(())
    }

    fn write_table(worksheet: &mut Worksheet, header: &Format, table: &NormalizedTable) -> Result<()> {
        for (c, name) in table.column_names().enumerate() {
            let (row, col) = cell_index(0, c)?;
            worksheet.write_string_with_format(row, col, name, header)?;
        }
        for (r, values) in table.rows().iter().enumerate() {
            for (c, value) in values.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let (row, col) = cell_index(r + 1, c)?;
                worksheet.write_string(row, col, value)?;
            }
        }
        worksheet.set_freeze_panes(1, 0)?;
        Ok(())
    }

    fn write_column_diff(
        worksheet: &mut Worksheet,
        header: &Format,
        key_len: usize,
        records: &[DiffRecord],
    ) -> Result<()> {
        for (c, name) in DiffRecord::headers(key_len).iter().enumerate() {
            let (row, col) = cell_index(0, c)?;
            worksheet.write_string_with_format(row, col, name, header)?;
        }
        for (r, record) in records.iter().enumerate() {
            for (c, value) in record.flatten().into_iter().enumerate() {
                let (row, col) = cell_index(r + 1, c)?;
                worksheet.write_string(row, col, value)?;
            }
        }
        worksheet.set_freeze_panes(1, 0)?;
        worksheet.autofit();
        Ok(())
    }
}

fn cell_index(row: usize, col: usize) -> Result<(u32, u16)> {
    let row = u32::try_from(row)
        .map_err(|_| TabreconError::invalid_input("Row index overflow"))?;
    let col = u16::try_from(col)
        .map_err(|_| TabreconError::invalid_input("Column index overflow"))?;
    Ok((row, col))
}
