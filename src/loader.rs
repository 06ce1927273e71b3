//! Loading spreadsheet sheets and CSV files into raw tables

use crate::error::{Result, TabreconError};
use crate::normalize::spreadsheet_epoch;
use crate::table::{CellValue, RawTable};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use indexmap::IndexSet;
use std::path::{Path, PathBuf};

/// Input file families the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Csv,
}

impl SourceFormat {
    /// Detect the format from the file extension
    pub fn detect(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Workbook),
            "csv" => Ok(Self::Csv),
            _ => Err(TabreconError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// A raw table together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub path: PathBuf,
    pub sheet: String,
    pub table: RawTable,
}

/// Reads one sheet of a workbook or a CSV file
pub struct TableLoader;

impl TableLoader {
    /// Load `sheet` (or the first sheet) from `path`
    pub fn load(path: &Path, sheet: Option<&str>) -> Result<LoadedTable> {
        if !path.is_file() {
            return Err(TabreconError::invalid_input(format!(
                "File not found: {}",
                path.display()
            )));
        }

        let loaded = match SourceFormat::detect(path)? {
            SourceFormat::Workbook => Self::load_workbook(path, sheet)?,
            SourceFormat::Csv => Self::load_csv(path, sheet)?,
        };
        log::info!(
            "Loaded {} rows x {} columns from {} [{}]",
            loaded.table.row_count(),
            loaded.table.column_count(),
            path.display(),
            loaded.sheet
        );
        Ok(loaded)
    }

    /// Sheet names in workbook order; a CSV file has a single sheet named after its stem
    pub fn list_sheets(path: &Path) -> Result<Vec<String>> {
        match SourceFormat::detect(path)? {
            SourceFormat::Workbook => {
                let workbook = open_workbook_auto(path)?;
                Ok(workbook.sheet_names().to_vec())
            }
            SourceFormat::Csv => Ok(vec![csv_sheet_name(path)]),
        }
    }

    fn load_workbook(path: &Path, sheet: Option<&str>) -> Result<LoadedTable> {
        let mut workbook = open_workbook_auto(path)?;
        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

        let sheet_name = match sheet {
            Some(name) if sheet_names.iter().any(|s| s == name) => name.to_string(),
            Some(name) => return Err(TabreconError::sheet_not_found(path, name, &sheet_names)),
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| TabreconError::invalid_input(format!(
                    "Workbook has no sheets: {}",
                    path.display()
                )))?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;
        let grid = range
            .rows()
            .map(|row| row.iter().map(convert_cell).collect())
            .collect();

        Ok(LoadedTable {
            path: path.to_path_buf(),
            table: build_table(grid)?,
            sheet: sheet_name,
        })
    }

    fn load_csv(path: &Path, sheet: Option<&str>) -> Result<LoadedTable> {
        let sheet_name = csv_sheet_name(path);
        if let Some(name) = sheet {
            if name != sheet_name {
                return Err(TabreconError::sheet_not_found(
                    path,
                    name,
                    std::slice::from_ref(&sheet_name),
                ));
            }
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut grid = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row: Vec<CellValue> = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect();
            grid.push(row);
        }

        // Excel writes a UTF-8 byte order mark at the start of CSV exports
        if let Some(CellValue::Text(first)) = grid.first_mut().and_then(|row| row.first_mut()) {
            if let Some(stripped) = first.strip_prefix('\u{feff}') {
                *first = stripped.to_string();
            }
        }

        Ok(LoadedTable {
            path: path.to_path_buf(),
            table: build_table(grid)?,
            sheet: sheet_name,
        })
    }
}

fn csv_sheet_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Turn a grid of cells into a table whose header is the first non-blank row.
///
/// Blank header cells become `Unnamed: N` and repeated names get `.1`, `.2`
/// suffixes. Short rows are padded and trailing blank rows are dropped.
pub fn build_table(grid: Vec<Vec<CellValue>>) -> Result<RawTable> {
    let is_blank_row = |row: &Vec<CellValue>| row.iter().all(CellValue::is_blank);

    let mut rows = grid.into_iter().skip_while(|row| is_blank_row(row));
    let Some(header) = rows.next() else {
        return RawTable::new(Vec::<String>::new());
    };

    let mut body: Vec<Vec<CellValue>> = rows.collect();
    while body.last().is_some_and(|row| is_blank_row(row)) {
        body.pop();
    }

    let width = body
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    let mut columns: IndexSet<String> = IndexSet::with_capacity(width);
    for idx in 0..width {
        let name = header
            .get(idx)
            .map(|cell| cell.render().trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("Unnamed: {}", idx));
        columns.insert(dedupe_column_name(&columns, name));
    }

    let body = body
        .into_iter()
        .map(|mut row| {
            row.resize(width, CellValue::Empty);
            row
        })
        .collect();

    RawTable::from_rows(columns, body)
}

fn dedupe_column_name(existing: &IndexSet<String>, name: String) -> String {
    if !existing.contains(&name) {
        return name;
    }
    (1..)
        .map(|n| format!("{}.{}", name, n))
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or(name)
}

fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        // The 1904 date system is not exposed by calamine; assume 1900
        Data::DateTime(dt) => serial_to_datetime(dt.as_f64())
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Float(dt.as_f64())),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("#ERROR: {:?}", e)),
    }
}

/// Convert a spreadsheet serial (days since 1899-12-30, fraction = time of day)
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.floor();
    let millis = ((serial - days) * 86_400_000.0).round() as i64;
    spreadsheet_epoch()
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::days(days as i64))?
        .checked_add_signed(Duration::milliseconds(millis))
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
