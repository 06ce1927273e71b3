//! Cell normalization: turns heterogeneous spreadsheet values into comparable strings

use crate::table::{CellValue, NormalizedTable, RawTable, Table};
use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::ops::RangeInclusive;

/// Canonical rendering for every recognized date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Matches empty headers and pandas-style `Unnamed: N` placeholders
pub const DEFAULT_PLACEHOLDER_PATTERN: &str = r"^(?:Unnamed.*)?$";

/// Serial 18264 is 1950-01-01, serial 73415 is 2100-12-31
pub const DEFAULT_DATE_SERIAL_MIN: f64 = 18264.0;
pub const DEFAULT_DATE_SERIAL_MAX: f64 = 73415.0;

/// One attempt at reading a cell as a calendar date
pub trait DateParser: Send + Sync {
    fn name(&self) -> &'static str;

    fn parse(&self, cell: &CellValue) -> Option<NaiveDate>;
}

/// Cells the spreadsheet reader already typed as date/time
pub struct NativeDateTime;

impl DateParser for NativeDateTime {
    fn name(&self) -> &'static str {
        "native"
    }

    fn parse(&self, cell: &CellValue) -> Option<NaiveDate> {
        match cell {
            CellValue::DateTime(dt) => Some(dt.date()),
            _ => None,
        }
    }
}

/// Text cells in a fixed chrono format
pub struct TextDateFormat {
    name: &'static str,
    format: &'static str,
}

impl TextDateFormat {
    pub const fn new(name: &'static str, format: &'static str) -> Self {
        Self { name, format }
    }
}

impl DateParser for TextDateFormat {
    fn name(&self) -> &'static str {
        self.name
    }

    fn parse(&self, cell: &CellValue) -> Option<NaiveDate> {
        match cell {
            CellValue::Text(s) => NaiveDate::parse_from_str(s.trim(), self.format).ok(),
            _ => None,
        }
    }
}

/// Spreadsheet day counts (epoch 1899-12-30), restricted to a plausible window
pub struct SerialDayCount {
    epoch: NaiveDate,
    range: RangeInclusive<f64>,
}

impl SerialDayCount {
    pub fn new(range: RangeInclusive<f64>) -> Self {
        Self {
            epoch: spreadsheet_epoch(),
            range,
        }
    }
}

impl DateParser for SerialDayCount {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn parse(&self, cell: &CellValue) -> Option<NaiveDate> {
        let serial = cell.as_number()?;
        if !self.range.contains(&serial) {
            return None;
        }
        self.epoch
            .checked_add_signed(Duration::days(serial.floor() as i64))
    }
}

/// The 1900 date system's day zero
pub fn spreadsheet_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// Ordered list of date parsers; the first one that succeeds wins
pub struct DateParseChain {
    parsers: Vec<Box<dyn DateParser>>,
}

impl DateParseChain {
    pub fn new(parsers: Vec<Box<dyn DateParser>>) -> Self {
        Self { parsers }
    }

    /// native → `YYYY/MM/DD` → `YYYY-MM-DD` → serial day count
    pub fn standard(serial_range: RangeInclusive<f64>) -> Self {
        Self::new(vec![
            Box::new(NativeDateTime),
            Box::new(TextDateFormat::new("slash", "%Y/%m/%d")),
            Box::new(TextDateFormat::new("iso", "%Y-%m-%d")),
            Box::new(SerialDayCount::new(serial_range)),
        ])
    }

    pub fn parse(&self, cell: &CellValue) -> Option<NaiveDate> {
        self.parsers.iter().find_map(|p| p.parse(cell))
    }

    /// Like `parse`, but also reports which parser matched
    pub fn parse_with_source(&self, cell: &CellValue) -> Option<(&'static str, NaiveDate)> {
        self.parsers
            .iter()
            .find_map(|p| p.parse(cell).map(|d| (p.name(), d)))
    }

    pub fn parser_names(&self) -> Vec<&'static str> {
        self.parsers.iter().map(|p| p.name()).collect()
    }
}

/// Settings that control normalization
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub case_insensitive: bool,
    pub detect_dates: bool,
    pub placeholder_pattern: Regex,
    pub date_serial_range: RangeInclusive<f64>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            detect_dates: true,
            placeholder_pattern: Regex::new(DEFAULT_PLACEHOLDER_PATTERN)
                .expect("Invalid placeholder pattern"),
            date_serial_range: DEFAULT_DATE_SERIAL_MIN..=DEFAULT_DATE_SERIAL_MAX,
        }
    }
}

/// Converts raw tables into normalized tables
pub struct Normalizer {
    options: NormalizeOptions,
    dates: DateParseChain,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        let dates = DateParseChain::standard(options.date_serial_range.clone());
        Self { options, dates }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize every cell of `table`, dropping blank placeholder columns.
    ///
    /// The input is left untouched and the row count is preserved.
    pub fn normalize(&self, table: &RawTable) -> NormalizedTable {
        let kept: Vec<(usize, &String)> = table
            .columns()
            .iter()
            .enumerate()
            .filter(|(idx, name)| {
                let drop = self.is_placeholder_column(table, *idx, name);
                if drop {
                    log::debug!("Dropping blank placeholder column '{}'", name);
                }
                !drop
            })
            .collect();

        let date_columns: Vec<bool> = kept
            .iter()
            .map(|(idx, name)| {
                let is_date = self.options.detect_dates && self.is_date_column(table, *idx);
                if is_date {
                    log::debug!("Column '{}' holds date values", name);
                }
                is_date
            })
            .collect();

        let rows = table
            .rows()
            .iter()
            .map(|row| {
                kept.iter()
                    .zip(&date_columns)
                    .map(|((idx, _), &is_date)| self.normalize_cell(&row[*idx], is_date))
                    .collect()
            })
            .collect();

        let columns = kept.into_iter().map(|(_, name)| name.clone()).collect();
        Table::from_parts(columns, rows)
    }

    /// Canonical form of a single cell
    pub fn normalize_cell(&self, cell: &CellValue, date_column: bool) -> String {
        if date_column {
            if let Some(date) = self.dates.parse(cell) {
                return date.format(DATE_FORMAT).to_string();
            }
        }

        match cell {
            CellValue::Empty => String::new(),
            other => {
                let rendered = other.render();
                let trimmed = rendered.trim();
                if self.options.case_insensitive {
                    trimmed.to_lowercase()
                } else {
                    trimmed.to_string()
                }
            }
        }
    }

    fn is_placeholder_column(&self, table: &RawTable, index: usize, name: &str) -> bool {
        self.options.placeholder_pattern.is_match(name)
            && table.column_values(index).all(CellValue::is_blank)
    }

    /// A column is date-like when at least one of its cells parses as a date
    fn is_date_column(&self, table: &RawTable, index: usize) -> bool {
        table
            .column_values(index)
            .any(|cell| self.dates.parse(cell).is_some())
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

impl From<&NormalizedTable> for RawTable {
    fn from(table: &NormalizedTable) -> Self {
        let rows = table
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|v| {
                        if v.is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::Text(v.clone())
                        }
                    })
                    .collect()
            })
            .collect();
        Table::from_parts(table.columns().clone(), rows)
    }
}
