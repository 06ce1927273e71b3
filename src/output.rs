//! Console output for reconciliation results

use crate::engine::{ReconReport, ReconSummary};
use crate::error::Result;
use crate::keys::KeyPair;
use crate::report::ReportSources;

/// Number of diff records previewed on the console
const DIFF_PREVIEW: usize = 3;

/// Pretty printer for tabrecon output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print the outcome of a compare run
    pub fn print_compare_results(report: &ReconReport, sources: &ReportSources) {
        let summary = &report.summary;

        println!(
            "🔍 Compare: {} [{}] → {} [{}]",
            sources.left_file, sources.left_sheet, sources.right_file, sources.right_sheet
        );

        if report.used_keys() {
            println!("├─ 🔑 Keys: {}", format_keys(&report.keys));
            println!("├─ Matched rows: {}", report.matched_count);
        } else {
            println!("├─ ⚠️  Keys: none found, compared whole rows");
        }

        print_count("Only in left", summary.only_left_count);
        print_count("Only in right", summary.only_right_count);

        let records = report.diff_records();
        if report.column_diff.is_none() {
            println!("├─ Column diff: unavailable without keys");
        } else if records.is_empty() {
            println!("├─ ✅ Column diff: none");
        } else {
            println!("├─ ❌ Column diff: {}", records.len());
            for (i, record) in records.iter().take(DIFF_PREVIEW).enumerate() {
                let is_last = i + 1 == records.len().min(DIFF_PREVIEW);
                let marker = if is_last { "└─" } else { "├─" };
                println!(
                    "│  {} [{}] {}: '{}' → '{}'",
                    marker,
                    record.key.join(", "),
                    record.column,
                    record.left_value,
                    record.right_value
                );
            }
            if records.len() > DIFF_PREVIEW {
                println!("│     ... and {} more", records.len() - DIFF_PREVIEW);
            }
        }

        if summary.identical {
            println!("└─ ✅ Tables are identical");
        } else {
            println!("└─ ❌ Tables differ");
        }

        if !report.used_keys() {
            println!();
            println!("🟡 Pass --keys <COLUMN>... to get a column-level diff.");
        }
    }

    /// Machine-readable `key=value` lines
    pub fn print_quiet(summary: &ReconSummary) {
        println!("keys_used={}", summary.keys_used.join(","));
        println!("only_in_left={}", summary.only_left_count);
        println!("only_in_right={}", summary.only_right_count);
        println!("column_diff={}", summary.column_diff_count);
        println!("identical={}", summary.identical);
    }

    /// Print the sheets of a file
    pub fn print_sheet_list(path: &str, sheets: &[String]) {
        if sheets.is_empty() {
            println!("No sheets found in {}.", path);
            return;
        }

        println!("📄 Sheets in {}:", path);
        for (i, sheet) in sheets.iter().enumerate() {
            let prefix = if i == sheets.len() - 1 { "└─" } else { "├─" };
            println!("{} {}", prefix, sheet);
        }
    }

    /// Print what automatic key selection would do for two tables
    pub fn print_key_probe(keys: &KeyPair, compared: &[&str]) {
        println!("🔑 Key probe");
        if keys.is_empty() {
            println!("├─ ⚠️  No candidate key group matched both tables");
        } else {
            println!("├─ Keys: {}", format_keys(keys));
        }
        if compared.is_empty() {
            println!("└─ Compared columns: none");
        } else {
            println!("└─ Compared columns: {}", compared.join(", "));
        }
    }
}

fn print_count(label: &str, count: usize) {
    if count == 0 {
        println!("├─ ✅ {}: 0", label);
    } else {
        println!("├─ ❌ {}: {} rows", label, count);
    }
}

/// `a` when both sides use the same name, `a ↔ b` otherwise
fn format_keys(keys: &KeyPair) -> String {
    keys.left
        .iter()
        .zip(&keys.right)
        .map(|(l, r)| {
            if l == r {
                l.clone()
            } else {
                format!("{} ↔ {}", l, r)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: serde::Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    pub fn format_summary(summary: &ReconSummary, sources: &ReportSources) -> Result<String> {
        let json = serde_json::json!({
            "sources": sources,
            "summary": summary,
        });
        Ok(serde_json::to_string_pretty(&json)?)
    }
}
