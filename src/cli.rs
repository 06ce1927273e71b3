//! Command-line interface for tabrecon

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default report file for `compare`
pub const DEFAULT_REPORT: &str = "tabrecon_report.xlsx";

#[derive(Parser)]
#[command(name = "tabrecon")]
#[command(about = "Reconcile two spreadsheet exports and report row and column differences")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two tables and write a diff report
    Compare {
        /// Left file (xlsx, xls, xlsb, ods or csv)
        left: PathBuf,

        /// Right file (xlsx, xls, xlsb, ods or csv)
        right: PathBuf,

        /// Sheet in the left file (defaults to the first sheet)
        #[arg(long)]
        left_sheet: Option<String>,

        /// Sheet in the right file (defaults to the first sheet)
        #[arg(long)]
        right_sheet: Option<String>,

        /// Key columns present in both files, in order
        #[arg(long, num_args = 1..)]
        keys: Option<Vec<String>>,

        /// Ignore case when comparing text
        #[arg(long)]
        case_insensitive: bool,

        /// JSON config file with key candidates and normalization settings
        #[arg(long)]
        config: Option<PathBuf>,

        /// Report file path
        #[arg(long, default_value = DEFAULT_REPORT)]
        output: PathBuf,

        /// Report format: "xlsx" or "json" (defaults from the output extension)
        #[arg(long)]
        format: Option<String>,

        /// Quiet output (machine-readable)
        #[arg(long, conflicts_with = "json")]
        quiet: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the sheets of a file
    Sheets {
        /// Input file
        file: PathBuf,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },

    /// Show which key columns automatic selection would pick
    Keys {
        /// Left file
        left: PathBuf,

        /// Right file
        right: PathBuf,

        /// Sheet in the left file (defaults to the first sheet)
        #[arg(long)]
        left_sheet: Option<String>,

        /// Sheet in the right file (defaults to the first sheet)
        #[arg(long)]
        right_sheet: Option<String>,

        /// JSON config file with key candidates
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Parse output format string
#[derive(Debug, Clone)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}
