//! Command implementations for tabrecon CLI

use crate::cli::{Commands, OutputFormat};
use crate::config::{ConfigFile, ReconcileConfig};
use crate::differ::ColumnDiffer;
use crate::engine::Reconciler;
use crate::error::{Result, TabreconError};
use crate::loader::TableLoader;
use crate::output::{JsonFormatter, PrettyPrinter};
use crate::progress::ProgressReporter;
use crate::report::{ReportFormat, ReportSources, ReportWriter};
use std::path::{Path, PathBuf};

/// Arguments of the `compare` command
#[derive(Debug, Clone)]
pub struct CompareRequest {
    pub left: PathBuf,
    pub right: PathBuf,
    pub left_sheet: Option<String>,
    pub right_sheet: Option<String>,
    pub keys: Option<Vec<String>>,
    pub case_insensitive: bool,
    pub config: Option<PathBuf>,
    pub output: PathBuf,
    pub format: Option<String>,
    pub quiet: bool,
    pub json: bool,
}

/// Execute a command
pub fn execute_command(command: Commands) -> Result<()> {
    match command {
        Commands::Compare {
            left,
            right,
            left_sheet,
            right_sheet,
            keys,
            case_insensitive,
            config,
            output,
            format,
            quiet,
            json,
        } => compare_command(CompareRequest {
            left,
            right,
            left_sheet,
            right_sheet,
            keys,
            case_insensitive,
            config,
            output,
            format,
            quiet,
            json,
        }),
        Commands::Sheets { file, format } => sheets_command(&file, &format),
        Commands::Keys {
            left,
            right,
            left_sheet,
            right_sheet,
            config,
        } => keys_command(
            &left,
            &right,
            left_sheet.as_deref(),
            right_sheet.as_deref(),
            config.as_deref(),
        ),
    }
}

/// Defaults, overlaid with the config file when one is given
fn load_config(path: Option<&Path>) -> Result<ReconcileConfig> {
    match path {
        Some(path) => ConfigFile::load(path)?.into_config(),
        None => Ok(ReconcileConfig::default()),
    }
}

/// Compare two tables and write the report
pub fn compare_command(request: CompareRequest) -> Result<()> {
    let mut config = load_config(request.config.as_deref())?;
    if let Some(keys) = request.keys {
        config.explicit_keys = Some(keys);
    }
    if request.case_insensitive {
        config.normalize.case_insensitive = true;
    }

    let report_format = match request.format.as_deref() {
        Some(format) => ReportFormat::parse(format).map_err(TabreconError::invalid_input)?,
        None => ReportFormat::from_path(&request.output),
    };

    let mut progress = if request.quiet || request.json {
        ProgressReporter::new_minimal()
    } else {
        ProgressReporter::new_for_compare()
    };

    progress.start_stage("Loading left table...");
    let left = TableLoader::load(&request.left, request.left_sheet.as_deref())?;
    progress.start_stage("Loading right table...");
    let right = TableLoader::load(&request.right, request.right_sheet.as_deref())?;

    let reconciler = Reconciler::new(config);
    progress.start_stage("Normalizing values...");
    let left_table = reconciler.normalize(&left.table);
    let right_table = reconciler.normalize(&right.table);

    progress.start_stage("Matching rows...");
    let report = reconciler.reconcile_normalized(&left_table, &right_table)?;

    let sources = ReportSources {
        left_file: request.left.display().to_string(),
        left_sheet: left.sheet,
        right_file: request.right.display().to_string(),
        right_sheet: right.sheet,
    };

    progress.start_stage("Writing report...");
    ReportWriter::write(&report, &sources, &request.output, report_format)?;
    let elapsed = progress.elapsed();
    progress.finish_stage(&format!("Compared in {:.2?}", elapsed));
    drop(progress);

    if request.quiet {
        PrettyPrinter::print_quiet(&report.summary);
    } else if request.json {
        println!("{}", JsonFormatter::format_summary(&report.summary, &sources)?);
    } else {
        PrettyPrinter::print_compare_results(&report, &sources);
        println!("📄 Report: {}", request.output.display());
    }

    Ok(())
}

/// List the sheets of a file
fn sheets_command(file: &Path, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format).map_err(TabreconError::invalid_input)?;
    let sheets = TableLoader::list_sheets(file)?;

    match format {
        OutputFormat::Pretty => PrettyPrinter::print_sheet_list(&file.display().to_string(), &sheets),
        OutputFormat::Json => println!("{}", JsonFormatter::format(&sheets)?),
    }

    Ok(())
}

/// Show the key columns and compared columns for two tables
fn keys_command(
    left: &Path,
    right: &Path,
    left_sheet: Option<&str>,
    right_sheet: Option<&str>,
    config: Option<&Path>,
) -> Result<()> {
    let reconciler = Reconciler::new(load_config(config)?);
    let left = reconciler.normalize(&TableLoader::load(left, left_sheet)?.table);
    let right = reconciler.normalize(&TableLoader::load(right, right_sheet)?.table);

    let keys = reconciler.select_keys(&left, &right)?;
    let differ = ColumnDiffer::new(&left, &right, &keys);
    PrettyPrinter::print_key_probe(&keys, &differ.compared_columns());

    Ok(())
}
