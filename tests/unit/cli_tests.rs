//! Unit tests for CLI argument parsing and validation

use clap::Parser;
use std::path::PathBuf;
use tabrecon::cli::{Cli, Commands, OutputFormat, DEFAULT_REPORT};

#[test]
fn test_cli_compare_defaults() {
    let cli = Cli::try_parse_from(&["tabrecon", "compare", "left.xlsx", "right.xlsx"]).unwrap();
    assert!(!cli.verbose);
    match cli.command {
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
        } => {
            assert_eq!(left, PathBuf::from("left.xlsx"));
            assert_eq!(right, PathBuf::from("right.xlsx"));
            assert!(left_sheet.is_none());
            assert!(right_sheet.is_none());
            assert!(keys.is_none());
            assert!(!case_insensitive);
            assert!(config.is_none());
            assert_eq!(output, PathBuf::from(DEFAULT_REPORT));
            assert!(format.is_none());
            assert!(!quiet);
            assert!(!json);
        }
        _ => panic!("Expected Compare command"),
    }
}

#[test]
fn test_cli_compare_with_options() {
    let cli = Cli::try_parse_from(&[
        "tabrecon", "compare", "a.xlsx", "b.csv",
        "--left-sheet", "TOTAL",
        "--right-sheet", "b",
        "--keys", "單號", "序號",
        "--case-insensitive",
        "--output", "out.json",
        "--format", "json",
        "--quiet",
    ]).unwrap();

    match cli.command {
        Commands::Compare {
            left_sheet,
            right_sheet,
            keys,
            case_insensitive,
            output,
            format,
            quiet,
            ..
        } => {
            assert_eq!(left_sheet.as_deref(), Some("TOTAL"));
            assert_eq!(right_sheet.as_deref(), Some("b"));
            assert_eq!(keys, Some(vec!["單號".to_string(), "序號".to_string()]));
            assert!(case_insensitive);
            assert_eq!(output, PathBuf::from("out.json"));
            assert_eq!(format.as_deref(), Some("json"));
            assert!(quiet);
        }
        _ => panic!("Expected Compare command"),
    }
}

#[test]
fn test_cli_compare_requires_two_files() {
    assert!(Cli::try_parse_from(&["tabrecon", "compare", "left.xlsx"]).is_err());
}

#[test]
fn test_cli_keys_flag_needs_a_value() {
    assert!(Cli::try_parse_from(&["tabrecon", "compare", "a.csv", "b.csv", "--keys"]).is_err());
}

#[test]
fn test_cli_sheets_command() {
    let cli = Cli::try_parse_from(&["tabrecon", "sheets", "book.xlsx"]).unwrap();
    match cli.command {
        Commands::Sheets { file, format } => {
            assert_eq!(file, PathBuf::from("book.xlsx"));
            assert_eq!(format, "pretty");
        }
        _ => panic!("Expected Sheets command"),
    }
}

#[test]
fn test_cli_keys_command() {
    let cli = Cli::try_parse_from(&[
        "tabrecon", "keys", "a.xlsx", "b.xlsx", "--left-sheet", "TOTAL", "--config", "recon.json",
    ]).unwrap();
    match cli.command {
        Commands::Keys { left, right, left_sheet, right_sheet, config } => {
            assert_eq!(left, PathBuf::from("a.xlsx"));
            assert_eq!(right, PathBuf::from("b.xlsx"));
            assert_eq!(left_sheet.as_deref(), Some("TOTAL"));
            assert!(right_sheet.is_none());
            assert_eq!(config, Some(PathBuf::from("recon.json")));
        }
        _ => panic!("Expected Keys command"),
    }
}

#[test]
fn test_cli_global_verbose_flag() {
    let cli = Cli::try_parse_from(&["tabrecon", "sheets", "book.xlsx", "--verbose"]).unwrap();
    assert!(cli.verbose);

    let cli = Cli::try_parse_from(&["tabrecon", "-v", "sheets", "book.xlsx"]).unwrap();
    assert!(cli.verbose);
}

#[test]
fn test_output_format_parsing() {
    assert!(matches!(OutputFormat::parse("pretty"), Ok(OutputFormat::Pretty)));
    assert!(matches!(OutputFormat::parse("Json"), Ok(OutputFormat::Json)));
    assert!(OutputFormat::parse("table").is_err());
}

#[test]
fn test_invalid_command() {
    assert!(Cli::try_parse_from(&["tabrecon", "merge", "a.csv"]).is_err());
}
