//! `license-listgen` — generate every published form of a license list from one source.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]) and validate paths.
//! 3. Build the ignore list ([`outcome::IgnoreList`]).
//! 4. Run the pipeline ([`generator::generate`]): open the source ([`source`]),
//!    check each record ([`check`], [`metadata`], [`tester`]) and fan it out
//!    to every output format ([`writer`]).
//! 5. Render the warning report ([`report`]).
//! 6. Exit `0` (clean), `64` (unexpected warnings) or `1` (fatal error).

mod check;
mod cli;
mod config;
mod error;
mod generator;
mod metadata;
mod models;
mod outcome;
mod report;
mod source;
mod tester;
mod writer;

use std::path::Path;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use colored::Colorize;

use cli::Cli;
use config::load_config;
use error::GeneratorError;
use generator::{generate, GeneratorOptions};
use outcome::{exit_status, IgnoreList, ERROR_STATUS};
use report::progress::Progress;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(ERROR_STATUS);
            }
        },
    };

    let status = match run(cli) {
        Ok(status) => status,
        Err(e) => {
            eprintln!("{}", error_report(&e));
            ERROR_STATUS
        }
    };
    std::process::exit(status);
}

fn run(cli: Cli) -> Result<i32> {
    let cwd = std::env::current_dir().context("unable to determine working directory")?;
    let config = load_config(&cwd, cli.config.as_deref())?;

    validate_paths(&cli)?;

    let mut ignored = match cli.ignored_warnings.as_deref() {
        Some(arg) => IgnoreList::from_arg(arg)?,
        None => IgnoreList::default(),
    };
    ignored.extend(config.ignored_warnings);

    let options = GeneratorOptions {
        input: cli.input.clone(),
        output_dir: cli.output_dir.clone(),
        version: cli.list_version.clone(),
        release_date: cli.release_date.clone(),
        test_dir: cli.test_dir.clone(),
        fsf_data: cli.fsf_data.clone().or(config.fsf_data),
        resources_dir: config.resources_dir,
    };

    if !cli.quiet {
        eprintln!(
            "  {} Generating license list from {}",
            "→".cyan(),
            options.input.display()
        );
    }

    let mut progress = if cli.quiet {
        Progress::hidden()
    } else {
        Progress::visible()
    };
    let generated = generate(&options, &mut progress)?;
    drop(progress);

    report::terminal::render(&generated, &options.output_dir, &ignored, cli.verbose, cli.quiet)?;

    Ok(exit_status(&generated.warnings, &ignored))
}

/// Error line for the operator; argument errors also carry the usage text.
fn error_report(e: &anyhow::Error) -> String {
    let mut out = format!("{} {:#}", "error:".red().bold(), e);
    if let Some(GeneratorError::Argument(_)) = e.downcast_ref::<GeneratorError>() {
        out.push_str(&format!("\n\n{}", Cli::command().render_usage()));
    }
    out
}

/// Reject unusable paths before any output is produced. The output directory
/// is created when absent.
fn validate_paths(cli: &Cli) -> Result<(), GeneratorError> {
    if !cli.input.exists() {
        return Err(GeneratorError::Argument(format!(
            "input {} does not exist",
            cli.input.display()
        )));
    }

    if let Some(test_dir) = &cli.test_dir {
        if !test_dir.exists() {
            return Err(GeneratorError::Argument(format!(
                "license test directory {} does not exist",
                test_dir.display()
            )));
        }
        if !test_dir.is_dir() {
            return Err(GeneratorError::Argument(format!(
                "license test directory {} is not a directory",
                test_dir.display()
            )));
        }
    }

    ensure_output_dir(&cli.output_dir)
}

fn ensure_output_dir(dir: &Path) -> Result<(), GeneratorError> {
    if dir.exists() {
        if dir.is_dir() {
            return Ok(());
        }
        return Err(GeneratorError::Argument(format!(
            "output {} is not a directory",
            dir.display()
        )));
    }
    std::fs::create_dir_all(dir).map_err(|e| {
        GeneratorError::Argument(format!(
            "unable to create output directory {}: {}",
            dir.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cli(input: PathBuf, output_dir: PathBuf, test_dir: Option<PathBuf>) -> Cli {
        Cli {
            input,
            output_dir,
            list_version: None,
            release_date: None,
            test_dir,
            ignored_warnings: None,
            config: None,
            fsf_data: None,
            verbose: false,
            quiet: true,
        }
    }

    #[test]
    fn test_missing_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let args = cli(dir.path().join("missing"), dir.path().join("out"), None);
        assert!(matches!(validate_paths(&args), Err(GeneratorError::Argument(_))));
    }

    #[test]
    fn test_test_dir_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        let args = cli(dir.path().to_path_buf(), dir.path().join("out"), Some(file));
        assert!(matches!(validate_paths(&args), Err(GeneratorError::Argument(_))));
    }

    #[test]
    fn test_output_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a").join("b");
        let args = cli(dir.path().to_path_buf(), out.clone(), None);
        validate_paths(&args).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn test_argument_errors_include_usage() {
        let dir = tempfile::tempdir().unwrap();
        let args = cli(dir.path().join("missing"), dir.path().join("out"), None);
        let err = anyhow::Error::from(validate_paths(&args).unwrap_err());
        let report = error_report(&err);
        assert!(report.contains("does not exist"));
        assert!(report.contains("Usage:"));
        assert!(report.contains("<INPUT> <OUTPUT_DIR>"));

        let fatal = anyhow::Error::from(GeneratorError::Internal("boom".into()));
        assert!(!error_report(&fatal).contains("Usage:"));
    }

    #[test]
    fn test_output_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::write(&out, "x").unwrap();
        let args = cli(dir.path().to_path_buf(), out, None);
        assert!(matches!(validate_paths(&args), Err(GeneratorError::Argument(_))));
    }
}
