// crates/tabletest-cli/src/main.rs
// ============================================================================
// Module: Tabletest CLI Entry Point
// Description: Command-line runner for manifest-declared suites.
// Purpose: Run suites, print the breakdown, and persist the JSON report.
// Dependencies: clap, tabletest-cli, tabletest-runner, tabletest-sources, tokio
// ============================================================================

//! ## Overview
//! The `tabletest` binary loads a TOML suite manifest, builds the declared
//! collaborator and registrations, runs every (method, row) pairing, and
//! prints the per-result breakdown. The exit status is zero only when
//! every result passed; fatal errors print to stderr and exit non-zero
//! before any partial report is written.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use tabletest_cli::AppError;
use tabletest_cli::SuiteApp;
use tabletest_core::Verdict;
use tabletest_runner::ReportError;
use tabletest_runner::SuiteConfig;
use tabletest_runner::render_summary;
use tabletest_runner::to_json;

// ============================================================================
// SECTION: Arguments
// ============================================================================

/// Data-driven table test runner.
#[derive(Debug, Parser)]
#[command(name = "tabletest", version, about = "Runs manifest-declared table test suites")]
struct Cli {
    /// Path to the TOML suite manifest.
    manifest: PathBuf,

    /// Maximum number of invocations in flight at once.
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Wall-clock budget for the whole run, in seconds.
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Writes the structured JSON report to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Runs only methods whose identifier or display name contains this text.
    #[arg(long)]
    filter: Option<String>,
}

// ============================================================================
// SECTION: CLI Errors
// ============================================================================

/// Fatal CLI failures.
#[derive(Debug, Error)]
enum CliError {
    /// Suite construction or execution failed.
    #[error(transparent)]
    App(#[from] AppError),
    /// The report could not be rendered.
    #[error(transparent)]
    Report(#[from] ReportError),
    /// The JSON report could not be written.
    #[error("report {path} not writable: {detail}")]
    ReportWrite {
        /// Report path.
        path: String,
        /// Write failure description.
        detail: String,
    },
    /// Output could not be written to stdout.
    #[error("stdout write failed: {0}")]
    Output(String),
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Loads the manifest, runs the suite, and renders its outputs.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let mut app = SuiteApp::load(&cli.manifest)?;
    if let Some(filter) = cli.filter {
        app = app.with_filter(filter);
    }

    let config = SuiteConfig {
        concurrency: cli.concurrency,
        deadline: cli.deadline_secs.map(Duration::from_secs),
    };
    let report = app.run(&config).await?;

    write_stdout(&render_summary(&report)).map_err(|err| CliError::Output(err.to_string()))?;
    if let Some(path) = &cli.report {
        let json = to_json(&report)?;
        fs::write(path, json).map_err(|err| CliError::ReportWrite {
            path: path.display().to_string(),
            detail: err.to_string(),
        })?;
    }

    Ok(if report.verdict() == Verdict::Pass {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a message to stdout without appending a newline.
fn write_stdout(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(message.as_bytes())
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Prints an error to stderr and returns the failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn arguments_parse_with_defaults() {
        let cli = Cli::try_parse_from(["tabletest", "suite.toml"]);
        let Ok(cli) = cli else {
            unreachable!("arguments parse");
        };
        assert_eq!(cli.concurrency, 1);
        assert_eq!(cli.deadline_secs, None);
        assert_eq!(cli.report, None);
        assert_eq!(cli.filter, None);
    }

    #[test]
    fn all_options_parse() {
        let cli = Cli::try_parse_from([
            "tabletest",
            "suite.toml",
            "--concurrency",
            "8",
            "--deadline-secs",
            "30",
            "--report",
            "out.json",
            "--filter",
            "SafeMath",
        ]);
        let Ok(cli) = cli else {
            unreachable!("arguments parse");
        };
        assert_eq!(cli.concurrency, 8);
        assert_eq!(cli.deadline_secs, Some(30));
        assert_eq!(cli.filter.as_deref(), Some("SafeMath"));
    }
}
