//! treehash CLI
//!
//! Prints the SHA-256 tree hash of each file as `<hex> *<file>`.

mod config;
mod output;
mod progress;
mod runner;

use clap::Parser;
use console::style;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use config::Config;
use runner::{RunOptions, Runner};

/// treehash - SHA-256 tree hashes for archival uploads
#[derive(Parser)]
#[command(name = "treehash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress per-file timing lines
    #[arg(short, long)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verify digests listed in SUMFILE instead of printing them
    #[arg(long, value_name = "SUMFILE")]
    check: Option<PathBuf>,

    /// Continue with remaining files after a failure
    #[arg(long)]
    keep_going: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Files to hash
    #[arg(required_unless_present = "check")]
    files: Vec<String>,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default()?,
    };
    config.validate()?;

    // Initialize logging; stdout carries only digest lines
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.to_lowercase()
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .init();

    let options = RunOptions {
        timing: config.output.timing && !cli.quiet,
        progress: config.output.progress && !cli.no_progress,
        keep_going: config.output.keep_going || cli.keep_going,
    };
    let primitive = config.primitive()?;
    let mut runner = Runner::new(primitive, options);

    let stdout = io::stdout();
    let stderr = io::stderr();

    if let Some(sumfile) = &cli.check {
        let summary = runner.check(sumfile, &mut stdout.lock(), &mut stderr.lock())?;
        tracing::info!(ok = summary.ok, "check complete");

        if summary.mismatched > 0 {
            eprintln!(
                "treehash: {} {} computed digest(s) did NOT match",
                style("WARNING:").yellow(),
                summary.mismatched
            );
        }
        if summary.unreadable > 0 {
            eprintln!(
                "treehash: {} {} listed file(s) could not be read",
                style("WARNING:").yellow(),
                summary.unreadable
            );
        }
        if summary.malformed > 0 {
            eprintln!(
                "treehash: {} {} line(s) are improperly formatted",
                style("WARNING:").yellow(),
                summary.malformed
            );
        }

        return Ok(exit_code(summary.success()));
    }

    let summary = runner.hash_files(&cli.files, &mut stdout.lock(), &mut stderr.lock())?;
    if summary.skipped > 0 {
        tracing::warn!(skipped = summary.skipped, "stopped after first failure");
    }

    Ok(exit_code(summary.success()))
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
