//! Hortela CLI Entry Point
//!
//! # Usage
//!
//! ```bash
//! # Parse and validate a ledger
//! hortela check books.hta
//!
//! # Stop at the first failing validator
//! hortela check books.hta --fail-fast
//!
//! # Balance sheet, optionally at a date
//! hortela balance books.hta
//! hortela balance books.hta --at 2024-01-31 --precision 4
//!
//! # Machine-readable output, including the opening counterparty
//! hortela balance books.hta --format json --include-void
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};

use hortela::diagnostics::Diagnostic;
use hortela::report::{BalanceOptions, BalanceSheet, OutputFormat};
use hortela::validate::{RunOptions, Runner};
use hortela::{load_ledger, Error, LoadedLedger, Settings, APP_NAME, VERSION};

#[derive(Parser, Debug)]
#[command(name = "hortela", version, about = "Plain text double-entry ledger")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to hortela.yaml next to the ledger)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse the ledger and run every validator
    Check {
        file: PathBuf,

        /// Stop at the first failing validator
        #[arg(long)]
        fail_fast: bool,
    },

    /// Print the balance sheet
    Balance {
        file: PathBuf,

        /// Only count postings on or before this date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        at: Option<NaiveDate>,

        /// Show the void account that balances opening amounts
        #[arg(long)]
        include_void: bool,

        /// Decimal places (0 to 8)
        #[arg(long)]
        precision: Option<u32>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| match record.level() {
            log::Level::Warn | log::Level::Error => {
                writeln!(buf, "[{}] {}", record.level(), record.args())
            }
            _ => writeln!(buf, "{}", record.args()),
        })
        .init();
}

/// Loads settings for `file` and applies the global flags.
fn load_settings(cli: &Cli, file: &Path) -> Result<Settings> {
    let mut settings = Settings::resolve(cli.config.as_deref(), file)?;

    if cli.no_color {
        settings.color = false;
    }
    if !settings.color {
        colored::control::set_override(false);
    }

    debug!("Settings: {:?}", settings);
    Ok(settings)
}

/// Loads the ledger, printing syntax errors against the source.
fn load(file: &Path) -> Result<LoadedLedger> {
    match load_ledger(file) {
        Ok(loaded) => Ok(loaded),
        Err(error @ Error::Syntax { .. }) => {
            if let Error::Syntax { path, text, errors } = &error {
                let filename = path.display().to_string();
                let mut err = io::stderr().lock();
                for syntax_error in errors {
                    Diagnostic::from(syntax_error).write(&filename, text, &mut err)?;
                }
            }
            Err(error.into())
        }
        Err(error) => {
            Err(error).with_context(|| format!("could not load ledger '{}'", file.display()))
        }
    }
}

fn check(file: &Path, settings: &Settings) -> Result<()> {
    let loaded = load(file)?;
    let options = RunOptions {
        fail_fast: settings.fail_fast,
    };

    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();
    let summary = Runner::run_all(
        &loaded.path,
        &loaded.source,
        &loaded.ledger,
        &options,
        &mut out,
        &mut err,
    )?;

    info!(
        "{}: {} postings, {} validators passed",
        file.display(),
        loaded.ledger.len(),
        summary.passed.len()
    );
    Ok(())
}

fn balance(file: &Path, settings: &Settings, at: Option<NaiveDate>, format: Format) -> Result<()> {
    let loaded = load(file)?;
    let options = BalanceOptions {
        at,
        include_void: settings.include_void,
        precision: settings.precision,
    };

    let sheet = BalanceSheet::build(&loaded.ledger, &options);
    let rendered = sheet
        .render(format.into())
        .context("could not render balance sheet")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", rendered.trim_end())?;
    Ok(())
}

/// Main application entry point.
fn run() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    debug!("{} v{}", APP_NAME, VERSION);

    match &cli.command {
        Command::Check { file, fail_fast } => {
            let mut settings = load_settings(&cli, file)?;
            settings.fail_fast |= *fail_fast;
            check(file, &settings)
        }
        Command::Balance {
            file,
            at,
            include_void,
            precision,
            format,
        } => {
            let mut settings = load_settings(&cli, file)?;
            settings.include_void |= *include_void;
            if let Some(precision) = precision {
                settings.precision = *precision;
            }
            settings.validate()?;
            balance(file, &settings, *at, *format)
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
