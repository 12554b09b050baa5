//! Hortela - Plain Text Double-Entry Ledger
//!
//! Reads ledger files (`.hta`), turns them into a flat table of postings,
//! checks that the books balance and prints balance sheets.
//!
//! # Architecture
//!
//! - [`syntax`]: Lexer and parser for the ledger file format
//! - [`ledger`]: Accounts, money and the computed posting table
//! - [`validate`]: Validators and the runner that reports their traces
//! - [`report`]: Balance sheet computation and rendering
//! - [`diagnostics`]: Source-annotated error rendering
//! - [`config`]: Optional YAML settings
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use hortela::load_ledger;
//! use hortela::report::{BalanceOptions, BalanceSheet};
//! use hortela::validate::{RunOptions, Runner};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loaded = load_ledger("books.hta")?;
//!
//!     Runner::run_all(
//!         Path::new("books.hta"),
//!         &loaded.source,
//!         &loaded.ledger,
//!         &RunOptions::default(),
//!         &mut std::io::stdout(),
//!         &mut std::io::stderr(),
//!     )?;
//!
//!     let sheet = BalanceSheet::build(&loaded.ledger, &BalanceOptions::default());
//!     print!("{}", sheet.render_text());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod ledger;
pub mod report;
pub mod syntax;
pub mod validate;

// Re-export commonly used types
pub use config::Settings;
pub use error::{Error, Result};
pub use ledger::{compute_program, load_ledger, Ledger, LoadedLedger};
pub use syntax::parse_str;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "hortela";
