//! Validator Runner
//!
//! Runs the registered validators over a ledger and renders every trace
//! against the ledger source.

use std::io::Write;
use std::path::Path;

use log::{debug, info};

use super::{Validator, ALL_VALIDATORS};
use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};
use crate::ledger::Ledger;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Stop after the first failing validator
    pub fail_fast: bool,
}

/// Outcome of a run where every validator passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: Vec<String>,
}

pub struct Runner;

impl Runner {
    /// Runs [`ALL_VALIDATORS`] in order.
    ///
    /// Progress lines go to `out`, rendered diagnostics to `err`. Returns
    /// [`Error::Validation`] naming every validator that failed.
    pub fn run_all(
        path: &Path,
        source: &str,
        ledger: &Ledger,
        options: &RunOptions,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<RunSummary> {
        Self::run_with(ALL_VALIDATORS, path, source, ledger, options, out, err)
    }

    pub fn run_with(
        validators: &[(&str, Validator)],
        path: &Path,
        source: &str,
        ledger: &Ledger,
        options: &RunOptions,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<RunSummary> {
        let filename = path.display().to_string();
        let mut summary = RunSummary::default();
        let mut failed = Vec::new();

        info!("Validating {} postings from {}", ledger.len(), filename);

        for (name, validator) in validators {
            write!(out, "Running validator: {}... ", name)?;

            match validator(ledger) {
                Ok(()) => {
                    writeln!(out, "OK")?;
                    summary.passed.push(name.to_string());
                }
                Err(error) => {
                    writeln!(out, "ERROR")?;
                    out.flush()?;
                    debug!("Validator '{}': {}", name, error);

                    for trace in error.traces() {
                        Diagnostic::from(trace).write(&filename, source, err)?;
                    }
                    failed.push(name.to_string());

                    if options.fail_fast {
                        info!("Stopping after first failure");
                        break;
                    }
                }
            }
        }

        if failed.is_empty() {
            info!("All {} validators passed", summary.passed.len());
            Ok(summary)
        } else {
            Err(Error::Validation { failed })
        }
    }
}
