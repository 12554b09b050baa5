//! Ledger Validation
//!
//! A validator inspects a computed [`Ledger`] and either accepts it or
//! returns traces pointing at the offending parts of the source.
//!
//! # Structure
//!
//! - [`rules`]: The validators themselves
//! - [`runner`]: Runs every validator and renders the traces

use thiserror::Error;

use crate::ledger::Ledger;
use crate::syntax::Span;

pub mod rules;
pub mod runner;

pub use runner::{RunOptions, RunSummary, Runner};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{} problem(s) found", .0.len())]
    WithTrace(Vec<Trace>),
}

impl ValidationError {
    pub fn traces(&self) -> &[Trace] {
        match self {
            Self::WithTrace(traces) => traces,
        }
    }
}

/// One problem found by a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    pub message: String,
    pub details: String,
    pub span: Option<Span>,
    pub found: Option<String>,
    pub expected: Option<String>,
}

impl Trace {
    pub fn new(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: details.into(),
            span: None,
            found: None,
            expected: None,
        }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }
}

pub type Validator = fn(&Ledger) -> Result<(), ValidationError>;

/// Every validator, in the order they run.
pub static ALL_VALIDATORS: &[(&str, Validator)] = &[
    (
        "validate that credits and debits balance",
        rules::validate_credits_and_debits_balance,
    ),
    (
        "validate that all isolated transactions are properly balanced",
        rules::validate_all_isolated_transactions_balance,
    ),
    (
        "validate that accounts are opened before use",
        rules::validate_accounts_are_opened,
    ),
    (
        "validate that all balance statements are correct",
        rules::validate_balance_statements,
    ),
];

/// Turns collected traces into a validator result.
pub(crate) fn traces_to_result(traces: Vec<Trace>) -> Result<(), ValidationError> {
    if traces.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::WithTrace(traces))
    }
}
