//! Ledger Computation
//!
//! Turns parsed directives into a [`Ledger`]: transactions expand into one
//! posting per movement, opening balances into a pair of postings against
//! the void account, and `balance`/`open` directives are kept aside for the
//! validators.

use std::path::{Path, PathBuf};

use log::{debug, info};

use super::account::Account;
use super::model::{BalanceAssertion, Ledger, OpenedAccount, Posting};
use super::money::Money;
use crate::error::Result;
use crate::syntax::{parse_file, Directive, Movement, MovementKind, Span, Spanned};

/// Description given to postings generated by an opening balance.
pub const OPENING_DESCRIPTION: &str = "Account opening";

/// A ledger together with the file it was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedLedger {
    pub path: PathBuf,
    pub source: String,
    pub ledger: Ledger,
}

/// Reads, parses and computes a ledger file.
///
/// # Example
///
/// ```rust,no_run
/// use hortela::load_ledger;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let loaded = load_ledger("books.hta")?;
///     println!("{} postings", loaded.ledger.len());
///     Ok(())
/// }
/// ```
pub fn load_ledger(path: impl AsRef<Path>) -> Result<LoadedLedger> {
    let path = path.as_ref();
    let (source, directives) = parse_file(path)?;
    let ledger = compute_program(directives);

    Ok(LoadedLedger {
        path: path.to_path_buf(),
        source,
        ledger,
    })
}

/// Builds the ledger from a parsed program.
///
/// Parent ids are the 1-based position of each directive in the file, so a
/// posting can always be traced back to the statement that produced it.
pub fn compute_program(program: Vec<Spanned<Directive>>) -> Ledger {
    let mut ledger = Ledger::new();
    let mut next_id: u64 = 1;

    for (index, (directive, span)) in program.into_iter().enumerate() {
        let parent_id = index as u64 + 1;

        match directive {
            Directive::Open {
                date,
                account,
                opening,
                currency,
            } => {
                if let Some(amount) = opening.filter(|a| !a.is_zero()) {
                    let money = Money::new(amount, currency.clone());
                    let movements = [
                        Movement::debit(Account::void(), money.clone()),
                        Movement::credit(account.clone(), money),
                    ];

                    for movement in movements {
                        ledger.postings.push(posting(
                            &mut next_id,
                            parent_id,
                            date,
                            OPENING_DESCRIPTION,
                            movement,
                            span.clone(),
                        ));
                    }
                }

                ledger.openings.push(OpenedAccount {
                    date,
                    account,
                    currency,
                    span,
                });
            }
            Directive::Balance {
                date,
                account,
                expected,
            } => {
                ledger.assertions.push(BalanceAssertion {
                    date,
                    account,
                    expected: expected.amount,
                    currency: expected.currency,
                    span,
                });
            }
            Directive::Transaction {
                date,
                description,
                movements,
            } => {
                for (movement, movement_span) in movements {
                    ledger.postings.push(posting(
                        &mut next_id,
                        parent_id,
                        date,
                        &description,
                        movement,
                        movement_span,
                    ));
                }
            }
        }
    }

    info!(
        "Computed ledger: {} postings, {} balance assertions, {} opened accounts",
        ledger.postings.len(),
        ledger.assertions.len(),
        ledger.openings.len()
    );

    ledger
}

fn posting(
    next_id: &mut u64,
    parent_id: u64,
    date: chrono::NaiveDate,
    description: &str,
    movement: Movement,
    span: Span,
) -> Posting {
    let id = *next_id;
    *next_id += 1;

    debug!(
        "Posting {} ({}): {} {} {}",
        id,
        match movement.kind {
            MovementKind::Debit => "debit",
            MovementKind::Credit => "credit",
        },
        movement.money,
        if movement.kind == MovementKind::Debit { "from" } else { "to" },
        movement.account
    );

    Posting {
        id,
        parent_id,
        date,
        description: description.to_string(),
        account: movement.account,
        amount: movement.money.amount,
        currency: movement.money.currency,
        kind: movement.kind,
        span,
    }
}
