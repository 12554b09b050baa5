//! Validation Rules

use std::collections::{BTreeMap, HashSet};

use log::debug;

use super::{traces_to_result, Trace, ValidationError};
use crate::ledger::{Account, Amount, Currency, Ledger};
use crate::syntax::Span;

fn money(amount: Amount, currency: &Currency) -> String {
    format!("{} {}", amount, currency)
}

/// Across the whole ledger, credits and debits match per currency.
pub fn validate_credits_and_debits_balance(ledger: &Ledger) -> Result<(), ValidationError> {
    let mut sums: BTreeMap<&Currency, (Amount, Amount)> = BTreeMap::new();

    for posting in &ledger.postings {
        let entry = sums.entry(&posting.currency).or_default();
        if posting.is_credit() {
            entry.0 += posting.amount;
        } else {
            entry.1 += posting.amount;
        }
    }

    let traces = sums
        .into_iter()
        .filter(|(_, (credits, debits))| credits != debits)
        .map(|(currency, (credits, debits))| {
            Trace::new(
                "Budget does not balance",
                "In a double-entry accounting system, all credits and debits should balance in the end.",
            )
            .found(money(credits - debits, currency))
            .expected(money(Amount::ZERO, currency))
        })
        .collect();

    traces_to_result(traces)
}

/// Inside each transaction, the signed sum per currency is zero.
pub fn validate_all_isolated_transactions_balance(ledger: &Ledger) -> Result<(), ValidationError> {
    let mut traces = Vec::new();

    for (parent_id, postings) in ledger.transactions() {
        let mut sums: BTreeMap<&Currency, Amount> = BTreeMap::new();
        for posting in &postings {
            *sums.entry(&posting.currency).or_default() += posting.signed_amount();
        }

        let span: Span = postings.iter().map(|p| p.span.start).min().unwrap_or(0)
            ..postings.iter().map(|p| p.span.end).max().unwrap_or(0);

        for (currency, sum) in sums.into_iter().filter(|(_, sum)| !sum.is_zero()) {
            debug!("Transaction {} is off by {}", parent_id, money(sum, currency));
            traces.push(
                Trace::new(
                    "Transaction does not balance",
                    "Inside a transaction, all debits and credits must balance in the end.",
                )
                .at(span.clone())
                .found(money(sum, currency))
                .expected(money(Amount::ZERO, currency)),
            );
        }
    }

    traces_to_result(traces)
}

/// Every account is opened once, before it is used, in the currency it is
/// used with.
pub fn validate_accounts_are_opened(ledger: &Ledger) -> Result<(), ValidationError> {
    let mut traces = Vec::new();

    let mut opened: HashSet<&Account> = HashSet::new();
    for opening in &ledger.openings {
        if !opened.insert(&opening.account) {
            let first = ledger.opening_of(&opening.account).map(|o| o.date);
            traces.push(
                Trace::new(
                    format!("Account `{}` is opened twice", opening.account),
                    match first {
                        Some(date) => format!("It was already opened on {}.", date),
                        None => "It was already opened.".to_string(),
                    },
                )
                .at(opening.span.clone()),
            );
        }
    }

    let uses = ledger
        .postings
        .iter()
        .filter(|p| !p.account.is_void())
        .map(|p| (&p.account, &p.currency, p.date, &p.span))
        .chain(
            ledger
                .assertions
                .iter()
                .map(|a| (&a.account, &a.currency, a.date, &a.span)),
        );

    let mut reported_unopened: HashSet<&Account> = HashSet::new();

    for (account, currency, date, span) in uses {
        match ledger.opening_of(account) {
            None => {
                if reported_unopened.insert(account) {
                    traces.push(
                        Trace::new(
                            format!("Account `{}` is never opened", account),
                            format!("Add an `open` directive for {} before using it.", account),
                        )
                        .at(span.clone()),
                    );
                }
            }
            Some(opening) if date < opening.date => {
                traces.push(
                    Trace::new(
                        format!("Account `{}` is used before it is opened", account),
                        format!("It is only opened on {}.", opening.date),
                    )
                    .at(span.clone())
                    .found(date.to_string())
                    .expected(format!("{} or later", opening.date)),
                );
            }
            Some(opening) if currency != &opening.currency => {
                traces.push(
                    Trace::new(
                        format!("Wrong currency for account `{}`", account),
                        format!("The account was opened in {}.", opening.currency),
                    )
                    .at(span.clone())
                    .found(currency.to_string())
                    .expected(opening.currency.to_string()),
                );
            }
            Some(_) => {}
        }
    }

    traces_to_result(traces)
}

/// Each `balance` directive matches the account balance at the end of its
/// date.
pub fn validate_balance_statements(ledger: &Ledger) -> Result<(), ValidationError> {
    let traces = ledger
        .assertions
        .iter()
        .filter_map(|assertion| {
            let actual = ledger.balance_of(&assertion.account, &assertion.currency, Some(assertion.date));
            if actual == assertion.expected {
                return None;
            }

            Some(
                Trace::new(
                    "Balance statement does not match",
                    format!(
                        "Balance of {} at the end of {}, counting every posting up to that day.",
                        assertion.account, assertion.date
                    ),
                )
                .at(assertion.span.clone())
                .found(money(actual, &assertion.currency))
                .expected(money(assertion.expected, &assertion.currency)),
            )
        })
        .collect();

    traces_to_result(traces)
}
