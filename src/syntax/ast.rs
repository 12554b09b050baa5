//! Directive Tree
//!
//! What the parser produces: one [`Directive`] per top-level statement,
//! each paired with its source span.

use chrono::NaiveDate;
use serde::Serialize;

use super::Spanned;
use crate::ledger::{Account, Amount, Currency, Money};

/// Direction of a movement.
///
/// `<` debits (the amount leaves the account), `>` credits (the amount
/// enters the account).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Debit,
    Credit,
}

impl MovementKind {
    pub fn symbol(self) -> char {
        match self {
            Self::Debit => '<',
            Self::Credit => '>',
        }
    }

    /// Sign applied to an amount when accumulating balances.
    pub fn sign(self) -> i64 {
        match self {
            Self::Debit => -1,
            Self::Credit => 1,
        }
    }
}

/// One line inside a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    pub kind: MovementKind,
    pub money: Money,
    pub account: Account,
}

impl Movement {
    pub fn debit(account: Account, money: Money) -> Self {
        Self {
            kind: MovementKind::Debit,
            money,
            account,
        }
    }

    pub fn credit(account: Account, money: Money) -> Self {
        Self {
            kind: MovementKind::Credit,
            money,
            account,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Declares an account, its currency and an optional opening balance.
    Open {
        date: NaiveDate,
        account: Account,
        opening: Option<Amount>,
        currency: Currency,
    },

    /// Asserts the balance of an account at the end of a day.
    Balance {
        date: NaiveDate,
        account: Account,
        expected: Money,
    },

    Transaction {
        date: NaiveDate,
        description: String,
        movements: Vec<Spanned<Movement>>,
    },
}

impl Directive {
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Open { date, .. } | Self::Balance { date, .. } | Self::Transaction { date, .. } => {
                *date
            }
        }
    }
}
