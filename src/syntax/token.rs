//! Lexical Tokens

use std::fmt;

use chrono::NaiveDate;

use super::ast::MovementKind;
use crate::ledger::{Account, Amount, Currency};

/// Directive keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Open,
    Balance,
    Transaction,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "open" => Some(Self::Open),
            "balance" => Some(Self::Balance),
            "transaction" => Some(Self::Transaction),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Balance => "balance",
            Self::Transaction => "transaction",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Date(NaiveDate),
    Amount(Amount),
    Currency(Currency),
    Keyword(Keyword),
    Account(Account),
    Description(String),
    Movement(MovementKind),
}

impl Token {
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }
}

/// Human-readable form used in "found ..." messages.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "date {}", date.format("%Y-%m-%d")),
            Self::Amount(amount) => write!(f, "amount {}", amount),
            Self::Currency(currency) => write!(f, "currency {}", currency),
            Self::Keyword(keyword) => write!(f, "keyword `{}`", keyword.as_str()),
            Self::Account(account) => write!(f, "account {}", account),
            Self::Description(text) => write!(f, "description \"{}\"", text),
            Self::Movement(kind) => write!(f, "`{}`", kind.symbol()),
        }
    }
}
