//! Account Names
//!
//! Accounts are written as `kind:segment[:segment[:segment]]`, e.g.
//! `assets:bank:checking` or `expenses:food`.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Maximum number of segments after the account kind.
pub const MAX_SEGMENTS: usize = 3;

/// Top-level classification of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Assets,
    Liabilities,
    Income,
    Equity,
    Expenses,
    /// Internal counterparty of opening balances. Not writable in ledger files.
    Void,
}

impl AccountKind {
    /// Kinds a ledger file may use.
    pub const WRITABLE: [AccountKind; 5] = [
        AccountKind::Assets,
        AccountKind::Liabilities,
        AccountKind::Income,
        AccountKind::Equity,
        AccountKind::Expenses,
    ];

    /// Resolves the keyword used in ledger files.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::WRITABLE
            .into_iter()
            .find(|kind| kind.as_str() == keyword)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assets => "assets",
            Self::Liabilities => "liabilities",
            Self::Income => "income",
            Self::Equity => "equity",
            Self::Expenses => "expenses",
            Self::Void => "void",
        }
    }

    /// Sign that turns a raw balance into the kind's natural reading.
    ///
    /// Raw balances are credits minus debits. Liabilities, income and equity
    /// accumulate as outflows, so they flip to read positive.
    pub fn natural_factor(self) -> i64 {
        match self {
            Self::Assets | Self::Expenses | Self::Void => 1,
            Self::Liabilities | Self::Income | Self::Equity => -1,
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons an account name is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("unknown account kind `{0}`, expected one of assets, liabilities, income, equity, expenses")]
    UnknownKind(String),

    #[error("account needs at least one name after the kind")]
    MissingSegment,

    #[error("accounts can be at most 3 levels deep below the kind")]
    TooDeep,

    #[error("invalid account segment `{0}`: use lowercase letters, digits and `_`, starting with a letter")]
    InvalidSegment(String),
}

/// A fully qualified account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Account {
    pub kind: AccountKind,
    pub path: Vec<String>,
}

impl Account {
    pub fn new<I, S>(kind: AccountKind, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    /// Counterparty for opening balances.
    pub fn void() -> Self {
        Self::new(AccountKind::Void, ["opening"])
    }

    pub fn is_void(&self) -> bool {
        self.kind == AccountKind::Void
    }

    /// Segments below the kind joined with `:`.
    pub fn name(&self) -> String {
        self.path.join(":")
    }
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

impl FromStr for Account {
    type Err = AccountError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut parts = text.split(':');
        let keyword = parts.next().unwrap_or_default();
        let kind = AccountKind::from_keyword(keyword)
            .ok_or_else(|| AccountError::UnknownKind(keyword.to_string()))?;

        let path: Vec<&str> = parts.collect();
        if path.is_empty() || path.as_slice() == [""] {
            return Err(AccountError::MissingSegment);
        }
        if path.len() > MAX_SEGMENTS {
            return Err(AccountError::TooDeep);
        }
        if let Some(bad) = path.iter().find(|s| !is_valid_segment(s)) {
            return Err(AccountError::InvalidSegment(bad.to_string()));
        }

        Ok(Self::new(kind, path))
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for segment in &self.path {
            write!(f, ":{}", segment)?;
        }
        Ok(())
    }
}

impl Serialize for Account {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
