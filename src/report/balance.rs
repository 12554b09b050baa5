//! Balance Sheet
//!
//! Balances per account and currency, with totals per account kind.
//! Every row carries both the raw balance (credits minus debits) and the
//! natural balance, which flips liabilities, income and equity so they read
//! positive.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use colored::Colorize;
use log::debug;
use serde::{Serialize, Serializer};
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::error::Result;
use crate::ledger::{Account, AccountKind, Amount, Currency, Ledger};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceOptions {
    /// Only count postings on or before this date
    pub at: Option<NaiveDate>,
    pub include_void: bool,
    /// Fractional digits kept after rounding
    pub precision: u32,
}

impl Default for BalanceOptions {
    fn default() -> Self {
        Self {
            at: None,
            include_void: false,
            precision: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalance {
    pub account: Account,
    pub kind: AccountKind,
    pub currency: Currency,
    pub balance: Amount,
    pub natural: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindTotal {
    pub kind: AccountKind,
    pub currency: Currency,
    pub balance: Amount,
    pub natural: Amount,
}

/// Serializes with every amount formatted to `precision` digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSheet {
    pub at: Option<NaiveDate>,
    pub precision: u32,
    pub accounts: Vec<AccountBalance>,
    pub totals: Vec<KindTotal>,
}

impl BalanceSheet {
    /// Computes the balance sheet.
    ///
    /// Accounts that were opened but never moved show up with a zero
    /// balance. Totals are summed before rounding.
    pub fn build(ledger: &Ledger, options: &BalanceOptions) -> Self {
        let visible = |account: &Account| options.include_void || !account.is_void();
        let in_range = |date: NaiveDate| options.at.map_or(true, |at| date <= at);

        let mut balances: BTreeMap<(&Account, &Currency), Amount> = BTreeMap::new();

        for opening in ledger.openings.iter().filter(|o| in_range(o.date)) {
            balances
                .entry((&opening.account, &opening.currency))
                .or_default();
        }

        for posting in ledger
            .postings
            .iter()
            .filter(|p| in_range(p.date) && visible(&p.account))
        {
            *balances
                .entry((&posting.account, &posting.currency))
                .or_default() += posting.signed_amount();
        }

        let mut totals: BTreeMap<(AccountKind, &Currency), Amount> = BTreeMap::new();
        for ((account, currency), balance) in &balances {
            *totals.entry((account.kind, *currency)).or_default() += *balance;
        }

        let precision = options.precision;

        let accounts: Vec<AccountBalance> = balances
            .into_iter()
            .map(|((account, currency), balance)| AccountBalance {
                account: account.clone(),
                kind: account.kind,
                currency: currency.clone(),
                balance: balance.round(precision),
                natural: (balance * account.kind.natural_factor()).round(precision),
            })
            .collect();

        let totals: Vec<KindTotal> = totals
            .into_iter()
            .map(|((kind, currency), balance)| KindTotal {
                kind,
                currency: currency.clone(),
                balance: balance.round(precision),
                natural: (balance * kind.natural_factor()).round(precision),
            })
            .collect();

        debug!(
            "Balance sheet: {} account rows, {} totals",
            accounts.len(),
            totals.len()
        );

        Self {
            at: options.at,
            precision,
            accounts,
            totals,
        }
    }

    pub fn total_for(&self, kind: AccountKind, currency: &Currency) -> Option<&KindTotal> {
        self.totals
            .iter()
            .find(|t| t.kind == kind && &t.currency == currency)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => self.to_json(),
        }
    }

    /// Aligned table of natural balances, followed by the per-kind totals.
    pub fn render_text(&self) -> String {
        let amount = |a: Amount| a.format_fixed(self.precision);

        let rows = self.accounts.iter().map(|row| TextRow {
            name: row.account.to_string(),
            currency: row.currency.to_string(),
            balance: amount(row.natural),
        });
        let totals = self.totals.iter().map(|total| TextTotal {
            kind: total.kind.to_string(),
            currency: total.currency.to_string(),
            balance: amount(total.natural),
        });

        let title = match self.at {
            Some(at) => format!("Balance sheet at {}", at),
            None => "Balance sheet".to_string(),
        };

        format!(
            "{}\n\n{}\n\n{}\n{}\n",
            title.bold(),
            borderless(Table::new(rows)),
            "Totals".bold(),
            borderless(Table::new(totals))
        )
    }
}

impl Serialize for BalanceSheet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let amount = |a: Amount| a.format_fixed(self.precision);

        SheetView {
            at: self.at,
            precision: self.precision,
            accounts: self
                .accounts
                .iter()
                .map(|row| RowView {
                    account: &row.account,
                    kind: row.kind,
                    currency: &row.currency,
                    balance: amount(row.balance),
                    natural: amount(row.natural),
                })
                .collect(),
            totals: self
                .totals
                .iter()
                .map(|total| TotalView {
                    kind: total.kind,
                    currency: &total.currency,
                    balance: amount(total.balance),
                    natural: amount(total.natural),
                })
                .collect(),
        }
        .serialize(serializer)
    }
}

#[derive(Serialize)]
struct SheetView<'a> {
    at: Option<NaiveDate>,
    precision: u32,
    accounts: Vec<RowView<'a>>,
    totals: Vec<TotalView<'a>>,
}

#[derive(Serialize)]
struct RowView<'a> {
    account: &'a Account,
    kind: AccountKind,
    currency: &'a Currency,
    balance: String,
    natural: String,
}

#[derive(Serialize)]
struct TotalView<'a> {
    kind: AccountKind,
    currency: &'a Currency,
    balance: String,
    natural: String,
}

#[derive(Tabled)]
struct TextRow {
    #[tabled(rename = "ACCOUNT")]
    name: String,
    #[tabled(rename = "CURRENCY")]
    currency: String,
    #[tabled(rename = "BALANCE")]
    balance: String,
}

#[derive(Tabled)]
struct TextTotal {
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "CURRENCY")]
    currency: String,
    #[tabled(rename = "BALANCE")]
    balance: String,
}

/// Borderless table with the balance column right-aligned.
fn borderless(mut table: Table) -> String {
    table
        .with(Style::blank())
        .with(Modify::new(Columns::single(2)).with(Alignment::right()));
    table.to_string()
}
