//! Ledger Data Model
//!
//! The computed form of a ledger file: a flat list of postings (one per
//! account movement) plus the balance assertions and account openings that
//! validators check against.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use super::account::Account;
use super::money::{Amount, Currency};
use crate::syntax::{MovementKind, Span};

/// One movement of money into or out of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Posting {
    /// Sequential id, starting at 1
    pub id: u64,

    /// Id of the directive this posting came from
    pub parent_id: u64,

    pub date: NaiveDate,
    pub description: String,
    pub account: Account,

    /// Always non-negative; direction lives in `kind`
    pub amount: Amount,

    pub currency: Currency,
    pub kind: MovementKind,

    #[serde(skip)]
    pub span: Span,
}

impl Posting {
    pub fn is_credit(&self) -> bool {
        self.kind == MovementKind::Credit
    }

    /// Credits count positive, debits negative.
    pub fn signed_amount(&self) -> Amount {
        self.amount * self.kind.sign()
    }
}

/// A `balance` directive: the expected balance at the end of `date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceAssertion {
    pub date: NaiveDate,
    pub account: Account,
    pub expected: Amount,
    pub currency: Currency,
    pub span: Span,
}

/// An `open` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedAccount {
    pub date: NaiveDate,
    pub account: Account,
    pub currency: Currency,
    pub span: Span,
}

/// The computed ledger.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub postings: Vec<Posting>,
    pub assertions: Vec<BalanceAssertion>,
    pub openings: Vec<OpenedAccount>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn credits(&self) -> impl Iterator<Item = &Posting> {
        self.postings.iter().filter(|p| p.is_credit())
    }

    pub fn debits(&self) -> impl Iterator<Item = &Posting> {
        self.postings.iter().filter(|p| !p.is_credit())
    }

    pub fn postings_for<'a>(&'a self, account: &'a Account) -> impl Iterator<Item = &'a Posting> {
        self.postings.iter().filter(move |p| &p.account == account)
    }

    /// Balance of `account` in `currency`, counting postings up to and
    /// including `up_to` when given.
    pub fn balance_of(
        &self,
        account: &Account,
        currency: &Currency,
        up_to: Option<NaiveDate>,
    ) -> Amount {
        self.postings_for(account)
            .filter(|p| &p.currency == currency)
            .filter(|p| up_to.map_or(true, |limit| p.date <= limit))
            .map(Posting::signed_amount)
            .sum()
    }

    /// Postings grouped by the directive they came from, in file order.
    pub fn transactions(&self) -> BTreeMap<u64, Vec<&Posting>> {
        let mut grouped: BTreeMap<u64, Vec<&Posting>> = BTreeMap::new();
        for posting in &self.postings {
            grouped.entry(posting.parent_id).or_default().push(posting);
        }
        grouped
    }

    /// Every account that has at least one posting.
    pub fn accounts(&self) -> BTreeSet<&Account> {
        self.postings.iter().map(|p| &p.account).collect()
    }

    /// Earliest and latest posting dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.postings.iter().map(|p| p.date).min()?;
        let max = self.postings.iter().map(|p| p.date).max()?;
        Some((min, max))
    }

    /// The first `open` of an account, if any.
    pub fn opening_of(&self, account: &Account) -> Option<&OpenedAccount> {
        self.openings.iter().find(|o| &o.account == account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::AccountKind;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn posting(id: u64, parent_id: u64, day: u32, account: &str, amount: i64, kind: MovementKind) -> Posting {
        Posting {
            id,
            parent_id,
            date: ymd(2020, 1, day),
            description: "test".into(),
            account: account.parse().unwrap(),
            amount: Amount::from_whole(amount),
            currency: "BRL".into(),
            kind,
            span: 0..0,
        }
    }

    fn sample() -> Ledger {
        Ledger {
            postings: vec![
                posting(1, 1, 1, "assets:cash", 100, MovementKind::Credit),
                posting(2, 1, 1, "equity:opening", 100, MovementKind::Debit),
                posting(3, 2, 3, "assets:cash", 30, MovementKind::Debit),
                posting(4, 2, 3, "expenses:food", 30, MovementKind::Credit),
            ],
            ..Ledger::default()
        }
    }

    #[test]
    fn test_signed_amount() {
        let credit = posting(1, 1, 1, "assets:cash", 5, MovementKind::Credit);
        let debit = posting(2, 1, 1, "assets:cash", 5, MovementKind::Debit);

        assert_eq!(credit.signed_amount(), Amount::from_whole(5));
        assert_eq!(debit.signed_amount(), Amount::from_whole(-5));
    }

    #[test]
    fn test_credits_and_debits() {
        let ledger = sample();
        assert_eq!(ledger.credits().count(), 2);
        assert_eq!(ledger.debits().count(), 2);
    }

    #[test]
    fn test_balance_of_with_cutoff() {
        let ledger = sample();
        let cash: Account = "assets:cash".parse().unwrap();
        let brl = Currency::from("BRL");

        assert_eq!(ledger.balance_of(&cash, &brl, None), Amount::from_whole(70));
        assert_eq!(
            ledger.balance_of(&cash, &brl, Some(ymd(2020, 1, 2))),
            Amount::from_whole(100)
        );
        assert_eq!(
            ledger.balance_of(&cash, &Currency::from("USD"), None),
            Amount::ZERO
        );
    }

    #[test]
    fn test_transactions_grouped_by_parent() {
        let ledger = sample();
        let grouped = ledger.transactions();

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&2].len(), 2);
        assert_eq!(grouped[&2][0].id, 3);
    }

    #[test]
    fn test_accounts_and_date_range() {
        let ledger = sample();

        assert_eq!(ledger.accounts().len(), 3);
        assert_eq!(ledger.date_range(), Some((ymd(2020, 1, 1), ymd(2020, 1, 3))));
        assert!(Ledger::new().date_range().is_none());
    }

    #[test]
    fn test_opening_of() {
        let mut ledger = Ledger::new();
        let account = Account::new(AccountKind::Assets, ["cash"]);
        ledger.openings.push(OpenedAccount {
            date: ymd(2020, 1, 1),
            account: account.clone(),
            currency: "BRL".into(),
            span: 0..10,
        });

        assert!(ledger.opening_of(&account).is_some());
        assert!(ledger
            .opening_of(&Account::new(AccountKind::Assets, ["bank"]))
            .is_none());
    }
}
