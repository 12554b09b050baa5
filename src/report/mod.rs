//! Reports
//!
//! Read-only views computed from a [`Ledger`](crate::ledger::Ledger).
//!
//! # Structure
//!
//! - [`balance`]: Balance sheet per account and per account kind

pub mod balance;

pub use balance::{AccountBalance, BalanceOptions, BalanceSheet, KindTotal, OutputFormat};
