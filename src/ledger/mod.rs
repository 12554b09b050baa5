//! Ledger Module
//!
//! Accounts, money and the computed posting table.
//!
//! # Structure
//!
//! - [`account`]: Account kinds and names
//! - [`money`]: Fixed-point amounts and currencies
//! - [`model`]: Postings, assertions and the [`Ledger`] itself
//! - [`compute`]: Directives to ledger, and file loading

pub mod account;
pub mod compute;
pub mod model;
pub mod money;

pub use account::{Account, AccountError, AccountKind};
pub use compute::{compute_program, load_ledger, LoadedLedger};
pub use model::{BalanceAssertion, Ledger, OpenedAccount, Posting};
pub use money::{Amount, AmountError, Currency, Money};
