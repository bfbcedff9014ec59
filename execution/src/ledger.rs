//! Token custody.
//!
//! The engine never holds balances itself: ticket payments and injections are pulled in
//! through [`Ledger::transfer_in`], prizes and treasury fees are pushed out through
//! [`Ledger::transfer_out`]. Both calls are all-or-nothing.

use commonware_cryptography::ed25519::PublicKey;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance (needed={needed}, available={available})")]
    InsufficientBalance { needed: u64, available: u64 },
    #[error("insufficient custody (needed={needed}, available={available})")]
    InsufficientCustody { needed: u64, available: u64 },
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

pub trait Ledger {
    /// Move `amount` from `payer` into the engine's custody.
    fn transfer_in(&mut self, payer: &PublicKey, amount: u64) -> Result<(), LedgerError>;

    /// Move `amount` out of the engine's custody to `payee`.
    fn transfer_out(&mut self, payee: &PublicKey, amount: u64) -> Result<(), LedgerError>;
}
