//! Wallet error taxonomy.
//!
//! Construction-time kinds (`InvalidMnemonic`, `InvalidAccountIndex`) stop a
//! wallet from ever existing. Everything else is a per-request failure that
//! leaves wallet state untouched.

use crate::tx::TxShape;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Invalid account index {0}: must be below 2^31")]
    InvalidAccountIndex(u32),

    #[error("Key derivation failed: {0}")]
    DerivationFailure(String),

    #[error("No key for address {0} in the assembled keychain")]
    MissingKey(String),

    #[error("Wrong transaction shape: expected {expected}, got {found}")]
    WrongTransactionShape { expected: TxShape, found: TxShape },

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Address usage oracle failed: {0}")]
    UsageOracle(String),

    #[error("Secret store: {0}")]
    Encryption(String),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(&'static str),
}

pub type Result<T> = std::result::Result<T, WalletError>;
