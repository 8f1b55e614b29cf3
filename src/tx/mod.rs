//! Transaction shapes
//!
//! Construction and codec serialization happen upstream. This core receives
//! the unsigned bytes plus who must sign, tagged by chain:
//!
//! ```text
//! UnsignedTx::X(UtxoTx)        exchange chain      -> external ∪ internal keys
//! UnsignedTx::P(UtxoTx)        platform chain      -> external keys
//! UnsignedTx::C(UtxoTx)        C-chain import/export -> EVM key
//! UnsignedTx::Evm(EvmTransaction) plain EVM tx     -> EVM key
//! ```

mod evm;
mod utxo;

pub use evm::{Eip1559Tx, EvmTransaction, LegacyTx, SignedEvmTx};
pub use utxo::{Credential, SignedUtxoTx, UtxoTx, SECP_CREDENTIAL_TYPE_ID};

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxShape {
    /// X-chain (AVM) transaction.
    Avm,
    /// P-chain transaction.
    Platform,
    /// C-chain atomic import/export.
    EvmAtomic,
    /// Ordinary EVM transaction.
    Evm,
}

impl TxShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxShape::Avm => "avm",
            TxShape::Platform => "platform",
            TxShape::EvmAtomic => "evm-atomic",
            TxShape::Evm => "evm",
        }
    }
}

impl fmt::Display for TxShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsignedTx {
    X(UtxoTx),
    P(UtxoTx),
    C(UtxoTx),
    Evm(EvmTransaction),
}

impl UnsignedTx {
    pub fn shape(&self) -> TxShape {
        match self {
            UnsignedTx::X(_) => TxShape::Avm,
            UnsignedTx::P(_) => TxShape::Platform,
            UnsignedTx::C(_) => TxShape::EvmAtomic,
            UnsignedTx::Evm(_) => TxShape::Evm,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignedTx {
    X(SignedUtxoTx),
    P(SignedUtxoTx),
    C(SignedUtxoTx),
    Evm(SignedEvmTx),
}

impl SignedTx {
    pub fn shape(&self) -> TxShape {
        match self {
            SignedTx::X(_) => TxShape::Avm,
            SignedTx::P(_) => TxShape::Platform,
            SignedTx::C(_) => TxShape::EvmAtomic,
            SignedTx::Evm(_) => TxShape::Evm,
        }
    }

    /// Wire bytes for the broadcast layer.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            SignedTx::X(tx) | SignedTx::P(tx) | SignedTx::C(tx) => tx.to_bytes(),
            SignedTx::Evm(tx) => tx.raw().to_vec(),
        }
    }

    pub fn as_utxo(&self) -> Option<&SignedUtxoTx> {
        match self {
            SignedTx::X(tx) | SignedTx::P(tx) | SignedTx::C(tx) => Some(tx),
            SignedTx::Evm(_) => None,
        }
    }

    pub fn as_evm(&self) -> Option<&SignedEvmTx> {
        match self {
            SignedTx::Evm(tx) => Some(tx),
            _ => None,
        }
    }
}
