//! HD derivation for the three Avalanche ledgers
//!
//! ```text
//! seed ──► MasterKey
//!            ├── m/44'/9000'/{account}'      Avalanche (X + P share it)
//!            │      ├── /0/{index}            external (receive)
//!            │      └── /1/{index}            internal (change)
//!            └── m/44'/60'/0'/0/{account}    EVM (C), one key, no scan
//! ```

mod keys;
mod path;

pub use keys::{derive_account_key, derive_child, AccountKey, DerivedKey, MasterKey};
pub use path::{path_for, AVAX_COIN_TYPE, ETH_COIN_TYPE, PURPOSE};

use serde::{Deserialize, Serialize};
use std::fmt;

/// First hardened child index. Account indices must stay below it.
pub const HARDENED_LIMIT: u32 = 0x8000_0000;

/// Key namespace: which account template a key hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Shared X/P account key with external/internal branches.
    Avalanche,
    /// Single C-chain key.
    Evm,
}

/// Address subtree under the Avalanche account key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    External,
    Internal,
}

impl Branch {
    pub fn index(&self) -> u32 {
        match self {
            Branch::External => 0,
            Branch::Internal => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::External => "external",
            Branch::Internal => "internal",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
