//! Derivation Path Resolver

use super::Namespace;
use crate::error::{Result, WalletError};
use bitcoin::bip32::{ChildNumber, DerivationPath};

pub const PURPOSE: u32 = 44;
/// SLIP-44 coin type for AVAX.
pub const AVAX_COIN_TYPE: u32 = 9000;
/// SLIP-44 coin type for ETH, used by the C-chain.
pub const ETH_COIN_TYPE: u32 = 60;

/// Account-level path for `namespace`.
///
/// * Avalanche: `m/44'/9000'/{account}'`
/// * EVM: `m/44'/60'/0'/0/{account}`
pub fn path_for(namespace: Namespace, account: u32) -> Result<DerivationPath> {
    let children = match namespace {
        Namespace::Avalanche => vec![
            hardened(PURPOSE)?,
            hardened(AVAX_COIN_TYPE)?,
            ChildNumber::from_hardened_idx(account)
                .map_err(|_| WalletError::InvalidAccountIndex(account))?,
        ],
        Namespace::Evm => vec![
            hardened(PURPOSE)?,
            hardened(ETH_COIN_TYPE)?,
            hardened(0)?,
            ChildNumber::from_normal_idx(0).map_err(|e| WalletError::DerivationFailure(e.to_string()))?,
            ChildNumber::from_normal_idx(account)
                .map_err(|_| WalletError::InvalidAccountIndex(account))?,
        ],
    };
    Ok(DerivationPath::from(children))
}

fn hardened(index: u32) -> Result<ChildNumber> {
    ChildNumber::from_hardened_idx(index).map_err(|e| WalletError::DerivationFailure(e.to_string()))
}
