//! HD Derivation Engine
//!
//! Pure functions over immutable key material. Same inputs always give
//! byte-identical keys.

use super::Branch;
use crate::address::ShortId;
use crate::error::{Result, WalletError};
use crate::keychain::{KeyPair, SECP};
use bitcoin::bip32::{ChildNumber, DerivationPath, Xpriv};
use std::fmt;

/// Root of the derivation tree.
pub struct MasterKey(Xpriv);

impl MasterKey {
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let xpriv = Xpriv::new_master(bitcoin::Network::Bitcoin, seed)
            .map_err(|e| WalletError::DerivationFailure(e.to_string()))?;
        Ok(Self(xpriv))
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

/// Account-level key at a resolved path.
#[derive(Clone)]
pub struct AccountKey {
    path: DerivationPath,
    xpriv: Xpriv,
}

impl AccountKey {
    pub fn path(&self) -> &DerivationPath { &self.path }

    /// Signing key of the account node itself (the EVM key).
    pub fn key_pair(&self) -> KeyPair {
        KeyPair::from_secret(self.xpriv.private_key)
    }
}

impl fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountKey").field("path", &self.path.to_string()).finish_non_exhaustive()
    }
}

/// Child key at `account/branch/index`.
#[derive(Clone, Debug)]
pub struct DerivedKey {
    pub branch: Branch,
    pub index: u32,
    key_pair: KeyPair,
}

impl DerivedKey {
    pub fn key_pair(&self) -> &KeyPair { &self.key_pair }
    pub fn short_id(&self) -> ShortId { self.key_pair.short_id() }
}

pub fn derive_account_key(master: &MasterKey, path: &DerivationPath) -> Result<AccountKey> {
    let xpriv = master
        .0
        .derive_priv(&*SECP, path)
        .map_err(|e| WalletError::DerivationFailure(e.to_string()))?;
    Ok(AccountKey { path: path.clone(), xpriv })
}

/// Non-hardened `/branch/index` under an account key.
pub fn derive_child(account: &AccountKey, branch: Branch, index: u32) -> Result<DerivedKey> {
    let children = [
        ChildNumber::from_normal_idx(branch.index())
            .map_err(|e| WalletError::DerivationFailure(e.to_string()))?,
        ChildNumber::from_normal_idx(index)
            .map_err(|e| WalletError::DerivationFailure(format!("index {index}: {e}")))?,
    ];
    let xpriv = account
        .xpriv
        .derive_priv(&*SECP, &children)
        .map_err(|e| WalletError::DerivationFailure(e.to_string()))?;
    Ok(DerivedKey { branch, index, key_pair: KeyPair::from_secret(xpriv.private_key) })
}
