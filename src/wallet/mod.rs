//! Wallet facade - one mnemonic, three chains
//!
//! # Architecture
//!
//! ```text
//! MnemonicWallet
//!     │
//!     ├── EncryptedMnemonic (AES-GCM, decrypted only on request)
//!     │
//!     ├── AddressScanner external ──┐
//!     ├── AddressScanner internal ──┼── KeyChain X = ext ∪ int ──► XChainSigner
//!     │                             └── KeyChain P = ext ────────► PChainSigner
//!     │
//!     └── EvmSigner (m/44'/60'/0'/0/{account}) ──► sign_evm / sign_c
//! ```
//!
//! # Signing
//!
//! | Method | Accepts | Keys |
//! |--------|---------|------|
//! | `sign_x` | `UnsignedTx::X` | external ∪ internal |
//! | `sign_p` | `UnsignedTx::P` | external |
//! | `sign_c` | `UnsignedTx::C` | EVM key |
//! | `sign_evm` | `UnsignedTx::Evm` | EVM key |
//! | `sign_message` | text + index | external key at index |
//!
//! X and P keychains only hold keys the last scan found in use (plus
//! external index 0). Signing for an address the scan has not reached
//! fails with `MissingKey`; scan again first.

mod singleton;

pub use singleton::SingletonWallet;

use crate::address::{Chain, EvmAddress};
use crate::config::WalletConfig;
use crate::error::{Result, WalletError};
use crate::hd::{derive_account_key, path_for, Branch, DerivedKey, MasterKey, Namespace};
use crate::keychain::KeyChain;
use crate::message;
use crate::mnemonic::{self, seed_from_phrase};
use crate::scan::{AddressScanner, AddressUsage, ScanState};
use crate::secret::EncryptedMnemonic;
use crate::signer::{EvmSigner, PChainSigner, WalletSigner, XChainSigner};
use crate::tx::{SignedTx, TxShape, UnsignedTx};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use zeroize::Zeroizing;

pub struct MnemonicWallet {
    mnemonic: EncryptedMnemonic,
    config: WalletConfig,
    external: AddressScanner,
    internal: AddressScanner,
    evm: EvmSigner,
}

impl MnemonicWallet {
    pub const WALLET_TYPE: &'static str = "mnemonic";

    /// Build from a phrase. Invalid phrases and account indices never
    /// produce a wallet.
    pub fn from_mnemonic(phrase: &str, config: WalletConfig) -> Result<Self> {
        config.validate()?;
        if !mnemonic::validate_mnemonic(phrase) {
            return Err(WalletError::InvalidMnemonic("word list or checksum rejected".into()));
        }

        let account = config.account_index;
        let hrp = config.network.hrp();
        let (avax_account, evm_account) = {
            let seed = seed_from_phrase(phrase)?;
            let master = MasterKey::from_seed(&seed[..])?;
            (
                derive_account_key(&master, &path_for(Namespace::Avalanche, account)?)?,
                derive_account_key(&master, &path_for(Namespace::Evm, account)?)?,
            )
        };

        let wallet = Self {
            mnemonic: EncryptedMnemonic::seal(phrase)?,
            external: AddressScanner::new(avax_account.clone(), Branch::External, hrp, config.gap_limit),
            internal: AddressScanner::new(avax_account, Branch::Internal, hrp, config.gap_limit),
            evm: EvmSigner::new(evm_account.key_pair(), hrp),
            config,
        };
        info!(
            account,
            network = wallet.config.network.as_str(),
            evm_address = %wallet.evm.address(),
            "mnemonic wallet ready"
        );
        Ok(wallet)
    }

    /// Fresh wallet on a new 24 word phrase.
    pub fn create(config: WalletConfig) -> Result<Self> {
        let phrase = mnemonic::generate_mnemonic_phrase()?;
        Self::from_mnemonic(&phrase, config)
    }

    pub fn generate_mnemonic_phrase() -> Result<Zeroizing<String>> {
        mnemonic::generate_mnemonic_phrase()
    }

    pub fn validate_mnemonic(phrase: &str) -> bool {
        mnemonic::validate_mnemonic(phrase)
    }

    /// Attach the chain-history oracle used by `scan`.
    pub fn with_usage_oracle(mut self, oracle: Arc<dyn AddressUsage>) -> Self {
        self.external.set_oracle(Some(oracle.clone()));
        self.internal.set_oracle(Some(oracle));
        self
    }

    /// The original phrase, in a buffer wiped on drop.
    pub fn mnemonic(&self) -> Result<Zeroizing<String>> {
        self.mnemonic.reveal()
    }

    pub fn evm_private_key_hex(&self) -> Zeroizing<String> { self.evm.private_key_hex() }
    pub fn account_index(&self) -> u32 { self.config.account_index }
    pub fn config(&self) -> &WalletConfig { &self.config }
    pub fn evm_address(&self) -> EvmAddress { self.evm.address() }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// Next receive address on X.
    pub fn address_x(&self) -> Result<String> {
        let index = self.external.state()?.next_index();
        self.external.address(Chain::X, index)
    }

    pub fn address_p(&self) -> Result<String> {
        let index = self.external.state()?.next_index();
        self.external.address(Chain::P, index)
    }

    pub fn change_address_x(&self) -> Result<String> {
        let index = self.internal.state()?.next_index();
        self.internal.address(Chain::X, index)
    }

    /// Bech32 form of the EVM key, used as the signer of atomic inputs.
    pub fn address_c_bech32(&self) -> Result<String> {
        self.evm.short_id().to_address(Chain::C, self.config.network.hrp())
    }

    pub fn external_addresses_x(&self) -> Result<Vec<String>> {
        self.format_addresses(&self.external.key_chain()?, Chain::X)
    }

    pub fn internal_addresses_x(&self) -> Result<Vec<String>> {
        self.format_addresses(&self.internal.key_chain()?, Chain::X)
    }

    pub fn all_addresses_x(&self) -> Result<Vec<String>> {
        self.format_addresses(&self.key_chain_x()?, Chain::X)
    }

    pub fn all_addresses_p(&self) -> Result<Vec<String>> {
        self.format_addresses(&self.key_chain_p()?, Chain::P)
    }

    fn format_addresses(&self, keychain: &KeyChain, chain: Chain) -> Result<Vec<String>> {
        let hrp = self.config.network.hrp();
        keychain.addresses().map(|id| id.to_address(chain, hrp)).collect()
    }

    // =========================================================================
    // Scanning and keychains
    // =========================================================================

    pub async fn scan(&self) -> Result<()> {
        self.external.scan().await?;
        self.internal.scan().await?;
        Ok(())
    }

    pub async fn scan_branch(&self, branch: Branch) -> Result<ScanState> {
        self.scanner(branch).scan().await
    }

    pub fn scan_state(&self, branch: Branch) -> Result<ScanState> {
        self.scanner(branch).state()
    }

    pub fn key_for_index(&self, branch: Branch, index: u32) -> Result<DerivedKey> {
        self.scanner(branch).key_for_index(index)
    }

    pub fn key_chain(&self, branch: Branch) -> Result<KeyChain> {
        self.scanner(branch).key_chain()
    }

    pub fn key_chain_x(&self) -> Result<KeyChain> {
        Ok(self.external.key_chain()?.union(&self.internal.key_chain()?))
    }

    pub fn key_chain_p(&self) -> Result<KeyChain> {
        self.external.key_chain()
    }

    fn scanner(&self, branch: Branch) -> &AddressScanner {
        match branch {
            Branch::External => &self.external,
            Branch::Internal => &self.internal,
        }
    }
}

/// Reject a mismatched shape before any key material is assembled.
pub(crate) fn expect_shape(tx: &UnsignedTx, expected: TxShape) -> Result<()> {
    let found = tx.shape();
    if found != expected {
        return Err(WalletError::WrongTransactionShape { expected, found });
    }
    Ok(())
}

#[async_trait]
impl WalletSigner for MnemonicWallet {
    fn wallet_type(&self) -> &'static str { Self::WALLET_TYPE }

    async fn sign_x(&self, tx: UnsignedTx) -> Result<SignedTx> {
        expect_shape(&tx, TxShape::Avm)?;
        XChainSigner::new(self.key_chain_x()?, self.config.network.hrp()).sign(tx)
    }

    async fn sign_p(&self, tx: UnsignedTx) -> Result<SignedTx> {
        expect_shape(&tx, TxShape::Platform)?;
        PChainSigner::new(self.key_chain_p()?, self.config.network.hrp()).sign(tx)
    }

    async fn sign_c(&self, tx: UnsignedTx) -> Result<SignedTx> {
        self.evm.sign_c(tx)
    }

    async fn sign_evm(&self, tx: UnsignedTx) -> Result<SignedTx> {
        self.evm.sign_evm(tx)
    }

    // TODO: internal-branch message signing (needs a branch argument on the trait)
    async fn sign_message(&self, message: &str, index: u32) -> Result<String> {
        let key = self.external.key_for_index(index)?;
        debug!(index, "signing message with external key");
        Ok(message::sign_message(key.key_pair(), message))
    }
}

impl fmt::Debug for MnemonicWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MnemonicWallet")
            .field("config", &self.config)
            .field("evm", &self.evm)
            .field("external", &self.external)
            .field("internal", &self.internal)
            .finish_non_exhaustive()
    }
}
