//! avahd: HD wallet core for the Avalanche X, P and C chains.
//!
//! # Architecture
//!
//! ```text
//! mnemonic ──► EncryptedMnemonic (at rest)
//!    │
//!    └─► seed ──► MasterKey
//!                   ├── m/44'/9000'/a' ──► AddressScanner (external, internal)
//!                   │                          │  AddressUsage oracle
//!                   │                          ▼
//!                   │                       KeyChain ──► XChainSigner / PChainSigner
//!                   │
//!                   └── m/44'/60'/0'/0/a ──► EvmSigner ──► sign_evm / sign_c
//!
//! WalletSigner (async trait) ◄── MnemonicWallet, SingletonWallet, hardware backends
//! ```
//!
//! # Operations
//!
//! | Operation | Entry point |
//! |-----------|-------------|
//! | path for namespace/account | `hd::path_for` |
//! | derive account / child key | `hd::derive_account_key`, `hd::derive_child` |
//! | discover used addresses | `MnemonicWallet::scan`, `AddressScanner::scan` |
//! | assemble keychains | `MnemonicWallet::key_chain_x`, `key_chain_p` |
//! | sign by chain | `WalletSigner::{sign_x, sign_p, sign_c, sign_evm}` |
//! | sign a message | `WalletSigner::sign_message` |
//! | phrase lifecycle | `MnemonicWallet::{create, from_mnemonic, mnemonic}` |
//!
//! # Usage
//!
//! ```ignore
//! use avahd::{MnemonicWallet, WalletConfig, WalletSigner, Network};
//!
//! let wallet = MnemonicWallet::from_mnemonic(phrase, WalletConfig::new().with_network(Network::Fuji))?
//!     .with_usage_oracle(Arc::new(my_indexer));
//! wallet.scan().await?;
//! let signed = wallet.sign_x(unsigned).await?;
//! let sig = wallet.sign_message("hello", 0).await?;
//! ```

pub mod address;
pub mod cb58;
pub mod config;
pub mod error;
pub mod hd;
pub mod keychain;
pub mod logging;
pub mod message;
pub mod mnemonic;
pub mod scan;
pub mod secret;
pub mod signer;
pub mod tx;
pub mod wallet;

// =============================================================================
// Re-exports
// =============================================================================
pub use address::{Chain, EvmAddress, ShortId};
pub use config::{Network, WalletConfig, DEFAULT_GAP_LIMIT};
pub use error::{Result, WalletError};
pub use hd::{Branch, Namespace};
pub use keychain::{KeyChain, KeyPair, Signature};
pub use scan::{AddressScanner, AddressUsage, MemoryUsage, ScanState};
pub use signer::WalletSigner;
pub use tx::{EvmTransaction, SignedTx, TxShape, UnsignedTx, UtxoTx};
pub use wallet::{MnemonicWallet, SingletonWallet};
