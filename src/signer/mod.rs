//! Signing capability
//!
//! `WalletSigner` is the seam hardware or hosted custodians implement. All
//! methods are async so backends that wait on a device or a remote service
//! fit the same contract as the in-memory wallets.

mod evm;
mod utxo;

pub use evm::EvmSigner;
pub use utxo::{PChainSigner, XChainSigner};

use crate::error::Result;
use crate::tx::{SignedTx, UnsignedTx};
use async_trait::async_trait;

#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Backend name, e.g. `"mnemonic"`.
    fn wallet_type(&self) -> &'static str;

    async fn sign_x(&self, tx: UnsignedTx) -> Result<SignedTx>;
    async fn sign_p(&self, tx: UnsignedTx) -> Result<SignedTx>;
    /// C-chain atomic import/export.
    async fn sign_c(&self, tx: UnsignedTx) -> Result<SignedTx>;
    async fn sign_evm(&self, tx: UnsignedTx) -> Result<SignedTx>;
    /// CB58 signature by the external key at `index`.
    async fn sign_message(&self, message: &str, index: u32) -> Result<String>;
}
