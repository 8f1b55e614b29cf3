//! Single private key serving X, P and C. No derivation, no scanning.

use super::expect_shape;
use crate::address::{Chain, EvmAddress, ShortId};
use crate::cb58;
use crate::config::Network;
use crate::error::{Result, WalletError};
use crate::keychain::{KeyChain, KeyPair};
use crate::message;
use crate::signer::{EvmSigner, PChainSigner, WalletSigner, XChainSigner};
use crate::tx::{SignedTx, TxShape, UnsignedTx};
use async_trait::async_trait;
use std::fmt;
use tracing::info;
use zeroize::Zeroizing;

pub struct SingletonWallet {
    key: KeyPair,
    network: Network,
    evm: EvmSigner,
}

impl SingletonWallet {
    pub const WALLET_TYPE: &'static str = "singleton";

    pub fn from_secret_bytes(secret: &[u8], network: Network) -> Result<Self> {
        let key = KeyPair::from_slice(secret)?;
        let evm = EvmSigner::new(key.clone(), network.hrp());
        info!(network = network.as_str(), evm_address = %evm.address(), "singleton wallet ready");
        Ok(Self { key, network, evm })
    }

    /// `PrivateKey-<cb58>`
    pub fn from_private_key_string(text: &str, network: Network) -> Result<Self> {
        let secret = cb58::decode_private_key(text)?;
        Self::from_secret_bytes(&secret, network)
    }

    pub fn private_key_string(&self) -> Zeroizing<String> {
        cb58::encode_private_key(&self.key.secret_bytes())
    }

    pub fn evm_private_key_hex(&self) -> Zeroizing<String> { self.key.secret_hex() }
    pub fn network(&self) -> Network { self.network }
    pub fn short_id(&self) -> ShortId { self.key.short_id() }
    pub fn evm_address(&self) -> EvmAddress { self.evm.address() }

    pub fn address(&self, chain: Chain) -> Result<String> {
        self.key.short_id().to_address(chain, self.network.hrp())
    }

    pub fn key_chain(&self) -> KeyChain {
        [self.key.clone()].into_iter().collect()
    }
}

#[async_trait]
impl WalletSigner for SingletonWallet {
    fn wallet_type(&self) -> &'static str { Self::WALLET_TYPE }

    async fn sign_x(&self, tx: UnsignedTx) -> Result<SignedTx> {
        expect_shape(&tx, TxShape::Avm)?;
        XChainSigner::new(self.key_chain(), self.network.hrp()).sign(tx)
    }

    async fn sign_p(&self, tx: UnsignedTx) -> Result<SignedTx> {
        expect_shape(&tx, TxShape::Platform)?;
        PChainSigner::new(self.key_chain(), self.network.hrp()).sign(tx)
    }

    async fn sign_c(&self, tx: UnsignedTx) -> Result<SignedTx> {
        self.evm.sign_c(tx)
    }

    async fn sign_evm(&self, tx: UnsignedTx) -> Result<SignedTx> {
        self.evm.sign_evm(tx)
    }

    /// Only index 0 exists.
    async fn sign_message(&self, message: &str, index: u32) -> Result<String> {
        if index != 0 {
            return Err(WalletError::MissingKey(format!("external index {index} of a single-key wallet")));
        }
        Ok(message::sign_message(&self.key, message))
    }
}

impl fmt::Debug for SingletonWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonWallet")
            .field("network", &self.network)
            .field("short_id", &self.key.short_id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EWOQ: &str = "PrivateKey-ewoqjP7PxY4yr3iLTpLisriqt94hdyDFNgchSxGGztUrTXtNN";

    #[test]
    fn test_ewoq_golden_addresses() {
        let w = SingletonWallet::from_private_key_string(EWOQ, Network::Local).unwrap();
        assert_eq!(
            w.address(Chain::X).unwrap(),
            "X-local18jma8ppw3nhx5r4ap8clazz0dps7rv5u00z96u",
            "Golden X address mismatch - address encoding changed!"
        );
        assert_eq!(w.address(Chain::P).unwrap(), "P-local18jma8ppw3nhx5r4ap8clazz0dps7rv5u00z96u");
        assert_eq!(w.evm_address().to_string(), "0x8db97C7cEcE249c2b98bDC0226Cc4C2A57BF52FC");
    }

    #[test]
    fn test_private_key_string_round_trip() {
        let w = SingletonWallet::from_private_key_string(EWOQ, Network::Local).unwrap();
        assert_eq!(w.private_key_string().as_str(), EWOQ);
    }

    #[test]
    fn test_bad_key_rejected() {
        assert!(matches!(
            SingletonWallet::from_private_key_string("PrivateKey-abc", Network::Mainnet),
            Err(WalletError::InvalidKey(_))
        ));
        assert!(matches!(
            SingletonWallet::from_secret_bytes(&[0u8; 32], Network::Mainnet),
            Err(WalletError::InvalidKey(_))
        ));
    }
}
