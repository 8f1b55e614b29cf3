//! EVM adapter: one account key, no scanning.

use super::utxo::sign_inputs;
use crate::address::{Chain, EvmAddress, ShortId};
use crate::error::{Result, WalletError};
use crate::keychain::{KeyChain, KeyPair};
use crate::tx::{SignedTx, TxShape, UnsignedTx};
use std::fmt;
use tracing::debug;
use zeroize::Zeroizing;

pub struct EvmSigner {
    key: KeyPair,
    hrp: String,
}

impl EvmSigner {
    pub fn new(key: KeyPair, hrp: impl Into<String>) -> Self { Self { key, hrp: hrp.into() } }

    pub fn address(&self) -> EvmAddress { self.key.evm_address() }

    /// Bech32 form of the same key (`C-avax1…`), used by atomic inputs.
    pub fn short_id(&self) -> ShortId { self.key.short_id() }

    pub fn private_key_hex(&self) -> Zeroizing<String> { self.key.secret_hex() }

    pub fn key_pair(&self) -> &KeyPair { &self.key }

    pub fn sign_evm(&self, tx: UnsignedTx) -> Result<SignedTx> {
        match tx {
            UnsignedTx::Evm(inner) => {
                let signature = self.key.sign_digest(&inner.signing_hash());
                let signed = inner.into_signed(signature)?;
                debug!(chain_id = signed.tx.chain_id(), hash = %signed.hash(), "signed evm transaction");
                Ok(SignedTx::Evm(signed))
            }
            other => Err(WalletError::WrongTransactionShape { expected: TxShape::Evm, found: other.shape() }),
        }
    }

    pub fn sign_c(&self, tx: UnsignedTx) -> Result<SignedTx> {
        match tx {
            UnsignedTx::C(inner) => {
                let keychain: KeyChain = [self.key.clone()].into_iter().collect();
                Ok(SignedTx::C(sign_inputs(inner, &keychain, Chain::C, &self.hrp)?))
            }
            other => Err(WalletError::WrongTransactionShape { expected: TxShape::EvmAtomic, found: other.shape() }),
        }
    }
}

impl fmt::Debug for EvmSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvmSigner").field("address", &self.address()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::{EvmTransaction, LegacyTx, UtxoTx};

    fn signer() -> EvmSigner {
        EvmSigner::new(KeyPair::from_slice(&[0x46; 32]).unwrap(), "avax")
    }

    fn evm_tx() -> UnsignedTx {
        UnsignedTx::Evm(EvmTransaction::Legacy(LegacyTx {
            nonce: 0,
            gas_price: 25_000_000_000,
            gas_limit: 21_000,
            to: Some(EvmAddress::from_bytes([1; 20])),
            value: 1,
            data: Vec::new(),
            chain_id: 43114,
        }))
    }

    #[test]
    fn test_sign_evm() {
        let s = signer();
        let signed = s.sign_evm(evm_tx()).unwrap();
        let evm = signed.as_evm().unwrap();
        assert_eq!(evm.recover_sender().unwrap(), s.address());
        assert!(evm.v == 43114 * 2 + 35 || evm.v == 43114 * 2 + 36);
    }

    #[test]
    fn test_sign_evm_rejects_overflowing_chain_id() {
        let tx = UnsignedTx::Evm(EvmTransaction::Legacy(LegacyTx {
            nonce: 0,
            gas_price: 1,
            gas_limit: 21_000,
            to: None,
            value: 0,
            data: Vec::new(),
            chain_id: u64::MAX / 2,
        }));
        assert!(matches!(signer().sign_evm(tx), Err(WalletError::InvalidTransaction(_))));
    }

    #[test]
    fn test_sign_c_uses_same_key() {
        let s = signer();
        let tx = UnsignedTx::C(UtxoTx::new(vec![0, 0, 7]).with_input(vec![s.short_id()]));
        let signed = s.sign_c(tx).unwrap();
        assert!(signed.as_utxo().unwrap().verify());
    }

    #[test]
    fn test_each_method_rejects_the_other_shape() {
        let s = signer();
        let atomic = UnsignedTx::C(UtxoTx::new(vec![1]).with_input(vec![s.short_id()]));
        assert!(matches!(
            s.sign_evm(atomic),
            Err(WalletError::WrongTransactionShape { expected: TxShape::Evm, found: TxShape::EvmAtomic })
        ));
        assert!(matches!(
            s.sign_c(evm_tx()),
            Err(WalletError::WrongTransactionShape { expected: TxShape::EvmAtomic, found: TxShape::Evm })
        ));
    }

    #[test]
    fn test_sign_c_missing_key() {
        let s = signer();
        let tx = UnsignedTx::C(UtxoTx::new(vec![1]).with_input(vec![ShortId::from_bytes([3; 20])]));
        assert!(matches!(s.sign_c(tx), Err(WalletError::MissingKey(a)) if a.starts_with("C-avax1")));
    }

    #[test]
    fn test_debug_hides_key() {
        let s = signer();
        assert!(!format!("{s:?}").contains(&"46".repeat(32)));
    }
}
