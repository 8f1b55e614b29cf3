//! X and P adapters: sign each input with the keys its signers name.

use crate::address::Chain;
use crate::error::{Result, WalletError};
use crate::keychain::KeyChain;
use crate::tx::{Credential, SignedTx, SignedUtxoTx, TxShape, UnsignedTx, UtxoTx};
use tracing::debug;

/// Exchange-chain signer over the external ∪ internal keychain.
#[derive(Debug)]
pub struct XChainSigner {
    keychain: KeyChain,
    hrp: String,
}

impl XChainSigner {
    pub fn new(keychain: KeyChain, hrp: impl Into<String>) -> Self { Self { keychain, hrp: hrp.into() } }

    pub fn sign(&self, tx: UnsignedTx) -> Result<SignedTx> {
        match tx {
            UnsignedTx::X(inner) => Ok(SignedTx::X(sign_inputs(inner, &self.keychain, Chain::X, &self.hrp)?)),
            other => Err(WalletError::WrongTransactionShape { expected: TxShape::Avm, found: other.shape() }),
        }
    }
}

/// Platform-chain signer over the external keychain.
#[derive(Debug)]
pub struct PChainSigner {
    keychain: KeyChain,
    hrp: String,
}

impl PChainSigner {
    pub fn new(keychain: KeyChain, hrp: impl Into<String>) -> Self { Self { keychain, hrp: hrp.into() } }

    pub fn sign(&self, tx: UnsignedTx) -> Result<SignedTx> {
        match tx {
            UnsignedTx::P(inner) => Ok(SignedTx::P(sign_inputs(inner, &self.keychain, Chain::P, &self.hrp)?)),
            other => Err(WalletError::WrongTransactionShape { expected: TxShape::Platform, found: other.shape() }),
        }
    }
}

/// One credential per input, one signature per named signer.
pub(crate) fn sign_inputs(tx: UtxoTx, keychain: &KeyChain, chain: Chain, hrp: &str) -> Result<SignedUtxoTx> {
    let digest = tx.signing_hash();
    let mut credentials = Vec::with_capacity(tx.inputs().len());
    for signers in tx.inputs() {
        let mut signatures = Vec::with_capacity(signers.len());
        for id in signers {
            let key = match keychain.get(id) {
                Some(key) => key,
                None => return Err(WalletError::MissingKey(id.to_address(chain, hrp)?)),
            };
            signatures.push(key.sign_digest(&digest));
        }
        credentials.push(Credential { signatures });
    }
    debug!(chain = %chain, inputs = credentials.len(), "signed utxo transaction");
    Ok(SignedUtxoTx { unsigned: tx, credentials })
}
