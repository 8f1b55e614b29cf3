use crate::address::ShortId;
use crate::cb58;
use crate::keychain::Signature;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

/// Codec type id of a secp256k1 credential on X, P and C.
pub const SECP_CREDENTIAL_TYPE_ID: u32 = 9;

/// Unsigned UTXO-model transaction: codec bytes plus, for each input, the
/// addresses that must sign it in signature-index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtxoTx {
    bytes: Vec<u8>,
    inputs: Vec<Vec<ShortId>>,
}

impl UtxoTx {
    pub fn new(bytes: Vec<u8>) -> Self { Self { bytes, inputs: Vec::new() } }
    pub fn with_input(mut self, signers: Vec<ShortId>) -> Self { self.inputs.push(signers); self }
    pub fn bytes(&self) -> &[u8] { &self.bytes }
    pub fn inputs(&self) -> &[Vec<ShortId>] { &self.inputs }

    pub fn signing_hash(&self) -> [u8; 32] {
        Sha256::digest(&self.bytes).into()
    }

    pub fn required_signers(&self) -> BTreeSet<ShortId> {
        self.inputs.iter().flatten().copied().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub signatures: Vec<Signature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUtxoTx {
    pub unsigned: UtxoTx,
    pub credentials: Vec<Credential>,
}

impl SignedUtxoTx {
    /// Unsigned bytes followed by the credential array.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.unsigned.bytes.clone();
        out.extend_from_slice(&(self.credentials.len() as u32).to_be_bytes());
        for credential in &self.credentials {
            out.extend_from_slice(&SECP_CREDENTIAL_TYPE_ID.to_be_bytes());
            out.extend_from_slice(&(credential.signatures.len() as u32).to_be_bytes());
            for sig in &credential.signatures {
                out.extend_from_slice(sig.as_bytes());
            }
        }
        out
    }

    pub fn tx_id(&self) -> String {
        cb58::encode(&Sha256::digest(self.to_bytes()))
    }

    /// Every signature recovers to the signer named at its slot.
    pub fn verify(&self) -> bool {
        if self.credentials.len() != self.unsigned.inputs.len() {
            return false;
        }
        let digest = self.unsigned.signing_hash();
        self.unsigned.inputs.iter().zip(&self.credentials).all(|(signers, credential)| {
            signers.len() == credential.signatures.len()
                && signers.iter().zip(&credential.signatures).all(|(signer, sig)| {
                    sig.recover(&digest)
                        .map(|public| ShortId::from_public_key(&public) == *signer)
                        .unwrap_or(false)
                })
        })
    }
}
