//! EVM transactions: legacy (EIP-155) and dynamic-fee (EIP-1559).

use crate::address::EvmAddress;
use crate::error::{Result, WalletError};
use crate::keychain::Signature;
use rlp::RlpStream;
use sha3::{Digest, Keccak256};

const EIP1559_TX_TYPE: u8 = 0x02;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTx {
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    /// `None` deploys a contract.
    pub to: Option<EvmAddress>,
    pub value: u128,
    pub data: Vec<u8>,
    pub chain_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eip1559Tx {
    pub chain_id: u64,
    pub nonce: u64,
    pub max_priority_fee_per_gas: u128,
    pub max_fee_per_gas: u128,
    pub gas_limit: u64,
    pub to: Option<EvmAddress>,
    pub value: u128,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvmTransaction {
    Legacy(LegacyTx),
    Eip1559(Eip1559Tx),
}

impl EvmTransaction {
    pub fn chain_id(&self) -> u64 {
        match self {
            EvmTransaction::Legacy(tx) => tx.chain_id,
            EvmTransaction::Eip1559(tx) => tx.chain_id,
        }
    }

    /// Bytes whose keccak256 is signed.
    pub fn signing_payload(&self) -> Vec<u8> {
        match self {
            EvmTransaction::Legacy(tx) => {
                let mut s = RlpStream::new_list(9);
                append_legacy_fields(&mut s, tx);
                s.append(&uint(tx.chain_id));
                s.append(&Vec::<u8>::new());
                s.append(&Vec::<u8>::new());
                s.out().to_vec()
            }
            EvmTransaction::Eip1559(tx) => {
                let mut s = RlpStream::new_list(9);
                append_eip1559_fields(&mut s, tx);
                typed(EIP1559_TX_TYPE, &s.out())
            }
        }
    }

    pub fn signing_hash(&self) -> [u8; 32] {
        Keccak256::digest(self.signing_payload()).into()
    }

    /// Attach a signature over `signing_hash()`. Fails when the chain id is
    /// too large for an EIP-155 `v`.
    pub(crate) fn into_signed(self, signature: Signature) -> Result<SignedEvmTx> {
        let recid = u64::from(signature.recovery_id());
        let r = trim(signature.r());
        let s_val = trim(signature.s());
        let (v, raw) = match &self {
            EvmTransaction::Legacy(tx) => {
                let v = eip155_v(recid, tx.chain_id)?;
                let mut s = RlpStream::new_list(9);
                append_legacy_fields(&mut s, tx);
                s.append(&uint(v));
                s.append(&r);
                s.append(&s_val);
                (v, s.out().to_vec())
            }
            EvmTransaction::Eip1559(tx) => {
                let mut s = RlpStream::new_list(12);
                append_eip1559_fields(&mut s, tx);
                s.append(&uint(recid));
                s.append(&r);
                s.append(&s_val);
                (recid, typed(EIP1559_TX_TYPE, &s.out()))
            }
        };
        Ok(SignedEvmTx { tx: self, signature, v, raw })
    }
}

/// `recid + 35 + 2 * chain_id`
fn eip155_v(recid: u64, chain_id: u64) -> Result<u64> {
    chain_id
        .checked_mul(2)
        .and_then(|v| v.checked_add(35 + recid))
        .ok_or_else(|| WalletError::InvalidTransaction(format!("chain id {chain_id} overflows EIP-155 v")))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEvmTx {
    pub tx: EvmTransaction,
    pub signature: Signature,
    /// EIP-155 `v` for legacy, `y_parity` for EIP-1559.
    pub v: u64,
    raw: Vec<u8>,
}

impl SignedEvmTx {
    pub fn raw(&self) -> &[u8] { &self.raw }
    pub fn raw_hex(&self) -> String { format!("0x{}", hex::encode(&self.raw)) }

    pub fn hash(&self) -> String {
        format!("0x{}", hex::encode(Keccak256::digest(&self.raw)))
    }

    pub fn recover_sender(&self) -> Result<EvmAddress> {
        let public = self.signature.recover(&self.tx.signing_hash())?;
        Ok(EvmAddress::from_public_key(&public))
    }
}

fn append_legacy_fields(s: &mut RlpStream, tx: &LegacyTx) {
    s.append(&uint(tx.nonce));
    s.append(&uint(tx.gas_price));
    s.append(&uint(tx.gas_limit));
    s.append(&to_field(&tx.to));
    s.append(&uint(tx.value));
    s.append(&tx.data);
}

fn append_eip1559_fields(s: &mut RlpStream, tx: &Eip1559Tx) {
    s.append(&uint(tx.chain_id));
    s.append(&uint(tx.nonce));
    s.append(&uint(tx.max_priority_fee_per_gas));
    s.append(&uint(tx.max_fee_per_gas));
    s.append(&uint(tx.gas_limit));
    s.append(&to_field(&tx.to));
    s.append(&uint(tx.value));
    s.append(&tx.data);
    // empty access list
    s.begin_list(0);
}

/// RLP integers are minimal big-endian byte strings; zero is empty.
fn uint(value: impl Into<u128>) -> Vec<u8> {
    trim(&value.into().to_be_bytes())
}

fn trim(bytes: &[u8]) -> Vec<u8> {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    bytes[first..].to_vec()
}

fn to_field(to: &Option<EvmAddress>) -> Vec<u8> {
    to.map(|addr| addr.as_bytes().to_vec()).unwrap_or_default()
}

fn typed(tx_type: u8, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 1);
    out.push(tx_type);
    out.extend_from_slice(body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keychain::KeyPair;

    // EIP-155 reference transaction
    fn legacy_fields() -> LegacyTx {
        LegacyTx {
            nonce: 9,
            gas_price: 20_000_000_000,
            gas_limit: 21_000,
            to: Some(EvmAddress::from_bytes([0x35; 20])),
            value: 1_000_000_000_000_000_000,
            data: Vec::new(),
            chain_id: 1,
        }
    }

    fn eip155_example() -> EvmTransaction {
        EvmTransaction::Legacy(legacy_fields())
    }

    #[test]
    fn test_eip155_signing_payload() {
        let tx = eip155_example();
        assert_eq!(
            hex::encode(tx.signing_payload()),
            "ec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080"
        );
        assert_eq!(
            hex::encode(tx.signing_hash()),
            "daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
        );
    }

    #[test]
    fn test_eip155_signed_vector() {
        let key = KeyPair::from_slice(&[0x46; 32]).unwrap();
        let tx = eip155_example();
        let sig = key.sign_digest(&tx.signing_hash());
        let signed = tx.into_signed(sig).unwrap();
        assert_eq!(signed.v, 37);
        assert_eq!(
            hex::encode(signed.raw()),
            "f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
        );
        assert_eq!(signed.recover_sender().unwrap(), key.evm_address());
    }

    #[test]
    fn test_eip1559_envelope() {
        let key = KeyPair::from_slice(&[0x11; 32]).unwrap();
        let tx = EvmTransaction::Eip1559(Eip1559Tx {
            chain_id: 43114,
            nonce: 0,
            max_priority_fee_per_gas: 1_500_000_000,
            max_fee_per_gas: 30_000_000_000,
            gas_limit: 21_000,
            to: None,
            value: 0,
            data: vec![0x60, 0x00],
        });
        assert_eq!(tx.signing_payload()[0], EIP1559_TX_TYPE);

        let sig = key.sign_digest(&tx.signing_hash());
        let signed = tx.into_signed(sig).unwrap();
        assert!(signed.v <= 1);
        assert_eq!(signed.raw()[0], EIP1559_TX_TYPE);
        assert_eq!(signed.recover_sender().unwrap(), key.evm_address());
        assert!(signed.hash().starts_with("0x"));
        assert_eq!(signed.hash().len(), 66);
    }

    #[test]
    fn test_oversized_chain_id_is_an_error() {
        let key = KeyPair::from_slice(&[0x46; 32]).unwrap();
        let tx = EvmTransaction::Legacy(LegacyTx { chain_id: u64::MAX / 2, ..legacy_fields() });
        let sig = key.sign_digest(&tx.signing_hash());
        assert!(matches!(tx.into_signed(sig), Err(WalletError::InvalidTransaction(_))));

        // largest chain id whose v still fits
        let max = (u64::MAX - 36) / 2;
        let tx = EvmTransaction::Legacy(LegacyTx { chain_id: max, ..legacy_fields() });
        let sig = key.sign_digest(&tx.signing_hash());
        let signed = tx.into_signed(sig).unwrap();
        assert_eq!(signed.v, max * 2 + 35 + u64::from(sig.recovery_id()));
        assert_eq!(signed.recover_sender().unwrap(), key.evm_address());
    }

    #[test]
    fn test_uint_encoding() {
        assert!(uint(0u64).is_empty());
        assert_eq!(uint(1u64), vec![1]);
        assert_eq!(uint(0x0100u64), vec![1, 0]);
    }
}
