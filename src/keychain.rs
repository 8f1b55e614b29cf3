//! KeyPair and KeyChain
//!
//! A KeyChain is the credential set handed to a signer, keyed by short id.
//! Union is set union on addresses: commutative, idempotent, duplicate-free.

use crate::address::{EvmAddress, ShortId};
use crate::error::{Result, WalletError};
use bitcoin::secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use bitcoin::secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::fmt;
use zeroize::Zeroizing;

pub(crate) static SECP: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// 65-byte recoverable secp256k1 signature: `r || s || recovery_id`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 65]);

impl Signature {
    pub fn from_bytes(bytes: [u8; 65]) -> Self { Self(bytes) }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 65] = bytes
            .try_into()
            .map_err(|_| WalletError::InvalidEncoding(format!("signature must be 65 bytes, got {}", bytes.len())))?;
        Ok(Self(bytes))
    }

    pub fn to_bytes(&self) -> [u8; 65] { self.0 }
    pub fn as_bytes(&self) -> &[u8; 65] { &self.0 }
    pub fn r(&self) -> &[u8] { &self.0[..32] }
    pub fn s(&self) -> &[u8] { &self.0[32..64] }
    pub fn recovery_id(&self) -> u8 { self.0[64] }

    /// Public key that produced this signature over `digest`.
    pub fn recover(&self, digest: &[u8; 32]) -> Result<PublicKey> {
        let recid = RecoveryId::from_i32(i32::from(self.recovery_id()))
            .map_err(|e| WalletError::InvalidEncoding(format!("recovery id: {e}")))?;
        let sig = RecoverableSignature::from_compact(&self.0[..64], recid)
            .map_err(|e| WalletError::InvalidEncoding(format!("signature: {e}")))?;
        SECP.recover_ecdsa(&Message::from_digest(*digest), &sig)
            .map_err(|e| WalletError::InvalidEncoding(format!("recover: {e}")))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", hex::encode(self.0))
    }
}

#[derive(Clone)]
pub struct KeyPair {
    secret: SecretKey,
    public: PublicKey,
}

impl KeyPair {
    pub fn from_secret(secret: SecretKey) -> Self {
        let public = PublicKey::from_secret_key(&*SECP, &secret);
        Self { secret, public }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let secret = SecretKey::from_slice(bytes).map_err(|e| WalletError::InvalidKey(e.to_string()))?;
        Ok(Self::from_secret(secret))
    }

    pub fn public_key(&self) -> &PublicKey { &self.public }
    pub fn short_id(&self) -> ShortId { ShortId::from_public_key(&self.public) }
    pub fn evm_address(&self) -> EvmAddress { EvmAddress::from_public_key(&self.public) }

    pub fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.secret.secret_bytes())
    }

    pub fn secret_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&self.secret_bytes()[..]))
    }

    /// Sign a 32-byte digest (RFC 6979 nonce).
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Signature {
        let sig = SECP.sign_ecdsa_recoverable(&Message::from_digest(*digest), &self.secret);
        let (recid, compact) = sig.serialize_compact();
        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&compact);
        bytes[64] = recid.to_i32() as u8;
        Signature(bytes)
    }
}

impl KeyPair {
    fn erase(&mut self) {
        self.secret.non_secure_erase();
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.erase();
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair").field("short_id", &self.short_id()).finish_non_exhaustive()
    }
}

#[derive(Clone, Default)]
pub struct KeyChain {
    keys: BTreeMap<ShortId, KeyPair>,
}

impl KeyChain {
    pub fn new() -> Self { Self::default() }

    /// Insert a key; re-inserting the same address keeps one entry.
    pub fn insert(&mut self, key: KeyPair) -> ShortId {
        let id = key.short_id();
        self.keys.insert(id, key);
        id
    }

    pub fn get(&self, id: &ShortId) -> Option<&KeyPair> { self.keys.get(id) }
    pub fn contains(&self, id: &ShortId) -> bool { self.keys.contains_key(id) }
    pub fn len(&self) -> usize { self.keys.len() }
    pub fn is_empty(&self) -> bool { self.keys.is_empty() }
    pub fn addresses(&self) -> impl Iterator<Item = &ShortId> { self.keys.keys() }

    pub fn union(&self, other: &KeyChain) -> KeyChain {
        let mut keys = self.keys.clone();
        for (id, key) in &other.keys {
            keys.entry(*id).or_insert_with(|| key.clone());
        }
        KeyChain { keys }
    }
}

impl FromIterator<KeyPair> for KeyChain {
    fn from_iter<I: IntoIterator<Item = KeyPair>>(iter: I) -> Self {
        let mut chain = KeyChain::new();
        for key in iter {
            chain.insert(key);
        }
        chain
    }
}

impl fmt::Debug for KeyChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys.keys()).finish()
    }
}
