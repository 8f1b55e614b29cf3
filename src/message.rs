//! Avalanche signed messages
//!
//! `sha256("\x1AAvalanche Signed Message:\n" || u32be(len) || message)`,
//! signed as a 65-byte recoverable signature and rendered as CB58.

use crate::address::ShortId;
use crate::cb58;
use crate::error::Result;
use crate::keychain::{KeyPair, Signature};
use sha2::{Digest, Sha256};

const MESSAGE_PREFIX: &[u8] = b"\x1AAvalanche Signed Message:\n";

pub fn digest_message(message: &str) -> [u8; 32] {
    let bytes = message.as_bytes();
    let mut hasher = Sha256::new();
    hasher.update(MESSAGE_PREFIX);
    hasher.update((bytes.len() as u32).to_be_bytes());
    hasher.update(bytes);
    hasher.finalize().into()
}

/// CB58 signature string.
pub fn sign_message(key: &KeyPair, message: &str) -> String {
    cb58::encode(key.sign_digest(&digest_message(message)).as_bytes())
}

/// Short id of whoever signed `message`.
pub fn recover_signer(message: &str, signature: &str) -> Result<ShortId> {
    let sig = Signature::from_slice(&cb58::decode(signature)?)?;
    let public = sig.recover(&digest_message(message))?;
    Ok(ShortId::from_public_key(&public))
}
