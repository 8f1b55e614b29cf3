//! CB58: base58 over `payload || sha256(payload)[28..32]`.

use crate::error::{Result, WalletError};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

pub const PRIVATE_KEY_PREFIX: &str = "PrivateKey-";

const CHECKSUM_LEN: usize = 4;

pub fn encode(payload: &[u8]) -> String {
    let hash = Sha256::digest(payload);
    let mut buf = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    buf.extend_from_slice(payload);
    buf.extend_from_slice(&hash[hash.len() - CHECKSUM_LEN..]);
    bs58::encode(buf).into_string()
}

pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    let raw = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| WalletError::InvalidEncoding(format!("base58: {e}")))?;
    if raw.len() < CHECKSUM_LEN {
        return Err(WalletError::InvalidEncoding("cb58 payload too short".into()));
    }
    let (payload, checksum) = raw.split_at(raw.len() - CHECKSUM_LEN);
    let hash = Sha256::digest(payload);
    if hash[hash.len() - CHECKSUM_LEN..] != *checksum {
        return Err(WalletError::InvalidEncoding("cb58 checksum mismatch".into()));
    }
    Ok(payload.to_vec())
}

/// `PrivateKey-<cb58>` text form of a raw secret key.
pub fn encode_private_key(secret: &[u8; 32]) -> Zeroizing<String> {
    Zeroizing::new(format!("{PRIVATE_KEY_PREFIX}{}", encode(secret)))
}

pub fn decode_private_key(text: &str) -> Result<Zeroizing<Vec<u8>>> {
    let body = text
        .trim()
        .strip_prefix(PRIVATE_KEY_PREFIX)
        .ok_or_else(|| WalletError::InvalidKey(format!("expected {PRIVATE_KEY_PREFIX} prefix")))?;
    let bytes = Zeroizing::new(decode(body).map_err(|e| WalletError::InvalidKey(e.to_string()))?);
    if bytes.len() != 32 {
        return Err(WalletError::InvalidKey(format!("expected 32 bytes, got {}", bytes.len())));
    }
    Ok(bytes)
}
