//! Address formats
//!
//! X and P share one 20-byte short id per key (ripemd160 of sha256 of the
//! compressed public key) and differ only in the chain prefix:
//! `X-avax1…` / `P-avax1…`. The C-chain uses an Ethereum address with an
//! EIP-55 checksum.

use crate::error::{Result, WalletError};
use bech32::{Bech32, Hrp};
use bitcoin::hashes::{hash160, Hash};
use bitcoin::secp256k1::PublicKey;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// Ledger a transaction or address belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    X,
    P,
    C,
}

impl Chain {
    pub fn alias(&self) -> &'static str {
        match self {
            Chain::X => "X",
            Chain::P => "P",
            Chain::C => "C",
        }
    }

    pub fn from_alias(value: &str) -> Option<Self> {
        match value.trim() {
            "X" | "x" => Some(Chain::X),
            "P" | "p" => Some(Chain::P),
            "C" | "c" => Some(Chain::C),
            _ => None,
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShortId([u8; 20]);

impl ShortId {
    pub fn from_bytes(bytes: [u8; 20]) -> Self { Self(bytes) }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 20] = bytes.try_into().map_err(|_| {
            WalletError::InvalidAddress(format!("short id must be 20 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(bytes))
    }

    pub fn from_public_key(public: &PublicKey) -> Self {
        Self(hash160::Hash::hash(&public.serialize()).to_byte_array())
    }

    pub fn as_bytes(&self) -> &[u8; 20] { &self.0 }

    /// `{chain}-{hrp}1…`
    pub fn to_address(&self, chain: Chain, hrp: &str) -> Result<String> {
        format_address(chain, hrp, self)
    }
}

impl fmt::Debug for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShortId({})", hex::encode(self.0))
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

pub fn format_address(chain: Chain, hrp: &str, id: &ShortId) -> Result<String> {
    let hrp = Hrp::parse(hrp).map_err(|e| WalletError::InvalidAddress(format!("hrp {hrp}: {e}")))?;
    let body = bech32::encode::<Bech32>(hrp, id.as_bytes())
        .map_err(|e| WalletError::InvalidAddress(e.to_string()))?;
    Ok(format!("{}-{}", chain.alias(), body))
}

/// Split `X-avax1…` into chain, hrp and short id.
pub fn parse_address(address: &str) -> Result<(Chain, String, ShortId)> {
    let (alias, body) = address
        .split_once('-')
        .ok_or_else(|| WalletError::InvalidAddress(format!("missing chain prefix: {address}")))?;
    let chain = Chain::from_alias(alias)
        .ok_or_else(|| WalletError::InvalidAddress(format!("unknown chain alias: {alias}")))?;
    let (hrp, data) = bech32::decode(body).map_err(|e| WalletError::InvalidAddress(e.to_string()))?;
    Ok((chain, hrp.to_string(), ShortId::from_slice(&data)?))
}

/// 20-byte Ethereum-style account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EvmAddress([u8; 20]);

impl EvmAddress {
    pub fn from_bytes(bytes: [u8; 20]) -> Self { Self(bytes) }

    pub fn from_public_key(public: &PublicKey) -> Self {
        let uncompressed = public.serialize_uncompressed();
        let hash = Keccak256::digest(&uncompressed[1..]);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[12..]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] { &self.0 }

    /// EIP-55 mixed-case form, `0x` prefixed.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = Keccak256::digest(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let shift = if i % 2 == 0 { 4 } else { 0 };
            let nibble = (hash[i / 2] >> shift) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Debug for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EvmAddress({})", self.to_checksum())
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl FromStr for EvmAddress {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw).map_err(|e| WalletError::InvalidAddress(e.to_string()))?;
        let bytes: [u8; 20] = bytes
            .try_into()
            .map_err(|_| WalletError::InvalidAddress(format!("evm address must be 20 bytes: {s}")))?;
        Ok(Self(bytes))
    }
}
