//! Wallet Configuration - passed from higher layers

use crate::error::{Result, WalletError};
use crate::hd::HARDENED_LIMIT;
use serde::{Deserialize, Serialize};

/// Default gap limit: consecutive unused indices before discovery stops.
pub const DEFAULT_GAP_LIMIT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Fuji,
    Local,
}

impl Default for Network {
    fn default() -> Self { Self::Mainnet }
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Fuji => "fuji",
            Network::Local => "local",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "avax" | "main" => Some(Network::Mainnet),
            "fuji" | "testnet" => Some(Network::Fuji),
            "local" | "localnet" => Some(Network::Local),
            _ => None,
        }
    }

    /// Bech32 human-readable part for X/P addresses.
    pub fn hrp(&self) -> &'static str {
        match self {
            Network::Mainnet => "avax",
            Network::Fuji => "fuji",
            Network::Local => "local",
        }
    }

    /// EIP-155 chain id of the C-chain.
    pub fn evm_chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => 43114,
            Network::Fuji => 43113,
            Network::Local => 43112,
        }
    }
}

/// Wallet configuration. Higher layers construct this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    pub account_index: u32,
    pub network: Network,
    pub gap_limit: u32,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self { account_index: 0, network: Network::default(), gap_limit: DEFAULT_GAP_LIMIT }
    }
}

impl WalletConfig {
    pub fn new() -> Self { Self::default() }
    pub fn with_account(mut self, index: u32) -> Self { self.account_index = index; self }
    pub fn with_network(mut self, network: Network) -> Self { self.network = network; self }
    pub fn with_gap_limit(mut self, gap: u32) -> Self { self.gap_limit = gap; self }

    /// Parse a JSON config; missing fields fall back to defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| WalletError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.account_index >= HARDENED_LIMIT {
            return Err(WalletError::InvalidAccountIndex(self.account_index));
        }
        if self.gap_limit == 0 {
            return Err(WalletError::InvalidConfig("gap limit must be at least 1".into()));
        }
        Ok(())
    }
}
