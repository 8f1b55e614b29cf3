//! Address-usage oracle: "has this address been used on-chain?"

use crate::address::Chain;
use crate::error::{Result, WalletError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::RwLock;

/// Chain history lookup consulted during discovery. Retries are the
/// implementor's business; an `Err` aborts the scan in progress.
#[async_trait]
pub trait AddressUsage: Send + Sync {
    async fn is_used(&self, chain: Chain, address: &str) -> Result<bool>;
}

/// Fixed set of addresses known to have history.
#[derive(Debug, Default)]
pub struct MemoryUsage {
    used: RwLock<HashSet<String>>,
}

impl MemoryUsage {
    pub fn new() -> Self { Self::default() }

    pub fn with_used<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { used: RwLock::new(addresses.into_iter().map(Into::into).collect()) }
    }

    pub fn mark_used(&self, address: impl Into<String>) -> Result<()> {
        self.used
            .write()
            .map_err(|_| WalletError::LockPoisoned("usage set"))?
            .insert(address.into());
        Ok(())
    }
}

#[async_trait]
impl AddressUsage for MemoryUsage {
    async fn is_used(&self, _chain: Chain, address: &str) -> Result<bool> {
        let used = self.used.read().map_err(|_| WalletError::LockPoisoned("usage set"))?;
        Ok(used.contains(address))
    }
}
