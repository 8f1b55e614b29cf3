//! Address Scan Engine
//!
//! ```text
//!  index:   0   1   2   3   4   5   6   7   8   9  10
//!  used:    ●   ○   ●   ○   ○   ●   ○   ○   ○   ○   ○
//!                                   └── gap of G unused ──┘ stop
//! ```
//!
//! One scanner per branch. Discovery walks indices from 0, asks the usage
//! oracle about each derived address and stops after `gap_limit`
//! consecutive misses. Scans of a branch are serialized; the new state is
//! committed only when a scan completes, so a dropped or failed scan leaves
//! the previous state in place.

mod oracle;

pub use oracle::{AddressUsage, MemoryUsage};

use crate::address::Chain;
use crate::error::{Result, WalletError};
use crate::hd::{derive_child, AccountKey, Branch, DerivedKey, HARDENED_LIMIT};
use crate::keychain::KeyChain;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    highest_scanned: Option<u32>,
    used: BTreeSet<u32>,
}

impl ScanState {
    pub fn highest_scanned(&self) -> Option<u32> { self.highest_scanned }
    pub fn used_indices(&self) -> &BTreeSet<u32> { &self.used }
    pub fn is_used(&self, index: u32) -> bool { self.used.contains(&index) }
    pub fn highest_used(&self) -> Option<u32> { self.used.last().copied() }

    /// First index past the highest used one.
    pub fn next_index(&self) -> u32 {
        self.highest_used().map(|i| i + 1).unwrap_or(0)
    }
}

pub struct AddressScanner {
    branch: Branch,
    account: AccountKey,
    hrp: String,
    gap_limit: u32,
    oracle: Option<Arc<dyn AddressUsage>>,
    scan_lock: tokio::sync::Mutex<()>,
    state: RwLock<ScanState>,
    cache: RwLock<BTreeMap<u32, DerivedKey>>,
}

impl AddressScanner {
    pub fn new(account: AccountKey, branch: Branch, hrp: impl Into<String>, gap_limit: u32) -> Self {
        Self {
            branch,
            account,
            hrp: hrp.into(),
            gap_limit: gap_limit.max(1),
            oracle: None,
            scan_lock: tokio::sync::Mutex::new(()),
            state: RwLock::new(ScanState::default()),
            cache: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn with_oracle(mut self, oracle: Arc<dyn AddressUsage>) -> Self { self.oracle = Some(oracle); self }
    pub fn set_oracle(&mut self, oracle: Option<Arc<dyn AddressUsage>>) { self.oracle = oracle; }
    pub fn branch(&self) -> Branch { self.branch }
    pub fn gap_limit(&self) -> u32 { self.gap_limit }

    /// Key at `index` regardless of scan results. Only indices inside the
    /// committed scan range are cached; anything past it is derived on demand
    /// and dropped with the caller's copy. Concurrent callers may both derive;
    /// the result is identical so the first insert wins.
    pub fn key_for_index(&self, index: u32) -> Result<DerivedKey> {
        {
            let cache = self.cache.read().map_err(|_| WalletError::LockPoisoned("key cache"))?;
            if let Some(key) = cache.get(&index) {
                return Ok(key.clone());
            }
        }
        let key = derive_child(&self.account, self.branch, index)?;
        if index > self.cache_bound()? {
            return Ok(key);
        }
        let mut cache = self.cache.write().map_err(|_| WalletError::LockPoisoned("key cache"))?;
        Ok(cache.entry(index).or_insert(key).clone())
    }

    pub fn cached_keys(&self) -> Result<usize> {
        Ok(self.cache.read().map_err(|_| WalletError::LockPoisoned("key cache"))?.len())
    }

    fn cache_bound(&self) -> Result<u32> {
        Ok(self.state()?.highest_scanned().unwrap_or(0))
    }

    pub fn address(&self, chain: Chain, index: u32) -> Result<String> {
        self.key_for_index(index)?.short_id().to_address(chain, &self.hrp)
    }

    pub fn state(&self) -> Result<ScanState> {
        Ok(self.state.read().map_err(|_| WalletError::LockPoisoned("scan state"))?.clone())
    }

    /// Gap-limited discovery. Without an oracle only external index 0 is
    /// reported, since a wallet with no history source has nothing to find.
    pub async fn scan(&self) -> Result<ScanState> {
        let _guard = self.scan_lock.lock().await;

        let Some(oracle) = self.oracle.clone() else {
            let state = ScanState {
                highest_scanned: (self.branch == Branch::External).then_some(0),
                used: BTreeSet::new(),
            };
            debug!(branch = %self.branch, "no usage oracle, skipping discovery");
            self.commit(state.clone())?;
            return Ok(state);
        };

        // P-chain never spends from change addresses.
        let chains: &[Chain] = match self.branch {
            Branch::External => &[Chain::X, Chain::P],
            Branch::Internal => &[Chain::X],
        };

        let mut state = ScanState::default();
        let mut unused_run = 0u32;
        let mut index = 0u32;
        loop {
            let id = self.key_for_index(index)?.short_id();
            let mut used = false;
            for chain in chains {
                let address = id.to_address(*chain, &self.hrp)?;
                if oracle.is_used(*chain, &address).await? {
                    used = true;
                    break;
                }
            }

            state.highest_scanned = Some(index);
            if used {
                state.used.insert(index);
                unused_run = 0;
            } else {
                unused_run += 1;
            }

            if unused_run >= self.gap_limit || index + 1 >= HARDENED_LIMIT {
                break;
            }
            index += 1;
        }

        info!(
            branch = %self.branch,
            highest_scanned = index,
            used = state.used.len(),
            "address scan complete"
        );
        self.commit(state.clone())?;
        Ok(state)
    }

    /// Keys at every used index; external index 0 is always present.
    pub fn key_chain(&self) -> Result<KeyChain> {
        let state = self.state()?;
        let mut indices = state.used;
        if self.branch == Branch::External {
            indices.insert(0);
        }
        let mut chain = KeyChain::new();
        for index in indices {
            chain.insert(self.key_for_index(index)?.key_pair().clone());
        }
        Ok(chain)
    }

    fn commit(&self, state: ScanState) -> Result<()> {
        let bound = state.highest_scanned.unwrap_or(0);
        *self.state.write().map_err(|_| WalletError::LockPoisoned("scan state"))? = state;
        self.cache
            .write()
            .map_err(|_| WalletError::LockPoisoned("key cache"))?
            .retain(|index, _| *index <= bound);
        Ok(())
    }
}

impl fmt::Debug for AddressScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressScanner")
            .field("branch", &self.branch)
            .field("hrp", &self.hrp)
            .field("gap_limit", &self.gap_limit)
            .field("has_oracle", &self.oracle.is_some())
            .finish_non_exhaustive()
    }
}
