//! Scan Tests - gap-limit discovery against mocked usage oracles
//!
//! These tests verify:
//! 1. Discovery records interleaved used indices and stops after G misses
//! 2. Without an oracle only external index 0 is reported
//! 3. KeyChain union laws over a scanned wallet
//! 4. Concurrent scans of one branch never overlap
//! 5. Failed or abandoned scans keep the previous ScanState

use async_trait::async_trait;
use avahd::{
    AddressUsage, Branch, Chain, KeyChain, MnemonicWallet, Result, ShortId, WalletConfig, WalletError,
};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn wallet(gap: u32) -> MnemonicWallet {
    MnemonicWallet::from_mnemonic(TEST_MNEMONIC, WalletConfig::new().with_gap_limit(gap)).expect("valid mnemonic")
}

/// Oracle over X addresses of chosen indices; records which indices were asked about.
struct IndexOracle {
    used: HashSet<String>,
    index_of: HashMap<String, u32>,
    queried: Mutex<BTreeSet<u32>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    fail: AtomicBool,
    hang: AtomicBool,
}

impl IndexOracle {
    fn new(w: &MnemonicWallet, branch: Branch, used: &[u32]) -> Self {
        let address = |i: u32| -> String {
            w.key_for_index(branch, i).unwrap().short_id().to_address(Chain::X, "avax").unwrap()
        };
        Self {
            used: used.iter().map(|i| address(*i)).collect(),
            index_of: (0..64).map(|i| (address(i), i)).collect(),
            queried: Mutex::new(BTreeSet::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            hang: AtomicBool::new(false),
        }
    }

    fn highest_queried(&self) -> Option<u32> {
        self.queried.lock().unwrap().last().copied()
    }
}

#[async_trait]
impl AddressUsage for IndexOracle {
    async fn is_used(&self, _chain: Chain, address: &str) -> Result<bool> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(WalletError::UsageOracle("indexer unavailable".into()));
        }
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(i) = self.index_of.get(address) {
            self.queried.lock().unwrap().insert(*i);
        }
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.used.contains(address))
    }
}

fn ids(chain: &KeyChain) -> Vec<ShortId> {
    chain.addresses().copied().collect()
}

mod gap_limit_tests {
    use super::*;

    /// Test: used {0,2,5}, G=5 stops at index 10
    #[tokio::test]
    async fn terminates_after_gap() {
        let reference = wallet(5);
        let oracle = Arc::new(IndexOracle::new(&reference, Branch::External, &[0, 2, 5]));
        let w = wallet(5).with_usage_oracle(oracle.clone());

        let state = w.scan_branch(Branch::External).await.unwrap();
        assert_eq!(state.used_indices().iter().copied().collect::<Vec<_>>(), vec![0, 2, 5]);
        assert_eq!(state.highest_scanned(), Some(10));
        assert_eq!(oracle.highest_queried(), Some(10), "scan went past the gap");
        assert_eq!(state.next_index(), 6);
        assert_eq!(w.key_chain(Branch::External).unwrap().len(), 3);
    }

    /// Test: nothing used still scans exactly G indices
    #[tokio::test]
    async fn empty_history_scans_one_gap() {
        let reference = wallet(4);
        let oracle = Arc::new(IndexOracle::new(&reference, Branch::Internal, &[]));
        let w = wallet(4).with_usage_oracle(oracle.clone());

        let state = w.scan_branch(Branch::Internal).await.unwrap();
        assert!(state.used_indices().is_empty());
        assert_eq!(state.highest_scanned(), Some(3));
        assert!(w.key_chain(Branch::Internal).unwrap().is_empty());
    }

    /// Test: no oracle degrades to external index 0
    #[tokio::test]
    async fn no_oracle_degrades() {
        let w = wallet(5);
        w.scan().await.unwrap();
        assert_eq!(w.scan_state(Branch::External).unwrap().highest_scanned(), Some(0));
        assert_eq!(w.key_chain_x().unwrap().len(), 1);
        assert_eq!(w.all_addresses_p().unwrap(), vec![w.address_p().unwrap()]);
    }
}

mod keychain_tests {
    use super::*;

    /// Test: union of branch keychains is commutative, idempotent, duplicate-free
    #[tokio::test]
    async fn union_laws() {
        let reference = wallet(3);
        let mut used: Vec<String> = Vec::new();
        for (branch, index) in [(Branch::External, 1), (Branch::Internal, 0), (Branch::Internal, 2)] {
            used.push(reference.key_for_index(branch, index).unwrap().short_id().to_address(Chain::X, "avax").unwrap());
        }
        let w = wallet(3).with_usage_oracle(Arc::new(avahd::MemoryUsage::with_used(used)));
        w.scan().await.unwrap();

        let e = w.key_chain(Branch::External).unwrap();
        let i = w.key_chain(Branch::Internal).unwrap();
        assert_eq!(e.len(), 2);
        assert_eq!(i.len(), 2);

        let ei = e.union(&i);
        assert_eq!(ei.len(), 4);
        assert_eq!(ids(&ei), ids(&i.union(&e)));
        assert_eq!(ids(&ei.union(&ei)), ids(&ei));
        for id in e.addresses().chain(i.addresses()) {
            assert!(ei.contains(id));
        }
        assert_eq!(ids(&w.key_chain_x().unwrap()), ids(&ei));
        assert_eq!(w.all_addresses_x().unwrap().len(), 4);
        assert_eq!(w.all_addresses_p().unwrap().len(), 2);
    }
}

mod concurrency_tests {
    use super::*;

    /// Test: two scans of one branch run one after the other
    #[tokio::test]
    async fn scans_are_serialized() {
        let reference = wallet(5);
        let oracle = Arc::new(IndexOracle::new(&reference, Branch::Internal, &[1, 3]));
        let w = wallet(5).with_usage_oracle(oracle.clone());

        let (a, b) = tokio::join!(w.scan_branch(Branch::Internal), w.scan_branch(Branch::Internal));
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(oracle.max_in_flight.load(Ordering::SeqCst), 1);
    }

    /// Test: concurrent derivation of one index agrees
    #[tokio::test]
    async fn concurrent_derivation_is_idempotent() {
        let w = Arc::new(wallet(5));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let w = w.clone();
            handles.push(tokio::spawn(async move { w.key_for_index(Branch::External, 42).unwrap().short_id() }));
        }
        let mut seen = HashSet::new();
        for handle in handles {
            seen.insert(handle.await.unwrap());
        }
        assert_eq!(seen.len(), 1);
    }

    /// Test: oracle failure surfaces and keeps the last good state
    #[tokio::test]
    async fn failed_scan_keeps_state() {
        let reference = wallet(3);
        let oracle = Arc::new(IndexOracle::new(&reference, Branch::External, &[2]));
        let w = wallet(3).with_usage_oracle(oracle.clone());
        let before = w.scan_branch(Branch::External).await.unwrap();

        oracle.fail.store(true, Ordering::SeqCst);
        assert!(matches!(w.scan_branch(Branch::External).await, Err(WalletError::UsageOracle(_))));
        assert_eq!(w.scan_state(Branch::External).unwrap(), before);
    }

    /// Test: an abandoned scan leaves state intact and frees the branch
    #[tokio::test]
    async fn abandoned_scan_keeps_state() {
        let reference = wallet(3);
        let oracle = Arc::new(IndexOracle::new(&reference, Branch::External, &[1]));
        let w = wallet(3).with_usage_oracle(oracle.clone());
        let before = w.scan_branch(Branch::External).await.unwrap();

        oracle.hang.store(true, Ordering::SeqCst);
        let timed_out = tokio::time::timeout(Duration::from_millis(50), w.scan_branch(Branch::External)).await;
        assert!(timed_out.is_err());
        assert_eq!(w.scan_state(Branch::External).unwrap(), before);

        oracle.hang.store(false, Ordering::SeqCst);
        assert_eq!(w.scan_branch(Branch::External).await.unwrap(), before);
    }
}
