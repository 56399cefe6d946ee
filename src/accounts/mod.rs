//! Account Reconciliation Store
//!
//! The single owner of the known-accounts map. Every mutation is an
//! upsert or removal keyed by address; push events and refresh responses
//! funnel through here so repeated delivery stays idempotent.

use std::collections::BTreeMap;

use ethers_core::types::U256;

use crate::types::Account;

#[derive(Debug, Default, Clone)]
pub struct AccountStore {
    entries: BTreeMap<String, U256>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the balance for an address.
    pub fn upsert(&mut self, address: impl Into<String>, balance_wei: U256) {
        let address = address.into();
        crate::log_debug!("accounts", "Upsert", address = crate::utils::logging::redact_address(&address));
        self.entries.insert(address, balance_wei);
    }

    /// Remove an address. Returns whether it was present.
    pub fn remove(&mut self, address: &str) -> bool {
        self.entries.remove(address).is_some()
    }

    /// Replace balances from a full refresh. Addresses not mentioned are
    /// kept; an empty list therefore changes nothing.
    pub fn bulk_upsert<I>(&mut self, accounts: I)
    where
        I: IntoIterator<Item = (String, U256)>,
    {
        for (address, balance) in accounts {
            self.entries.insert(address, balance);
        }
    }

    pub fn balance_of(&self, address: &str) -> Option<U256> {
        self.entries.get(address).copied()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.entries.contains_key(address)
    }

    /// Ordered snapshot of the current state.
    pub fn snapshot(&self) -> Vec<Account> {
        self.entries
            .iter()
            .map(|(address, balance)| Account {
                address: address.clone(),
                balance_wei: *balance,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_is_idempotent_by_key() {
        let mut store = AccountStore::new();
        store.upsert("0xaaa", U256::from(1u64));
        store.upsert("0xaaa", U256::from(2u64));

        assert_eq!(store.len(), 1);
        assert_eq!(store.balance_of("0xaaa"), Some(U256::from(2u64)));
    }

    #[test]
    fn test_remove_deletes_exactly_one() {
        let mut store = AccountStore::new();
        store.upsert("0xaaa", U256::from(1u64));
        store.upsert("0xbbb", U256::from(2u64));

        assert!(store.remove("0xaaa"));
        assert!(!store.remove("0xaaa"));
        assert_eq!(store.len(), 1);
        assert!(store.contains("0xbbb"));
    }

    #[test]
    fn test_bulk_upsert_empty_changes_nothing() {
        let mut store = AccountStore::new();
        store.upsert("0xaaa", U256::from(1u64));

        store.bulk_upsert(Vec::new());
        assert_eq!(store.len(), 1);
        assert_eq!(store.balance_of("0xaaa"), Some(U256::from(1u64)));
    }

    #[test]
    fn test_snapshot_is_ordered() {
        let mut store = AccountStore::new();
        store.upsert("0xccc", U256::from(3u64));
        store.upsert("0xaaa", U256::from(1u64));

        let snapshot = store.snapshot();
        assert_eq!(snapshot[0].address, "0xaaa");
        assert_eq!(snapshot[1].address, "0xccc");
    }
}
