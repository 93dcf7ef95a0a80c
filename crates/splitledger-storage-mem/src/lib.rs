//! In-memory ledger store implementing the core storage contract.
//!
//! The reference backend for tests and embedding callers. Transactions work
//! on a staged copy of the entry map: mutations become visible only when the
//! closure returns `Ok`, so a failure partway through a sync run rolls the
//! whole unit back. The map key doubles as the unique constraint on
//! `(participant, session, month)`.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use splitledger_core::{CoreError, LedgerStore, LedgerTransaction, StoreError};
use splitledger_domain::{LedgerEntry, LedgerEntryKey};

/// Mutex-guarded entry map. Whole transactions serialize behind the lock,
/// which subsumes the per-session-month serialization the synchronizer
/// requires.
#[derive(Default)]
pub struct MemoryLedgerStore {
    entries: Mutex<HashMap<LedgerEntryKey, LedgerEntry>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed entry for the key, if any.
    pub fn entry(&self, key: &LedgerEntryKey) -> Option<LedgerEntry> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Committed entries for one participant, in key order.
    pub fn entries_for_participant(&self, participant_id: Uuid) -> Vec<LedgerEntry> {
        let Ok(entries) = self.entries.lock() else {
            return Vec::new();
        };
        let mut matching: Vec<LedgerEntry> = entries
            .values()
            .filter(|entry| entry.participant_id == participant_id)
            .cloned()
            .collect();
        matching.sort_by_key(LedgerEntry::key);
        matching
    }
}

/// Working copy of the store for one transactional scope.
pub struct MemoryTransaction {
    entries: HashMap<LedgerEntryKey, LedgerEntry>,
}

impl LedgerTransaction for MemoryTransaction {
    fn find_entry(&self, key: &LedgerEntryKey) -> Result<Option<LedgerEntry>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn create_entry(&mut self, entry: LedgerEntry) -> Result<LedgerEntry, StoreError> {
        let key = entry.key();
        if self.entries.contains_key(&key) {
            return Err(StoreError::Conflict(key));
        }
        self.entries.insert(key, entry.clone());
        Ok(entry)
    }

    fn update_entry(&mut self, entry: LedgerEntry) -> Result<LedgerEntry, StoreError> {
        let key = entry.key();
        if !self.entries.contains_key(&key) {
            return Err(StoreError::NotFound(key));
        }
        self.entries.insert(key, entry.clone());
        Ok(entry)
    }
}

impl LedgerStore for MemoryLedgerStore {
    type Tx = MemoryTransaction;

    fn with_transaction<T, F>(&self, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut Self::Tx) -> Result<T, CoreError>,
    {
        let mut committed = self
            .entries
            .lock()
            .map_err(|_| CoreError::StoreUnavailable("ledger store lock poisoned".into()))?;
        let mut tx = MemoryTransaction {
            entries: committed.clone(),
        };
        let result = f(&mut tx)?;
        *committed = tx.entries;
        Ok(result)
    }
}
