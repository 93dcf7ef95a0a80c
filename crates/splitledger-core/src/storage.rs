//! Contract for the external personal-ledger store.
//!
//! The engine depends on persistence only through these traits: a narrow
//! find/create/update surface, always inside a transactional scope supplied
//! by the store. Backends must enforce a unique constraint on
//! [`LedgerEntryKey`] as the correctness backstop against concurrent
//! same-key synchronization runs.

use thiserror::Error;

use splitledger_domain::{LedgerEntry, LedgerEntryKey};

use crate::error::CoreError;

/// Backend failure modes, classified for retry handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Unique-key violation on create (duplicate entry).
    #[error("duplicate ledger entry: {0}")]
    Conflict(LedgerEntryKey),
    /// Update targeted an entry that does not exist.
    #[error("no ledger entry for key: {0}")]
    NotFound(LedgerEntryKey),
    /// Transient I/O failure (network, lock contention, timeout).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Operations available inside one transactional scope. Writes become
/// visible only when the enclosing [`LedgerStore::with_transaction`] call
/// returns `Ok`.
pub trait LedgerTransaction {
    fn find_entry(&self, key: &LedgerEntryKey) -> Result<Option<LedgerEntry>, StoreError>;
    fn create_entry(&mut self, entry: LedgerEntry) -> Result<LedgerEntry, StoreError>;
    fn update_entry(&mut self, entry: LedgerEntry) -> Result<LedgerEntry, StoreError>;
}

/// A personal-ledger store capable of running closures transactionally.
///
/// `with_transaction` commits when the closure returns `Ok` and rolls the
/// whole unit back when it returns `Err`; a failure partway through a sync
/// run must not leave some participants updated and others not.
pub trait LedgerStore: Send + Sync {
    type Tx: LedgerTransaction;

    fn with_transaction<T, F>(&self, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut Self::Tx) -> Result<T, CoreError>;
}
