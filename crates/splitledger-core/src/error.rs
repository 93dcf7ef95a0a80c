use thiserror::Error;

use splitledger_domain::{ExpenseError, MoneyError};

use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid expense: {0}")]
    InvalidExpense(String),
    #[error("no participants to allocate across")]
    NoParticipants,
    #[error("invalid allocation weights: {0}")]
    InvalidWeights(String),
    #[error("ledger out of balance by {0} minor units")]
    UnbalancedLedger(i64),
    #[error("ledger sync conflict: {0}")]
    SyncConflict(String),
    #[error("ledger store unavailable: {0}")]
    StoreUnavailable(String),
}

impl CoreError {
    /// Whether the caller may retry with backoff. Pure computation errors
    /// indicate bad input or a logic defect and are never retryable;
    /// only transient store failures are.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::StoreUnavailable(_))
    }
}

impl From<MoneyError> for CoreError {
    fn from(err: MoneyError) -> Self {
        CoreError::InvalidAmount(err.to_string())
    }
}

impl From<ExpenseError> for CoreError {
    fn from(err: ExpenseError) -> Self {
        CoreError::InvalidExpense(err.to_string())
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(key) => {
                CoreError::SyncConflict(format!("duplicate ledger entry for {key}"))
            }
            StoreError::NotFound(key) => {
                CoreError::SyncConflict(format!("ledger entry vanished for {key}"))
            }
            StoreError::Unavailable(reason) => CoreError::StoreUnavailable(reason),
        }
    }
}
