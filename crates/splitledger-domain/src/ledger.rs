//! Personal-ledger entries synchronized from session expenses.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::YearMonth;
use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Uniqueness key for synchronized entries: at most one entry per
/// participant per session per month.
pub struct LedgerEntryKey {
    pub participant_id: Uuid,
    pub session_id: Uuid,
    pub month: YearMonth,
}

impl fmt::Display for LedgerEntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.participant_id, self.session_id, self.month
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// A participant's synchronized share of a session for one month, as stored
/// in their private expense ledger. `amount` and `description` are the
/// fields the synchronizer overwrites idempotently.
pub struct LedgerEntry {
    pub id: Uuid,
    pub participant_id: Uuid,
    pub session_id: Uuid,
    pub month: YearMonth,
    pub amount: Money,
    pub description: String,
}

impl LedgerEntry {
    pub fn new(
        participant_id: Uuid,
        session_id: Uuid,
        month: YearMonth,
        amount: Money,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            participant_id,
            session_id,
            month,
            amount,
            description: description.into(),
        }
    }

    pub fn key(&self) -> LedgerEntryKey {
        LedgerEntryKey {
            participant_id: self.participant_id,
            session_id: self.session_id,
            month: self.month,
        }
    }
}
