//! Computed allocation and settlement value types.
//!
//! These are ephemeral: recomputed on demand from expenses and weights,
//! never persisted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::{Money, Percentage};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// One participant's computed share of an expense pool. The percentage is
/// informational; the amount is authoritative.
pub struct Distribution {
    pub participant_id: Uuid,
    pub amount: Money,
    pub percentage: Percentage,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Paid-versus-owed position for one participant. Positive net means the
/// participant is a creditor and should receive money.
pub struct Balance {
    pub participant_id: Uuid,
    pub paid: Money,
    pub owed: Money,
}

impl Balance {
    /// Net position in minor units (`paid - owed`).
    pub fn net_minor_units(&self) -> i64 {
        self.paid.minor_units - self.owed.minor_units
    }

    pub fn net(&self) -> Money {
        Money::new(self.net_minor_units(), self.paid.currency)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// A directed peer-to-peer payment closing part of the net imbalance.
pub struct Transfer {
    pub from: Uuid,
    pub to: Uuid,
    pub amount: Money,
}
