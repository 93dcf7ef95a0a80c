//! splitledger-domain
//!
//! Pure domain models (Money, Expense, Session, Balance, LedgerEntry, etc.).
//! No I/O, no storage. Only data types, classification, and date math.

pub mod common;
pub mod expense;
pub mod ledger;
pub mod money;
pub mod participant;
pub mod session;
pub mod settlement;

pub use common::*;
pub use expense::*;
pub use ledger::*;
pub use money::*;
pub use participant::*;
pub use session::*;
pub use settlement::*;
