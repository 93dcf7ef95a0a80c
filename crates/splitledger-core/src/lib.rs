//! splitledger-core
//!
//! Allocation, settlement, and ledger-synchronization services.
//! Depends on splitledger-domain. No UI, no wire formats, no direct storage
//! backend; persistence goes through the [`storage`] contract.

pub mod allocation_service;
pub mod error;
pub mod settlement_service;
pub mod storage;
pub mod sync_service;

pub use allocation_service::*;
pub use error::CoreError;
pub use settlement_service::*;
pub use storage::*;
pub use sync_service::*;
