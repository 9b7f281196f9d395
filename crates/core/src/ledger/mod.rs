//! Stock assignment ledger logic.
//!
//! This module implements the core ledger functionality:
//! - Assignment counters and the conservation invariant
//! - Status derivation for assignment records
//! - Check-then-compute operations for assign, sell, and return
//! - Error types for ledger operations

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{
    AssignmentCounters, AssignmentStatus, ReturnOutcome, SaleOutcome, StockAvailability,
};
