//! Installment contract engine.
//!
//! This module implements the contract lifecycle:
//! - Term validation and schedule computation
//! - Payment application and balance tracking
//! - Status state machine (active, completed, overdue, cancelled)
//! - Error types for contract operations

pub mod error;
pub mod schedule;
pub mod service;
pub mod status;
pub mod types;

#[cfg(test)]
mod schedule_props;

pub use error::ContractError;
pub use schedule::{PAYMENT_INTERVAL_DAYS, compute_schedule, validate_terms};
pub use service::InstallmentService;
pub use status::derive_status;
pub use types::{
    ContractStatus, ContractTerms, MAX_DURATION_MONTHS, MIN_DURATION_MONTHS, PaymentOutcome,
    Schedule,
};
