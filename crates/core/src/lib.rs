//! Core business logic for Savdo.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Stock assignment ledger (assign, sell, return)
//! - `installment` - Installment contract schedule and state machine
//! - `reporting` - Read-only aggregate types

pub mod installment;
pub mod ledger;
pub mod reporting;
