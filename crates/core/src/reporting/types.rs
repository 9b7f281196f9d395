//! Read-only reporting aggregates.
//!
//! These are derived views over ledger and contract state, computed on
//! demand by the reporting repository. Nothing here mutates anything.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use savdo_shared::types::{AgentId, ContractId, CustomerId, ProductId};
use serde::Serialize;

use crate::installment::ContractStatus;

/// Outstanding stock held by one agent.
#[derive(Debug, Clone, Serialize)]
pub struct AgentOutstanding {
    /// The agent.
    pub agent_id: AgentId,
    /// Number of assignments with units still outstanding.
    pub open_assignments: u64,
    /// Sum of remaining units across those assignments.
    pub total_remaining: i64,
}

/// Allocation totals for one product across all its assignments.
#[derive(Debug, Clone, Serialize)]
pub struct ProductAllocation {
    /// The product.
    pub product_id: ProductId,
    /// Units ever assigned.
    pub assigned_total: i64,
    /// Units sold by agents.
    pub sold_total: i64,
    /// Units returned to the pool.
    pub returned_total: i64,
    /// Units currently outstanding.
    pub remaining_total: i64,
}

/// A contract whose next payment is near or past due.
#[derive(Debug, Clone, Serialize)]
pub struct DueContract {
    /// The contract.
    pub contract_id: ContractId,
    /// The customer the contract references.
    pub customer_ref: CustomerId,
    /// Date the next installment falls due.
    pub next_payment_date: NaiveDate,
    /// Fixed monthly installment.
    pub monthly_payment: Decimal,
    /// Balance still owed.
    pub remaining_amount: Decimal,
    /// Read-time derived status (overdue included).
    pub status: ContractStatus,
}

/// Returns true when a payment date falls within `days` of `today`,
/// or has already passed.
#[must_use]
pub fn is_due_within(next_payment_date: NaiveDate, today: NaiveDate, days: u32) -> bool {
    let horizon = today
        .checked_add_days(chrono::Days::new(u64::from(days)))
        .unwrap_or(today);
    next_payment_date <= horizon
}
