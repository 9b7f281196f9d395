//! Contract status state machine.
//!
//! Status is a pure function of `{paid_months, duration_months,
//! remaining_amount, next_payment_date, now, cancelled}`. It is derived
//! at read time rather than stored in multiple places, so overdue
//! detection can never diverge from the schedule fields.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::ContractStatus;

/// Derives the effective contract status.
///
/// Precedence: cancelled is terminal and wins over everything; a fully
/// paid contract is completed; an unpaid installment past its due date
/// is overdue; otherwise the contract is active. A payment recorded on
/// an overdue contract moves it back to active because the due date
/// advances past `today`.
#[must_use]
pub fn derive_status(
    paid_months: i32,
    duration_months: i32,
    remaining_amount: Decimal,
    next_payment_date: NaiveDate,
    today: NaiveDate,
    cancelled: bool,
) -> ContractStatus {
    if cancelled {
        return ContractStatus::Cancelled;
    }
    if remaining_amount <= Decimal::ZERO || paid_months >= duration_months {
        return ContractStatus::Completed;
    }
    if today > next_payment_date {
        return ContractStatus::Overdue;
    }
    ContractStatus::Active
}
