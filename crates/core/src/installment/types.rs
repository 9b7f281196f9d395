//! Installment contract domain types.
//!
//! A contract splits the financed balance of a sale (total minus down
//! payment) into fixed monthly payments. Schedule fields are computed
//! once at creation and advanced incrementally by payments, never
//! recomputed wholesale on edit.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Minimum contract duration in months.
pub const MIN_DURATION_MONTHS: i32 = 1;
/// Maximum contract duration in months.
pub const MAX_DURATION_MONTHS: i32 = 24;

/// Contract status in the payment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    /// Payments are being made on schedule.
    Active,
    /// All installments paid; nothing outstanding.
    Completed,
    /// The next payment date has passed without a recorded payment.
    Overdue,
    /// Cancelled by operator action (terminal, frozen).
    Cancelled,
}

impl ContractStatus {
    /// Returns true if the contract accepts no further mutation.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns true if a payment may be applied in this state.
    #[must_use]
    pub fn accepts_payment(&self) -> bool {
        matches!(self, Self::Active | Self::Overdue)
    }

    /// String form used in API responses and storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }
}

/// The immutable terms a contract is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractTerms {
    /// Full sale price.
    pub total_amount: Decimal,
    /// Amount paid up front.
    pub down_payment: Decimal,
    /// Number of monthly installments (1..=24).
    pub duration_months: i32,
}

impl ContractTerms {
    /// The balance financed across the installments.
    #[must_use]
    pub fn financed_principal(&self) -> Decimal {
        self.total_amount - self.down_payment
    }
}

/// A computed payment schedule at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Fixed monthly installment amount (whole currency units).
    pub monthly_payment: Decimal,
    /// Balance still owed.
    pub remaining_amount: Decimal,
    /// Date the next installment falls due.
    pub next_payment_date: NaiveDate,
}

/// Result of applying one payment to a contract.
#[derive(Debug, Clone, Copy)]
pub struct PaymentOutcome {
    /// Installments paid so far, including this one.
    pub paid_months: i32,
    /// Balance still owed after this payment.
    pub remaining_amount: Decimal,
    /// Date the next installment falls due.
    pub next_payment_date: NaiveDate,
    /// Status after this payment.
    pub status: ContractStatus,
}
