//! Installment contract error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during installment contract operations.
#[derive(Debug, Error)]
pub enum ContractError {
    // ========== Term Validation Errors ==========
    /// Duration must be between 1 and 24 months.
    #[error("Duration must be between 1 and 24 months, got {months}")]
    DurationOutOfRange {
        /// The rejected duration.
        months: i32,
    },

    /// Down payment cannot exceed the total amount.
    #[error("Down payment {down_payment} exceeds total amount {total_amount}")]
    DownPaymentExceedsTotal {
        /// The down payment offered.
        down_payment: Decimal,
        /// The total sale amount.
        total_amount: Decimal,
    },

    /// Amounts must be non-negative.
    #[error("Contract amounts must be non-negative")]
    NegativeAmount,

    // ========== State Errors ==========
    /// All installments are already paid.
    #[error("Contract is already settled, all installments paid")]
    AlreadySettled,

    /// Contract was cancelled and is frozen.
    #[error("Contract is cancelled and accepts no further changes")]
    Cancelled,

    // ========== Lookup Errors ==========
    /// Contract not found.
    #[error("Contract not found: {0}")]
    ContractNotFound(Uuid),

    // ========== Concurrency Errors ==========
    /// A concurrent writer won; the caller should retry with fresh state.
    #[error("Concurrent modification detected, please retry")]
    ConcurrencyConflict,

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl ContractError {
    /// Returns the error code for API responses.
    ///
    /// All term validation failures share the `INVALID_TERMS` code the
    /// clients already branch on; the message carries the detail.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DurationOutOfRange { .. }
            | Self::DownPaymentExceedsTotal { .. }
            | Self::NegativeAmount => "INVALID_TERMS",
            Self::AlreadySettled => "CONTRACT_ALREADY_SETTLED",
            Self::Cancelled => "CONTRACT_CANCELLED",
            Self::ContractNotFound(_) => "NOT_FOUND",
            Self::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::DurationOutOfRange { .. }
            | Self::DownPaymentExceedsTotal { .. }
            | Self::NegativeAmount => 400,
            Self::ContractNotFound(_) => 404,
            Self::AlreadySettled | Self::Cancelled | Self::ConcurrencyConflict => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns true if this error is transient and safe to retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict)
    }
}
