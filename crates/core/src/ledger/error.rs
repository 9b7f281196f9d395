//! Ledger error types for validation, state, and concurrency failures.
//!
//! Every invariant violation surfaces as a typed error; nothing is
//! logged-and-ignored. `ConcurrencyConflict` is the only retryable kind.

use thiserror::Error;
use uuid::Uuid;

use super::types::AssignmentStatus;

/// Errors that can occur during stock ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Quantity must be positive.
    #[error("Quantity must be positive, got {quantity}")]
    InvalidQuantity {
        /// The rejected quantity.
        quantity: i32,
    },

    /// Requested more units than the shop has unassigned.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Units requested for assignment.
        requested: i32,
        /// Units currently unassigned in the pool.
        available: i32,
    },

    /// Sale quantity exceeds what is outstanding on the assignment.
    #[error("Cannot sell {requested} units, only {remaining} remaining")]
    OverSale {
        /// Units the caller tried to sell.
        requested: i32,
        /// Units actually outstanding.
        remaining: i32,
    },

    /// Return quantity exceeds what is outstanding on the assignment.
    #[error("Cannot return {requested} units, only {remaining} remaining")]
    OverReturn {
        /// Units the caller tried to return.
        requested: i32,
        /// Units actually outstanding.
        remaining: i32,
    },

    /// Pool total cannot drop below outstanding assigned units.
    #[error("Pool total {total} is below outstanding assignments {outstanding}")]
    PoolBelowOutstanding {
        /// Requested pool total.
        total: i32,
        /// Units currently outstanding with agents.
        outstanding: i32,
    },

    // ========== State Errors ==========
    /// Assignment is in a terminal state and accepts no further mutation.
    #[error("Assignment is closed with status {status:?}")]
    AssignmentClosed {
        /// The terminal status of the record.
        status: AssignmentStatus,
    },

    // ========== Lookup Errors ==========
    /// Assignment not found.
    #[error("Assignment not found: {0}")]
    AssignmentNotFound(Uuid),

    /// No stock pool exists for the product at the shop.
    #[error("No stock pool for product {product_id} at shop {shop_id}")]
    PoolNotFound {
        /// The product.
        product_id: Uuid,
        /// The shop.
        shop_id: Uuid,
    },

    // ========== Concurrency Errors ==========
    /// A concurrent writer won; the caller should retry with fresh state.
    #[error("Concurrent modification detected, please retry")]
    ConcurrencyConflict,

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidQuantity { .. } => "INVALID_QUANTITY",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::OverSale { .. } => "OVER_SALE",
            Self::OverReturn { .. } => "OVER_RETURN",
            Self::PoolBelowOutstanding { .. } => "POOL_BELOW_OUTSTANDING",
            Self::AssignmentClosed { .. } => "ASSIGNMENT_CLOSED",
            Self::AssignmentNotFound(_) | Self::PoolNotFound { .. } => "NOT_FOUND",
            Self::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InvalidQuantity { .. }
            | Self::InsufficientStock { .. }
            | Self::OverSale { .. }
            | Self::OverReturn { .. }
            | Self::PoolBelowOutstanding { .. } => 400,

            // 404 Not Found
            Self::AssignmentNotFound(_) | Self::PoolNotFound { .. } => 404,

            // 409 Conflict - terminal state and concurrency errors
            Self::AssignmentClosed { .. } | Self::ConcurrencyConflict => 409,

            // 500 Internal Server Error
            Self::Database(_) => 500,
        }
    }

    /// Returns true if this error is transient and safe to retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict)
    }
}
