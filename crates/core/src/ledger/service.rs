//! Ledger service for assignment validation and counter arithmetic.
//!
//! Pure check-then-compute logic with no database dependencies. The
//! repository layer reads current counters, calls these functions, and
//! commits the outcome with an atomic conditional update; a validation
//! failure here therefore never leaves partial state behind.

use super::error::LedgerError;
use super::types::{
    AssignmentCounters, ReturnOutcome, SaleOutcome, StockAvailability,
};

/// Ledger service for stock assignment operations.
pub struct LedgerService;

impl LedgerService {
    /// Validates a new assignment against the shop's available stock.
    ///
    /// Available stock is the pool total minus units already outstanding
    /// with agents; an assignment may never push the outstanding sum
    /// past the pool total.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity` for non-positive quantities and
    /// `InsufficientStock` when the request exceeds available stock.
    pub fn validate_assign(
        quantity: i32,
        availability: StockAvailability,
    ) -> Result<(), LedgerError> {
        if quantity <= 0 {
            return Err(LedgerError::InvalidQuantity { quantity });
        }

        let available = availability.available();
        if quantity > available {
            return Err(LedgerError::InsufficientStock {
                requested: quantity,
                available,
            });
        }

        Ok(())
    }

    /// Applies a sale of `quantity` units to the given counters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity`, `AssignmentClosed` for terminal
    /// records, or `OverSale` when the quantity exceeds what remains.
    pub fn apply_sale(
        counters: AssignmentCounters,
        quantity: i32,
    ) -> Result<SaleOutcome, LedgerError> {
        if quantity <= 0 {
            return Err(LedgerError::InvalidQuantity { quantity });
        }
        if counters.is_closed() {
            return Err(LedgerError::AssignmentClosed {
                status: counters.derive_status(),
            });
        }
        if quantity > counters.remaining {
            return Err(LedgerError::OverSale {
                requested: quantity,
                remaining: counters.remaining,
            });
        }

        let next = AssignmentCounters {
            assigned: counters.assigned,
            sold: counters.sold + quantity,
            returned: counters.returned,
            remaining: counters.remaining - quantity,
        };
        debug_assert!(next.is_conserved());

        Ok(SaleOutcome {
            counters: next,
            status: next.derive_status(),
        })
    }

    /// Applies a return of `quantity` units to the given counters.
    ///
    /// The outcome carries `pool_delta`: the units that must go back
    /// into the shop's stock pool in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity`, `AssignmentClosed` for terminal
    /// records, or `OverReturn` when the quantity exceeds what remains.
    pub fn apply_return(
        counters: AssignmentCounters,
        quantity: i32,
    ) -> Result<ReturnOutcome, LedgerError> {
        if quantity <= 0 {
            return Err(LedgerError::InvalidQuantity { quantity });
        }
        if counters.is_closed() {
            return Err(LedgerError::AssignmentClosed {
                status: counters.derive_status(),
            });
        }
        if quantity > counters.remaining {
            return Err(LedgerError::OverReturn {
                requested: quantity,
                remaining: counters.remaining,
            });
        }

        let next = AssignmentCounters {
            assigned: counters.assigned,
            sold: counters.sold,
            returned: counters.returned + quantity,
            remaining: counters.remaining - quantity,
        };
        debug_assert!(next.is_conserved());

        Ok(ReturnOutcome {
            counters: next,
            status: next.derive_status(),
            pool_delta: quantity,
        })
    }

    /// Validates a direct pool total edit against outstanding assignments.
    ///
    /// Shop staff may correct on-hand stock, but never below what is
    /// already out with agents.
    ///
    /// # Errors
    ///
    /// Returns `PoolBelowOutstanding` when the new total would underflow
    /// the outstanding sum.
    pub fn validate_pool_total(total: i32, outstanding: i32) -> Result<(), LedgerError> {
        if total < outstanding {
            return Err(LedgerError::PoolBelowOutstanding { total, outstanding });
        }
        Ok(())
    }
}
