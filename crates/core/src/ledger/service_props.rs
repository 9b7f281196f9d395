//! Property-based tests for the stock assignment ledger.
//!
//! - Conservation: assigned == sold + returned + remaining after every op
//! - Over-sale/over-return never succeed and never mutate counters
//! - Terminal records reject all further mutation

use proptest::prelude::*;

use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{AssignmentCounters, AssignmentStatus, StockAvailability};

/// A single ledger operation against one assignment.
#[derive(Debug, Clone, Copy)]
enum Op {
    Sell(i32),
    Return(i32),
}

/// Strategy for assigned quantities.
fn assigned_quantity() -> impl Strategy<Value = i32> {
    1i32..500
}

/// Strategy for a sequence of sale/return attempts (valid and invalid mixed).
fn op_sequence() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            (1i32..60).prop_map(Op::Sell),
            (1i32..60).prop_map(Op::Return),
        ],
        0..40,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Conservation holds after every operation, whether it succeeds or
    /// fails, and failures leave the counters untouched.
    #[test]
    fn prop_conservation_under_arbitrary_ops(
        assigned in assigned_quantity(),
        ops in op_sequence(),
    ) {
        let mut counters = AssignmentCounters::new(assigned);
        let mut pool_gained = 0i32;

        for op in ops {
            let before = counters;
            match op {
                Op::Sell(q) => match LedgerService::apply_sale(counters, q) {
                    Ok(outcome) => counters = outcome.counters,
                    Err(_) => prop_assert_eq!(counters, before, "failed sale must not mutate"),
                },
                Op::Return(q) => match LedgerService::apply_return(counters, q) {
                    Ok(outcome) => {
                        counters = outcome.counters;
                        pool_gained += outcome.pool_delta;
                    }
                    Err(_) => prop_assert_eq!(counters, before, "failed return must not mutate"),
                },
            }

            prop_assert!(counters.is_conserved());
            prop_assert_eq!(counters.assigned, assigned, "assigned is immutable");
        }

        // Everything that went back to the pool was counted as returned.
        prop_assert_eq!(pool_gained, counters.returned);
    }

    /// Selling or returning more than remaining always fails with the
    /// matching typed error.
    #[test]
    fn prop_over_disposal_always_rejected(
        assigned in assigned_quantity(),
        excess in 1i32..100,
    ) {
        let counters = AssignmentCounters::new(assigned);

        let sale = LedgerService::apply_sale(counters, assigned + excess);
        prop_assert!(
            matches!(sale, Err(LedgerError::OverSale { .. })),
            "expected OverSale, got {sale:?}"
        );

        let ret = LedgerService::apply_return(counters, assigned + excess);
        prop_assert!(
            matches!(ret, Err(LedgerError::OverReturn { .. })),
            "expected OverReturn, got {ret:?}"
        );
    }

    /// Once a record is closed, every mutation fails with AssignmentClosed.
    #[test]
    fn prop_terminal_records_are_frozen(
        assigned in assigned_quantity(),
        attempt in 1i32..50,
    ) {
        let closed = LedgerService::apply_sale(AssignmentCounters::new(assigned), assigned)
            .unwrap()
            .counters;
        prop_assert!(closed.is_closed());

        prop_assert!(
            matches!(
                LedgerService::apply_sale(closed, attempt),
                Err(LedgerError::AssignmentClosed { .. })
            ),
            "expected AssignmentClosed on sale"
        );
        prop_assert!(
            matches!(
                LedgerService::apply_return(closed, attempt),
                Err(LedgerError::AssignmentClosed { .. })
            ),
            "expected AssignmentClosed on return"
        );
    }

    /// Assignment validation never admits more than available stock and
    /// never rejects a request within it.
    #[test]
    fn prop_assign_respects_available_stock(
        pool_total in 0i32..1000,
        outstanding_frac in 0i32..1000,
        quantity in 1i32..1000,
    ) {
        let outstanding = outstanding_frac.min(pool_total);
        let availability = StockAvailability { pool_total, outstanding };
        let result = LedgerService::validate_assign(quantity, availability);

        if quantity <= availability.available() {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(
                matches!(result, Err(LedgerError::InsufficientStock { .. })),
                "expected InsufficientStock, got {result:?}"
            );
        }
    }

    /// Status derivation matches the counter shape.
    #[test]
    fn prop_status_matches_counters(
        assigned in assigned_quantity(),
        sold_frac in 0i32..500,
        returned_frac in 0i32..500,
    ) {
        let sold = sold_frac.min(assigned);
        let returned = returned_frac.min(assigned - sold);
        let counters = AssignmentCounters {
            assigned,
            sold,
            returned,
            remaining: assigned - sold - returned,
        };
        prop_assert!(counters.is_conserved());

        let status = counters.derive_status();
        match status {
            AssignmentStatus::SoldOut => {
                prop_assert_eq!(counters.remaining, 0);
                prop_assert!(counters.sold > 0);
            }
            AssignmentStatus::Returned => {
                prop_assert_eq!(counters.remaining, 0);
                prop_assert_eq!(counters.sold, 0);
            }
            AssignmentStatus::PartiallyReturned => {
                prop_assert!(counters.remaining > 0);
                prop_assert!(counters.returned > 0);
            }
            AssignmentStatus::Assigned => {
                prop_assert!(counters.remaining > 0);
                prop_assert_eq!(counters.returned, 0);
            }
        }
    }
}
