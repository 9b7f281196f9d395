//! Property-based tests for installment schedule arithmetic.
//!
//! - The rounded monthly payment stays within half a unit per month of
//!   the exact quotient
//! - The remaining balance is non-negative, monotonically decreasing,
//!   and exactly zero after the final installment
//! - Term bounds are enforced for every generated input

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::ContractError;
use super::schedule::{monthly_payment, remaining_after, validate_terms};
use super::service::InstallmentService;
use super::types::{ContractStatus, ContractTerms, MAX_DURATION_MONTHS};

/// Strategy for (total, down) pairs with down <= total.
fn amounts() -> impl Strategy<Value = (Decimal, Decimal)> {
    (0i64..100_000_000, 0i64..100_000_000).prop_map(|(a, b)| {
        let total = a.max(b);
        let down = a.min(b);
        (Decimal::from(total), Decimal::from(down))
    })
}

fn valid_duration() -> impl Strategy<Value = i32> {
    1i32..=MAX_DURATION_MONTHS
}

fn start_date() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2030, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// monthly_payment * duration stays within duration/2 units of the
    /// financed principal (half-up rounding error bound).
    #[test]
    fn prop_schedule_total_close_to_principal(
        (total, down) in amounts(),
        duration in valid_duration(),
    ) {
        let terms = ContractTerms {
            total_amount: total,
            down_payment: down,
            duration_months: duration,
        };
        prop_assert!(validate_terms(&terms).is_ok());

        let monthly = monthly_payment(&terms);
        let drift = (monthly * Decimal::from(duration) - terms.financed_principal()).abs();
        prop_assert!(
            drift <= Decimal::from(duration),
            "drift {} exceeds duration {}", drift, duration
        );
    }

    /// Remaining balance decreases monotonically and hits exactly zero
    /// at the final installment.
    #[test]
    fn prop_remaining_monotone_to_zero(
        (total, down) in amounts(),
        duration in valid_duration(),
    ) {
        let terms = ContractTerms {
            total_amount: total,
            down_payment: down,
            duration_months: duration,
        };

        let mut previous = remaining_after(&terms, 0);
        prop_assert_eq!(previous, terms.financed_principal());

        for paid in 1..=duration {
            let current = remaining_after(&terms, paid);
            prop_assert!(current >= Decimal::ZERO);
            prop_assert!(current <= previous, "remaining must not increase");
            previous = current;
        }
        prop_assert_eq!(previous, Decimal::ZERO);
    }

    /// Driving a contract through every payment via the service ends in
    /// Completed with nothing owed, and the settled contract rejects
    /// further payments.
    #[test]
    fn prop_full_payment_run_completes(
        (total, down) in amounts(),
        duration in valid_duration(),
        today in start_date(),
    ) {
        let terms = ContractTerms {
            total_amount: total,
            down_payment: down,
            duration_months: duration,
        };

        let mut paid = 0;
        let mut status = ContractStatus::Active;
        let mut remaining = terms.financed_principal();

        while status.accepts_payment() {
            let outcome = InstallmentService::apply_payment(&terms, paid, status, today).unwrap();
            prop_assert!(outcome.remaining_amount <= remaining);
            paid = outcome.paid_months;
            status = outcome.status;
            remaining = outcome.remaining_amount;
        }

        prop_assert_eq!(status, ContractStatus::Completed);
        prop_assert_eq!(remaining, Decimal::ZERO);
        prop_assert!(paid <= duration);

        prop_assert!(matches!(
            InstallmentService::apply_payment(&terms, paid, status, today),
            Err(ContractError::AlreadySettled)
        ));
    }

    /// Out-of-range durations are always rejected.
    #[test]
    fn prop_duration_bounds_enforced(
        (total, down) in amounts(),
        duration in prop_oneof![-100i32..=0, 25i32..200],
    ) {
        let terms = ContractTerms {
            total_amount: total,
            down_payment: down,
            duration_months: duration,
        };
        prop_assert!(
            matches!(
                validate_terms(&terms),
                Err(ContractError::DurationOutOfRange { .. })
            ),
            "expected DurationOutOfRange"
        );
    }
}
