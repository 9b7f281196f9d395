//! Payment schedule arithmetic.
//!
//! The schedule is a pure function of the contract terms: a fixed
//! monthly installment, a remaining balance that decreases linearly,
//! and a due date advancing in fixed 30-day steps. The 30-day cadence
//! (rather than calendar-month arithmetic) is the cadence existing
//! contracts were issued under, so it is kept deliberately.
//!
//! The monthly installment is the half-up rounded quotient of the
//! financed principal; the rounding remainder is absorbed by the final
//! installment (the remaining balance clamps at zero) instead of
//! letting repeated recomputation drift the effective total.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use savdo_shared::types::money::round_currency;

use super::error::ContractError;
use super::types::{ContractTerms, MAX_DURATION_MONTHS, MIN_DURATION_MONTHS, Schedule};

/// Days between consecutive installment due dates.
pub const PAYMENT_INTERVAL_DAYS: u64 = 30;

/// Validates contract terms at creation time.
///
/// # Errors
///
/// Returns `DurationOutOfRange`, `NegativeAmount`, or
/// `DownPaymentExceedsTotal` when the terms violate the contract bounds.
pub fn validate_terms(terms: &ContractTerms) -> Result<(), ContractError> {
    if terms.duration_months < MIN_DURATION_MONTHS || terms.duration_months > MAX_DURATION_MONTHS {
        return Err(ContractError::DurationOutOfRange {
            months: terms.duration_months,
        });
    }
    if terms.total_amount < Decimal::ZERO || terms.down_payment < Decimal::ZERO {
        return Err(ContractError::NegativeAmount);
    }
    if terms.down_payment > terms.total_amount {
        return Err(ContractError::DownPaymentExceedsTotal {
            down_payment: terms.down_payment,
            total_amount: terms.total_amount,
        });
    }
    Ok(())
}

/// The fixed monthly installment for the given terms.
///
/// Half-up rounded to whole currency units. Callers must have validated
/// the terms first; `duration_months` is guaranteed positive then.
#[must_use]
pub fn monthly_payment(terms: &ContractTerms) -> Decimal {
    round_currency(terms.financed_principal() / Decimal::from(terms.duration_months))
}

/// The balance still owed after `paid_months` installments.
///
/// Clamps at zero: the final installment absorbs the rounding remainder
/// rather than leaving a few units owed or overpaid.
#[must_use]
pub fn remaining_after(terms: &ContractTerms, paid_months: i32) -> Decimal {
    if paid_months >= terms.duration_months {
        return Decimal::ZERO;
    }
    let remaining =
        terms.financed_principal() - monthly_payment(terms) * Decimal::from(paid_months);
    remaining.max(Decimal::ZERO)
}

/// The due date of the next installment, counted from `today`.
#[must_use]
pub fn next_payment_date(today: NaiveDate) -> NaiveDate {
    // Adding 30 days to any NaiveDate stays comfortably inside the
    // representable range.
    today
        .checked_add_days(Days::new(PAYMENT_INTERVAL_DAYS))
        .unwrap_or(today)
}

/// Computes the full schedule for a new contract (zero payments made).
///
/// # Errors
///
/// Returns a term validation error; see [`validate_terms`].
pub fn compute_schedule(terms: &ContractTerms, today: NaiveDate) -> Result<Schedule, ContractError> {
    validate_terms(terms)?;

    Ok(Schedule {
        monthly_payment: monthly_payment(terms),
        remaining_amount: remaining_after(terms, 0),
        next_payment_date: next_payment_date(today),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn terms(total: Decimal, down: Decimal, months: i32) -> ContractTerms {
        ContractTerms {
            total_amount: total,
            down_payment: down,
            duration_months: months,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_worked_example() {
        // 1,200,000 total, 200,000 down, 10 months.
        let t = terms(dec!(1200000), dec!(200000), 10);
        let schedule = compute_schedule(&t, day(2026, 3, 1)).unwrap();

        assert_eq!(schedule.monthly_payment, dec!(100000));
        assert_eq!(schedule.remaining_amount, dec!(1000000));
        assert_eq!(remaining_after(&t, 3), dec!(700000));
        assert_eq!(remaining_after(&t, 10), Decimal::ZERO);
    }

    #[test]
    fn test_uneven_division_rounds_half_up() {
        // 1,000,000 over 3 months: 333,333.33.. rounds to 333,333.
        let t = terms(dec!(1000000), dec!(0), 3);
        assert_eq!(monthly_payment(&t), dec!(333333));

        // 500 over 3: 166.66.. rounds to 167.
        let t = terms(dec!(500), dec!(0), 3);
        assert_eq!(monthly_payment(&t), dec!(167));
    }

    #[test]
    fn test_final_installment_absorbs_remainder() {
        // Monthly 333,333 * 3 = 999,999; the last payment clears the
        // remaining unit instead of leaving it owed.
        let t = terms(dec!(1000000), dec!(0), 3);
        assert_eq!(remaining_after(&t, 2), dec!(333334));
        assert_eq!(remaining_after(&t, 3), Decimal::ZERO);
    }

    #[test]
    fn test_remaining_never_negative() {
        // Monthly 167 * 2 = 334 > 333 remaining after 2 of 3.
        let t = terms(dec!(500), dec!(0), 3);
        assert_eq!(remaining_after(&t, 2), dec!(166));
        assert!(remaining_after(&t, 3) >= Decimal::ZERO);
    }

    #[test]
    fn test_next_payment_date_is_thirty_days_out() {
        assert_eq!(next_payment_date(day(2026, 3, 1)), day(2026, 3, 31));
        assert_eq!(next_payment_date(day(2026, 12, 15)), day(2027, 1, 14));
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(25)]
    #[case(100)]
    fn test_duration_bounds_rejected(#[case] months: i32) {
        let t = terms(dec!(1200000), dec!(200000), months);
        assert!(matches!(
            validate_terms(&t),
            Err(ContractError::DurationOutOfRange { .. })
        ));
    }

    #[rstest]
    #[case(1)]
    #[case(12)]
    #[case(24)]
    fn test_duration_bounds_accepted(#[case] months: i32) {
        let t = terms(dec!(1200000), dec!(200000), months);
        assert!(validate_terms(&t).is_ok());
    }

    #[test]
    fn test_down_payment_exceeding_total_rejected() {
        let t = terms(dec!(1000000), dec!(1000001), 12);
        assert!(matches!(
            validate_terms(&t),
            Err(ContractError::DownPaymentExceedsTotal { .. })
        ));
    }

    #[test]
    fn test_negative_amounts_rejected() {
        assert!(matches!(
            validate_terms(&terms(dec!(-1), dec!(0), 12)),
            Err(ContractError::NegativeAmount)
        ));
        assert!(matches!(
            validate_terms(&terms(dec!(100), dec!(-1), 12)),
            Err(ContractError::NegativeAmount)
        ));
    }

    #[test]
    fn test_full_down_payment_yields_zero_schedule() {
        let t = terms(dec!(500000), dec!(500000), 6);
        let schedule = compute_schedule(&t, day(2026, 1, 1)).unwrap();
        assert_eq!(schedule.monthly_payment, Decimal::ZERO);
        assert_eq!(schedule.remaining_amount, Decimal::ZERO);
    }
}
