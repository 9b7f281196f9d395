//! Installment service for contract creation and payment application.
//!
//! Pure check-then-compute logic; the repository layer commits the
//! outcome with atomic conditional updates.

use chrono::NaiveDate;

use super::error::ContractError;
use super::schedule::{compute_schedule, next_payment_date, remaining_after};
use super::status::derive_status;
use super::types::{ContractStatus, ContractTerms, PaymentOutcome, Schedule};

/// Installment service for contract lifecycle operations.
pub struct InstallmentService;

impl InstallmentService {
    /// Validates terms and computes the initial schedule for a new contract.
    ///
    /// New contracts start with `paid_months = 0` and status `active`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTerms`-class errors for out-of-bounds terms.
    pub fn create(terms: &ContractTerms, today: NaiveDate) -> Result<Schedule, ContractError> {
        compute_schedule(terms, today)
    }

    /// Applies one installment payment to a contract.
    ///
    /// The payment advances `paid_months`, recomputes the remaining
    /// balance, and pushes the due date 30 days out from `today`. An
    /// overdue contract resumes: its new due date is in the future, so
    /// the derived status returns to active (or completed).
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` for cancelled contracts and `AlreadySettled`
    /// when every installment is already paid.
    pub fn apply_payment(
        terms: &ContractTerms,
        paid_months: i32,
        status: ContractStatus,
        today: NaiveDate,
    ) -> Result<PaymentOutcome, ContractError> {
        match status {
            ContractStatus::Cancelled => return Err(ContractError::Cancelled),
            ContractStatus::Completed => return Err(ContractError::AlreadySettled),
            ContractStatus::Active | ContractStatus::Overdue => {}
        }
        if paid_months >= terms.duration_months {
            return Err(ContractError::AlreadySettled);
        }

        let paid = paid_months + 1;
        let remaining = remaining_after(terms, paid);
        let due = next_payment_date(today);

        Ok(PaymentOutcome {
            paid_months: paid,
            remaining_amount: remaining,
            next_payment_date: due,
            status: derive_status(paid, terms.duration_months, remaining, due, today, false),
        })
    }

    /// Validates that a contract can be cancelled.
    ///
    /// Cancellation is allowed from any non-terminal state and freezes
    /// the record.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` when already cancelled and `AlreadySettled`
    /// when the contract has completed.
    pub fn validate_cancellable(status: ContractStatus) -> Result<(), ContractError> {
        match status {
            ContractStatus::Cancelled => Err(ContractError::Cancelled),
            ContractStatus::Completed => Err(ContractError::AlreadySettled),
            ContractStatus::Active | ContractStatus::Overdue => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn terms() -> ContractTerms {
        ContractTerms {
            total_amount: dec!(1200000),
            down_payment: dec!(200000),
            duration_months: 10,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_create_contract_schedule() {
        let schedule = InstallmentService::create(&terms(), day(2026, 3, 1)).unwrap();
        assert_eq!(schedule.monthly_payment, dec!(100000));
        assert_eq!(schedule.remaining_amount, dec!(1000000));
        assert_eq!(schedule.next_payment_date, day(2026, 3, 31));
    }

    #[test]
    fn test_create_rejects_bad_terms() {
        let bad = ContractTerms {
            total_amount: dec!(1000),
            down_payment: dec!(2000),
            duration_months: 10,
        };
        assert!(matches!(
            InstallmentService::create(&bad, day(2026, 3, 1)),
            Err(ContractError::DownPaymentExceedsTotal { .. })
        ));
    }

    #[test]
    fn test_payment_advances_schedule() {
        let today = day(2026, 4, 1);
        let outcome =
            InstallmentService::apply_payment(&terms(), 2, ContractStatus::Active, today).unwrap();

        assert_eq!(outcome.paid_months, 3);
        assert_eq!(outcome.remaining_amount, dec!(700000));
        assert_eq!(outcome.next_payment_date, day(2026, 5, 1));
        assert_eq!(outcome.status, ContractStatus::Active);
    }

    #[test]
    fn test_payment_on_overdue_contract_resumes() {
        let outcome =
            InstallmentService::apply_payment(&terms(), 3, ContractStatus::Overdue, day(2026, 5, 10))
                .unwrap();
        assert_eq!(outcome.status, ContractStatus::Active);
        assert_eq!(outcome.paid_months, 4);
    }

    #[test]
    fn test_final_payment_completes_contract() {
        let outcome =
            InstallmentService::apply_payment(&terms(), 9, ContractStatus::Active, day(2026, 12, 1))
                .unwrap();
        assert_eq!(outcome.paid_months, 10);
        assert_eq!(outcome.remaining_amount, Decimal::ZERO);
        assert_eq!(outcome.status, ContractStatus::Completed);
    }

    #[test]
    fn test_payment_on_settled_contract_rejected() {
        assert!(matches!(
            InstallmentService::apply_payment(&terms(), 10, ContractStatus::Active, day(2027, 1, 1)),
            Err(ContractError::AlreadySettled)
        ));
        assert!(matches!(
            InstallmentService::apply_payment(&terms(), 5, ContractStatus::Completed, day(2027, 1, 1)),
            Err(ContractError::AlreadySettled)
        ));
    }

    #[test]
    fn test_payment_on_cancelled_contract_rejected() {
        assert!(matches!(
            InstallmentService::apply_payment(&terms(), 5, ContractStatus::Cancelled, day(2026, 6, 1)),
            Err(ContractError::Cancelled)
        ));
    }

    #[test]
    fn test_cancellation_rules() {
        assert!(InstallmentService::validate_cancellable(ContractStatus::Active).is_ok());
        assert!(InstallmentService::validate_cancellable(ContractStatus::Overdue).is_ok());
        assert!(matches!(
            InstallmentService::validate_cancellable(ContractStatus::Cancelled),
            Err(ContractError::Cancelled)
        ));
        assert!(matches!(
            InstallmentService::validate_cancellable(ContractStatus::Completed),
            Err(ContractError::AlreadySettled)
        ));
    }
}
