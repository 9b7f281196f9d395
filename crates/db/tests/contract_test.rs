//! Integration tests for the contract repository.
//!
//! These tests run against a real Postgres instance and are skipped
//! when `DATABASE_URL` is not set.

#![allow(clippy::uninlined_format_args)]

use rust_decimal_macros::dec;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::env;
use uuid::Uuid;

use savdo_core::installment::{ContractError, ContractStatus};
use savdo_db::migration::Migrator;
use savdo_db::repositories::{ContractRepository, CreateContractInput};
use savdo_shared::types::Currency;

async fn test_db() -> Option<DatabaseConnection> {
    let Ok(url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database test");
        return None;
    };
    let db = Database::connect(&url).await.expect("failed to connect");
    Migrator::up(&db, None).await.expect("migration failed");
    Some(db)
}

fn contract_input(duration_months: i32) -> CreateContractInput {
    CreateContractInput {
        shop_id: Uuid::new_v4(),
        customer_ref: Uuid::new_v4(),
        product_ref: Uuid::new_v4(),
        currency: Currency::Uzs,
        total_amount: dec!(1200000),
        down_payment: dec!(200000),
        duration_months,
        created_by: Uuid::new_v4(),
    }
}

#[tokio::test]
async fn test_create_computes_schedule() {
    let Some(db) = test_db().await else { return };

    let repo = ContractRepository::new(db);
    let view = repo
        .create(contract_input(10))
        .await
        .expect("create failed");

    assert_eq!(view.contract.monthly_payment, dec!(100000));
    assert_eq!(view.contract.remaining_amount, dec!(1000000));
    assert_eq!(view.contract.paid_months, 0);
    assert_eq!(view.status, ContractStatus::Active);
}

#[tokio::test]
async fn test_create_rejects_invalid_terms() {
    let Some(db) = test_db().await else { return };

    let repo = ContractRepository::new(db);
    assert!(matches!(
        repo.create(contract_input(0)).await,
        Err(ContractError::DurationOutOfRange { months: 0 })
    ));
    assert!(matches!(
        repo.create(contract_input(25)).await,
        Err(ContractError::DurationOutOfRange { months: 25 })
    ));

    let mut input = contract_input(10);
    input.down_payment = dec!(2000000);
    assert!(matches!(
        repo.create(input).await,
        Err(ContractError::DownPaymentExceedsTotal { .. })
    ));
}

#[tokio::test]
async fn test_payments_advance_schedule_to_completion() {
    let Some(db) = test_db().await else { return };

    let repo = ContractRepository::new(db);
    let view = repo.create(contract_input(3)).await.expect("create failed");
    let id = view.contract.id;

    let first = repo.record_payment(id).await.expect("payment failed");
    assert_eq!(first.contract.paid_months, 1);
    assert_eq!(first.status, ContractStatus::Active);

    repo.record_payment(id).await.expect("payment failed");
    let last = repo.record_payment(id).await.expect("payment failed");
    assert_eq!(last.contract.paid_months, 3);
    assert_eq!(last.contract.remaining_amount, dec!(0));
    assert_eq!(last.status, ContractStatus::Completed);

    // Settled contracts reject further payments.
    assert!(matches!(
        repo.record_payment(id).await,
        Err(ContractError::AlreadySettled)
    ));
}

#[tokio::test]
async fn test_cancel_freezes_contract() {
    let Some(db) = test_db().await else { return };

    let repo = ContractRepository::new(db);
    let view = repo
        .create(contract_input(10))
        .await
        .expect("create failed");
    let id = view.contract.id;

    let cancelled = repo
        .cancel(id, Some("customer backed out".to_string()))
        .await
        .expect("cancel failed");
    assert_eq!(cancelled.status, ContractStatus::Cancelled);
    assert!(cancelled.contract.cancelled_at.is_some());

    assert!(matches!(
        repo.record_payment(id).await,
        Err(ContractError::Cancelled)
    ));
    assert!(matches!(
        repo.cancel(id, None).await,
        Err(ContractError::Cancelled)
    ));
}

#[tokio::test]
async fn test_completed_contract_cannot_be_cancelled() {
    let Some(db) = test_db().await else { return };

    let repo = ContractRepository::new(db);
    let view = repo.create(contract_input(1)).await.expect("create failed");
    let id = view.contract.id;

    repo.record_payment(id).await.expect("payment failed");

    assert!(matches!(
        repo.cancel(id, None).await,
        Err(ContractError::AlreadySettled)
    ));
}
