//! Concurrent access tests for the assignment ledger.
//!
//! Verifies that version-guarded conditional updates keep the counters
//! conserved under racing writers, and that availability is never
//! oversubscribed by concurrent assigns. Skipped when `DATABASE_URL`
//! is not set.

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_wrap)]

use futures::future::join_all;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::env;
use std::sync::Arc;
use tokio::sync::Barrier;
use uuid::Uuid;

use savdo_core::ledger::LedgerError;
use savdo_db::migration::Migrator;
use savdo_db::repositories::{
    AssignInput, AssignmentRepository, StockPoolRepository, UpsertStockPoolInput,
};

async fn test_db() -> Option<DatabaseConnection> {
    let Ok(url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database test");
        return None;
    };
    let db = Database::connect(&url).await.expect("failed to connect");
    Migrator::up(&db, None).await.expect("migration failed");
    Some(db)
}

#[tokio::test]
async fn test_concurrent_assigns_never_oversubscribe_pool() {
    let Some(db) = test_db().await else { return };

    let product_id = Uuid::new_v4();
    let shop_id = Uuid::new_v4();
    StockPoolRepository::new(db.clone())
        .upsert(UpsertStockPoolInput {
            product_id,
            shop_id,
            total_quantity: 50,
        })
        .await
        .expect("pool upsert failed");

    // 10 writers racing for 10 units each against a pool of 50. At most
    // 5 can win; retries may push some losers through, but the sum of
    // successful quantities must never exceed the pool.
    let repo = Arc::new(AssignmentRepository::new(db.clone()));
    let barrier = Arc::new(Barrier::new(10));

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let repo = Arc::clone(&repo);
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                barrier.wait().await;
                repo.assign(AssignInput {
                    product_id,
                    shop_id,
                    agent_id: Uuid::new_v4(),
                    assigned_by: Uuid::new_v4(),
                    quantity: 10,
                })
                .await
            })
        })
        .collect();

    let mut succeeded = 0;
    for result in join_all(tasks).await {
        match result.expect("task panicked") {
            Ok(_) => succeeded += 1,
            Err(
                LedgerError::InsufficientStock { .. } | LedgerError::ConcurrencyConflict,
            ) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert!(succeeded <= 5, "oversubscribed: {succeeded} assigns won");

    let (_, availability) = StockPoolRepository::new(db)
        .availability(product_id, shop_id)
        .await
        .expect("availability failed");
    assert_eq!(availability.outstanding, succeeded * 10);
    assert!(availability.available() >= 0);
}

#[tokio::test]
async fn test_concurrent_sales_conserve_counters() {
    let Some(db) = test_db().await else { return };

    let product_id = Uuid::new_v4();
    let shop_id = Uuid::new_v4();
    StockPoolRepository::new(db.clone())
        .upsert(UpsertStockPoolInput {
            product_id,
            shop_id,
            total_quantity: 100,
        })
        .await
        .expect("pool upsert failed");

    let repo = Arc::new(AssignmentRepository::new(db));
    let assignment = repo
        .assign(AssignInput {
            product_id,
            shop_id,
            agent_id: Uuid::new_v4(),
            assigned_by: Uuid::new_v4(),
            quantity: 20,
        })
        .await
        .expect("assign failed");

    // 30 racing single-unit sales against 20 remaining units. Winners
    // plus over-sale losers must account for every attempt, and the
    // record must stay conserved.
    let barrier = Arc::new(Barrier::new(30));
    let tasks: Vec<_> = (0..30)
        .map(|_| {
            let repo = Arc::clone(&repo);
            let barrier = Arc::clone(&barrier);
            let id = assignment.id;
            tokio::spawn(async move {
                barrier.wait().await;
                repo.record_sale(id, 1).await
            })
        })
        .collect();

    let mut sold = 0;
    for result in join_all(tasks).await {
        match result.expect("task panicked") {
            Ok(_) => sold += 1,
            Err(
                LedgerError::OverSale { .. }
                | LedgerError::AssignmentClosed { .. }
                | LedgerError::ConcurrencyConflict,
            ) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let record = repo.get(assignment.id).await.expect("get failed");
    assert_eq!(record.sold_quantity, sold);
    assert!(record.sold_quantity <= 20);
    assert_eq!(
        record.assigned_quantity,
        record.sold_quantity + record.returned_quantity + record.remaining_quantity
    );
}

#[tokio::test]
async fn test_dueling_full_returns_replenish_pool_once() {
    let Some(db) = test_db().await else { return };

    let product_id = Uuid::new_v4();
    let shop_id = Uuid::new_v4();
    StockPoolRepository::new(db.clone())
        .upsert(UpsertStockPoolInput {
            product_id,
            shop_id,
            total_quantity: 30,
        })
        .await
        .expect("pool upsert failed");

    let repo = Arc::new(AssignmentRepository::new(db.clone()));
    let assignment = repo
        .assign(AssignInput {
            product_id,
            shop_id,
            agent_id: Uuid::new_v4(),
            assigned_by: Uuid::new_v4(),
            quantity: 30,
        })
        .await
        .expect("assign failed");

    // Two writers both try to return the full remaining quantity.
    // Exactly one may win; the loser retries against the now-closed
    // record and gets AssignmentClosed.
    let barrier = Arc::new(Barrier::new(2));
    let tasks: Vec<_> = (0..2)
        .map(|_| {
            let repo = Arc::clone(&repo);
            let barrier = Arc::clone(&barrier);
            let id = assignment.id;
            tokio::spawn(async move {
                barrier.wait().await;
                repo.record_return(id, 30).await.map(|_| ())
            })
        })
        .collect();

    let mut succeeded = 0;
    for result in join_all(tasks).await {
        match result.expect("task panicked") {
            Ok(()) => succeeded += 1,
            Err(LedgerError::AssignmentClosed { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(succeeded, 1, "exactly one full return must win");

    let record = repo.get(assignment.id).await.expect("get failed");
    assert_eq!(record.returned_quantity, 30);
    assert_eq!(record.remaining_quantity, 0);
    assert_eq!(
        record.assigned_quantity,
        record.sold_quantity + record.returned_quantity + record.remaining_quantity
    );

    // Pool replenished exactly once: 30 on hand plus the 30 returned.
    let pool = StockPoolRepository::new(db)
        .get(product_id, shop_id)
        .await
        .expect("pool get failed");
    assert_eq!(pool.total_quantity, 60);
}

#[tokio::test]
async fn test_concurrent_return_and_sale_commit_atomically() {
    let Some(db) = test_db().await else { return };

    let product_id = Uuid::new_v4();
    let shop_id = Uuid::new_v4();
    StockPoolRepository::new(db.clone())
        .upsert(UpsertStockPoolInput {
            product_id,
            shop_id,
            total_quantity: 40,
        })
        .await
        .expect("pool upsert failed");

    let repo = Arc::new(AssignmentRepository::new(db.clone()));
    let assignment = repo
        .assign(AssignInput {
            product_id,
            shop_id,
            agent_id: Uuid::new_v4(),
            assigned_by: Uuid::new_v4(),
            quantity: 40,
        })
        .await
        .expect("assign failed");

    let barrier = Arc::new(Barrier::new(2));

    let sale = {
        let repo = Arc::clone(&repo);
        let barrier = Arc::clone(&barrier);
        let id = assignment.id;
        tokio::spawn(async move {
            barrier.wait().await;
            repo.record_sale(id, 15).await.map(|_| ())
        })
    };
    let ret = {
        let repo = Arc::clone(&repo);
        let barrier = Arc::clone(&barrier);
        let id = assignment.id;
        tokio::spawn(async move {
            barrier.wait().await;
            repo.record_return(id, 10).await.map(|_| ())
        })
    };

    // Both fit within remaining = 40, so with retries both should land.
    sale.await.expect("task panicked").expect("sale failed");
    ret.await.expect("task panicked").expect("return failed");

    let record = repo.get(assignment.id).await.expect("get failed");
    assert_eq!(record.sold_quantity, 15);
    assert_eq!(record.returned_quantity, 10);
    assert_eq!(record.remaining_quantity, 15);

    // Pool replenished exactly once, by exactly the returned amount.
    let pool = StockPoolRepository::new(db)
        .get(product_id, shop_id)
        .await
        .expect("pool get failed");
    assert_eq!(pool.total_quantity, 50);
}
