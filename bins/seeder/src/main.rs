//! Database seeder for Savdo development and testing.
//!
//! Seeds a test shop's stock pools plus a sample assignment and an
//! installment contract for local development.
//!
//! Usage: cargo run --bin seeder

use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use savdo_db::repositories::{
    AssignInput, AssignmentRepository, ContractRepository, CreateContractInput,
    StockPoolRepository, UpsertStockPoolInput,
};
use savdo_shared::types::Currency;

/// Test shop ID (consistent for all seeds)
const TEST_SHOP_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Test agent ID (consistent for all seeds)
const TEST_AGENT_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Test shop user ID (consistent for all seeds)
const TEST_USER_ID: &str = "00000000-0000-0000-0000-000000000003";
/// Test customer ID (consistent for all seeds)
const TEST_CUSTOMER_ID: &str = "00000000-0000-0000-0000-000000000004";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = savdo_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding stock pools...");
    let product_ids = seed_stock_pools(&db).await;

    println!("Seeding sample assignment...");
    seed_sample_assignment(&db, product_ids.first().copied()).await;

    println!("Seeding sample contract...");
    seed_sample_contract(&db, product_ids.first().copied()).await;

    println!("Seeding complete!");
}

fn test_shop_id() -> Uuid {
    Uuid::parse_str(TEST_SHOP_ID).unwrap()
}

/// Seeds pools for a handful of products at the test shop.
async fn seed_stock_pools(db: &sea_orm::DatabaseConnection) -> Vec<Uuid> {
    let repo = StockPoolRepository::new(db.clone());
    let shop_id = test_shop_id();

    // (product id suffix, total quantity)
    let pools = [
        ("00000000-0000-0000-0000-000000000101", 200),
        ("00000000-0000-0000-0000-000000000102", 120),
        ("00000000-0000-0000-0000-000000000103", 75),
        ("00000000-0000-0000-0000-000000000104", 40),
        ("00000000-0000-0000-0000-000000000105", 15),
    ];

    let mut product_ids = Vec::with_capacity(pools.len());
    let mut inserted = 0;
    for (product, total) in pools {
        let product_id = Uuid::parse_str(product).unwrap();
        product_ids.push(product_id);

        match repo
            .upsert(UpsertStockPoolInput {
                product_id,
                shop_id,
                total_quantity: total,
            })
            .await
        {
            Ok(_) => inserted += 1,
            Err(e) => eprintln!("Failed to seed pool for product {product_id}: {e}"),
        }
    }

    println!("  Upserted {inserted} stock pools");
    product_ids
}

/// Seeds one open assignment against the first seeded pool.
async fn seed_sample_assignment(db: &sea_orm::DatabaseConnection, product_id: Option<Uuid>) {
    let Some(product_id) = product_id else {
        eprintln!("  No seeded products, skipping sample assignment");
        return;
    };

    let repo = AssignmentRepository::new(db.clone());
    let result = repo
        .assign(AssignInput {
            product_id,
            shop_id: test_shop_id(),
            agent_id: Uuid::parse_str(TEST_AGENT_ID).unwrap(),
            assigned_by: Uuid::parse_str(TEST_USER_ID).unwrap(),
            quantity: 25,
        })
        .await;

    match result {
        Ok(assignment) => println!("  Created assignment {}", assignment.id),
        Err(e) => eprintln!("Failed to seed assignment: {e}"),
    }
}

/// Seeds one active 12-month contract.
async fn seed_sample_contract(db: &sea_orm::DatabaseConnection, product_ref: Option<Uuid>) {
    let Some(product_ref) = product_ref else {
        eprintln!("  No seeded products, skipping sample contract");
        return;
    };

    let repo = ContractRepository::new(db.clone());
    let result = repo
        .create(CreateContractInput {
            shop_id: test_shop_id(),
            customer_ref: Uuid::parse_str(TEST_CUSTOMER_ID).unwrap(),
            product_ref,
            currency: Currency::Uzs,
            total_amount: Decimal::from_str("6000000").unwrap(),
            down_payment: Decimal::from_str("1200000").unwrap(),
            duration_months: 12,
            created_by: Uuid::parse_str(TEST_USER_ID).unwrap(),
        })
        .await;

    match result {
        Ok(view) => println!(
            "  Created contract {} (monthly payment {})",
            view.contract.id, view.contract.monthly_payment
        ),
        Err(e) => eprintln!("Failed to seed contract: {e}"),
    }
}
