//! Stock pool repository.
//!
//! Pools hold per-(product, shop) stock totals. Edits are version
//! guarded the same way assignment writes are; a total may never drop
//! below the units currently out with agents.

use chrono::Utc;
use tracing::warn;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use savdo_core::ledger::{LedgerError, LedgerService, StockAvailability};
use savdo_shared::types::PageRequest;

use super::assignment::{MAX_CONFLICT_RETRIES, db_err, outstanding_units};
use crate::entities::stock_pools;

/// Input for creating or adjusting a stock pool.
#[derive(Debug, Clone)]
pub struct UpsertStockPoolInput {
    /// Product the pool tracks.
    pub product_id: Uuid,
    /// Shop that owns the stock.
    pub shop_id: Uuid,
    /// New total quantity, including units out with agents.
    pub total_quantity: i32,
}

/// Repository for stock pool operations.
#[derive(Debug, Clone)]
pub struct StockPoolRepository {
    db: DatabaseConnection,
}

impl StockPoolRepository {
    /// Creates a new stock pool repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates the pool for a (product, shop) pair, or sets its total.
    ///
    /// The new total is validated against the outstanding sum inside the
    /// same transaction; stock out with agents cannot be edited away.
    ///
    /// # Errors
    ///
    /// Returns `PoolBelowOutstanding` when the total would underflow
    /// outstanding units, or `ConcurrencyConflict` after exhausted
    /// retries.
    pub async fn upsert(
        &self,
        input: UpsertStockPoolInput,
    ) -> Result<stock_pools::Model, LedgerError> {
        for _ in 0..MAX_CONFLICT_RETRIES {
            match self.try_upsert(&input).await {
                Err(LedgerError::ConcurrencyConflict) => {}
                other => return other,
            }
        }
        warn!(
            product_id = %input.product_id,
            shop_id = %input.shop_id,
            "pool upsert retries exhausted"
        );
        Err(LedgerError::ConcurrencyConflict)
    }

    async fn try_upsert(
        &self,
        input: &UpsertStockPoolInput,
    ) -> Result<stock_pools::Model, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = stock_pools::Entity::find()
            .filter(stock_pools::Column::ProductId.eq(input.product_id))
            .filter(stock_pools::Column::ShopId.eq(input.shop_id))
            .one(&txn)
            .await
            .map_err(db_err)?;

        let outstanding = outstanding_units(&txn, input.product_id, input.shop_id).await?;
        LedgerService::validate_pool_total(input.total_quantity, outstanding)?;

        let now = Utc::now().into();
        let model = match existing {
            None => {
                let pool = stock_pools::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    product_id: Set(input.product_id),
                    shop_id: Set(input.shop_id),
                    total_quantity: Set(input.total_quantity),
                    version: Set(1),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                pool.insert(&txn).await.map_err(db_err)?
            }
            Some(pool) => {
                let updated = stock_pools::Entity::update_many()
                    .set(stock_pools::ActiveModel {
                        total_quantity: Set(input.total_quantity),
                        version: Set(pool.version + 1),
                        updated_at: Set(now),
                        ..Default::default()
                    })
                    .filter(stock_pools::Column::Id.eq(pool.id))
                    .filter(stock_pools::Column::Version.eq(pool.version))
                    .exec(&txn)
                    .await
                    .map_err(db_err)?;

                if updated.rows_affected == 0 {
                    txn.rollback().await.map_err(db_err)?;
                    return Err(LedgerError::ConcurrencyConflict);
                }

                stock_pools::Model {
                    total_quantity: input.total_quantity,
                    version: pool.version + 1,
                    updated_at: now,
                    ..pool
                }
            }
        };

        txn.commit().await.map_err(db_err)?;
        Ok(model)
    }

    /// Fetches the pool for a (product, shop) pair.
    ///
    /// # Errors
    ///
    /// Returns `PoolNotFound` if no pool exists for the pair.
    pub async fn get(
        &self,
        product_id: Uuid,
        shop_id: Uuid,
    ) -> Result<stock_pools::Model, LedgerError> {
        stock_pools::Entity::find()
            .filter(stock_pools::Column::ProductId.eq(product_id))
            .filter(stock_pools::Column::ShopId.eq(shop_id))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::PoolNotFound {
                product_id,
                shop_id,
            })
    }

    /// Fetches the pool plus its current availability.
    ///
    /// # Errors
    ///
    /// Returns `PoolNotFound` if no pool exists for the pair.
    pub async fn availability(
        &self,
        product_id: Uuid,
        shop_id: Uuid,
    ) -> Result<(stock_pools::Model, StockAvailability), LedgerError> {
        let pool = self.get(product_id, shop_id).await?;
        let outstanding = outstanding_units(&self.db, product_id, shop_id).await?;

        let availability = StockAvailability {
            pool_total: pool.total_quantity,
            outstanding,
        };
        Ok((pool, availability))
    }

    /// Lists pools, optionally scoped to one shop, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        shop_id: Option<Uuid>,
        page: &PageRequest,
    ) -> Result<(Vec<stock_pools::Model>, u64), LedgerError> {
        let mut query = stock_pools::Entity::find();
        if let Some(shop_id) = shop_id {
            query = query.filter(stock_pools::Column::ShopId.eq(shop_id));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let items = query
            .order_by_desc(stock_pools::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok((items, total))
    }
}
