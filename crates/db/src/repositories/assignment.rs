//! Assignment repository for the stock assignment ledger.
//!
//! Reads current counters, delegates validation and arithmetic to
//! `savdo_core::ledger`, and commits outcomes with version-guarded
//! conditional updates. Conflicting writers lose the update race and
//! retry against fresh state, capped at [`MAX_CONFLICT_RETRIES`].

use chrono::Utc;
use tracing::warn;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use savdo_core::ledger::{AssignmentCounters, LedgerError, LedgerService, StockAvailability};
use savdo_shared::types::PageRequest;

use crate::entities::{assignments, sea_orm_active_enums::AssignmentStatus, stock_pools};

/// Attempts per operation before giving up with `ConcurrencyConflict`.
pub const MAX_CONFLICT_RETRIES: u32 = 3;

/// Input for assigning stock to an agent.
#[derive(Debug, Clone)]
pub struct AssignInput {
    /// Product being assigned.
    pub product_id: Uuid,
    /// Shop the stock belongs to.
    pub shop_id: Uuid,
    /// Agent receiving the stock.
    pub agent_id: Uuid,
    /// Shop user who performed the assignment.
    pub assigned_by: Uuid,
    /// Units to assign.
    pub quantity: i32,
}

/// Filter options for listing assignments.
#[derive(Debug, Clone, Default)]
pub struct AssignmentFilter {
    /// Filter by agent.
    pub agent_id: Option<Uuid>,
    /// Filter by product.
    pub product_id: Option<Uuid>,
    /// Filter by shop.
    pub shop_id: Option<Uuid>,
    /// Filter by status.
    pub status: Option<AssignmentStatus>,
}

/// An assignment together with the pool it replenished.
#[derive(Debug, Clone)]
pub struct AssignmentWithPool {
    /// Updated assignment record.
    pub assignment: assignments::Model,
    /// Updated stock pool.
    pub pool: stock_pools::Model,
}

/// Repository for assignment ledger operations.
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    db: DatabaseConnection,
}

impl AssignmentRepository {
    /// Creates a new assignment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Assigns stock from a shop's pool to an agent.
    ///
    /// Availability is checked against the pool total minus the sum of
    /// units already outstanding; the insert commits together with a
    /// pool version bump so concurrent assigns against the same pool
    /// serialize.
    ///
    /// # Errors
    ///
    /// Returns `PoolNotFound`, a validation error from the ledger
    /// service, or `ConcurrencyConflict` after exhausted retries.
    pub async fn assign(&self, input: AssignInput) -> Result<assignments::Model, LedgerError> {
        for _ in 0..MAX_CONFLICT_RETRIES {
            match self.try_assign(&input).await {
                Err(LedgerError::ConcurrencyConflict) => {}
                other => return other,
            }
        }
        warn!(
            product_id = %input.product_id,
            shop_id = %input.shop_id,
            "assign retries exhausted"
        );
        Err(LedgerError::ConcurrencyConflict)
    }

    async fn try_assign(&self, input: &AssignInput) -> Result<assignments::Model, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let pool = stock_pools::Entity::find()
            .filter(stock_pools::Column::ProductId.eq(input.product_id))
            .filter(stock_pools::Column::ShopId.eq(input.shop_id))
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::PoolNotFound {
                product_id: input.product_id,
                shop_id: input.shop_id,
            })?;

        let outstanding = outstanding_units(&txn, input.product_id, input.shop_id).await?;

        LedgerService::validate_assign(
            input.quantity,
            StockAvailability {
                pool_total: pool.total_quantity,
                outstanding,
            },
        )?;

        let now = Utc::now().into();
        let assignment = assignments::ActiveModel {
            id: Set(Uuid::now_v7()),
            product_id: Set(input.product_id),
            shop_id: Set(input.shop_id),
            agent_id: Set(input.agent_id),
            assigned_by: Set(input.assigned_by),
            assigned_quantity: Set(input.quantity),
            sold_quantity: Set(0),
            returned_quantity: Set(0),
            remaining_quantity: Set(input.quantity),
            status: Set(AssignmentStatus::Assigned),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = assignment.insert(&txn).await.map_err(db_err)?;

        // Bump the pool version without changing the total, so a writer
        // that validated against stale availability loses the race.
        let bumped = stock_pools::Entity::update_many()
            .set(stock_pools::ActiveModel {
                version: Set(pool.version + 1),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(stock_pools::Column::Id.eq(pool.id))
            .filter(stock_pools::Column::Version.eq(pool.version))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if bumped.rows_affected == 0 {
            txn.rollback().await.map_err(db_err)?;
            return Err(LedgerError::ConcurrencyConflict);
        }

        txn.commit().await.map_err(db_err)?;
        Ok(model)
    }

    /// Records a sale of `quantity` units against an assignment.
    ///
    /// # Errors
    ///
    /// Returns `AssignmentNotFound`, a validation error (`OverSale`,
    /// `AssignmentClosed`, `InvalidQuantity`), or `ConcurrencyConflict`
    /// after exhausted retries.
    pub async fn record_sale(
        &self,
        assignment_id: Uuid,
        quantity: i32,
    ) -> Result<assignments::Model, LedgerError> {
        for _ in 0..MAX_CONFLICT_RETRIES {
            match self.try_record_sale(assignment_id, quantity).await {
                Err(LedgerError::ConcurrencyConflict) => {}
                other => return other,
            }
        }
        warn!(assignment_id = %assignment_id, "sale retries exhausted");
        Err(LedgerError::ConcurrencyConflict)
    }

    async fn try_record_sale(
        &self,
        assignment_id: Uuid,
        quantity: i32,
    ) -> Result<assignments::Model, LedgerError> {
        let record = self.get(assignment_id).await?;
        let outcome = LedgerService::apply_sale(counters_of(&record), quantity)?;

        let now = Utc::now().into();
        let status = AssignmentStatus::from(outcome.status);
        let updated = assignments::Entity::update_many()
            .set(assignments::ActiveModel {
                sold_quantity: Set(outcome.counters.sold),
                remaining_quantity: Set(outcome.counters.remaining),
                status: Set(status.clone()),
                version: Set(record.version + 1),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(assignments::Column::Id.eq(assignment_id))
            .filter(assignments::Column::Version.eq(record.version))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if updated.rows_affected == 0 {
            return Err(LedgerError::ConcurrencyConflict);
        }

        Ok(assignments::Model {
            sold_quantity: outcome.counters.sold,
            remaining_quantity: outcome.counters.remaining,
            status,
            version: record.version + 1,
            updated_at: now,
            ..record
        })
    }

    /// Records a return of `quantity` units from an agent back to the
    /// shop's pool.
    ///
    /// The assignment counters and the pool total move in one database
    /// transaction; either both commit or neither does.
    ///
    /// # Errors
    ///
    /// Returns `AssignmentNotFound`, `PoolNotFound`, a validation error
    /// (`OverReturn`, `AssignmentClosed`, `InvalidQuantity`), or
    /// `ConcurrencyConflict` after exhausted retries.
    pub async fn record_return(
        &self,
        assignment_id: Uuid,
        quantity: i32,
    ) -> Result<AssignmentWithPool, LedgerError> {
        for _ in 0..MAX_CONFLICT_RETRIES {
            match self.try_record_return(assignment_id, quantity).await {
                Err(LedgerError::ConcurrencyConflict) => {}
                other => return other,
            }
        }
        warn!(assignment_id = %assignment_id, "return retries exhausted");
        Err(LedgerError::ConcurrencyConflict)
    }

    async fn try_record_return(
        &self,
        assignment_id: Uuid,
        quantity: i32,
    ) -> Result<AssignmentWithPool, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let record = assignments::Entity::find_by_id(assignment_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::AssignmentNotFound(assignment_id))?;

        let pool = stock_pools::Entity::find()
            .filter(stock_pools::Column::ProductId.eq(record.product_id))
            .filter(stock_pools::Column::ShopId.eq(record.shop_id))
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::PoolNotFound {
                product_id: record.product_id,
                shop_id: record.shop_id,
            })?;

        let outcome = LedgerService::apply_return(counters_of(&record), quantity)?;

        let now = Utc::now().into();
        let status = AssignmentStatus::from(outcome.status);
        let assignment_updated = assignments::Entity::update_many()
            .set(assignments::ActiveModel {
                returned_quantity: Set(outcome.counters.returned),
                remaining_quantity: Set(outcome.counters.remaining),
                status: Set(status.clone()),
                version: Set(record.version + 1),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(assignments::Column::Id.eq(assignment_id))
            .filter(assignments::Column::Version.eq(record.version))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let new_total = pool.total_quantity + outcome.pool_delta;
        let pool_updated = stock_pools::Entity::update_many()
            .set(stock_pools::ActiveModel {
                total_quantity: Set(new_total),
                version: Set(pool.version + 1),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(stock_pools::Column::Id.eq(pool.id))
            .filter(stock_pools::Column::Version.eq(pool.version))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if assignment_updated.rows_affected == 0 || pool_updated.rows_affected == 0 {
            txn.rollback().await.map_err(db_err)?;
            return Err(LedgerError::ConcurrencyConflict);
        }

        txn.commit().await.map_err(db_err)?;

        Ok(AssignmentWithPool {
            assignment: assignments::Model {
                returned_quantity: outcome.counters.returned,
                remaining_quantity: outcome.counters.remaining,
                status,
                version: record.version + 1,
                updated_at: now,
                ..record
            },
            pool: stock_pools::Model {
                total_quantity: new_total,
                version: pool.version + 1,
                updated_at: now,
                ..pool
            },
        })
    }

    /// Fetches an assignment by id.
    ///
    /// # Errors
    ///
    /// Returns `AssignmentNotFound` if no such record exists.
    pub async fn get(&self, assignment_id: Uuid) -> Result<assignments::Model, LedgerError> {
        assignments::Entity::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::AssignmentNotFound(assignment_id))
    }

    /// Lists assignments matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: AssignmentFilter,
        page: &PageRequest,
    ) -> Result<(Vec<assignments::Model>, u64), LedgerError> {
        let mut query = assignments::Entity::find();

        if let Some(agent_id) = filter.agent_id {
            query = query.filter(assignments::Column::AgentId.eq(agent_id));
        }
        if let Some(product_id) = filter.product_id {
            query = query.filter(assignments::Column::ProductId.eq(product_id));
        }
        if let Some(shop_id) = filter.shop_id {
            query = query.filter(assignments::Column::ShopId.eq(shop_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(assignments::Column::Status.eq(status));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let items = query
            .order_by_desc(assignments::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok((items, total))
    }
}

/// Sums `remaining_quantity` across all assignments for a (product, shop)
/// pair. Runs on any connection so callers can keep it inside their
/// transaction.
pub(crate) async fn outstanding_units<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    shop_id: Uuid,
) -> Result<i32, LedgerError> {
    let sum: Option<Option<i64>> = assignments::Entity::find()
        .select_only()
        .column_as(assignments::Column::RemainingQuantity.sum(), "outstanding")
        .filter(assignments::Column::ProductId.eq(product_id))
        .filter(assignments::Column::ShopId.eq(shop_id))
        .into_tuple()
        .one(conn)
        .await
        .map_err(db_err)?;

    let total = sum.flatten().unwrap_or(0);
    i32::try_from(total)
        .map_err(|_| LedgerError::Database("outstanding sum exceeds i32 range".to_string()))
}

const fn counters_of(model: &assignments::Model) -> AssignmentCounters {
    AssignmentCounters {
        assigned: model.assigned_quantity,
        sold: model.sold_quantity,
        returned: model.returned_quantity,
        remaining: model.remaining_quantity,
    }
}

pub(crate) fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Database(err.to_string())
}
