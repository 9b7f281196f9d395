//! Reporting repository.
//!
//! Read-only aggregate queries over the ledger and contract tables.
//! Aggregation happens in SQL; row shapes come from
//! `savdo_core::reporting`.

use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use savdo_core::ledger::LedgerError;
use savdo_core::reporting::{AgentOutstanding, DueContract, ProductAllocation, is_due_within};
use savdo_shared::types::{AgentId, ContractId, CustomerId, ProductId};

use super::contract::effective_status;
use crate::entities::{assignments, contracts, sea_orm_active_enums};

/// Repository for read-only reporting queries.
#[derive(Debug, Clone)]
pub struct ReportingRepository {
    db: DatabaseConnection,
}

impl ReportingRepository {
    /// Creates a new reporting repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Outstanding units per agent, optionally scoped to one shop.
    ///
    /// Only assignments with units still out are counted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn outstanding_by_agent(
        &self,
        shop_id: Option<Uuid>,
    ) -> Result<Vec<AgentOutstanding>, LedgerError> {
        let mut query = assignments::Entity::find()
            .select_only()
            .column(assignments::Column::AgentId)
            .column_as(assignments::Column::Id.count(), "open_assignments")
            .column_as(assignments::Column::RemainingQuantity.sum(), "total_remaining")
            .filter(assignments::Column::RemainingQuantity.gt(0));

        if let Some(shop_id) = shop_id {
            query = query.filter(assignments::Column::ShopId.eq(shop_id));
        }

        let rows: Vec<(Uuid, i64, Option<i64>)> = query
            .group_by(assignments::Column::AgentId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let report = rows
            .into_iter()
            .map(|(agent_id, open, remaining)| AgentOutstanding {
                agent_id: AgentId::from_uuid(agent_id),
                open_assignments: open.unsigned_abs(),
                total_remaining: remaining.unwrap_or(0),
            })
            .collect();

        Ok(report)
    }

    /// Allocation totals per product, optionally scoped to one shop.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn allocation_by_product(
        &self,
        shop_id: Option<Uuid>,
    ) -> Result<Vec<ProductAllocation>, LedgerError> {
        let mut query = assignments::Entity::find()
            .select_only()
            .column(assignments::Column::ProductId)
            .column_as(assignments::Column::AssignedQuantity.sum(), "assigned_total")
            .column_as(assignments::Column::SoldQuantity.sum(), "sold_total")
            .column_as(assignments::Column::ReturnedQuantity.sum(), "returned_total")
            .column_as(assignments::Column::RemainingQuantity.sum(), "remaining_total");

        if let Some(shop_id) = shop_id {
            query = query.filter(assignments::Column::ShopId.eq(shop_id));
        }

        let rows: Vec<(Uuid, Option<i64>, Option<i64>, Option<i64>, Option<i64>)> = query
            .group_by(assignments::Column::ProductId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let report = rows
            .into_iter()
            .map(
                |(product_id, assigned, sold, returned, remaining)| ProductAllocation {
                    product_id: ProductId::from_uuid(product_id),
                    assigned_total: assigned.unwrap_or(0),
                    sold_total: sold.unwrap_or(0),
                    returned_total: returned.unwrap_or(0),
                    remaining_total: remaining.unwrap_or(0),
                },
            )
            .collect();

        Ok(report)
    }

    /// Contracts due within `days` of today, overdue contracts included,
    /// soonest first.
    ///
    /// Completed and cancelled contracts never appear; the derived
    /// status on each row distinguishes active from overdue.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn due_contracts(
        &self,
        shop_id: Option<Uuid>,
        days: u32,
    ) -> Result<Vec<DueContract>, LedgerError> {
        let today = Utc::now().date_naive();

        let mut query = contracts::Entity::find()
            .filter(contracts::Column::Status.eq(sea_orm_active_enums::ContractStatus::Active));

        if let Some(shop_id) = shop_id {
            query = query.filter(contracts::Column::ShopId.eq(shop_id));
        }

        let rows = query
            .order_by_asc(contracts::Column::NextPaymentDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let report = rows
            .into_iter()
            .filter(|record| is_due_within(record.next_payment_date, today, days))
            .map(|record| {
                let status = effective_status(&record, today);
                DueContract {
                    contract_id: ContractId::from_uuid(record.id),
                    customer_ref: CustomerId::from_uuid(record.customer_ref),
                    next_payment_date: record.next_payment_date,
                    monthly_payment: record.monthly_payment,
                    remaining_amount: record.remaining_amount,
                    status,
                }
            })
            .collect();

        Ok(report)
    }
}

fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Database(err.to_string())
}
