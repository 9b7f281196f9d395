//! Contract repository for installment contract operations.
//!
//! Schedule math and the status state machine live in
//! `savdo_core::installment`; this layer persists outcomes with
//! version-guarded conditional updates. Overdue is derived at read time
//! from `next_payment_date` and never written to the status column.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::warn;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use savdo_core::installment::{
    ContractError, ContractStatus, ContractTerms, InstallmentService, derive_status,
};
use savdo_shared::types::{Currency, PageRequest};

use super::assignment::MAX_CONFLICT_RETRIES;
use crate::entities::{contracts, sea_orm_active_enums};

/// Input for creating an installment contract.
#[derive(Debug, Clone)]
pub struct CreateContractInput {
    /// Shop selling on installment.
    pub shop_id: Uuid,
    /// Customer the contract is written for.
    pub customer_ref: Uuid,
    /// Product sold under the contract.
    pub product_ref: Uuid,
    /// Contract currency.
    pub currency: Currency,
    /// Full price of the goods.
    pub total_amount: Decimal,
    /// Amount paid up front.
    pub down_payment: Decimal,
    /// Number of monthly installments.
    pub duration_months: i32,
    /// Shop user who created the contract.
    pub created_by: Uuid,
}

/// Filter options for listing contracts.
#[derive(Debug, Clone, Default)]
pub struct ContractFilter {
    /// Filter by shop.
    pub shop_id: Option<Uuid>,
    /// Filter by customer.
    pub customer_ref: Option<Uuid>,
    /// Filter by stored status.
    pub status: Option<sea_orm_active_enums::ContractStatus>,
}

/// A contract row plus its read-time derived status.
#[derive(Debug, Clone)]
pub struct ContractView {
    /// Stored contract record.
    pub contract: contracts::Model,
    /// Derived status, overdue included.
    pub status: ContractStatus,
}

/// Repository for installment contract operations.
#[derive(Debug, Clone)]
pub struct ContractRepository {
    db: DatabaseConnection,
}

impl ContractRepository {
    /// Creates a new contract repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a contract after validating terms and computing the
    /// initial schedule.
    ///
    /// # Errors
    ///
    /// Returns a terms validation error or a database error.
    pub async fn create(&self, input: CreateContractInput) -> Result<ContractView, ContractError> {
        let terms = ContractTerms {
            total_amount: input.total_amount,
            down_payment: input.down_payment,
            duration_months: input.duration_months,
        };
        let today = Utc::now().date_naive();
        let schedule = InstallmentService::create(&terms, today)?;

        let now = Utc::now().into();
        let contract = contracts::ActiveModel {
            id: Set(Uuid::now_v7()),
            shop_id: Set(input.shop_id),
            customer_ref: Set(input.customer_ref),
            product_ref: Set(input.product_ref),
            currency: Set(input.currency.to_string()),
            total_amount: Set(input.total_amount),
            down_payment: Set(input.down_payment),
            duration_months: Set(input.duration_months),
            monthly_payment: Set(schedule.monthly_payment),
            paid_months: Set(0),
            remaining_amount: Set(schedule.remaining_amount),
            next_payment_date: Set(schedule.next_payment_date),
            status: Set(sea_orm_active_enums::ContractStatus::Active),
            cancel_reason: Set(None),
            cancelled_at: Set(None),
            created_by: Set(input.created_by),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = contract.insert(&self.db).await.map_err(db_err)?;

        let status = effective_status(&model, today);
        Ok(ContractView {
            contract: model,
            status,
        })
    }

    /// Applies one installment payment to a contract.
    ///
    /// # Errors
    ///
    /// Returns `ContractNotFound`, `Cancelled`, `AlreadySettled`, or
    /// `ConcurrencyConflict` after exhausted retries.
    pub async fn record_payment(&self, contract_id: Uuid) -> Result<ContractView, ContractError> {
        for _ in 0..MAX_CONFLICT_RETRIES {
            match self.try_record_payment(contract_id).await {
                Err(ContractError::ConcurrencyConflict) => {}
                other => return other,
            }
        }
        warn!(contract_id = %contract_id, "payment retries exhausted");
        Err(ContractError::ConcurrencyConflict)
    }

    async fn try_record_payment(&self, contract_id: Uuid) -> Result<ContractView, ContractError> {
        let record = self.get_model(contract_id).await?;
        let today = Utc::now().date_naive();

        let terms = ContractTerms {
            total_amount: record.total_amount,
            down_payment: record.down_payment,
            duration_months: record.duration_months,
        };
        let outcome = InstallmentService::apply_payment(
            &terms,
            record.paid_months,
            effective_status(&record, today),
            today,
        )?;

        let stored = match outcome.status {
            ContractStatus::Completed => sea_orm_active_enums::ContractStatus::Completed,
            _ => sea_orm_active_enums::ContractStatus::Active,
        };

        let now = Utc::now().into();
        let updated = contracts::Entity::update_many()
            .set(contracts::ActiveModel {
                paid_months: Set(outcome.paid_months),
                remaining_amount: Set(outcome.remaining_amount),
                next_payment_date: Set(outcome.next_payment_date),
                status: Set(stored.clone()),
                version: Set(record.version + 1),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(contracts::Column::Id.eq(contract_id))
            .filter(contracts::Column::Version.eq(record.version))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if updated.rows_affected == 0 {
            return Err(ContractError::ConcurrencyConflict);
        }

        Ok(ContractView {
            contract: contracts::Model {
                paid_months: outcome.paid_months,
                remaining_amount: outcome.remaining_amount,
                next_payment_date: outcome.next_payment_date,
                status: stored,
                version: record.version + 1,
                updated_at: now,
                ..record
            },
            status: outcome.status,
        })
    }

    /// Cancels a contract, freezing its record.
    ///
    /// # Errors
    ///
    /// Returns `ContractNotFound`, `Cancelled` when already cancelled,
    /// `AlreadySettled` for completed contracts, or
    /// `ConcurrencyConflict` after exhausted retries.
    pub async fn cancel(
        &self,
        contract_id: Uuid,
        reason: Option<String>,
    ) -> Result<ContractView, ContractError> {
        for _ in 0..MAX_CONFLICT_RETRIES {
            match self.try_cancel(contract_id, reason.clone()).await {
                Err(ContractError::ConcurrencyConflict) => {}
                other => return other,
            }
        }
        warn!(contract_id = %contract_id, "cancel retries exhausted");
        Err(ContractError::ConcurrencyConflict)
    }

    async fn try_cancel(
        &self,
        contract_id: Uuid,
        reason: Option<String>,
    ) -> Result<ContractView, ContractError> {
        let record = self.get_model(contract_id).await?;
        let today = Utc::now().date_naive();

        InstallmentService::validate_cancellable(effective_status(&record, today))?;

        let now = Utc::now().into();
        let updated = contracts::Entity::update_many()
            .set(contracts::ActiveModel {
                status: Set(sea_orm_active_enums::ContractStatus::Cancelled),
                cancel_reason: Set(reason.clone()),
                cancelled_at: Set(Some(now)),
                version: Set(record.version + 1),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(contracts::Column::Id.eq(contract_id))
            .filter(contracts::Column::Version.eq(record.version))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if updated.rows_affected == 0 {
            return Err(ContractError::ConcurrencyConflict);
        }

        Ok(ContractView {
            contract: contracts::Model {
                status: sea_orm_active_enums::ContractStatus::Cancelled,
                cancel_reason: reason,
                cancelled_at: Some(now),
                version: record.version + 1,
                updated_at: now,
                ..record
            },
            status: ContractStatus::Cancelled,
        })
    }

    /// Fetches a contract with its derived status.
    ///
    /// # Errors
    ///
    /// Returns `ContractNotFound` if no such record exists.
    pub async fn get(&self, contract_id: Uuid) -> Result<ContractView, ContractError> {
        let record = self.get_model(contract_id).await?;
        let status = effective_status(&record, Utc::now().date_naive());
        Ok(ContractView {
            contract: record,
            status,
        })
    }

    async fn get_model(&self, contract_id: Uuid) -> Result<contracts::Model, ContractError> {
        contracts::Entity::find_by_id(contract_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(ContractError::ContractNotFound(contract_id))
    }

    /// Lists contracts matching the filter, newest first, each with its
    /// derived status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: ContractFilter,
        page: &PageRequest,
    ) -> Result<(Vec<ContractView>, u64), ContractError> {
        let mut query = contracts::Entity::find();

        if let Some(shop_id) = filter.shop_id {
            query = query.filter(contracts::Column::ShopId.eq(shop_id));
        }
        if let Some(customer_ref) = filter.customer_ref {
            query = query.filter(contracts::Column::CustomerRef.eq(customer_ref));
        }
        if let Some(status) = filter.status {
            query = query.filter(contracts::Column::Status.eq(status));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let items = query
            .order_by_desc(contracts::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let today = Utc::now().date_naive();
        let views = items
            .into_iter()
            .map(|record| {
                let status = effective_status(&record, today);
                ContractView {
                    contract: record,
                    status,
                }
            })
            .collect();

        Ok((views, total))
    }
}

/// Derives the read-time status of a stored contract.
#[must_use]
pub fn effective_status(record: &contracts::Model, today: NaiveDate) -> ContractStatus {
    let cancelled = record.status == sea_orm_active_enums::ContractStatus::Cancelled;
    derive_status(
        record.paid_months,
        record.duration_months,
        record.remaining_amount,
        record.next_payment_date,
        today,
        cancelled,
    )
}

fn db_err(err: DbErr) -> ContractError {
    ContractError::Database(err.to_string())
}
