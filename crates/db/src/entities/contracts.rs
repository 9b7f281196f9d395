//! `SeaORM` Entity for the `contracts` table.
//!
//! Stores installment contract terms plus the current schedule position.
//! The stored status never holds `overdue`; that is derived at read time
//! from `next_payment_date`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ContractStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub shop_id: Uuid,
    pub customer_ref: Uuid,
    pub product_ref: Uuid,
    pub currency: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub down_payment: Decimal,
    pub duration_months: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub monthly_payment: Decimal,
    pub paid_months: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub remaining_amount: Decimal,
    pub next_payment_date: Date,
    pub status: ContractStatus,
    pub cancel_reason: Option<String>,
    pub cancelled_at: Option<DateTimeWithTimeZone>,
    pub created_by: Uuid,
    /// Optimistic lock counter.
    pub version: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
