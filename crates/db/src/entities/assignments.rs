//! `SeaORM` Entity for the `assignments` table.
//!
//! Each row records one hand-off of stock from a shop to an agent and
//! tracks how those units were disposed of. The counters satisfy
//! `assigned = sold + returned + remaining` at all times.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AssignmentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub shop_id: Uuid,
    pub agent_id: Uuid,
    pub assigned_by: Uuid,
    pub assigned_quantity: i32,
    pub sold_quantity: i32,
    pub returned_quantity: i32,
    pub remaining_quantity: i32,
    pub status: AssignmentStatus,
    /// Optimistic lock counter.
    pub version: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
