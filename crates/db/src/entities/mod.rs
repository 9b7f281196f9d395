//! `SeaORM` entity definitions.

pub mod assignments;
pub mod contracts;
pub mod sea_orm_active_enums;
pub mod stock_pools;
