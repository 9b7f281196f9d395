//! `SeaORM` active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Assignment lifecycle status (`assignment_status` enum in Postgres).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "assignment_status")]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Units assigned, nothing returned yet.
    #[sea_orm(string_value = "assigned")]
    Assigned,
    /// Some units returned, record still open or partly sold.
    #[sea_orm(string_value = "partially_returned")]
    PartiallyReturned,
    /// All units disposed of and at least one was sold.
    #[sea_orm(string_value = "sold_out")]
    SoldOut,
    /// All units came back to the shop, nothing was sold.
    #[sea_orm(string_value = "returned")]
    Returned,
}

impl From<savdo_core::ledger::AssignmentStatus> for AssignmentStatus {
    fn from(status: savdo_core::ledger::AssignmentStatus) -> Self {
        match status {
            savdo_core::ledger::AssignmentStatus::Assigned => Self::Assigned,
            savdo_core::ledger::AssignmentStatus::PartiallyReturned => Self::PartiallyReturned,
            savdo_core::ledger::AssignmentStatus::SoldOut => Self::SoldOut,
            savdo_core::ledger::AssignmentStatus::Returned => Self::Returned,
        }
    }
}

impl From<AssignmentStatus> for savdo_core::ledger::AssignmentStatus {
    fn from(status: AssignmentStatus) -> Self {
        match status {
            AssignmentStatus::Assigned => Self::Assigned,
            AssignmentStatus::PartiallyReturned => Self::PartiallyReturned,
            AssignmentStatus::SoldOut => Self::SoldOut,
            AssignmentStatus::Returned => Self::Returned,
        }
    }
}

/// Contract lifecycle status (`contract_status` enum in Postgres).
///
/// `overdue` is derived at read time and not persisted; stored rows only
/// ever hold `active`, `completed`, or `cancelled`.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "contract_status")]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    /// Payments are being made on schedule.
    #[sea_orm(string_value = "active")]
    Active,
    /// All installments paid.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Cancelled by operator action (terminal).
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl ContractStatus {
    /// Widens to the core status type (never yields `Overdue`; that is
    /// derived from the schedule, not stored).
    #[must_use]
    pub fn to_core(&self) -> savdo_core::installment::ContractStatus {
        match self {
            Self::Active => savdo_core::installment::ContractStatus::Active,
            Self::Completed => savdo_core::installment::ContractStatus::Completed,
            Self::Cancelled => savdo_core::installment::ContractStatus::Cancelled,
        }
    }
}
