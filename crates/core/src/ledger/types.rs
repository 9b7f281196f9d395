//! Ledger domain types for stock assignment tracking.
//!
//! An assignment records units of a product handed from a shop's stock
//! pool to a selling agent. Units leave an assignment only by being sold
//! or returned; the counters below are the single source of truth for
//! how many units are still outstanding.

use serde::{Deserialize, Serialize};

/// Assignment lifecycle status, derived from the counters.
///
/// A record is terminal once `remaining_quantity` reaches zero; it is
/// never deleted, only transitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Units assigned, nothing returned yet.
    Assigned,
    /// Some units returned, some still outstanding or sold.
    PartiallyReturned,
    /// All units disposed of and at least one was sold.
    SoldOut,
    /// All units came back to the shop, nothing was sold.
    Returned,
}

impl AssignmentStatus {
    /// Returns true if the assignment accepts no further sales or returns.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::SoldOut | Self::Returned)
    }

    /// String form used in API responses and storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::PartiallyReturned => "partially_returned",
            Self::SoldOut => "sold_out",
            Self::Returned => "returned",
        }
    }
}

/// The quantity counters of a single assignment record.
///
/// Invariant: `assigned == sold + returned + remaining` with all four
/// non-negative. Every ledger operation preserves this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentCounters {
    /// Units originally assigned (immutable for the life of the record).
    pub assigned: i32,
    /// Units sold by the agent.
    pub sold: i32,
    /// Units returned to the shop pool.
    pub returned: i32,
    /// Units still outstanding with the agent.
    pub remaining: i32,
}

impl AssignmentCounters {
    /// Counters of a freshly created assignment.
    #[must_use]
    pub const fn new(assigned: i32) -> Self {
        Self {
            assigned,
            sold: 0,
            returned: 0,
            remaining: assigned,
        }
    }

    /// Checks the conservation invariant.
    #[must_use]
    pub const fn is_conserved(&self) -> bool {
        self.assigned == self.sold + self.returned + self.remaining
            && self.sold >= 0
            && self.returned >= 0
            && self.remaining >= 0
    }

    /// Returns true when no units are outstanding.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.remaining == 0
    }

    /// Derives the lifecycle status from the counters.
    ///
    /// A closed record with any sales counts as `sold_out`; a closed
    /// record where everything came back is `returned`. Any open record
    /// with returns is `partially_returned`.
    #[must_use]
    pub fn derive_status(&self) -> AssignmentStatus {
        if self.remaining == 0 {
            if self.sold > 0 {
                AssignmentStatus::SoldOut
            } else {
                AssignmentStatus::Returned
            }
        } else if self.returned > 0 {
            AssignmentStatus::PartiallyReturned
        } else {
            AssignmentStatus::Assigned
        }
    }
}

/// Stock availability snapshot used to validate new assignments.
#[derive(Debug, Clone, Copy)]
pub struct StockAvailability {
    /// Total units the shop currently holds for the product.
    pub pool_total: i32,
    /// Sum of `remaining` across the product's open assignments.
    pub outstanding: i32,
}

impl StockAvailability {
    /// Units that can still be assigned without over-allocating.
    #[must_use]
    pub const fn available(&self) -> i32 {
        self.pool_total - self.outstanding
    }
}

/// Result of applying a sale to an assignment.
#[derive(Debug, Clone, Copy)]
pub struct SaleOutcome {
    /// Counters after the sale.
    pub counters: AssignmentCounters,
    /// Status after the sale.
    pub status: AssignmentStatus,
}

/// Result of applying a return to an assignment.
#[derive(Debug, Clone, Copy)]
pub struct ReturnOutcome {
    /// Counters after the return.
    pub counters: AssignmentCounters,
    /// Status after the return.
    pub status: AssignmentStatus,
    /// Units to add back to the shop's stock pool (always the returned
    /// quantity; committed atomically with the counter update).
    pub pool_delta: i32,
}
