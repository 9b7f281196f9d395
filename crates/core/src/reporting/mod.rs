//! Reporting aggregates consumed by the query surface.

pub mod types;

pub use types::{AgentOutstanding, DueContract, ProductAllocation, is_due_within};
