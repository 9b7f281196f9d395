//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod assignment;
pub mod contract;
pub mod reporting;
pub mod stock_pool;

pub use assignment::{
    AssignInput, AssignmentFilter, AssignmentRepository, AssignmentWithPool, MAX_CONFLICT_RETRIES,
};
pub use contract::{ContractFilter, ContractRepository, ContractView, CreateContractInput};
pub use reporting::ReportingRepository;
pub use stock_pool::{StockPoolRepository, UpsertStockPoolInput};
