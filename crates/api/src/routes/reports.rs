//! Reporting routes.
//!
//! Read-only aggregates over the ledger and contract tables.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use savdo_db::repositories::ReportingRepository;

use super::ledger_error_response;
use crate::AppState;

/// Creates the reporting routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/agents/outstanding", get(agents_outstanding))
        .route("/reports/products/allocations", get(product_allocations))
        .route("/reports/contracts/due", get(due_contracts))
}

/// Query parameters shared by the ledger reports.
#[derive(Debug, Deserialize)]
pub struct ShopScopeQuery {
    /// Scope the report to one shop.
    pub shop_id: Option<Uuid>,
}

/// Query parameters for the due-contracts report.
#[derive(Debug, Deserialize)]
pub struct DueContractsQuery {
    /// Scope the report to one shop.
    pub shop_id: Option<Uuid>,
    /// Horizon in days (default 7).
    pub days: Option<u32>,
}

const DEFAULT_DUE_HORIZON_DAYS: u32 = 7;

/// GET `/reports/agents/outstanding` - Outstanding units per agent.
async fn agents_outstanding(
    State(state): State<AppState>,
    Query(query): Query<ShopScopeQuery>,
) -> impl IntoResponse {
    let repo = ReportingRepository::new((*state.db).clone());

    match repo.outstanding_by_agent(query.shop_id).await {
        Ok(report) => (StatusCode::OK, Json(json!({ "agents": report }))).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/reports/products/allocations` - Allocation totals per product.
async fn product_allocations(
    State(state): State<AppState>,
    Query(query): Query<ShopScopeQuery>,
) -> impl IntoResponse {
    let repo = ReportingRepository::new((*state.db).clone());

    match repo.allocation_by_product(query.shop_id).await {
        Ok(report) => (StatusCode::OK, Json(json!({ "products": report }))).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/reports/contracts/due` - Contracts due within the horizon.
async fn due_contracts(
    State(state): State<AppState>,
    Query(query): Query<DueContractsQuery>,
) -> impl IntoResponse {
    let repo = ReportingRepository::new((*state.db).clone());
    let days = query.days.unwrap_or(DEFAULT_DUE_HORIZON_DAYS);

    match repo.due_contracts(query.shop_id, days).await {
        Ok(report) => (StatusCode::OK, Json(json!({ "contracts": report }))).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}
