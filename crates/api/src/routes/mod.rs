//! API route definitions.

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use savdo_core::installment::ContractError;
use savdo_core::ledger::LedgerError;

use crate::AppState;

pub mod assignments;
pub mod contracts;
pub mod health;
pub mod reports;
pub mod stock_pools;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(stock_pools::routes())
        .merge(assignments::routes())
        .merge(contracts::routes())
        .merge(reports::routes())
}

fn error_body(status: u16, code: &'static str, message: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": code, "message": message }))).into_response()
}

/// Maps a ledger error to an HTTP response.
pub(crate) fn ledger_error_response(err: &LedgerError) -> Response {
    if let LedgerError::Database(_) = err {
        error!(error = %err, "ledger operation failed");
        return error_body(500, err.error_code(), "An error occurred".to_string());
    }
    error_body(err.http_status_code(), err.error_code(), err.to_string())
}

/// Maps a contract error to an HTTP response.
pub(crate) fn contract_error_response(err: &ContractError) -> Response {
    if let ContractError::Database(_) = err {
        error!(error = %err, "contract operation failed");
        return error_body(500, err.error_code(), "An error occurred".to_string());
    }
    error_body(err.http_status_code(), err.error_code(), err.to_string())
}
