//! Installment contract routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use savdo_core::installment::ContractStatus;
use savdo_db::entities::sea_orm_active_enums;
use savdo_db::repositories::{ContractFilter, ContractRepository, ContractView, CreateContractInput};
use savdo_shared::types::{Currency, PageRequest, PageResponse};

use super::contract_error_response;
use crate::AppState;

/// Creates the contract routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/contracts", post(create_contract).get(list_contracts))
        .route("/contracts/{id}", get(get_contract))
        .route("/contracts/{id}/payments", post(record_payment))
        .route("/contracts/{id}/cancel", post(cancel_contract))
}

/// Request body for creating a contract.
#[derive(Debug, Deserialize)]
pub struct CreateContractRequest {
    /// Shop selling on installment.
    pub shop_id: Uuid,
    /// Customer the contract is written for.
    pub customer_ref: Uuid,
    /// Product sold under the contract.
    pub product_ref: Uuid,
    /// Contract currency (defaults to UZS).
    pub currency: Option<Currency>,
    /// Full price of the goods.
    pub total_amount: Decimal,
    /// Amount paid up front.
    pub down_payment: Decimal,
    /// Number of monthly installments.
    pub duration_months: i32,
    /// Shop user creating the contract.
    pub created_by: Option<Uuid>,
}

/// Request body for cancelling a contract.
#[derive(Debug, Deserialize, Default)]
pub struct CancelContractRequest {
    /// Why the contract was cancelled.
    pub reason: Option<String>,
}

/// Query parameters for listing contracts.
#[derive(Debug, Deserialize)]
pub struct ListContractsQuery {
    /// Filter by shop.
    pub shop: Option<Uuid>,
    /// Filter by customer.
    pub customer: Option<Uuid>,
    /// Filter by stored status (`active`, `completed`, `cancelled`).
    pub status: Option<sea_orm_active_enums::ContractStatus>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

impl ListContractsQuery {
    fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Response for a contract.
#[derive(Debug, Serialize)]
pub struct ContractResponse {
    /// Contract ID.
    pub id: Uuid,
    /// Shop.
    pub shop_id: Uuid,
    /// Customer.
    pub customer_ref: Uuid,
    /// Product.
    pub product_ref: Uuid,
    /// Contract currency.
    pub currency: String,
    /// Full price of the goods.
    pub total_amount: Decimal,
    /// Amount paid up front.
    pub down_payment: Decimal,
    /// Number of monthly installments.
    pub duration_months: i32,
    /// Fixed monthly installment.
    pub monthly_payment: Decimal,
    /// Installments paid so far.
    pub paid_months: i32,
    /// Balance still owed.
    pub remaining_amount: Decimal,
    /// Date the next installment falls due.
    pub next_payment_date: String,
    /// Read-time derived status (overdue included).
    pub status: ContractStatus,
    /// Why the contract was cancelled, if it was.
    pub cancel_reason: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<ContractView> for ContractResponse {
    fn from(view: ContractView) -> Self {
        let record = view.contract;
        Self {
            id: record.id,
            shop_id: record.shop_id,
            customer_ref: record.customer_ref,
            product_ref: record.product_ref,
            currency: record.currency,
            total_amount: record.total_amount,
            down_payment: record.down_payment,
            duration_months: record.duration_months,
            monthly_payment: record.monthly_payment,
            paid_months: record.paid_months,
            remaining_amount: record.remaining_amount,
            next_payment_date: record.next_payment_date.to_string(),
            status: view.status,
            cancel_reason: record.cancel_reason,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// POST `/contracts` - Create an installment contract.
async fn create_contract(
    State(state): State<AppState>,
    Json(payload): Json<CreateContractRequest>,
) -> impl IntoResponse {
    let repo = ContractRepository::new((*state.db).clone());

    let input = CreateContractInput {
        shop_id: payload.shop_id,
        customer_ref: payload.customer_ref,
        product_ref: payload.product_ref,
        currency: payload.currency.unwrap_or_default(),
        total_amount: payload.total_amount,
        down_payment: payload.down_payment,
        duration_months: payload.duration_months,
        created_by: payload.created_by.unwrap_or_default(),
    };

    match repo.create(input).await {
        Ok(view) => {
            info!(
                contract_id = %view.contract.id,
                monthly_payment = %view.contract.monthly_payment,
                duration = view.contract.duration_months,
                "contract created"
            );
            (StatusCode::CREATED, Json(ContractResponse::from(view))).into_response()
        }
        Err(e) => contract_error_response(&e),
    }
}

/// POST `/contracts/{id}/payments` - Record one installment payment.
async fn record_payment(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = ContractRepository::new((*state.db).clone());

    match repo.record_payment(id).await {
        Ok(view) => {
            info!(
                contract_id = %id,
                paid_months = view.contract.paid_months,
                remaining = %view.contract.remaining_amount,
                "payment recorded"
            );
            (StatusCode::OK, Json(ContractResponse::from(view))).into_response()
        }
        Err(e) => contract_error_response(&e),
    }
}

/// POST `/contracts/{id}/cancel` - Cancel a contract.
async fn cancel_contract(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Option<Json<CancelContractRequest>>,
) -> impl IntoResponse {
    let repo = ContractRepository::new((*state.db).clone());
    let reason = payload.and_then(|Json(body)| body.reason);

    match repo.cancel(id, reason).await {
        Ok(view) => {
            info!(contract_id = %id, "contract cancelled");
            (StatusCode::OK, Json(ContractResponse::from(view))).into_response()
        }
        Err(e) => contract_error_response(&e),
    }
}

/// GET `/contracts/{id}` - Fetch one contract with its derived status.
async fn get_contract(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = ContractRepository::new((*state.db).clone());

    match repo.get(id).await {
        Ok(view) => (StatusCode::OK, Json(ContractResponse::from(view))).into_response(),
        Err(e) => contract_error_response(&e),
    }
}

/// GET `/contracts` - List contracts with filters.
async fn list_contracts(
    State(state): State<AppState>,
    Query(query): Query<ListContractsQuery>,
) -> impl IntoResponse {
    let repo = ContractRepository::new((*state.db).clone());

    let page = query.page_request();
    let filter = ContractFilter {
        shop_id: query.shop,
        customer_ref: query.customer,
        status: query.status,
    };

    match repo.list(filter, &page).await {
        Ok((views, total)) => {
            let items: Vec<ContractResponse> =
                views.into_iter().map(ContractResponse::from).collect();
            let body = PageResponse::new(items, page.page, page.per_page, total);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => contract_error_response(&e),
    }
}
