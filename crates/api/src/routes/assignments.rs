//! Assignment ledger routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use savdo_core::ledger::AssignmentStatus;
use savdo_db::entities::assignments;
use savdo_db::repositories::{AssignInput, AssignmentFilter, AssignmentRepository};
use savdo_shared::types::{PageRequest, PageResponse};

use super::ledger_error_response;
use crate::AppState;

/// Creates the assignment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/assignments", post(create_assignment).get(list_assignments))
        .route("/assignments/{id}", get(get_assignment))
        .route("/assignments/{id}/sales", post(record_sale))
        .route("/assignments/{id}/returns", post(record_return))
}

/// Request body for assigning stock to an agent.
#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    /// Product being assigned.
    pub product_id: Uuid,
    /// Shop the stock belongs to.
    pub shop_id: Uuid,
    /// Agent receiving the stock.
    pub agent_id: Uuid,
    /// Shop user performing the assignment.
    pub assigned_by: Option<Uuid>,
    /// Units to assign.
    pub quantity: i32,
}

/// Request body for a sale or return against an assignment.
#[derive(Debug, Deserialize)]
pub struct QuantityRequest {
    /// Units sold or returned.
    pub quantity: i32,
}

/// Query parameters for listing assignments.
#[derive(Debug, Deserialize)]
pub struct ListAssignmentsQuery {
    /// Filter by agent.
    pub agent: Option<Uuid>,
    /// Filter by product.
    pub product: Option<Uuid>,
    /// Filter by shop.
    pub shop: Option<Uuid>,
    /// Filter by status.
    pub status: Option<AssignmentStatus>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

impl ListAssignmentsQuery {
    fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Response for an assignment record.
#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    /// Assignment ID.
    pub id: Uuid,
    /// Product.
    pub product_id: Uuid,
    /// Shop.
    pub shop_id: Uuid,
    /// Agent.
    pub agent_id: Uuid,
    /// Units assigned.
    pub assigned_quantity: i32,
    /// Units sold.
    pub sold_quantity: i32,
    /// Units returned.
    pub returned_quantity: i32,
    /// Units still with the agent.
    pub remaining_quantity: i32,
    /// Record status.
    pub status: AssignmentStatus,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

/// Response for a return, including the replenished pool total.
#[derive(Debug, Serialize)]
pub struct ReturnResponse {
    /// Updated assignment.
    #[serde(flatten)]
    pub assignment: AssignmentResponse,
    /// Pool total after replenishment.
    pub pool_total_quantity: i32,
}

impl From<assignments::Model> for AssignmentResponse {
    fn from(model: assignments::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            shop_id: model.shop_id,
            agent_id: model.agent_id,
            assigned_quantity: model.assigned_quantity,
            sold_quantity: model.sold_quantity,
            returned_quantity: model.returned_quantity,
            remaining_quantity: model.remaining_quantity,
            status: model.status.into(),
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

/// POST `/assignments` - Assign stock from a shop's pool to an agent.
async fn create_assignment(
    State(state): State<AppState>,
    Json(payload): Json<CreateAssignmentRequest>,
) -> impl IntoResponse {
    let repo = AssignmentRepository::new((*state.db).clone());

    let input = AssignInput {
        product_id: payload.product_id,
        shop_id: payload.shop_id,
        agent_id: payload.agent_id,
        assigned_by: payload.assigned_by.unwrap_or_default(),
        quantity: payload.quantity,
    };

    match repo.assign(input).await {
        Ok(assignment) => {
            info!(
                assignment_id = %assignment.id,
                agent_id = %assignment.agent_id,
                quantity = assignment.assigned_quantity,
                "stock assigned"
            );
            (
                StatusCode::CREATED,
                Json(AssignmentResponse::from(assignment)),
            )
                .into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// POST `/assignments/{id}/sales` - Record a sale against an assignment.
async fn record_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuantityRequest>,
) -> impl IntoResponse {
    let repo = AssignmentRepository::new((*state.db).clone());

    match repo.record_sale(id, payload.quantity).await {
        Ok(assignment) => {
            info!(
                assignment_id = %id,
                quantity = payload.quantity,
                remaining = assignment.remaining_quantity,
                "sale recorded"
            );
            (StatusCode::OK, Json(AssignmentResponse::from(assignment))).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// POST `/assignments/{id}/returns` - Return units to the shop's pool.
async fn record_return(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuantityRequest>,
) -> impl IntoResponse {
    let repo = AssignmentRepository::new((*state.db).clone());

    match repo.record_return(id, payload.quantity).await {
        Ok(receipt) => {
            info!(
                assignment_id = %id,
                quantity = payload.quantity,
                pool_total = receipt.pool.total_quantity,
                "return recorded"
            );
            (
                StatusCode::OK,
                Json(ReturnResponse {
                    assignment: AssignmentResponse::from(receipt.assignment),
                    pool_total_quantity: receipt.pool.total_quantity,
                }),
            )
                .into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/assignments/{id}` - Fetch one assignment.
async fn get_assignment(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = AssignmentRepository::new((*state.db).clone());

    match repo.get(id).await {
        Ok(assignment) => {
            (StatusCode::OK, Json(AssignmentResponse::from(assignment))).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/assignments` - List assignments with filters.
async fn list_assignments(
    State(state): State<AppState>,
    Query(query): Query<ListAssignmentsQuery>,
) -> impl IntoResponse {
    let repo = AssignmentRepository::new((*state.db).clone());

    let filter = AssignmentFilter {
        agent_id: query.agent,
        product_id: query.product,
        shop_id: query.shop,
        status: query.status.map(Into::into),
    };

    let page = query.page_request();
    match repo.list(filter, &page).await {
        Ok((records, total)) => {
            let items: Vec<AssignmentResponse> =
                records.into_iter().map(AssignmentResponse::from).collect();
            let body = PageResponse::new(items, page.page, page.per_page, total);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}
