//! Stock pool routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use savdo_db::entities::stock_pools;
use savdo_db::repositories::{StockPoolRepository, UpsertStockPoolInput};
use savdo_shared::types::{PageRequest, PageResponse};

use super::ledger_error_response;
use crate::AppState;

/// Creates the stock pool routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stock-pools", put(upsert_pool).get(list_pools))
        .route("/stock-pools/{product_id}/{shop_id}", get(get_pool))
}

/// Request body for creating or adjusting a pool.
#[derive(Debug, Deserialize)]
pub struct UpsertPoolRequest {
    /// Product the pool tracks.
    pub product_id: Uuid,
    /// Shop that owns the stock.
    pub shop_id: Uuid,
    /// New total quantity, including units out with agents.
    pub total_quantity: i32,
}

/// Query parameters for listing pools.
#[derive(Debug, Deserialize)]
pub struct ListPoolsQuery {
    /// Filter by shop.
    pub shop_id: Option<Uuid>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

impl ListPoolsQuery {
    fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Response for a stock pool.
#[derive(Debug, Serialize)]
pub struct PoolResponse {
    /// Pool ID.
    pub id: Uuid,
    /// Product.
    pub product_id: Uuid,
    /// Shop.
    pub shop_id: Uuid,
    /// Total quantity, outstanding units included.
    pub total_quantity: i32,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

/// Response for a pool with its availability.
#[derive(Debug, Serialize)]
pub struct PoolDetailResponse {
    /// The pool.
    #[serde(flatten)]
    pub pool: PoolResponse,
    /// Units currently out with agents.
    pub outstanding: i32,
    /// Units still assignable.
    pub available: i32,
}

impl From<stock_pools::Model> for PoolResponse {
    fn from(model: stock_pools::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            shop_id: model.shop_id,
            total_quantity: model.total_quantity,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

/// PUT `/stock-pools` - Create a pool or set its total quantity.
async fn upsert_pool(
    State(state): State<AppState>,
    Json(payload): Json<UpsertPoolRequest>,
) -> impl IntoResponse {
    let repo = StockPoolRepository::new((*state.db).clone());

    match repo
        .upsert(UpsertStockPoolInput {
            product_id: payload.product_id,
            shop_id: payload.shop_id,
            total_quantity: payload.total_quantity,
        })
        .await
    {
        Ok(pool) => {
            info!(
                product_id = %pool.product_id,
                shop_id = %pool.shop_id,
                total = pool.total_quantity,
                "stock pool updated"
            );
            (StatusCode::OK, Json(PoolResponse::from(pool))).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/stock-pools/{product_id}/{shop_id}` - Fetch a pool with availability.
async fn get_pool(
    State(state): State<AppState>,
    Path((product_id, shop_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = StockPoolRepository::new((*state.db).clone());

    match repo.availability(product_id, shop_id).await {
        Ok((pool, availability)) => (
            StatusCode::OK,
            Json(PoolDetailResponse {
                pool: PoolResponse::from(pool),
                outstanding: availability.outstanding,
                available: availability.available(),
            }),
        )
            .into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/stock-pools` - List pools, optionally scoped to one shop.
async fn list_pools(
    State(state): State<AppState>,
    Query(query): Query<ListPoolsQuery>,
) -> impl IntoResponse {
    let repo = StockPoolRepository::new((*state.db).clone());

    let page = query.page_request();
    match repo.list(query.shop_id, &page).await {
        Ok((pools, total)) => {
            let items: Vec<PoolResponse> = pools.into_iter().map(PoolResponse::from).collect();
            let body = PageResponse::new(items, page.page, page.per_page, total);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}
