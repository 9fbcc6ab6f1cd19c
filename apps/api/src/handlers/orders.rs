//! Order endpoints.
//!
//! The client sends only `productId` and `quantity`; any `totalPrice` in the
//! body is ignored and recomputed from the current product price.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::handlers::ApiJson;
use crate::AppState;
use mobilia_core::{Identity, Order, OrderStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// `POST /order/place`
pub async fn place_order(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(request): ApiJson<PlaceOrderRequest>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let order = state
        .db
        .orders()
        .place(&identity, &request.product_id, request.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /order`
pub async fn list_orders(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(state.db.orders().list_for(&identity).await?))
}

/// `GET /order/{id}`
pub async fn get_order(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<Json<Order>> {
    Ok(Json(state.db.orders().get_for(&identity, &id).await?))
}

/// `PATCH /order/{id}/status`
pub async fn update_order_status(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateStatusRequest>,
) -> ApiResult<Json<Order>> {
    let order = state
        .db
        .orders()
        .update_status(&identity, &id, request.status)
        .await?;

    Ok(Json(order))
}
