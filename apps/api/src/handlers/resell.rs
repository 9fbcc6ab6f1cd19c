//! Resale listing endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::handlers::ApiJson;
use crate::AppState;
use mobilia_core::{Identity, ResellProduct};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// `POST /resellProducts` (seller or admin)
pub async fn create_listing(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(request): ApiJson<CreateListingRequest>,
) -> ApiResult<(StatusCode, Json<ResellProduct>)> {
    let listing = state
        .db
        .resell()
        .create(&identity, &request.product_id, request.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(listing)))
}

/// `GET /resellProducts`
pub async fn list_listings(State(state): State<AppState>) -> ApiResult<Json<Vec<ResellProduct>>> {
    Ok(Json(state.db.resell().list().await?))
}

/// `GET /resellProducts/mine`
pub async fn my_listings(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Vec<ResellProduct>>> {
    Ok(Json(state.db.resell().list_by_seller(&identity.user_id).await?))
}

/// `GET /resellProducts/{id}`
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ResellProduct>> {
    state
        .db
        .resell()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Resale listing", &id))
}

/// `DELETE /resellProducts/{id}` (owner or admin)
pub async fn delete_listing(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.resell().delete(&identity, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
