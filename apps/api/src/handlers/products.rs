//! Catalog endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::handlers::{ApiJson, ApiQuery};
use crate::AppState;
use mobilia_core::policy::{ensure_can_manage_product, ensure_can_publish_product};
use mobilia_core::{CoreError, Identity, NewProduct, Product, ProductPatch, DEFAULT_PAGE_SIZE};
use mobilia_db::ProductFilter;

/// Query string of `GET /products`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    /// Owner (manufacturer) user id
    pub owner: Option<String>,
    pub limit: Option<u32>,
}

impl From<ProductQuery> for ProductFilter {
    fn from(query: ProductQuery) -> Self {
        ProductFilter {
            category: query.category.filter(|c| !c.trim().is_empty()),
            owner_id: query.owner.filter(|o| !o.trim().is_empty()),
            limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

/// `GET /products`
pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state.db.products().list(&query.into()).await?;
    Ok(Json(products))
}

/// `GET /products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    Ok(Json(load(&state, &id).await?))
}

/// `POST /products` (manufacturer or admin)
///
/// The caller becomes the owner. Company name comes from the caller's
/// account, falling back to the one in the body.
pub async fn create_product(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(input): ApiJson<NewProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    ensure_can_publish_product(&identity)?;

    let account = state
        .db
        .users()
        .get_by_id(&identity.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthenticated("Account no longer exists"))?;

    let company_name = account
        .company_name
        .or_else(|| input.company_name.clone())
        .unwrap_or_default();

    let product = state
        .db
        .products()
        .create(&identity.user_id, company_name.trim(), &input)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /products/{id}` (owner or admin)
pub async fn update_product(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> ApiResult<Json<Product>> {
    let product = load(&state, &id).await?;
    ensure_can_manage_product(&identity, &product)?;

    if patch.is_empty() {
        return Ok(Json(product));
    }

    let updated = state.db.products().update(&product.id, &patch).await?;
    Ok(Json(updated))
}

/// `DELETE /products/{id}` (owner or admin)
pub async fn delete_product(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let product = load(&state, &id).await?;
    ensure_can_manage_product(&identity, &product)?;

    state.db.products().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn load(state: &AppState, id: &str) -> ApiResult<Product> {
    state
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| CoreError::ProductNotFound(id.to_string()).into())
}
