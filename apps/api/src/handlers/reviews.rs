//! Product reviews.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::ApiResult;
use crate::handlers::products::load;
use crate::handlers::ApiJson;
use crate::AppState;
use mobilia_core::{Identity, Review};
use mobilia_db::NewReview;

/// `GET /products/{id}/reviews`
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<Json<Vec<Review>>> {
    load(&state, &product_id).await?;
    let reviews = state.db.reviews().list_for_product(&product_id).await?;
    Ok(Json(reviews))
}

/// `POST /products/{id}/reviews`
///
/// One review per user and product; a second attempt is 400.
pub async fn create_review(
    State(state): State<AppState>,
    identity: Identity,
    Path(product_id): Path<String>,
    ApiJson(input): ApiJson<NewReview>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    let review = state
        .db
        .reviews()
        .create(&identity, &product_id, &input)
        .await?;

    Ok((StatusCode::CREATED, Json(review)))
}
