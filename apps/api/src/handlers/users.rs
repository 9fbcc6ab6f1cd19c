//! Admin account management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use mobilia_core::policy::ensure_admin;
use mobilia_core::{Identity, User};

/// `GET /users` (admin)
pub async fn list_users(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Vec<User>>> {
    ensure_admin(&identity, "list users")?;
    Ok(Json(state.db.users().list().await?))
}

/// `DELETE /users/{id}` (admin, not self)
pub async fn delete_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    ensure_admin(&identity, "delete users")?;

    if id == identity.user_id {
        return Err(ApiError::validation("Admins cannot delete their own account"));
    }

    state.db.users().delete(&id).await?;
    tracing::info!(user_id = %id, by = %identity.user_id, "User removed by admin");
    Ok(StatusCode::NO_CONTENT)
}
