//! Registration, confirmation, login and password change.
//!
//! ```text
//! POST /auth/register ──► inactive user ──► mailer (link with token)
//! GET  /auth/confirm/{token} ──► active
//! POST /auth/login ──► { token, tokenType: "Bearer", expiresIn, user }
//! ```

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{hash_password, verify_password};
use crate::error::{ApiError, ApiResult};
use crate::handlers::ApiJson;
use crate::AppState;
use mobilia_core::policy::ensure_can_self_register;
use mobilia_core::validation::{validate_email, validate_password};
use mobilia_core::{CoreError, Identity, Role, User, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// `POST /auth/register`
///
/// Creates an inactive account and hands the confirmation token to the
/// mailer. Mail failures are logged; the account is still created.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let email = validate_email(&request.email).map_err(CoreError::from)?;
    validate_password(&request.password).map_err(CoreError::from)?;
    ensure_can_self_register(request.role)?;

    let company_name = request
        .company_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    let now = Utc::now();
    let token = Uuid::new_v4().to_string();
    let user = User {
        id: Uuid::new_v4().to_string(),
        email,
        password_hash: hash_password(&request.password)?,
        role: request.role,
        active: false,
        confirmation_token: Some(token.clone()),
        company_name,
        created_at: now,
        updated_at: now,
    };

    state.db.users().insert(&user).await?;

    if let Err(e) = state.mailer.send_confirmation(&user.email, &token) {
        warn!(error = %e, user_id = %user.id, "Failed to send confirmation email");
    }

    info!(user_id = %user.id, role = %user.role, "Account registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /auth/confirm/{token}`
pub async fn confirm(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<User>> {
    let user = state.db.users().confirm(&token).await?;
    Ok(Json(user))
}

/// `POST /auth/login`
///
/// Unknown email and wrong password produce the same 401.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let email = request.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(CoreError::from(ValidationError::Required {
            field: "email".to_string(),
        })
        .into());
    }
    if request.password.is_empty() {
        return Err(CoreError::from(ValidationError::Required {
            field: "password".to_string(),
        })
        .into());
    }

    let user = state
        .db
        .users()
        .get_by_email(&email)
        .await?
        .filter(|user| verify_password(&request.password, &user.password_hash))
        .ok_or_else(|| ApiError::unauthenticated("Invalid email or password"))?;

    if !user.active {
        return Err(ApiError::forbidden("Account is not confirmed"));
    }

    let token = state.jwt.issue(&user)?;
    info!(user_id = %user.id, "Login");

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt.lifetime_secs(),
        user,
    }))
}

/// `POST /auth/password`
pub async fn change_password(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(request): ApiJson<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    let user = state
        .db
        .users()
        .get_by_id(&identity.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthenticated("Account no longer exists"))?;

    if !verify_password(&request.current_password, &user.password_hash) {
        return Err(ApiError::validation("Current password is incorrect"));
    }
    validate_password(&request.new_password).map_err(CoreError::from)?;

    let hash = hash_password(&request.new_password)?;
    state.db.users().update_password(&user.id, &hash).await?;

    Ok(StatusCode::NO_CONTENT)
}
