//! HTTP handlers, one module per resource.
//!
//! Handlers stay thin: take the caller's [`mobilia_core::Identity`] where
//! needed, call into `mobilia-db`, and let [`crate::ApiError`] pick the
//! status code.

pub mod auth;
pub mod health;
pub mod orders;
pub mod products;
pub mod resell;
pub mod reviews;
pub mod users;

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// `axum::Json` whose rejection is reported as an [`ApiError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` whose rejection is reported as an [`ApiError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
