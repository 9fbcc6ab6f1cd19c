//! # Mobilia API
//!
//! REST server for the furniture marketplace.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         API Modules                                     │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  auth          │  │  handlers      │  │  error                     ││
//! │  │                │  │                │  │                            ││
//! │  │ • JwtManager   │  │ • auth / users │  │ • ApiError {code, message} ││
//! │  │ • argon2       │  │ • products     │  │ • IntoResponse             ││
//! │  │ • Identity     │  │ • reviews      │  │                            ││
//! │  │   extractor    │  │ • orders       │  │                            ││
//! │  │                │  │ • resell       │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  AppState (cloned per request)                                    │  │
//! │  │  Database pool · JwtManager · Mailer · ApiConfig                  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ApiConfig`]; every field can be set through a
//! `MOBILIA_`-prefixed environment variable.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod router;

use std::sync::Arc;

use mobilia_db::Database;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use router::create_router;

use crate::auth::JwtManager;
use crate::mailer::Mailer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig, mailer: Arc<dyn Mailer>) -> Self {
        let jwt = JwtManager::new(&config.jwt_secret, config.jwt_lifetime_secs);
        AppState {
            db,
            jwt: Arc::new(jwt),
            mailer,
            config: Arc::new(config),
        }
    }
}
