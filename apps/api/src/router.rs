//! Route table and middleware.

use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, health, orders, products, resell, reviews, users};
use crate::AppState;

/// Create application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let timeout_secs = state.config.request_timeout_secs;

    let router = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Accounts
        .route("/auth/register", post(auth::register))
        .route("/auth/confirm/{token}", get(auth::confirm))
        .route("/auth/login", post(auth::login))
        .route("/auth/password", post(auth::change_password))
        .route("/users", get(users::list_users))
        .route("/users/{id}", axum::routing::delete(users::delete_user))
        // Catalog
        .route("/products", get(products::list_products).post(products::create_product))
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/products/{id}/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        // Orders
        .route("/order", get(orders::list_orders))
        .route("/order/place", post(orders::place_order))
        .route("/order/{id}", get(orders::get_order))
        .route("/order/{id}/status", patch(orders::update_order_status))
        // Resale listings
        .route("/resellProducts", get(resell::list_listings).post(resell::create_listing))
        .route("/resellProducts/mine", get(resell::my_listings))
        .route(
            "/resellProducts/{id}",
            get(resell::get_listing).delete(resell::delete_listing),
        );

    let router = if timeout_secs > 0 {
        router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(timeout_secs),
        ))
    } else {
        router
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum_test::TestServer;
    use mobilia_db::{Database, DbConfig};

    use super::*;
    use crate::mailer::LogMailer;
    use crate::ApiConfig;

    async fn server(request_timeout_secs: u64) -> TestServer {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = ApiConfig {
            request_timeout_secs,
            ..Default::default()
        };
        let mailer = Arc::new(LogMailer::new(config.public_base_url.clone()));
        TestServer::new(create_router(AppState::new(db, config, mailer))).unwrap()
    }

    #[tokio::test]
    async fn test_routes_with_and_without_timeout() {
        for secs in [0, 5] {
            let server = server(secs).await;
            server.get("/health").await.assert_status_ok();
            server
                .get("/no-such-route")
                .await
                .assert_status(StatusCode::NOT_FOUND);
        }
    }
}
