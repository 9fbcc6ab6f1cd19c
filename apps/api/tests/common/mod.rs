//! Shared setup for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use mobilia_api::auth::hash_password;
use mobilia_api::mailer::{Mailer, MailerError};
use mobilia_api::{create_router, ApiConfig, AppState};
use mobilia_db::{Database, DbConfig};

pub const PASSWORD: &str = "s3cret-pass";
pub const ADMIN_EMAIL: &str = "root@mobilia.test";

/// Captures confirmation tokens instead of sending mail.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn token_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, token)| token.clone())
    }
}

impl Mailer for RecordingMailer {
    fn send_confirmation(&self, email: &str, token: &str) -> Result<(), MailerError> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), token.to_string()));
        Ok(())
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub mailer: Arc<RecordingMailer>,
    pub db: Database,
}

pub async fn setup() -> TestApp {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    db.users()
        .ensure_admin(ADMIN_EMAIL, &hash_password(PASSWORD).unwrap())
        .await
        .unwrap();

    let mailer = Arc::new(RecordingMailer::default());
    let config = ApiConfig {
        jwt_secret: "integration-test-secret".to_string(),
        ..Default::default()
    };
    let state = AppState::new(db.clone(), config, mailer.clone());
    let server = TestServer::new(create_router(state)).unwrap();

    TestApp { server, mailer, db }
}

impl TestApp {
    /// Registers without confirming. Returns the response body.
    pub async fn register(&self, email: &str, role: &str) -> Value {
        let response = self
            .server
            .post("/auth/register")
            .json(&json!({
                "email": email,
                "password": PASSWORD,
                "role": role,
                "companyName": "Nordic Living",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    pub async fn login(&self, email: &str) -> String {
        let response = self
            .server
            .post("/auth/login")
            .json(&json!({ "email": email, "password": PASSWORD }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["token"].as_str().unwrap().to_string()
    }

    /// Registers, confirms and logs in. Returns the bearer token.
    pub async fn signup(&self, email: &str, role: &str) -> String {
        self.register(email, role).await;
        let token = self.mailer.token_for(email).unwrap();
        self.server
            .get(&format!("/auth/confirm/{token}"))
            .await
            .assert_status_ok();
        self.login(email).await
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL).await
    }

    /// Publishes a product and returns its JSON.
    pub async fn publish(&self, token: &str, price_cents: i64, stock: i64) -> Value {
        let response = self
            .server
            .post("/products")
            .authorization_bearer(token)
            .json(&json!({
                "name": "Oslo Sofa",
                "description": "Three seater",
                "priceCents": price_cents,
                "stock": stock,
                "image": "/img/oslo.png",
                "category": "sofa",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    pub async fn stock_of(&self, product_id: &str) -> i64 {
        let body: Value = self
            .server
            .get(&format!("/products/{product_id}"))
            .await
            .json();
        body["stock"].as_i64().unwrap()
    }
}
