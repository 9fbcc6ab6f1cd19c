//! Products, reviews and resale listings over HTTP.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::setup;

#[tokio::test]
async fn test_only_manufacturers_publish() {
    let app = setup().await;
    let buyer = app.signup("buyer@example.com", "user").await;

    let response = app
        .server
        .post("/products")
        .authorization_bearer(&buyer)
        .json(&json!({
            "name": "Oslo Sofa",
            "priceCents": 100,
            "stock": 1,
            "image": "/img/oslo.png",
            "category": "sofa",
        }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["code"], "FORBIDDEN");

    let maker = app.signup("maker@example.com", "manufacturer").await;
    let product = app.publish(&maker, 4999, 10).await;
    assert_eq!(product["companyName"], "Nordic Living");
    assert_eq!(product["averageRating"], 0.0);
    assert_eq!(product["totalRatings"], 0);
}

#[tokio::test]
async fn test_publish_validation() {
    let app = setup().await;
    let maker = app.signup("maker@example.com", "manufacturer").await;

    app.server
        .post("/products")
        .authorization_bearer(&maker)
        .json(&json!({
            "name": "Oslo Sofa",
            "priceCents": -1,
            "stock": 1,
            "image": "/img/oslo.png",
            "category": "sofa",
        }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Missing required fields
    app.server
        .post("/products")
        .authorization_bearer(&maker)
        .json(&json!({ "name": "Oslo Sofa" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_and_filter_products() {
    let app = setup().await;
    let maker = app.signup("maker@example.com", "manufacturer").await;
    let sofa = app.publish(&maker, 4999, 10).await;

    app.server
        .post("/products")
        .authorization_bearer(&maker)
        .json(&json!({
            "name": "Bergen Table",
            "priceCents": 2500,
            "stock": 4,
            "image": "/img/bergen.png",
            "category": "Table",
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let all: Vec<Value> = app.server.get("/products").await.json();
    assert_eq!(all.len(), 2);

    let tables: Vec<Value> = app
        .server
        .get("/products")
        .add_query_param("category", "TABLE")
        .await
        .json();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0]["name"], "Bergen Table");

    let limited: Vec<Value> = app
        .server
        .get("/products")
        .add_query_param("limit", 1)
        .await
        .json();
    assert_eq!(limited.len(), 1);

    let by_owner: Vec<Value> = app
        .server
        .get("/products")
        .add_query_param("owner", sofa["ownerId"].as_str().unwrap())
        .await
        .json();
    assert_eq!(by_owner.len(), 2);

    app.server
        .get("/products/does-not-exist")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_and_delete_require_owner() {
    let app = setup().await;
    let maker = app.signup("maker@example.com", "manufacturer").await;
    let rival = app.signup("rival@example.com", "manufacturer").await;
    let product = app.publish(&maker, 4999, 10).await;
    let id = product["id"].as_str().unwrap();

    app.server
        .put(&format!("/products/{id}"))
        .authorization_bearer(&rival)
        .json(&json!({ "priceCents": 1 }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let updated: Value = app
        .server
        .put(&format!("/products/{id}"))
        .authorization_bearer(&maker)
        .json(&json!({ "priceCents": 5999, "stock": 3 }))
        .await
        .json();
    assert_eq!(updated["priceCents"], 5999);
    assert_eq!(updated["stock"], 3);
    assert_eq!(updated["name"], "Oslo Sofa");

    app.server
        .delete(&format!("/products/{id}"))
        .authorization_bearer(&rival)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let admin = app.admin_token().await;
    app.server
        .delete(&format!("/products/{id}"))
        .authorization_bearer(&admin)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .get(&format!("/products/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reviews_update_rating() {
    let app = setup().await;
    let maker = app.signup("maker@example.com", "manufacturer").await;
    let first = app.signup("first@example.com", "user").await;
    let second = app.signup("second@example.com", "user").await;
    let product = app.publish(&maker, 4999, 10).await;
    let id = product["id"].as_str().unwrap();

    app.server
        .post(&format!("/products/{id}/reviews"))
        .authorization_bearer(&first)
        .json(&json!({ "rating": 4, "description": "Comfortable" }))
        .await
        .assert_status(StatusCode::CREATED);

    app.server
        .post(&format!("/products/{id}/reviews"))
        .authorization_bearer(&second)
        .json(&json!({ "rating": 2, "description": "Scratched on arrival" }))
        .await
        .assert_status(StatusCode::CREATED);

    let reloaded: Value = app.server.get(&format!("/products/{id}")).await.json();
    assert_eq!(reloaded["averageRating"], 3.0);
    assert_eq!(reloaded["totalRatings"], 2);

    let reviews: Vec<Value> = app
        .server
        .get(&format!("/products/{id}/reviews"))
        .await
        .json();
    assert_eq!(reviews.len(), 2);

    // One review per user and product
    let duplicate = app
        .server
        .post(&format!("/products/{id}/reviews"))
        .authorization_bearer(&first)
        .json(&json!({ "rating": 5, "description": "Changed my mind" }))
        .await;
    duplicate.assert_status(StatusCode::BAD_REQUEST);

    let reloaded: Value = app.server.get(&format!("/products/{id}")).await.json();
    assert_eq!(reloaded["totalRatings"], 2);
}

#[tokio::test]
async fn test_review_input_rules() {
    let app = setup().await;
    let maker = app.signup("maker@example.com", "manufacturer").await;
    let buyer = app.signup("buyer@example.com", "user").await;
    let product = app.publish(&maker, 4999, 10).await;
    let id = product["id"].as_str().unwrap();

    app.server
        .post(&format!("/products/{id}/reviews"))
        .authorization_bearer(&buyer)
        .json(&json!({ "rating": 6, "description": "Too good" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .post("/products/missing/reviews")
        .authorization_bearer(&buyer)
        .json(&json!({ "rating": 3, "description": "Where is it" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.server
        .get("/products/missing/reviews")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resell_snapshot_and_rules() {
    let app = setup().await;
    let maker = app.signup("maker@example.com", "manufacturer").await;
    let seller = app.signup("seller@example.com", "seller").await;
    let buyer = app.signup("buyer@example.com", "user").await;
    let product = app.publish(&maker, 4999, 5).await;
    let id = product["id"].as_str().unwrap();

    app.server
        .post("/resellProducts")
        .authorization_bearer(&buyer)
        .json(&json!({ "productId": id, "quantity": 1 }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = app
        .server
        .post("/resellProducts")
        .authorization_bearer(&seller)
        .json(&json!({ "productId": id, "quantity": 2 }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let listing: Value = response.json();
    assert_eq!(listing["priceCents"], 4999);
    assert_eq!(listing["quantity"], 2);
    assert_eq!(app.stock_of(id).await, 3);

    app.server
        .post("/resellProducts")
        .authorization_bearer(&seller)
        .json(&json!({ "productId": id, "quantity": 4 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Later catalog edits do not touch the listing
    app.server
        .put(&format!("/products/{id}"))
        .authorization_bearer(&maker)
        .json(&json!({ "priceCents": 9999, "name": "Oslo Sofa XL" }))
        .await
        .assert_status_ok();

    let listing_id = listing["id"].as_str().unwrap();
    let reloaded: Value = app
        .server
        .get(&format!("/resellProducts/{listing_id}"))
        .await
        .json();
    assert_eq!(reloaded["priceCents"], 4999);
    assert_eq!(reloaded["name"], "Oslo Sofa");

    let mine: Vec<Value> = app
        .server
        .get("/resellProducts/mine")
        .authorization_bearer(&seller)
        .await
        .json();
    assert_eq!(mine.len(), 1);

    app.server
        .delete(&format!("/resellProducts/{listing_id}"))
        .authorization_bearer(&buyer)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .delete(&format!("/resellProducts/{listing_id}"))
        .authorization_bearer(&seller)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let all: Vec<Value> = app.server.get("/resellProducts").await.json();
    assert!(all.is_empty());
}
