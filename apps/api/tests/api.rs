//! End-to-end tests against the full router with an in-memory database.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use tavola_api::auth::{hash_password, JwtManager};
use tavola_api::config::PricingMode;
use tavola_api::{router, ApiConfig, AppState};
use tavola_core::{Money, NewMenuItem, Role};
use tavola_db::{Database, DbConfig};

async fn seeded_db() -> Database {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();

    let hash = hash_password("admin123").unwrap();
    db.users()
        .insert("Admin", "admin", &hash, Role::Manager)
        .await
        .unwrap();

    let main = db.catalog().insert_category("Main", 0).await.unwrap();
    for (name, cents) in [("Veg Burger", 9_900), ("Paneer Roll", 12_900)] {
        db.catalog()
            .create_item(&NewMenuItem {
                name: name.to_string(),
                description: None,
                price: Money::from_cents(cents),
                category_id: Some(main),
            })
            .await
            .unwrap();
    }

    db
}

async fn app_with(config: ApiConfig) -> (Router, Database) {
    let db = seeded_db().await;
    let state = AppState::new(db.clone(), config).unwrap();
    (router(state), db)
}

async fn app() -> (Router, Database) {
    app_with(ApiConfig::default()).await
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "admin", "password": "admin123" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

fn burger_and_roll() -> Value {
    json!({
        "order_type": "dine-in",
        "table_no": 4,
        "items": [
            { "item_id": 1, "qty": 2, "price": "99.00" },
            { "item_id": 2, "qty": 1, "price": "129.00" }
        ]
    })
}

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let (app, _db) = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "admin", "password": "admin123" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["username"], "admin");
    assert_eq!(body["user"]["role"], "manager");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (app, _db) = app().await;

    let (wrong_status, wrong_body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "admin", "password": "nope" })),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "ghost", "password": "admin123" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["error"], "invalid credentials");
}

#[tokio::test]
async fn test_create_order_computes_total() {
    let (app, db) = app().await;
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(&token),
        Some(burger_and_roll()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], "327.00");
    assert!(body["orderId"].as_i64().is_some_and(|id| id > 0));
    assert_eq!(db.orders().count().await.unwrap(), 1);
    assert_eq!(db.orders().count_items().await.unwrap(), 2);
}

#[tokio::test]
async fn test_create_order_without_token() {
    let (app, db) = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        None,
        Some(burger_and_roll()),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "no token");
    assert_eq!(db.orders().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let (app, db) = app().await;

    let admin = db.users().find_by_username("admin").await.unwrap().unwrap();
    let jwt = JwtManager::new(&ApiConfig::default().jwt_secret, 12);
    let stale = jwt
        .issue_at(&admin, Utc::now() - Duration::hours(13))
        .unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(&stale),
        Some(burger_and_roll()),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid token");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_rejected() {
    let (app, db) = app().await;

    let admin = db.users().find_by_username("admin").await.unwrap().unwrap();
    let forged = JwtManager::new("some-other-secret", 12).issue(&admin).unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/items",
        Some(&forged),
        Some(json!({ "name": "Lassi", "price": "49.00" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid token");
}

#[tokio::test]
async fn test_empty_items_rejected() {
    let (app, db) = app().await;
    let token = login(&app).await;

    for items in [json!([]), json!(null), json!("burger")] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/orders",
            Some(&token),
            Some(json!({ "order_type": "takeaway", "items": items })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "items required");
    }

    assert_eq!(db.orders().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_line_rolls_back_whole_order() {
    let (app, db) = app().await;
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(&token),
        Some(json!({
            "items": [
                { "item_id": 1, "qty": 1, "price": "99.00" },
                { "item_id": 999, "qty": 1, "price": "10.00" }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "could not create order");
    assert_eq!(db.orders().count().await.unwrap(), 0);
    assert_eq!(db.orders().count_items().await.unwrap(), 0);
}

#[tokio::test]
async fn test_checkout_open_when_auth_disabled() {
    let config = ApiConfig {
        orders_require_auth: false,
        ..ApiConfig::default()
    };
    let (app, _db) = app_with(config).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        None,
        Some(burger_and_roll()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], "327.00");
}

#[tokio::test]
async fn test_catalog_pricing_ignores_client_price() {
    let config = ApiConfig {
        pricing_mode: PricingMode::Catalog,
        ..ApiConfig::default()
    };
    let (app, _db) = app_with(config).await;
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(&token),
        Some(json!({
            "items": [
                { "item_id": 1, "qty": 2, "price": "0.01" },
                { "item_id": 2, "price": "0.01" }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], "327.00");
}

#[tokio::test]
async fn test_list_and_get_orders() {
    let (app, _db) = app().await;
    let token = login(&app).await;

    let (_, first) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(&token),
        Some(burger_and_roll()),
    )
    .await;
    let (_, second) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(&token),
        Some(burger_and_roll()),
    )
    .await;

    let (status, list) = send(&app, Method::GET, "/api/orders", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], second["orderId"]);
    assert_eq!(list[1]["id"], first["orderId"]);

    let uri = format!("/api/orders/{}", first["orderId"]);
    let (status, detail) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["order"]["total"], "327.00");
    assert_eq!(detail["order"]["table_no"], "4");
    assert_eq!(detail["items"].as_array().unwrap().len(), 2);
    assert_eq!(detail["items"][0]["qty"], 2);
}

#[tokio::test]
async fn test_get_missing_order() {
    let (app, _db) = app().await;

    for uri in ["/api/orders/424242", "/api/orders/abc", "/api/orders/-1"] {
        let (status, body) = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not found");
    }
}

#[tokio::test]
async fn test_catalog_reads_are_public() {
    let (app, _db) = app().await;

    let (status, categories) = send(&app, Method::GET, "/api/categories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(categories[0]["name"], "Main");

    let (status, items) = send(&app, Method::GET, "/api/items", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = items
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|item| item["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Paneer Roll", "Veg Burger"]);
    assert_eq!(items[1]["price"], "99.00");
}

#[tokio::test]
async fn test_menu_writes_require_session() {
    let (app, _db) = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/items",
        None,
        Some(json!({ "name": "Lassi", "price": "49.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "no token");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/items/1",
        None,
        Some(json!({ "price": "1.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_update_item() {
    let (app, db) = app().await;
    let token = login(&app).await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/items",
        Some(&token),
        Some(json!({ "name": "Lassi", "price": "49.00", "category_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/items/{id}"),
        Some(&token),
        Some(json!({ "price": "55.50" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let item = db.catalog().get_item(id).await.unwrap().unwrap();
    assert_eq!(item.price, Money::from_cents(5_550));
    assert_eq!(item.name, "Lassi");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/items/9999",
        Some(&token),
        Some(json!({ "price": "1.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_item_rejects_bad_input() {
    let (app, _db) = app().await;
    let token = login(&app).await;

    for body in [
        json!({ "name": "", "price": "10.00" }),
        json!({ "name": "Lassi", "price": "-1.00" }),
        json!({ "name": "Lassi", "price": "1.005" }),
    ] {
        let (status, _) = send(&app, Method::POST, "/api/items", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_create_item_with_unknown_category() {
    let (app, db) = app().await;
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/items",
        Some(&token),
        Some(json!({ "name": "Lassi", "price": "49.00", "category_id": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown category");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/items/1",
        Some(&token),
        Some(json!({ "category_id": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown category");

    let item = db.catalog().get_item(1).await.unwrap().unwrap();
    assert_eq!(item.category_id, Some(1));
}

#[tokio::test]
async fn test_health() {
    let (app, _db) = app().await;

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "serving");
    assert_eq!(body["database"], true);
}
