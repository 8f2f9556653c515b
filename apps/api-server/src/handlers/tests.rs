use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use diner_core::RepoError;
use diner_core::domain::{NewOrder, Order, OrderStatus, PhoneNumber};
use diner_core::ports::OrderRepository;
use diner_infra::RateLimitConfig;

use super::{configure_routes, json_config, path_config};
use crate::state::AppState;

macro_rules! test_app {
    ($state:expr) => {{
        let state: AppState = $state;
        test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .app_data(json_config())
                .app_data(path_config())
                .configure(|cfg| configure_routes(cfg, &state)),
        )
        .await
    }};
}

fn state() -> AppState {
    AppState::in_memory(RateLimitConfig::default())
}

fn limited_to(max_requests: u32) -> AppState {
    AppState::in_memory(RateLimitConfig {
        max_requests,
        window: Duration::from_secs(900),
    })
}

fn order_body(phone: &str) -> Value {
    json!({
        "customerName": "Asha Rao",
        "phoneNumber": phone,
        "items": [
            {"_id": "64f1c2", "name": "Butter Chicken", "price": 399, "quantity": 1},
            {"_id": "64f1c3", "name": "Butter Naan", "price": 69, "quantity": 2}
        ],
        "totalAmount": 537,
        "notes": " less spicy "
    })
}

fn place_order(phone: &str, client: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/orders")
        .peer_addr(client.parse().unwrap())
        .set_json(order_body(phone))
}

fn menu_body() -> Value {
    json!({
        "name": "Samosa",
        "description": "Crispy pastry filled with spiced potatoes",
        "price": 99,
        "category": "Appetizers"
    })
}

/// Order store whose backend is unreachable.
struct DownOrderRepository;

#[async_trait]
impl OrderRepository for DownOrderRepository {
    async fn create(&self, _order: NewOrder) -> Result<Order, RepoError> {
        Err(RepoError::Connection("connection refused".to_string()))
    }

    async fn list_by_phone(&self, _phone: &PhoneNumber) -> Result<Vec<Order>, RepoError> {
        Err(RepoError::Connection("connection refused".to_string()))
    }

    async fn update_status(&self, _id: i32, _status: OrderStatus) -> Result<Order, RepoError> {
        Err(RepoError::Connection("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), RepoError> {
        Err(RepoError::Connection("connection refused".to_string()))
    }
}

#[actix_rt::test]
async fn test_place_order_returns_stored_record() {
    let app = test_app!(state());

    let resp = test::call_service(
        &app,
        place_order("(555) 123-4567", "203.0.113.7:4000").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["phoneNumber"], "555-123-4567");
    assert_eq!(body["data"]["status"], "PENDING");
    assert_eq!(body["data"]["notes"], "less spicy");
    assert_eq!(body["data"]["items"][1]["_id"], "64f1c3");
}

#[actix_rt::test]
async fn test_invalid_order_lists_every_field() {
    let app = test_app!(state());

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .set_json(json!({
            "customerName": "J",
            "phoneNumber": "1111111111",
            "items": [],
            "totalAmount": -1
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["customerName", "phoneNumber", "items", "totalAmount"]);
}

#[actix_rt::test]
async fn test_malformed_json_is_bad_request() {
    let app = test_app!(state());

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"customerName\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_orders_by_phone_newest_first() {
    let app = test_app!(state());

    for phone in ["555-123-4567", "212-555-0199", "555.123.4567"] {
        let resp = test::call_service(
            &app,
            place_order(phone, "203.0.113.7:4000").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/orders/5551234567")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 1]);
}

#[actix_rt::test]
async fn test_orders_by_invalid_phone() {
    let app = test_app!(state());

    let req = test::TestRequest::get().uri("/api/orders/12345").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "phoneNumber");
}

#[actix_rt::test]
async fn test_health_is_not_read_as_phone_number() {
    let app = test_app!(state());

    let req = test::TestRequest::get().uri("/api/orders/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[actix_rt::test]
async fn test_update_status() {
    let app = test_app!(state());
    test::call_service(
        &app,
        place_order("5551234567", "203.0.113.7:4000").to_request(),
    )
    .await;

    let req = test::TestRequest::put()
        .uri("/api/orders/1")
        .set_json(json!({"status": "completed"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "COMPLETED");

    let req = test::TestRequest::put()
        .uri("/api/orders/99")
        .set_json(json!({"status": "CANCELLED"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_update_status_rejects_bad_id_and_status() {
    let app = test_app!(state());

    let req = test::TestRequest::put()
        .uri("/api/orders/abc")
        .set_json(json!({"status": "SHIPPED"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "id");
    assert_eq!(body["errors"][1]["field"], "status");
}

#[actix_rt::test]
async fn test_order_placement_is_rate_limited_per_address() {
    let app = test_app!(limited_to(2));

    for _ in 0..2 {
        let resp = test::call_service(
            &app,
            place_order("5551234567", "203.0.113.7:4000").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert!(resp.headers().contains_key("x-ratelimit-remaining"));
    }

    let resp = test::call_service(
        &app,
        place_order("5551234567", "203.0.113.7:4000").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key("retry-after"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["detail"],
        "Too many orders from this address, please try again after 15 minutes"
    );

    // Other addresses and other routes are unaffected
    let resp = test::call_service(
        &app,
        place_order("5551234567", "198.51.100.20:4000").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/orders/5551234567")
        .peer_addr("203.0.113.7:4000".parse().unwrap())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_forwarded_for_does_not_change_the_key() {
    let app = test_app!(state());

    for i in 1..=11 {
        let req = place_order("5551234567", "203.0.113.7:4000")
            .insert_header(("X-Forwarded-For", format!("10.0.0.{i}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let expected = if i <= 10 {
            StatusCode::CREATED
        } else {
            StatusCode::TOO_MANY_REQUESTS
        };
        assert_eq!(resp.status(), expected, "attempt {i}");
    }
}

#[actix_rt::test]
async fn test_trusted_proxy_keys_on_forwarded_address() {
    let mut state = limited_to(1);
    state.trust_proxy = true;
    let app = test_app!(state);

    for client in ["10.0.0.1", "10.0.0.2"] {
        let req = place_order("5551234567", "192.0.2.1:443")
            .insert_header(("X-Forwarded-For", client))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = place_order("5551234567", "192.0.2.1:443")
        .insert_header(("X-Forwarded-For", "10.0.0.1"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[actix_rt::test]
async fn test_limit_is_checked_before_validation() {
    let app = test_app!(limited_to(2));

    for _ in 0..2 {
        let resp = test::call_service(
            &app,
            place_order("5551234567", "203.0.113.7:4000").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .peer_addr("203.0.113.7:4000".parse().unwrap())
        .set_json(json!({"customerName": "J"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let body: Value = test::read_body_json(resp).await;
    assert!(body.get("errors").is_none());
    assert_eq!(body["status"], 429);
}

#[actix_rt::test]
async fn test_other_methods_do_not_use_up_the_limit() {
    let app = test_app!(limited_to(1));

    for _ in 0..3 {
        let req = test::TestRequest::get()
            .uri("/api/orders")
            .peer_addr("203.0.113.7:4000".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_ne!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    let resp = test::call_service(
        &app,
        place_order("5551234567", "203.0.113.7:4000").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_rt::test]
async fn test_wrong_typed_order_fields_are_field_errors() {
    let app = test_app!(state());

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .set_json(json!({
            "customerName": 42,
            "phoneNumber": "5551234567",
            "items": [],
            "totalAmount": -5
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["customerName", "items", "totalAmount"]);
}

#[actix_rt::test]
async fn test_store_outage_is_generic_500() {
    let mut state = state();
    state.orders = Arc::new(DownOrderRepository);
    let app = test_app!(state);

    let resp = test::call_service(
        &app,
        place_order("5551234567", "203.0.113.7:4000").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = test::read_body(resp).await;
    assert!(!String::from_utf8_lossy(&body).contains("connection refused"));

    let req = test::TestRequest::get().uri("/api/orders/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "unhealthy");
}

#[actix_rt::test]
async fn test_menu_lifecycle() {
    let app = test_app!(state());

    let req = test::TestRequest::post()
        .uri("/api/menu")
        .set_json(menu_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["_id"].as_str().unwrap().to_string();
    assert_eq!(created["isAvailable"], true);

    let req = test::TestRequest::put()
        .uri(&format!("/api/menu/{id}"))
        .set_json(json!({"price": 109}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["price"], 109.0);
    assert_eq!(updated["name"], "Samosa");

    let req = test::TestRequest::get().uri("/api/menu").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/menu/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Menu item deleted successfully");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/menu/{id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_menu_categories_in_menu_order() {
    let app = test_app!(state());

    for (name, category, available) in [
        ("Gulab Jamun", "Desserts", true),
        ("Samosa", "Appetizers", true),
        ("Palak Paneer", "Main Courses", true),
        ("Off Menu", "Sides", false),
    ] {
        let mut body = menu_body();
        body["name"] = json!(name);
        body["category"] = json!(category);
        body["isAvailable"] = json!(available);
        let req = test::TestRequest::post()
            .uri("/api/menu")
            .set_json(body)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/api/menu/categories").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let text = String::from_utf8_lossy(&body);
    let appetizers = text.find("\"Appetizers\"").unwrap();
    let mains = text.find("\"Main Courses\"").unwrap();
    let desserts = text.find("\"Desserts\"").unwrap();
    assert!(appetizers < mains && mains < desserts);
    assert!(!text.contains("Off Menu"));
}

#[actix_rt::test]
async fn test_menu_rejects_invalid_items() {
    let app = test_app!(state());

    let req = test::TestRequest::post()
        .uri("/api/menu")
        .set_json(json!({"name": "Soup", "price": -3, "category": "Soups"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);

    let req = test::TestRequest::put()
        .uri("/api/menu/000000000000000000000063")
        .set_json(json!({"price": 10}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
