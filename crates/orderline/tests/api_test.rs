use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use orderline::api::{self, ApiState};
use orderline::config::AppConfig;
use orderline::hours::{MemoryHoursStore, RestaurantHour};
use orderline::lifecycle::OrderSystem;
use orderline::model::{CategoryCreate, DineInOrder, MenuItemCreate, OrderLineItem, OrderType};
use orderline::payment::{PaymentGateway, SandboxGateway};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(system: &OrderSystem, gateway: Arc<dyn PaymentGateway>) -> Router {
    api::router(ApiState {
        orders: system.orders.clone(),
        menu: system.menu.clone(),
        hours: system.hours.clone(),
        gateway,
        currency: "usd".to_string(),
    })
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn week(open: &str, close: &str) -> Value {
    let days: Vec<Value> = (0..7)
        .map(|day| {
            json!({
                "day_of_week": day,
                "is_open": day != 1,
                "open_time": open,
                "close_time": close,
            })
        })
        .collect();
    json!({ "hours": days })
}

#[tokio::test]
async fn test_hours_round_trip() {
    let system = OrderSystem::with_hours_store(
        &AppConfig::default(),
        Arc::new(MemoryHoursStore::new()),
    );
    let app = app(&system, Arc::new(SandboxGateway::new()));

    let (status, body) = send(app.clone(), "POST", "/api/restaurant-hours", Some(week("11:00", "22:30:00"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 7);

    let (status, body) = send(app.clone(), "GET", "/api/restaurant-hours", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows: Vec<RestaurantHour> = serde_json::from_value(body).unwrap();
    assert_eq!(rows[0].day_of_week, 0);
    assert!(!rows[1].is_open);
    assert_eq!(
        serde_json::to_value(&rows[0]).unwrap()["open_time"],
        json!("11:00:00")
    );

    let (status, body) = send(app, "GET", "/api/restaurant-status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["is_open"].is_boolean());
    assert!(body["next_opening"].is_string());
}

#[tokio::test]
async fn test_invalid_hours_leave_table_untouched() {
    let system = OrderSystem::new(&AppConfig::default());
    let app = app(&system, Arc::new(SandboxGateway::new()));
    let (status, _) = send(app.clone(), "POST", "/api/restaurant-hours", Some(week("09:00", "17:00"))).await;
    assert_eq!(status, StatusCode::OK);

    for payload in [
        json!({ "hours": [] }),
        json!({ "days": [] }),
        json!({ "hours": [{ "day_of_week": 9, "is_open": false, "open_time": null, "close_time": null }] }),
        json!({ "hours": [{ "day_of_week": 2, "is_open": true, "open_time": null, "close_time": null }] }),
    ] {
        let (status, body) = send(app.clone(), "POST", "/api/restaurant-hours", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    let (_, body) = send(app, "GET", "/api/restaurant-hours", None).await;
    assert_eq!(body.as_array().unwrap().len(), 7);
    assert_eq!(body[3]["open_time"], json!("09:00:00"));
}

#[tokio::test]
async fn test_create_payment_intent() {
    let system = OrderSystem::new(&AppConfig::default());
    let gateway = Arc::new(SandboxGateway::new());
    let app = app(&system, gateway.clone());

    let (status, body) = send(app.clone(), "POST", "/api/create-payment-intent", Some(json!({ "amount": 2049 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["clientSecret"].as_str().unwrap().ends_with("_secret"));
    assert_eq!(gateway.intents_created(), 1);

    for payload in [json!({}), json!({ "amount": 0 }), json!({ "amount": -5 })] {
        let (status, body) = send(app.clone(), "POST", "/api/create-payment-intent", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Amount is required" }));
    }
    assert_eq!(gateway.intents_created(), 1);

    let down = self::app(&system, Arc::new(SandboxGateway::unavailable("maintenance")));
    let (status, body) = send(down, "POST", "/api/create-payment-intent", Some(json!({ "amount": 100 }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("maintenance"));
}

#[tokio::test]
async fn test_order_status_route() {
    let system = OrderSystem::new(&AppConfig::default());
    let app = app(&system, Arc::new(SandboxGateway::new()));
    let id = system
        .orders
        .punch_dine_in(DineInOrder {
            user_id: None,
            order_type: OrderType::Pickup,
            full_name: "Counter".to_string(),
            phone: "555-0199".to_string(),
            metadata: vec![OrderLineItem {
                menu_item_id: "fries".to_string(),
                name: "Fries".to_string(),
                quantity: 1,
                price: 3.5,
                image_url: None,
                options: Default::default(),
            }],
        })
        .await
        .unwrap();
    let uri = format!("/api/orders/{}/status", id);

    let (status, body) = send(app.clone(), "POST", &uri, Some(json!({ "status": "cooking", "expected": "punched" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("cooking"));

    // Stale: someone already moved it on.
    let (status, _) = send(app.clone(), "POST", &uri, Some(json!({ "status": "ready", "expected": "punched" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Illegal: no going back.
    let (status, _) = send(app.clone(), "POST", &uri, Some(json!({ "status": "punched" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(app.clone(), "GET", &format!("/api/orders/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("cooking"));

    let (status, body) = send(app.clone(), "GET", "/api/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(app, "POST", "/api/orders/order_404/status", Some(json!({ "status": "ready" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_menu_hides_unavailable_items() {
    let system = OrderSystem::new(&AppConfig::default());
    let app = app(&system, Arc::new(SandboxGateway::new()));
    let burgers = system
        .menu
        .add_category(CategoryCreate {
            name: "Burgers".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let classic = system
        .menu
        .add_item(MenuItemCreate::new("Classic", 8.0).in_category(burgers))
        .await
        .unwrap();
    system
        .menu
        .add_item(MenuItemCreate::new("Bacon Double", 11.0).in_category(burgers))
        .await
        .unwrap();

    let uri = format!("/api/menu-items/{}/availability", classic);
    let (status, body) = send(app.clone(), "POST", &uri, Some(json!({ "available": false }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], json!(false));

    let (status, body) = send(app.clone(), "GET", "/api/menu", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"][0]["name"], json!("Burgers"));
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bacon Double"]);

    let (status, _) = send(app, "POST", "/api/menu-items/item_404/availability", Some(json!({ "available": true }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
