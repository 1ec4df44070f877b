//! # HTTP API
//!
//! JSON routes for the admin screens and the payment form. Errors are `{"error": "..."}`.

pub mod error;
pub mod hours;
pub mod menu;
pub mod orders;
pub mod payments;

pub use error::ApiError;

use crate::clients::{MenuClient, OrderClient};
use crate::hours::HoursService;
use crate::payment::PaymentGateway;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

#[derive(Clone)]
pub struct ApiState {
    pub orders: OrderClient,
    pub menu: MenuClient,
    pub hours: Arc<HoursService>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub currency: String,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/api/restaurant-hours",
            get(hours::list_hours).post(hours::replace_hours),
        )
        .route("/api/restaurant-status", get(hours::restaurant_status))
        .route("/api/menu", get(menu::storefront))
        .route(
            "/api/menu-items/{id}/availability",
            post(menu::set_availability),
        )
        .route(
            "/api/create-payment-intent",
            post(payments::create_payment_intent),
        )
        .route("/api/orders", get(orders::list_orders))
        .route("/api/orders/{id}", get(orders::get_order))
        .route("/api/orders/{id}/status", post(orders::change_status))
        .with_state(state)
}
