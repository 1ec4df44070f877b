//! GET  /api/orders             - all orders, newest first
//! GET  /api/orders/{id}        - one order
//! POST /api/orders/{id}/status - move an order along its lifecycle

use crate::api::{ApiError, ApiState};
use crate::model::{Order, OrderId, OrderQuery, OrderStatus};
use axum::extract::{Path, State};
use axum::Json;
use orderline_actor::ActorClient;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: OrderStatus,
    /// Rejects the change unless the order is still in this status.
    #[serde(default)]
    pub expected: Option<OrderStatus>,
}

fn parse_id(raw: &str) -> Result<OrderId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("Order not found: {raw}")))
}

pub async fn list_orders(State(state): State<ApiState>) -> Result<Json<Vec<Order>>, ApiError> {
    let mut orders = state.orders.list(OrderQuery::all()).await?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(orders))
}

pub async fn get_order(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.orders.get_required(id).await?))
}

pub async fn change_status(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(change): Json<StatusChange>,
) -> Result<Json<Order>, ApiError> {
    let id = parse_id(&id)?;
    let order = state
        .orders
        .transition(id, change.status, change.expected)
        .await?;
    tracing::info!(order_id = %order.id, status = %order.status, "Order status changed");
    Ok(Json(order))
}
