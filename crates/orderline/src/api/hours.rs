//! GET  /api/restaurant-hours  - all day rows
//! POST /api/restaurant-hours  - replace the whole table
//! GET  /api/restaurant-status - open now, today's hours, next opening

use crate::api::{ApiError, ApiState};
use crate::clock;
use crate::hours::{RestaurantHour, RestaurantStatus};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct ReplaceHours {
    pub hours: Option<Vec<RestaurantHour>>,
}

pub async fn list_hours(State(state): State<ApiState>) -> Result<Json<Vec<RestaurantHour>>, ApiError> {
    Ok(Json(state.hours.list().await?))
}

pub async fn replace_hours(
    State(state): State<ApiState>,
    payload: Result<Json<ReplaceHours>, JsonRejection>,
) -> Result<Json<Vec<RestaurantHour>>, ApiError> {
    let hours = payload
        .ok()
        .and_then(|Json(body)| body.hours)
        .ok_or_else(|| ApiError::BadRequest("Invalid payload".to_string()))?;
    Ok(Json(state.hours.replace(hours).await?))
}

pub async fn restaurant_status(State(state): State<ApiState>) -> Json<RestaurantStatus> {
    Json(state.hours.status_at(clock::local_now()).await)
}
