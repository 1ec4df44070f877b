//! GET  /api/menu                           - categories and orderable items
//! POST /api/menu-items/{id}/availability  - take an item off or back on the menu

use crate::api::{ApiError, ApiState};
use crate::model::{Menu, MenuItem, MenuItemId};
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Availability {
    pub available: bool,
}

pub async fn storefront(State(state): State<ApiState>) -> Result<Json<Menu>, ApiError> {
    Ok(Json(state.menu.storefront().await?))
}

pub async fn set_availability(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(body): Json<Availability>,
) -> Result<Json<MenuItem>, ApiError> {
    let item = state
        .menu
        .set_available(MenuItemId(id), body.available)
        .await?;
    Ok(Json(item))
}
