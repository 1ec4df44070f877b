//! POST /api/create-payment-intent

use crate::api::{ApiError, ApiState};
use crate::payment::IntentRequest;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct CreateIntent {
    /// Minor currency units.
    pub amount: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentCreated {
    pub client_secret: String,
}

pub async fn create_payment_intent(
    State(state): State<ApiState>,
    payload: Result<Json<CreateIntent>, JsonRejection>,
) -> Result<Json<IntentCreated>, ApiError> {
    let amount = payload
        .ok()
        .and_then(|Json(body)| body.amount)
        .unwrap_or_default();
    let request = IntentRequest::new(amount, state.currency.clone())?;
    let intent = state.gateway.create_intent(request).await?;
    Ok(Json(IntentCreated {
        client_secret: intent.client_secret,
    }))
}
