use crate::hours::HoursError;
use crate::menu_actor::MenuError;
use crate::order_actor::OrderError;
use crate::payment::GatewayError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Handler error, rendered as `{"error": message}` with a matching status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<HoursError> for ApiError {
    fn from(e: HoursError) -> Self {
        match e {
            HoursError::Store(_) => ApiError::Internal(e.to_string()),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(_) => ApiError::NotFound(e.to_string()),
            OrderError::IllegalTransition { .. }
            | OrderError::StaleStatus { .. }
            | OrderError::PaymentRequired(_)
            | OrderError::AlreadyPaid(_) => ApiError::Conflict(e.to_string()),
            OrderError::ValidationError(_) | OrderError::PointsNotDue(_) => {
                ApiError::BadRequest(e.to_string())
            }
            OrderError::Points(_) | OrderError::ActorCommunicationError(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<MenuError> for ApiError {
    fn from(e: MenuError) -> Self {
        match e {
            MenuError::NotFound(_) => ApiError::NotFound(e.to_string()),
            MenuError::CategoryInUse { .. } => ApiError::Conflict(e.to_string()),
            MenuError::UnknownCategory(_) | MenuError::ValidationError(_) => {
                ApiError::BadRequest(e.to_string())
            }
            MenuError::ActorCommunicationError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::AmountRequired => ApiError::BadRequest(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
