//! Error types for the Order actor.

use crate::model::OrderStatus;
use crate::points_actor::PointsError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The lifecycle graph has no edge `from -> to`.
    #[error("Illegal transition: {from} -> {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    /// The caller acted on a status that is no longer current.
    #[error("Stale status: expected {expected}, found {actual}")]
    StaleStatus {
        expected: OrderStatus,
        actual: OrderStatus,
    },

    #[error("Card payment has not been collected for {0}")]
    PaymentRequired(String),

    #[error("{0} is already paid")]
    AlreadyPaid(String),

    #[error("{0} has no settled payment to earn points on")]
    PointsNotDue(String),

    #[error("Order validation error: {0}")]
    ValidationError(String),

    #[error("Points ledger error: {0}")]
    Points(#[from] PointsError),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}
