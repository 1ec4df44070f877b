//! Error types for the points actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PointsError {
    #[error("Insufficient points: requested {requested}, available {available}")]
    InsufficientPoints { requested: u32, available: u32 },

    #[error("Invalid points amount: {0}")]
    InvalidAmount(u32),

    #[error("No redemption to reverse for {0}")]
    NothingToReverse(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for PointsError {
    fn from(msg: String) -> Self {
        PointsError::ActorCommunicationError(msg)
    }
}
