//! Error types for the menu actors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MenuError {
    #[error("Menu entry not found: {0}")]
    NotFound(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("{category} still has {items} menu item(s)")]
    CategoryInUse { category: String, items: usize },

    #[error("Menu validation error: {0}")]
    ValidationError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for MenuError {
    fn from(msg: String) -> Self {
        MenuError::ActorCommunicationError(msg)
    }
}
