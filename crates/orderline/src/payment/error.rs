use thiserror::Error;

/// Failures reported by a payment gateway. Messages are shown to the customer as-is.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("Amount is required")]
    AmountRequired,

    /// The card was refused; carries the gateway's message.
    #[error("{0}")]
    Declined(String),

    #[error("No such payment intent: {0}")]
    UnknownIntent(String),

    #[error("Payment gateway unavailable: {0}")]
    Unavailable(String),
}
