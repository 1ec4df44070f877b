use crate::model::{OrderId, OrderStatus, PaymentStatus};
use crate::order_actor::OrderError;
use crate::payment::GatewayError;
use crate::points_actor::PointsError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Sorry, the restaurant is currently closed. Please try again during our opening hours.")]
    RestaurantClosed,

    #[error("{0} is currently unavailable")]
    Unavailable(String),

    #[error("Please choose an option for {0}")]
    OptionRequired(String),

    /// A selection the menu entry does not offer.
    #[error("{item} has no {kind} {id}")]
    UnknownChoice {
        item: String,
        kind: &'static str,
        id: String,
    },

    #[error("No cart line at position {0}")]
    NoSuchLine(usize),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Sign in to redeem points")]
    SignInRequired,

    #[error("Not enough points: requested {requested}, available {available}")]
    InsufficientPoints { requested: u32, available: u32 },

    #[error("Cannot redeem {requested} points on this order, at most {max}")]
    RedemptionTooLarge { requested: u32, max: u32 },

    #[error("Nothing left to charge to a card; pay cash or redeem fewer points")]
    NothingToCharge,

    /// The gateway's message, verbatim.
    #[error("{0}")]
    PaymentFailed(String),

    #[error("A payment for {0} is already in progress")]
    PaymentInFlight(OrderId),

    #[error("{order_id} is not awaiting payment (status {status}, payment {payment_status})")]
    NotAwaitingPayment {
        order_id: OrderId,
        status: OrderStatus,
        payment_status: PaymentStatus,
    },

    #[error("Order updates stopped before a decision was made")]
    FeedClosed,

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Points(#[from] PointsError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
