//! # Checkout
//!
//! Cart, pricing and the orchestration from cart to paid order.

pub mod cart;
pub mod error;
pub mod orchestrator;
pub mod pricing;

pub use cart::{Cart, CartItem};
pub use error::{CartError, CheckoutError};
pub use orchestrator::{
    CardCheckout, Checkout, CheckoutOutcome, CheckoutRequest, PaymentMethod, PlacedOrder,
};
pub use pricing::{quote, Fulfilment, OrderQuote, Redemption};
