//! Custom actions for the Order actor.
//!
//! Every status or payment mutation of an order is one of these actions; there is no
//! other write path. Each returns the order as committed.

use crate::model::{OrderStatus, PaymentStatus};

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Move to `to` along the lifecycle graph.
    ///
    /// With `expected: Some(s)` the move only happens if the order is still in `s`.
    /// Denying or cancelling an uncharged card order returns its redeemed points.
    Transition {
        to: OrderStatus,
        expected: Option<OrderStatus>,
    },
    /// Card payment captured: `accepted` -> `processing`, `payment_status = paid`.
    ///
    /// On an order cancelled mid-charge the payment is still recorded, status unchanged,
    /// so the charge can be refunded.
    ConfirmPayment { payment_intent_id: String },
    /// Card payment attempt failed; the order stays `accepted` and can be retried.
    FailPayment { reason: String },
    /// Back-office override of the payment status. `paid` cannot be overridden.
    SetPaymentStatus(PaymentStatus),
    /// Write the earn entry for a settled order if it is still missing.
    AwardPoints,
}
