//! Custom actions for the points actor.
//!
//! Every mutating action appends exactly one [`LedgerEntry`](crate::model::LedgerEntry)
//! or, when the same order already has an entry of that kind, returns the existing one.

use crate::model::{LedgerEntry, OrderId};

#[derive(Debug, Clone)]
pub enum PointsAction {
    /// Credit points earned by a settled order.
    Earn { order_id: OrderId, points: u32 },
    /// Debit points redeemed against an order.
    ///
    /// # Errors
    /// Fails with `InsufficientPoints` when the balance is lower than `points`.
    Redeem { order_id: OrderId, points: u32 },
    /// Give back a redemption whose order was never created or will never be charged.
    Reverse { order_id: OrderId },
    /// Current balance, read-only.
    Balance,
}

/// Results from PointsActions.
#[derive(Debug, Clone, PartialEq)]
pub enum PointsActionResult {
    Recorded(LedgerEntry),
    Balance(u32),
}
