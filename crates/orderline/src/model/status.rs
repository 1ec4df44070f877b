use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Where an order is in its journey. Legal moves between states live in
/// [`crate::order_actor::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Online order awaiting an admin decision.
    Pending,
    Accepted,
    /// Staff-entered dine-in or counter order; skips approval.
    Punched,
    Processing,
    Cooking,
    Ready,
    Completed,
    Denied,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 9] = [
        OrderStatus::Pending,
        OrderStatus::Accepted,
        OrderStatus::Punched,
        OrderStatus::Processing,
        OrderStatus::Cooking,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Denied,
        OrderStatus::Cancelled,
    ];

    /// Statuses shown on the kitchen board as work in progress.
    pub const KITCHEN_ACTIVE: [OrderStatus; 4] = [
        OrderStatus::Punched,
        OrderStatus::Processing,
        OrderStatus::Cooking,
        OrderStatus::Ready,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Punched => "punched",
            OrderStatus::Processing => "processing",
            OrderStatus::Cooking => "cooking",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Denied => "denied",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed | OrderStatus::Denied | OrderStatus::Cancelled
        )
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("Unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    CashOnDelivery,
    Paid,
    Failed,
    DineIn,
}

impl PaymentStatus {
    /// Card payment still has to be collected.
    pub fn awaits_card(&self) -> bool {
        matches!(self, PaymentStatus::Unpaid | PaymentStatus::Failed)
    }

    /// Payment outcomes that earn loyalty points.
    pub fn earns_points(&self) -> bool {
        matches!(self, PaymentStatus::Paid | PaymentStatus::CashOnDelivery)
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::CashOnDelivery => "cash_on_delivery",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::DineIn => "dine_in",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Delivery,
    Pickup,
    DineIn,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&PaymentStatus::CashOnDelivery).unwrap();
        assert_eq!(json, "\"cash_on_delivery\"");
        let status: OrderStatus = serde_json::from_str("\"cooking\"").unwrap();
        assert_eq!(status, OrderStatus::Cooking);
    }
}
