use crate::model::{OrderLineItem, OrderStatus, OrderType, PaymentStatus, UserId};
use crate::money::{self, to_decimal, to_f64};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Accepts both `order_12` and `12`.
impl FromStr for OrderId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("order_").unwrap_or(s).parse().map(OrderId)
    }
}

/// Represents a customer or dine-in order.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](orderline_actor::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](orderline_actor::ResourceActor).
///
/// See [`impl ActorEntity for Order`](#impl-ActorEntity-for-Order) for details on:
/// - Creation parameters ([`OrderCreate`])
/// - Actions ([`OrderAction`](crate::order_actor::OrderAction))
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub order_type: OrderType,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub points_redeemed: u32,
    pub points_discount: f64,
    /// `subtotal + delivery_fee - points_discount`, fixed at creation.
    pub order_total: f64,
    /// Set once the earn entry has been written (or found to be zero).
    pub points_earned: Option<u32>,
    pub delivery_address: Option<String>,
    pub phone: String,
    pub full_name: String,
    pub payment_intent_id: Option<String>,
    pub payment_error: Option<String>,
    pub metadata: Vec<OrderLineItem>,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Amount to charge, in minor currency units.
    pub fn amount_minor(&self) -> i64 {
        money::to_minor_units(self.order_total)
    }

    pub fn item_count(&self) -> u32 {
        self.metadata.iter().map(|item| item.quantity).sum()
    }
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: Option<UserId>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub order_type: OrderType,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub points_redeemed: u32,
    pub points_discount: f64,
    pub order_total: f64,
    pub delivery_address: Option<String>,
    pub phone: String,
    pub full_name: String,
    pub metadata: Vec<OrderLineItem>,
}

impl OrderCreate {
    /// The total implied by the other amounts.
    pub fn expected_total(&self) -> f64 {
        to_f64(
            to_decimal(self.subtotal) + to_decimal(self.delivery_fee)
                - to_decimal(self.points_discount),
        )
    }
}

/// A staff-entered counter order. It starts in `punched` and is settled at the till.
#[derive(Debug, Clone)]
pub struct DineInOrder {
    /// Set when a signed-in customer is at the counter, so the order earns points.
    pub user_id: Option<UserId>,
    /// `DineIn` or `Pickup`.
    pub order_type: OrderType,
    pub full_name: String,
    pub phone: String,
    pub metadata: Vec<OrderLineItem>,
}

impl DineInOrder {
    pub fn into_create(self) -> OrderCreate {
        let subtotal = to_f64(
            self.metadata
                .iter()
                .map(|item| to_decimal(item.line_total()))
                .sum(),
        );
        OrderCreate {
            user_id: self.user_id,
            status: OrderStatus::Punched,
            payment_status: PaymentStatus::DineIn,
            order_type: self.order_type,
            subtotal,
            delivery_fee: 0.0,
            points_redeemed: 0,
            points_discount: 0.0,
            order_total: subtotal,
            delivery_address: None,
            phone: self.phone,
            full_name: self.full_name,
            metadata: self.metadata,
        }
    }
}

/// Contact corrections while an order still awaits approval.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub phone: Option<String>,
    pub full_name: Option<String>,
    pub delivery_address: Option<String>,
}

/// Filter for order listings. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderQuery {
    pub statuses: Option<Vec<OrderStatus>>,
    pub created_since: Option<DateTime<Utc>>,
    pub user_id: Option<UserId>,
}

impl OrderQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = OrderStatus>) -> Self {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.created_since = Some(since);
        self
    }

    pub fn for_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn accepts(&self, order: &Order) -> bool {
        let status_ok = self
            .statuses
            .as_ref()
            .map_or(true, |statuses| statuses.contains(&order.status));
        let since_ok = self
            .created_since
            .map_or(true, |since| order.created_at >= since);
        let user_ok = self
            .user_id
            .as_ref()
            .map_or(true, |user| order.user_id.as_ref() == Some(user));
        status_ok && since_ok && user_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_parsing() {
        assert_eq!("order_12".parse::<OrderId>().unwrap(), OrderId(12));
        assert_eq!("7".parse::<OrderId>().unwrap(), OrderId(7));
        assert!("order_x".parse::<OrderId>().is_err());
        assert_eq!(OrderId(3).to_string(), "order_3");
    }
}
