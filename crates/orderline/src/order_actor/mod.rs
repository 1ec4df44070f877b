//! # Order Actor
//!
//! Owns every [`Order`] and is the only writer of order state. Requests for all orders go
//! through one sequential loop, so two staff members acting on the same order are applied
//! one after the other; the second sees the first's result and can guard on it with
//! `expected`.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](orderline_actor::ActorEntity) implementation for [`Order`]
//! - [`lifecycle`] - the status transition table
//! - [`actions`] - [`OrderAction`], the only way to change status or payment state
//! - [`error`] - [`OrderError`]
//!
//! ## Context
//!
//! Orders write loyalty points through the points actor, injected at `run()` time:
//!
//! ```rust,ignore
//! let (points_actor, points) = points_actor::new(&config.actors);
//! let (order_actor, orders) = order_actor::new(&config.actors);
//! tokio::spawn(points_actor.run(()));
//! tokio::spawn(order_actor.run(OrderContext::new(PointsClient::new(points), &config.pricing)));
//! ```

pub mod actions;
pub mod entity;
pub mod error;
pub mod lifecycle;

pub use actions::*;
pub use error::*;

use crate::clients::PointsClient;
use crate::config::{ActorConfig, PricingConfig};
use crate::model::Order;
use orderline_actor::{ResourceActor, ResourceClient};

/// Dependencies of the order actor.
#[derive(Clone)]
pub struct OrderContext {
    pub points: PointsClient,
    /// Points earned per currency unit of `order_total`.
    pub earn_rate: u32,
}

impl OrderContext {
    pub fn new(points: PointsClient, pricing: &PricingConfig) -> Self {
        Self {
            points,
            earn_rate: pricing.points_per_currency_unit,
        }
    }
}

/// Creates a new Order actor and its client.
pub fn new(config: &ActorConfig) -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::with_feed_capacity(config.buffer_size, config.feed_capacity)
}
