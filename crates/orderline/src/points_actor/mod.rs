//! # Points Actor
//!
//! Owns the loyalty ledger: one [`PointsAccount`] per user, keyed by [`UserId`](crate::model::UserId)
//! and opened on first use by [`PointsClient`](crate::clients::PointsClient).
//!
//! - [`entity`] - [`ActorEntity`](orderline_actor::ActorEntity) implementation
//! - [`actions`] - [`PointsAction`] / [`PointsActionResult`]
//! - [`error`] - [`PointsError`]
//!
//! Earn, redeem and reverse are idempotent per order: a repeated request returns the entry
//! written the first time.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::config::ActorConfig;
use crate::model::PointsAccount;
use orderline_actor::{ResourceActor, ResourceClient};

/// Creates a new points actor and its client.
pub fn new(config: &ActorConfig) -> (ResourceActor<PointsAccount>, ResourceClient<PointsAccount>) {
    ResourceActor::with_feed_capacity(config.buffer_size, config.feed_capacity)
}
