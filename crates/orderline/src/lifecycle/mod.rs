//! # System Lifecycle
//!
//! Starts, wires and stops the actors behind the ordering platform.
//!
//! Actors are created first and receive their dependencies at `run(context)`:
//!
//! ```rust,ignore
//! let (points_actor, points) = points_actor::new(&config.actors);
//! let (order_actor, orders) = order_actor::new(&config.actors);
//!
//! tokio::spawn(points_actor.run(()));
//! tokio::spawn(order_actor.run(OrderContext::new(PointsClient::new(points.clone()), &config.pricing)));
//! ```
//!
//! ## Graceful Shutdown
//!
//! Dropping every client closes an actor's channel and ends its loop. The order actor holds
//! a points client in its context, so it is awaited first; the points actor follows once
//! that context is gone. Anything else holding an [`OrderClient`](crate::clients::OrderClient)
//! (a [`Checkout`](crate::checkout::Checkout), a [`ViewSync`](crate::sync::ViewSync)) must be
//! dropped before [`OrderSystem::shutdown`] can complete.
//!
//! Logging is initialised once by the binary through
//! [`setup_tracing`](orderline_actor::tracing::setup_tracing).

pub mod order_system;

pub use order_system::*;
