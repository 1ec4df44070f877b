//! # Orderline
//!
//! Ordering core for a single restaurant: the menu, the order lifecycle, customer checkout
//! with loyalty points, and the live kitchen and admin dashboards.
//!
//! - **[order_actor]** / **[points_actor]** / **[menu_actor]**: entities owned by
//!   [`orderline_actor`] actors.
//! - **[clients]**: typed APIs over those actors.
//! - **[checkout]**: cart, pricing and the card/cash flows up to a paid order.
//! - **[sync]**: views kept current from the order change feed.
//! - **[hours]**: opening hours with an explicit cache.
//! - **[api]**: the axum routes.
//! - **[lifecycle]**: starts and stops everything.

pub mod analytics;
pub mod api;
pub mod checkout;
pub mod clients;
pub mod clock;
pub mod config;
pub mod hours;
pub mod lifecycle;
pub mod menu_actor;
pub mod model;
pub mod money;
pub mod order_actor;
pub mod payment;
pub mod points_actor;
pub mod sync;
