//! # Domain Models
//!
//! Plain data: orders and their line items, loyalty accounts, menu entries.
//! Behaviour attached to these types through [`ActorEntity`](orderline_actor::ActorEntity)
//! lives in the actor modules.

pub mod line_item;
pub mod menu;
pub mod order;
pub mod points;
pub mod status;
pub mod user;

pub use line_item::*;
pub use menu::*;
pub use order::*;
pub use points::*;
pub use status::*;
pub use user::*;
