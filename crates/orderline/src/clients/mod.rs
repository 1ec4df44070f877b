//! Typed clients over the generic [`ResourceClient`](orderline_actor::ResourceClient)s.
//!
//! Each implements [`ActorClient`](orderline_actor::ActorClient) for `get`/`list`/`delete`
//! and maps framework errors back to its actor's error type.

pub mod menu_client;
pub mod order_client;
pub mod points_client;

pub use menu_client::MenuClient;
pub use order_client::OrderClient;
pub use points_client::PointsClient;
