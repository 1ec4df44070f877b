//! # Kitchen/Admin Sync
//!
//! Keeps any number of dashboards consistent with the order actor without polling.
//! Each view is driven by its own task ([`ViewSync`]) fed from the order change feed and
//! filtered by the view's [`FeedScope`]. If the feed lags, the view refetches.

pub mod driver;
pub mod notifier;
pub mod scope;
pub mod timer;
pub mod views;

pub use driver::{OrderView, ViewSync};
pub use notifier::{NewOrderNotifier, ReadyOrderNotifier};
pub use scope::{ChangeFilter, FeedScope};
pub use timer::PrepCountdown;
pub use views::{DashboardSummary, KitchenBoard, KitchenCard, OrderDetail, OrdersTable};
