//! Single-purpose banners for the admin screen.
//!
//! A banner only changes what this screen shows. Dismissing it leaves the order alone.

use crate::clients::OrderClient;
use crate::model::{Order, OrderStatus};
use crate::order_actor::OrderError;
use crate::sync::{ChangeFilter, FeedScope, OrderView};
use async_trait::async_trait;
use orderline_actor::{ChangeEvent, ChangeKind};

/// Banner shown when a customer places an order.
#[derive(Debug, Default)]
pub struct NewOrderNotifier {
    banner: Option<Order>,
}

/// Banner shown when the kitchen marks an order ready.
#[derive(Debug, Default)]
pub struct ReadyOrderNotifier {
    banner: Option<Order>,
}

macro_rules! banner_methods {
    ($notifier:ty) => {
        impl $notifier {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn banner(&self) -> Option<&Order> {
                self.banner.as_ref()
            }

            /// Takes the order for the detail modal and hides the banner.
            pub fn open(&mut self) -> Option<Order> {
                self.banner.take()
            }

            pub fn dismiss(&mut self) {
                self.banner = None;
            }
        }
    };
}

banner_methods!(NewOrderNotifier);
banner_methods!(ReadyOrderNotifier);

#[async_trait]
impl OrderView for NewOrderNotifier {
    const NAME: &'static str = "new_order_notifier";

    fn scope(&self) -> FeedScope {
        FeedScope::all().only(ChangeKind::Insert)
    }

    async fn refresh(&mut self, _client: &OrderClient) -> Result<(), OrderError> {
        Ok(())
    }

    fn apply(&mut self, change: &ChangeEvent<Order>) -> bool {
        if let Some(order) = &change.new {
            self.banner = Some(order.clone());
        }
        true
    }
}

#[async_trait]
impl OrderView for ReadyOrderNotifier {
    const NAME: &'static str = "ready_order_notifier";

    fn scope(&self) -> FeedScope {
        FeedScope::all()
            .only(ChangeKind::Update)
            .with_filter(ChangeFilter::Status(OrderStatus::Ready))
    }

    async fn refresh(&mut self, _client: &OrderClient) -> Result<(), OrderError> {
        Ok(())
    }

    fn apply(&mut self, change: &ChangeEvent<Order>) -> bool {
        let was_ready = change
            .old
            .as_ref()
            .is_some_and(|old| old.status == OrderStatus::Ready);
        if !was_ready {
            self.banner = change.new.clone();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::tests::sample_order;

    #[test]
    fn test_ready_banner_only_on_entering_ready() {
        let mut notifier = ReadyOrderNotifier::new();
        let cooking = sample_order(1, OrderStatus::Cooking);
        let ready = sample_order(1, OrderStatus::Ready);

        notifier.apply(&ChangeEvent::update("orders", ready.clone(), ready.clone()));
        assert!(notifier.banner().is_none());

        notifier.apply(&ChangeEvent::update("orders", cooking, ready.clone()));
        assert_eq!(notifier.banner(), Some(&ready));

        assert_eq!(notifier.open(), Some(ready));
        assert!(notifier.banner().is_none());
    }

    #[test]
    fn test_dismiss_clears_banner_only() {
        let mut notifier = NewOrderNotifier::new();
        let order = sample_order(7, OrderStatus::Pending);
        notifier.apply(&ChangeEvent::insert("orders", order.clone()));
        notifier.dismiss();
        assert!(notifier.banner().is_none());
        assert!(notifier.open().is_none());
        assert_eq!(order.status, OrderStatus::Pending);
    }
}
