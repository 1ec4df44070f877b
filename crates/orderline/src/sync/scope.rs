use crate::model::{Order, OrderId, OrderStatus};
use orderline_actor::{ChangeEvent, ChangeKind};

/// Row predicate of a subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeFilter {
    All,
    Id(OrderId),
    Status(OrderStatus),
    Statuses(Vec<OrderStatus>),
}

impl ChangeFilter {
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            ChangeFilter::All => true,
            ChangeFilter::Id(id) => &order.id == id,
            ChangeFilter::Status(status) => &order.status == status,
            ChangeFilter::Statuses(statuses) => statuses.contains(&order.status),
        }
    }
}

/// Which change events a view wants: an optional event kind plus a row predicate.
///
/// Predicates are checked against the new row, or the old one for deletes.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedScope {
    pub event: Option<ChangeKind>,
    pub filter: ChangeFilter,
}

impl FeedScope {
    pub fn all() -> Self {
        Self {
            event: None,
            filter: ChangeFilter::All,
        }
    }

    pub fn order(id: OrderId) -> Self {
        Self {
            event: None,
            filter: ChangeFilter::Id(id),
        }
    }

    pub fn only(mut self, kind: ChangeKind) -> Self {
        self.event = Some(kind);
        self
    }

    pub fn with_filter(mut self, filter: ChangeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn matches(&self, change: &ChangeEvent<Order>) -> bool {
        if self.event.is_some_and(|kind| kind != change.kind) {
            return false;
        }
        change.row().is_some_and(|order| self.filter.matches(order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::tests::sample_order;

    #[test]
    fn test_status_filter_checks_new_row() {
        let before = sample_order(1, OrderStatus::Cooking);
        let after = sample_order(1, OrderStatus::Ready);
        let change = ChangeEvent::update("orders", before, after);

        let ready = FeedScope::all()
            .only(ChangeKind::Update)
            .with_filter(ChangeFilter::Status(OrderStatus::Ready));
        assert!(ready.matches(&change));

        let cooking = FeedScope::all().with_filter(ChangeFilter::Status(OrderStatus::Cooking));
        assert!(!cooking.matches(&change));
        assert!(!ready.clone().only(ChangeKind::Insert).matches(&change));
    }

    #[test]
    fn test_delete_matches_old_row() {
        let change = ChangeEvent::delete("orders", sample_order(4, OrderStatus::Cancelled));
        assert!(FeedScope::order(OrderId(4)).matches(&change));
        assert!(!FeedScope::order(OrderId(5)).matches(&change));
    }
}
