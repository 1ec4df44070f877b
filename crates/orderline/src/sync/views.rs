//! The staff and customer dashboards.
//!
//! [`OrdersTable`] and [`OrderDetail`] patch their rows by id. [`KitchenBoard`] and
//! [`DashboardSummary`] derive several lists from one query, so they refetch on every
//! relevant change instead.

use crate::analytics::TimeFilter;
use crate::clock::start_of_day;
use crate::clients::OrderClient;
use crate::model::{Order, OrderId, OrderQuery, OrderStatus};
use crate::money::{to_decimal, to_f64};
use crate::order_actor::lifecycle::kitchen_next;
use crate::order_actor::OrderError;
use crate::sync::{FeedScope, OrderView};
use async_trait::async_trait;
use chrono::Utc;
use orderline_actor::{ActorClient, ChangeEvent, ChangeKind};

/// Admin order list, newest first.
#[derive(Debug, Default)]
pub struct OrdersTable {
    filter: TimeFilter,
    orders: Vec<Order>,
}

impl OrdersTable {
    pub fn new(filter: TimeFilter) -> Self {
        Self {
            filter,
            orders: Vec::new(),
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn filter(&self) -> TimeFilter {
        self.filter
    }

    /// Changing the window empties the table until the next refresh.
    pub fn set_filter(&mut self, filter: TimeFilter) {
        if filter != self.filter {
            self.filter = filter;
            self.orders.clear();
        }
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == id)
    }
}

#[async_trait]
impl OrderView for OrdersTable {
    const NAME: &'static str = "orders_table";

    fn scope(&self) -> FeedScope {
        FeedScope::all()
    }

    async fn refresh(&mut self, client: &OrderClient) -> Result<(), OrderError> {
        let since = self.filter.since(Utc::now());
        let mut orders = client.list(OrderQuery::all().since(since)).await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.orders = orders;
        Ok(())
    }

    fn apply(&mut self, change: &ChangeEvent<Order>) -> bool {
        match (change.kind, &change.new, &change.old) {
            (ChangeKind::Delete, _, Some(old)) => {
                self.orders.retain(|order| order.id != old.id);
            }
            (_, Some(new), _) => {
                if let Some(row) = self.orders.iter_mut().find(|order| order.id == new.id) {
                    *row = new.clone();
                } else if self.filter.contains(new, Utc::now()) {
                    let at = self
                        .orders
                        .partition_point(|order| order.created_at > new.created_at);
                    self.orders.insert(at, new.clone());
                }
            }
            _ => {}
        }
        true
    }
}

/// Customer order page: one order, live.
#[derive(Debug)]
pub struct OrderDetail {
    id: OrderId,
    order: Option<Order>,
}

impl OrderDetail {
    pub fn new(id: OrderId) -> Self {
        Self { id, order: None }
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }
}

#[async_trait]
impl OrderView for OrderDetail {
    const NAME: &'static str = "order_detail";

    fn scope(&self) -> FeedScope {
        FeedScope::order(self.id.clone())
    }

    async fn refresh(&mut self, client: &OrderClient) -> Result<(), OrderError> {
        self.order = client.get(self.id.clone()).await?;
        Ok(())
    }

    fn apply(&mut self, change: &ChangeEvent<Order>) -> bool {
        self.order = change.new.clone();
        true
    }
}

/// A ticket on the kitchen board with the button it offers.
#[derive(Debug, Clone, PartialEq)]
pub struct KitchenCard {
    pub order: Order,
    pub next: Option<OrderStatus>,
}

#[derive(Debug, Default)]
pub struct KitchenBoard {
    active: Vec<KitchenCard>,
    today: Vec<Order>,
}

impl KitchenBoard {
    const TODAY: [OrderStatus; 6] = [
        OrderStatus::Punched,
        OrderStatus::Processing,
        OrderStatus::Cooking,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn new() -> Self {
        Self::default()
    }

    /// Work in progress, oldest first.
    pub fn active(&self) -> &[KitchenCard] {
        &self.active
    }

    /// Today's kitchen orders including finished and cancelled ones, newest first.
    pub fn today(&self) -> &[Order] {
        &self.today
    }

    pub fn count(&self, status: OrderStatus) -> usize {
        self.active
            .iter()
            .filter(|card| card.order.status == status)
            .count()
    }
}

#[async_trait]
impl OrderView for KitchenBoard {
    const NAME: &'static str = "kitchen_board";

    fn scope(&self) -> FeedScope {
        FeedScope::all()
    }

    async fn refresh(&mut self, client: &OrderClient) -> Result<(), OrderError> {
        let mut active = client
            .list(OrderQuery::all().with_statuses(OrderStatus::KITCHEN_ACTIVE))
            .await?;
        active.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let mut today = client
            .list(
                OrderQuery::all()
                    .with_statuses(Self::TODAY)
                    .since(start_of_day(Utc::now())),
            )
            .await?;
        today.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        self.active = active
            .into_iter()
            .map(|order| KitchenCard {
                next: kitchen_next(order.status),
                order,
            })
            .collect();
        self.today = today;
        Ok(())
    }

    fn apply(&mut self, _change: &ChangeEvent<Order>) -> bool {
        false
    }
}

/// Admin landing page figures for today.
#[derive(Debug, Default)]
pub struct DashboardSummary {
    pub orders_today: usize,
    /// Sum of today's order totals, cancelled and denied orders excluded.
    pub revenue_today: f64,
    /// Orders awaiting a decision, oldest first.
    pub pending: Vec<Order>,
    /// Accepted orders and kitchen work in progress.
    pub active: usize,
}

impl DashboardSummary {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderView for DashboardSummary {
    const NAME: &'static str = "dashboard_summary";

    fn scope(&self) -> FeedScope {
        FeedScope::all()
    }

    async fn refresh(&mut self, client: &OrderClient) -> Result<(), OrderError> {
        let today = client
            .list(OrderQuery::all().since(start_of_day(Utc::now())))
            .await?;
        let mut pending = client
            .list(OrderQuery::all().with_statuses([OrderStatus::Pending]))
            .await?;
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let active = client
            .list(
                OrderQuery::all().with_statuses(
                    OrderStatus::KITCHEN_ACTIVE
                        .into_iter()
                        .chain([OrderStatus::Accepted]),
                ),
            )
            .await?;

        self.orders_today = today.len();
        self.revenue_today = to_f64(
            today
                .iter()
                .filter(|order| !matches!(order.status, OrderStatus::Cancelled | OrderStatus::Denied))
                .map(|order| to_decimal(order.order_total))
                .sum(),
        );
        self.pending = pending;
        self.active = active.len();
        Ok(())
    }

    fn apply(&mut self, _change: &ChangeEvent<Order>) -> bool {
        false
    }
}
