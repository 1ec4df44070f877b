use orderline::analytics::TimeFilter;
use orderline::config::AppConfig;
use orderline::lifecycle::OrderSystem;
use orderline::model::{
    DineInOrder, OrderCreate, OrderLineItem, OrderStatus, OrderType, PaymentStatus,
};
use orderline::sync::{
    DashboardSummary, KitchenBoard, NewOrderNotifier, OrderDetail, OrdersTable,
    ReadyOrderNotifier, ViewSync,
};
use orderline_actor::tracing::setup_test_tracing;
use std::time::Duration;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

fn burger(quantity: u32) -> Vec<OrderLineItem> {
    vec![OrderLineItem {
        menu_item_id: "burger".to_string(),
        name: "Smash Burger".to_string(),
        quantity,
        price: 8.0,
        image_url: None,
        options: Default::default(),
    }]
}

fn counter_order(table: &str) -> DineInOrder {
    DineInOrder {
        user_id: None,
        order_type: OrderType::DineIn,
        full_name: table.to_string(),
        phone: "555-0142".to_string(),
        metadata: burger(1),
    }
}

fn cash_pickup(name: &str) -> OrderCreate {
    OrderCreate {
        user_id: None,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::CashOnDelivery,
        order_type: OrderType::Pickup,
        subtotal: 16.0,
        delivery_fee: 0.0,
        points_redeemed: 0,
        points_discount: 0.0,
        order_total: 16.0,
        delivery_address: None,
        phone: "555-0100".to_string(),
        full_name: name.to_string(),
        metadata: burger(2),
    }
}

fn start() -> OrderSystem {
    setup_test_tracing();
    OrderSystem::new(&AppConfig::default())
}

#[tokio::test]
async fn test_kitchen_board_follows_the_order() {
    let system = start();
    let board = ViewSync::spawn(KitchenBoard::new(), system.orders.clone());

    let id = system.orders.punch_dine_in(counter_order("Table 4")).await.unwrap();
    let converged = timeout(WAIT, board.wait_until(|b| b.active().len() == 1)).await;
    assert_eq!(converged, Ok(true));
    {
        let view = board.read().await;
        assert_eq!(view.count(OrderStatus::Punched), 1);
        assert_eq!(view.active()[0].next, Some(OrderStatus::Cooking));
    }

    system.orders.advance(id.clone()).await.unwrap();
    let converged = timeout(WAIT, board.wait_until(|b| b.count(OrderStatus::Cooking) == 1)).await;
    assert_eq!(converged, Ok(true));
    assert_eq!(board.read().await.active()[0].next, Some(OrderStatus::Ready));

    system.orders.advance(id.clone()).await.unwrap();
    system.orders.advance(id.clone()).await.unwrap();
    let converged = timeout(WAIT, board.wait_until(|b| b.active().is_empty())).await;
    assert_eq!(converged, Ok(true));

    // Finished orders stay on today's list.
    let view = board.read().await;
    assert_eq!(view.today().len(), 1);
    assert_eq!(view.today()[0].status, OrderStatus::Completed);
}

#[tokio::test]
async fn test_patching_views_converge() {
    let system = start();
    let first = system.orders.create_order(cash_pickup("Ana")).await.unwrap();

    let table = ViewSync::spawn(OrdersTable::new(TimeFilter::Today), system.orders.clone());
    let detail = ViewSync::spawn(OrderDetail::new(first.clone()), system.orders.clone());
    assert_eq!(timeout(WAIT, table.wait_until(|t| t.orders().len() == 1)).await, Ok(true));

    let second = system.orders.create_order(cash_pickup("Ben")).await.unwrap();
    system.orders.accept(first.clone()).await.unwrap();

    let converged = timeout(
        WAIT,
        table.wait_until(|t| {
            t.orders().len() == 2
                && t.get(&first).map(|o| o.status) == Some(OrderStatus::Accepted)
        }),
    )
    .await;
    assert_eq!(converged, Ok(true));
    assert_eq!(table.read().await.orders()[0].id, second);

    let converged = timeout(
        WAIT,
        detail.wait_until(|d| d.order().map(|o| o.status) == Some(OrderStatus::Accepted)),
    )
    .await;
    assert_eq!(converged, Ok(true));
    assert!(detail.read().await.order().unwrap().accepted_at.is_some());
}

#[tokio::test]
async fn test_dashboard_summary_refetches() {
    let system = start();
    let summary = ViewSync::spawn(DashboardSummary::new(), system.orders.clone());

    let a = system.orders.create_order(cash_pickup("Ana")).await.unwrap();
    system.orders.create_order(cash_pickup("Ben")).await.unwrap();
    let c = system.orders.create_order(cash_pickup("Cy")).await.unwrap();
    system.orders.accept(a).await.unwrap();
    system.orders.cancel(c).await.unwrap();

    let converged = timeout(
        WAIT,
        summary.wait_until(|s| s.orders_today == 3 && s.pending.len() == 1 && s.active == 1),
    )
    .await;
    assert_eq!(converged, Ok(true));
    assert_eq!(summary.read().await.revenue_today, 32.0);
}

#[tokio::test]
async fn test_banners_are_local_to_the_screen() {
    let system = start();
    let new_orders = ViewSync::spawn(NewOrderNotifier::new(), system.orders.clone());
    let ready_orders = ViewSync::spawn(ReadyOrderNotifier::new(), system.orders.clone());

    let id = system.orders.punch_dine_in(counter_order("Table 9")).await.unwrap();
    let converged = timeout(WAIT, new_orders.wait_until(|n| n.banner().is_some())).await;
    assert_eq!(converged, Ok(true));
    let opened = new_orders.with(|n| n.open()).await.unwrap();
    assert_eq!(opened.id, id);

    system.orders.advance(id.clone()).await.unwrap();
    system.orders.advance(id.clone()).await.unwrap();
    let converged = timeout(WAIT, ready_orders.wait_until(|n| n.banner().is_some())).await;
    assert_eq!(converged, Ok(true));

    ready_orders.with(|n| n.dismiss()).await;
    assert!(ready_orders.read().await.banner().is_none());
    let order = system.orders.get_required(id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Ready);
}
