use crate::checkout::Checkout;
use crate::clients::{MenuClient, OrderClient, PointsClient};
use crate::config::AppConfig;
use crate::hours::{HoursService, HoursStore, MemoryHoursStore};
use crate::menu_actor::MenuContext;
use crate::order_actor::OrderContext;
use crate::payment::PaymentGateway;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The running platform: the order, points and menu actors plus the hours service.
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::new(&AppConfig::default());
/// let checkout = system.checkout(Arc::new(SandboxGateway::new()));
/// // ... take orders ...
/// drop(checkout);
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    pub orders: OrderClient,
    pub points: PointsClient,
    pub menu: MenuClient,
    pub hours: Arc<HoursService>,
    config: AppConfig,
    /// Dependents first: orders hold a points client, menu items a category client.
    handles: Vec<JoinHandle<()>>,
}

impl OrderSystem {
    /// Starts the actors with an empty in-memory hours table.
    pub fn new(config: &AppConfig) -> Self {
        Self::with_hours_store(config, Arc::new(MemoryHoursStore::new()))
    }

    pub fn with_hours_store(config: &AppConfig, store: Arc<dyn HoursStore>) -> Self {
        let (points_actor, points_client) = crate::points_actor::new(&config.actors);
        let (order_actor, order_client) = crate::order_actor::new(&config.actors);
        let (category_actor, category_client) = crate::menu_actor::new_categories(&config.actors);
        let (item_actor, item_client) = crate::menu_actor::new_items(&config.actors);
        let points = PointsClient::new(points_client);

        let points_handle = tokio::spawn(points_actor.run(()));
        let order_handle = tokio::spawn(
            order_actor.run(OrderContext::new(points.clone(), &config.pricing)),
        );
        let category_handle = tokio::spawn(category_actor.run(()));
        let item_handle = tokio::spawn(item_actor.run(MenuContext::new(category_client.clone())));
        info!("Order system started");

        Self {
            orders: OrderClient::new(order_client),
            points,
            menu: MenuClient::new(item_client, category_client),
            hours: Arc::new(HoursService::new(store, config.hours.cache_ttl())),
            config: config.clone(),
            handles: vec![order_handle, points_handle, item_handle, category_handle],
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// A checkout orchestrator charging through `gateway`.
    pub fn checkout(&self, gateway: Arc<dyn PaymentGateway>) -> Checkout {
        Checkout::new(
            self.orders.clone(),
            self.points.clone(),
            gateway,
            self.config.pricing.clone(),
        )
    }

    /// Drops the clients and waits for every actor to finish.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down order system...");
        drop(self.orders);
        drop(self.points);
        drop(self.menu);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }
        info!("Order system shutdown complete.");
        Ok(())
    }
}
