use orderline::api::{self, ApiState};
use orderline::config::AppConfig;
use orderline::lifecycle::OrderSystem;
use orderline::payment::SandboxGateway;
use orderline_actor::tracing::setup_tracing;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = AppConfig::load().map_err(|e| e.to_string())?;
    let system = OrderSystem::new(&config);

    let state = ApiState {
        orders: system.orders.clone(),
        menu: system.menu.clone(),
        hours: system.hours.clone(),
        gateway: Arc::new(SandboxGateway::new()),
        currency: config.pricing.currency.clone(),
    };

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {e}", config.server.listen_addr))?;
    info!(addr = %config.server.listen_addr, "Listening");

    let served = axum::serve(listener, api::router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl-C");
            }
            info!("Ctrl-C received");
        })
        .await;
    if let Err(e) = served {
        error!(error = %e, "Server error");
    }

    system.shutdown().await
}
