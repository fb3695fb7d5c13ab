//! # voxhubd: voxhub daemon
//!
//! Composition root that wires the core and the HTTP adapter together and
//! starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise structured logging
//! - Seed the device store and build the action scheduler and chat service
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (Ctrl-C)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use voxhub_adapter_http_axum::state::AppState;
use voxhub_app::event_bus::InProcessEventBus;
use voxhub_app::ports::SystemClock;
use voxhub_app::scheduler::ActionScheduler;
use voxhub_app::services::chat_service::ChatService;
use voxhub_app::store::DeviceStore;
use voxhub_domain::time::now;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Device store
    let devices = config.initial_devices()?;
    tracing::info!(count = devices.len(), "registering devices");
    let store = DeviceStore::with_devices(devices, now());

    // Event bus
    let event_bus = Arc::new(InProcessEventBus::new(config.events.capacity));

    // Services
    let scheduler = Arc::new(ActionScheduler::new(
        store,
        Arc::clone(&event_bus),
        SystemClock,
    ));
    let chat_service = Arc::new(ChatService::new(
        config.interpreter()?,
        Arc::clone(&scheduler),
    ));

    // HTTP
    let state = AppState::new(chat_service, scheduler, event_bus);
    let app = voxhub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "voxhubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("voxhubd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
