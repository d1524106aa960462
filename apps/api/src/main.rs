//! Parlor API server.
//!
//! Startup order matters: configuration first (a missing gateway secret must
//! kill the process before it accepts a single request), then the database
//! with migrations, then the engines, then the listener.

mod auth;
mod config;
mod error;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use parlor_db::{Database, DbConfig};
use parlor_engine::PlatformConfig;
use parlor_gateway::{GatewayConfig, HttpGateway, OrderGateway};

use crate::config::ApiConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("api=info,parlor_engine=info,parlor_db=info,parlor_gateway=info")
        }))
        .init();

    let api_config = ApiConfig::load()?;
    let platform_config = PlatformConfig::load()?;
    // No default exists for the callback secret; refusing to start beats
    // accepting payments we cannot verify.
    let gateway_config = GatewayConfig::load()?;

    let db = Arc::new(Database::new(DbConfig::new(&api_config.database_path)).await?);
    info!(path = %api_config.database_path, "database ready");

    let commission_bps = platform_config.commission_bps;
    let gateway: Arc<dyn OrderGateway> = Arc::new(HttpGateway::new(gateway_config.clone()));
    let state = Arc::new(AppState::new(
        db,
        gateway,
        platform_config,
        gateway_config.secret,
    ));

    let app = routes::router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], api_config.port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, commission_bps, "parlor api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("parlor api stopped");
    Ok(())
}

/// Resolves when the process receives ctrl-c, letting in-flight requests
/// drain before the server exits.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            // Without a signal handler there is no graceful path; park this
            // future so the server at least keeps running.
            error!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
