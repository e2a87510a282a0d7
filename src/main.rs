//! API Gateway (v1)
//!
//! An HTTP gateway built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 API GATEWAY                   │
//!                      │                                               │
//!   Client Request     │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!   ───────────────────┼─▶│   rate   │──▶│  timing  │──▶│ dispatch │  │
//!                      │  │ limiter  │   │interceptor│  │ + forward│  │
//!                      │  └────┬─────┘   └──────────┘   └────┬─────┘  │
//!                      │       │                             │        │
//!                      │       ▼                             ▼        │
//!                      │  ┌──────────┐                 ┌──────────┐   │
//!   Client Response    │  │ counting │                 │ backend  │◀──┼── Backend
//!   ◀──────────────────┼──│  store   │                 │  pool    │   │   Service
//!                      │  └──────────┘                 └──────────┘   │
//!                      │                                               │
//!                      │  ┌─────────────────────────────────────────┐ │
//!                      │  │          Cross-Cutting Concerns          │ │
//!                      │  │  ┌────────┐ ┌─────────────┐ ┌─────────┐ │ │
//!                      │  │  │ config │ │observability│ │ errors  │ │ │
//!                      │  │  └────────┘ └─────────────┘ └─────────┘ │ │
//!                      │  └─────────────────────────────────────────┘ │
//!                      └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod error;
pub mod http;
pub mod limit;
pub mod proxy;
pub mod routing;

// Cross-cutting concerns
pub mod observability;

use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::GatewayConfig;
use crate::http::GatewayServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration: explicit file via arg or GATEWAY_CONFIG,
    // otherwise defaults plus environment overrides.
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("GATEWAY_CONFIG").ok())
        .map(PathBuf::from);

    let config: GatewayConfig = match &config_path {
        Some(path) => config::load_config(path)?,
        None => config::config_from_env()?,
    };

    // Initialize tracing subscriber
    let default_filter = if config.listener.debug {
        "api_gateway=debug,tower_http=debug"
    } else {
        "api_gateway=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("api-gateway v0.1.0 starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        services = ?config.services.keys().collect::<Vec<_>>(),
        rate_limit_per_window = config.rate_limit.requests_per_window,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    // Initialize metrics endpoint
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            crate::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Create and run HTTP server
    let server = GatewayServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
