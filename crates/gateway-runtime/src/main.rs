//! # FieldGate Gateway Runtime
//!
//! The main entry point for the FieldGate security gateway.
//!
//! ## Architecture
//!
//! The gateway terminates mutually-authenticated MQTT sessions from field
//! devices, validates every publication (schema, identity binding,
//! freshness, replay, signature), bridges accepted payloads to the backend
//! over HTTP, and routes backend responses and signed commands back to the
//! devices.
//!
//! ## Subsystems
//!
//! 1. Credential Store (read-only, loaded at startup)
//! 2. Replay Cache
//! 3. Message Validator
//! 4. MQTT Ingress / Response Router
//! 5. Backend HTTP Egress
//! 6. Command Ingress (HTTP)
//! 7. Lifecycle Supervisor

mod config;
mod credentials;
mod supervisor;

use anyhow::Result;
use config::GatewayConfig;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; RUST_LOG overrides the default level.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("===========================================");
    info!("  FieldGate Gateway v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "fieldgate.toml".to_string());
    info!(config = %config_path, "loading configuration");
    let config = GatewayConfig::load(Path::new(&config_path))?;

    supervisor::run(config).await
}
