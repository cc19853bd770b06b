//! Lifecycle supervision: dependency-ordered startup and graceful drain.
//!
//! Startup order: credentials, replay cache, validator, broker session,
//! backend client, worker lanes, command HTTP server, then the data
//! subscription (established by the ingress loop on connect). Shutdown on
//! ctrl-c: the watch signal stops HTTP intake and the ingress loop
//! together; dropping the dispatcher closes the worker lanes so in-flight
//! validations drain to a terminal state, bounded by the drain window.

use crate::config::GatewayConfig;
use crate::credentials;
use anyhow::{Context, Result};
use gateway_bridge::{
    run_ingress, BackendGateway, BridgeService, BridgeSettings, DevicePublisher, Dispatcher,
    HttpBackendGateway, MqttLink, MqttPublisher, ResponseRouter,
};
use gateway_command::{router, CommandState};
use gateway_types::{CredentialStore, GatewayMetrics};
use gateway_validation::{
    MessageValidator, MessageValidatorApi, ReplayCache, SystemTimeSource,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

const DRAIN_WINDOW: Duration = Duration::from_secs(20);

/// Bring the gateway up, run until ctrl-c, drain, and stop.
pub async fn run(config: GatewayConfig) -> Result<()> {
    // Credential store.
    let records = credentials::load_device_records(&config.credentials_path)?;
    let store = Arc::new(CredentialStore::from_records(records)?);
    info!(devices = store.len(), "credential store loaded");

    let metrics = Arc::new(GatewayMetrics::new());

    // Validation pipeline.
    let validator: Arc<dyn MessageValidatorApi> = Arc::new(MessageValidator::new(
        Arc::clone(&store),
        ReplayCache::new(config.replay_cache_size),
        Box::new(SystemTimeSource),
        config.skew_budget_seconds,
        Arc::clone(&metrics),
    ));

    // Broker session; the connection is established as the ingress loop
    // polls, and the data subscription follows on every connect.
    let MqttLink { client, eventloop } = MqttLink::connect(&config.mqtt_settings())?;
    let publisher: Arc<dyn DevicePublisher> = Arc::new(MqttPublisher::new(client.clone()));

    // Backend egress.
    let backend: Arc<dyn BackendGateway> = Arc::new(HttpBackendGateway::new(
        &config.backend_base_url,
        config.http_timeout(),
    )?);

    let bridge = Arc::new(BridgeService::new(
        validator,
        backend,
        ResponseRouter::new(Arc::clone(&publisher)),
        BridgeSettings {
            message_deadline: config.message_deadline(),
            forward_backend_errors: config.forward_backend_errors,
            report_transport_errors: config.report_transport_errors,
        },
        Arc::clone(&metrics),
    ));

    let (dispatcher, workers) =
        Dispatcher::spawn(bridge, config.ingress_workers, config.ingress_queue_depth);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let ingress = tokio::spawn(run_ingress(
        eventloop,
        client.clone(),
        dispatcher,
        shutdown_rx.clone(),
    ));

    // Command ingress.
    let state = Arc::new(CommandState::new(
        Arc::clone(&store),
        publisher,
        Arc::new(SystemTimeSource),
        config.command_bearer_token.clone(),
        Arc::clone(&metrics),
    ));
    let listener = tokio::net::TcpListener::bind(config.command_listen_addr)
        .await
        .with_context(|| format!("binding command listener on {}", config.command_listen_addr))?;
    info!(addr = %config.command_listen_addr, "command ingress listening");
    let mut http_shutdown = shutdown_rx.clone();
    let http = tokio::spawn(async move {
        axum::serve(listener, router(state))
            .with_graceful_shutdown(async move {
                let _ = http_shutdown.changed().await;
            })
            .await
    });

    info!("gateway ready");

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("shutting down gracefully");

    let _ = shutdown_tx.send(true);
    let drain = async {
        // Ingress returns first, dropping the dispatcher; the closed lanes
        // let the workers finish their queues.
        let _ = ingress.await;
        for worker in workers {
            let _ = worker.await;
        }
        let _ = http.await;
    };
    if tokio::time::timeout(DRAIN_WINDOW, drain).await.is_err() {
        warn!(
            window_s = DRAIN_WINDOW.as_secs(),
            "drain window expired, abandoning in-flight work"
        );
    }
    let _ = client.disconnect().await;
    info!("gateway stopped");
    Ok(())
}
