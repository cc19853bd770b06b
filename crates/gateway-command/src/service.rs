//! Command ingress service: router construction and the command handler.

use crate::auth::BearerAuthLayer;
use crate::error::CommandError;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use gateway_bridge::DevicePublisher;
use gateway_types::{topics, CredentialStore, GatewayMetrics, OutboundCommand};
use gateway_validation::TimeSource;
use serde_json::value::RawValue;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Shared state behind the command endpoints.
pub struct CommandState {
    store: Arc<CredentialStore>,
    publisher: Arc<dyn DevicePublisher>,
    clock: Arc<dyn TimeSource>,
    bearer_token: String,
    metrics: Arc<GatewayMetrics>,
}

impl CommandState {
    /// Wire up the command ingress.
    pub fn new(
        store: Arc<CredentialStore>,
        publisher: Arc<dyn DevicePublisher>,
        clock: Arc<dyn TimeSource>,
        bearer_token: String,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self {
            store,
            publisher,
            clock,
            bearer_token,
            metrics,
        }
    }
}

/// Build the command router. The command route sits behind bearer auth;
/// health and metrics are open.
pub fn router(state: Arc<CommandState>) -> Router {
    let protected = Router::new()
        .route("/command/:device_id", post(post_command))
        .layer(BearerAuthLayer::new(state.bearer_token.clone()))
        .with_state(Arc::clone(&state));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_snapshot))
        .with_state(state)
        .merge(protected)
}

/// Handle `POST /command/:device_id`.
async fn post_command(
    State(state): State<Arc<CommandState>>,
    Path(device_id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, CommandError> {
    let message_id = accept_command(&state, &device_id, &body).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "status": "accepted",
            "message_id": message_id,
        })),
    ))
}

/// Validate, sign, and publish one command. Returns the fresh message id.
async fn accept_command(
    state: &CommandState,
    device_id: &str,
    body: &[u8],
) -> Result<String, CommandError> {
    let payload: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| CommandError::Malformed(e.to_string()))?;
    if !payload.is_object() {
        return Err(CommandError::Malformed(
            "payload must be a JSON object".to_string(),
        ));
    }

    let record = state
        .store
        .lookup(device_id)
        .ok_or(CommandError::UnknownDevice)?;

    // The gateway serializes the payload once and signs those exact bytes;
    // the published envelope embeds the same bytes verbatim.
    let payload_json =
        serde_json::to_string(&payload).map_err(|e| CommandError::Internal(e.to_string()))?;
    let timestamp = state.clock.now();
    let message_id = Uuid::new_v4().to_string();
    let signature = gateway_crypto::sign_command(
        timestamp,
        &message_id,
        payload_json.as_bytes(),
        &record.shared_secret,
    )
    .map_err(|e| CommandError::Internal(e.to_string()))?;

    let command = OutboundCommand {
        timestamp,
        message_id: message_id.clone(),
        payload: RawValue::from_string(payload_json)
            .map_err(|e| CommandError::Internal(e.to_string()))?,
        signature,
    };
    let envelope =
        serde_json::to_vec(&command).map_err(|e| CommandError::Internal(e.to_string()))?;

    state
        .publisher
        .publish(topics::command_topic(device_id), envelope)
        .await
        .map_err(|e| CommandError::PublishFailed(e.to_string()))?;

    state.metrics.record_command_published();
    info!(device_id, message_id, "command published");
    Ok(message_id)
}

/// Liveness endpoint.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "fieldgate",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Gateway counters snapshot.
async fn metrics_snapshot(State(state): State<Arc<CommandState>>) -> impl IntoResponse {
    Json(state.metrics.to_json())
}
