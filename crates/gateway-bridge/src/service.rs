//! The per-publication bridging pipeline.
//!
//! Validate, forward, route the reply. Every peer- or downstream-induced
//! failure terminates here as a structured log record and a metric
//! increment; nothing propagates across messages.

use crate::ports::outbound::{BackendGateway, BridgeError};
use crate::router::ResponseRouter;
use gateway_types::GatewayMetrics;
use gateway_validation::MessageValidatorApi;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pipeline tuning.
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    /// Deadline covering validation, the backend call, and the response
    /// publish for a single message. Larger than the backend HTTP timeout.
    pub message_deadline: Duration,
    /// Route non-2xx backend bodies to the device's response topic.
    pub forward_backend_errors: bool,
    /// Publish a failure notice on the response topic when the backend is
    /// unreachable.
    pub report_transport_errors: bool,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            message_deadline: Duration::from_secs(15),
            forward_backend_errors: true,
            report_transport_errors: false,
        }
    }
}

/// The validate-forward-respond pipeline for one transport session's
/// publications.
pub struct BridgeService {
    validator: Arc<dyn MessageValidatorApi>,
    backend: Arc<dyn BackendGateway>,
    router: ResponseRouter,
    settings: BridgeSettings,
    metrics: Arc<GatewayMetrics>,
}

impl BridgeService {
    /// Wire up the pipeline.
    pub fn new(
        validator: Arc<dyn MessageValidatorApi>,
        backend: Arc<dyn BackendGateway>,
        router: ResponseRouter,
        settings: BridgeSettings,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self {
            validator,
            backend,
            router,
            settings,
            metrics,
        }
    }

    /// Process one publication to completion or abandonment.
    ///
    /// Never returns an error: every failure is terminal for the message
    /// and already logged by the stage that observed it.
    pub async fn handle_publication(&self, identity: &str, raw: &[u8]) {
        let deadline = self.settings.message_deadline;
        if tokio::time::timeout(deadline, self.process(identity, raw))
            .await
            .is_err()
        {
            warn!(identity, deadline_s = deadline.as_secs(), "message abandoned at deadline");
        }
    }

    async fn process(&self, identity: &str, raw: &[u8]) {
        // Validation failures are logged and counted by the validator; the
        // message simply ends here with no reply published.
        let Ok(accepted) = self.validator.validate(identity, raw) else {
            return;
        };

        match self.backend.forward(&accepted.device_id, &accepted.payload).await {
            Ok(reply) if reply.is_success() => {
                self.metrics.record_forwarded();
                self.respond(&accepted.device_id, reply.body).await;
            }
            Ok(reply) => {
                // Bridging succeeded; the device may observe the backend's
                // own error body.
                info!(
                    device_id = %accepted.device_id,
                    status = reply.status,
                    "backend replied non-2xx"
                );
                self.metrics.record_backend_error();
                if self.settings.forward_backend_errors {
                    self.respond(&accepted.device_id, reply.body).await;
                } else {
                    debug!(device_id = %accepted.device_id, "backend error body dropped");
                }
            }
            Err(BridgeError::Transport(detail)) => {
                warn!(device_id = %accepted.device_id, %detail, "backend unreachable");
                self.metrics.record_backend_transport_error();
                if self.settings.report_transport_errors {
                    let notice = br#"{"error":"backend_unreachable"}"#.to_vec();
                    self.respond(&accepted.device_id, notice).await;
                }
            }
            Err(error) => {
                warn!(device_id = %accepted.device_id, %error, "backend call failed");
                self.metrics.record_backend_transport_error();
            }
        }
    }

    async fn respond(&self, device_id: &str, body: Vec<u8>) {
        match self.router.respond(device_id, body).await {
            Ok(()) => self.metrics.record_response_published(),
            Err(error) => {
                warn!(device_id, %error, "response publish failed");
                self.metrics.record_publish_failure();
            }
        }
    }
}
