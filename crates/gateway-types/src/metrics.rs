//! Gateway metrics counters.
//!
//! Plain atomic counters, no exporter. The hot path touches these with
//! relaxed ordering only; no lock is ever taken for metrics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the validation and bridging pipeline.
#[derive(Debug, Default)]
pub struct GatewayMetrics {
    /// Messages that passed all five checks.
    pub accepted: AtomicU64,
    /// Rejections: failed parse or schema.
    pub rejected_malformed: AtomicU64,
    /// Rejections: claimed identity differs from transport identity.
    pub rejected_identity_mismatch: AtomicU64,
    /// Rejections: timestamp outside the skew budget.
    pub rejected_stale: AtomicU64,
    /// Rejections: message identifier already seen.
    pub rejected_replay: AtomicU64,
    /// Rejections: no credential record for the device.
    pub rejected_unknown_device: AtomicU64,
    /// Rejections: MAC mismatch.
    pub rejected_bad_signature: AtomicU64,
    /// Messages abandoned by internal errors.
    pub internal_errors: AtomicU64,

    /// Payloads forwarded to the backend (2xx reply).
    pub forwarded: AtomicU64,
    /// Backend replied with a non-2xx status.
    pub backend_errors: AtomicU64,
    /// Backend unreachable or timed out.
    pub backend_transport_errors: AtomicU64,
    /// Bodies published on a response topic.
    pub responses_published: AtomicU64,
    /// Commands published on a command topic.
    pub commands_published: AtomicU64,
    /// Failed publishes on either egress topic.
    pub publish_failures: AtomicU64,
}

impl GatewayMetrics {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted message.
    pub fn record_accept(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejection by its reason label.
    pub fn record_reject(&self, label: &str) {
        let counter = match label {
            "malformed" => &self.rejected_malformed,
            "identity_mismatch" => &self.rejected_identity_mismatch,
            "stale" => &self.rejected_stale,
            "replay" => &self.rejected_replay,
            "unknown_device" => &self.rejected_unknown_device,
            "bad_signature" => &self.rejected_bad_signature,
            _ => &self.internal_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful forward to the backend.
    pub fn record_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a non-2xx backend reply.
    pub fn record_backend_error(&self) {
        self.backend_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a backend transport failure.
    pub fn record_backend_transport_error(&self) {
        self.backend_transport_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a body published on a response topic.
    pub fn record_response_published(&self) {
        self.responses_published.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a command published on a command topic.
    pub fn record_command_published(&self) {
        self.commands_published.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed egress publish.
    pub fn record_publish_failure(&self) {
        self.publish_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot the counters as JSON for the metrics endpoint.
    pub fn to_json(&self) -> serde_json::Value {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        serde_json::json!({
            "accepted": load(&self.accepted),
            "rejected": {
                "malformed": load(&self.rejected_malformed),
                "identity_mismatch": load(&self.rejected_identity_mismatch),
                "stale": load(&self.rejected_stale),
                "replay": load(&self.rejected_replay),
                "unknown_device": load(&self.rejected_unknown_device),
                "bad_signature": load(&self.rejected_bad_signature),
            },
            "internal_errors": load(&self.internal_errors),
            "forwarded": load(&self.forwarded),
            "backend_errors": load(&self.backend_errors),
            "backend_transport_errors": load(&self.backend_transport_errors),
            "responses_published": load(&self.responses_published),
            "commands_published": load(&self.commands_published),
            "publish_failures": load(&self.publish_failures),
        })
    }
}
