//! Message validator service.
//!
//! The hexagonal application service: implements the inbound
//! [`MessageValidatorApi`] port, owns the replay cache, and reads the
//! credential store and clock through their ports. Every rejection is
//! logged here with its structured reason so both the live pipeline and
//! tests observe identical failure semantics.

use crate::domain::entities::{AcceptedMessage, WireMessage};
use crate::domain::errors::RejectReason;
use crate::domain::replay::ReplayCache;
use crate::ports::inbound::MessageValidatorApi;
use crate::ports::outbound::TimeSource;
use gateway_types::{CredentialStore, GatewayMetrics};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// The per-message validation pipeline.
pub struct MessageValidator {
    store: Arc<CredentialStore>,
    cache: ReplayCache,
    clock: Box<dyn TimeSource>,
    skew_budget: i64,
    metrics: Arc<GatewayMetrics>,
}

impl MessageValidator {
    /// Wire up the validator with its collaborators.
    ///
    /// `skew_budget` is the freshness tolerance in seconds; a message is
    /// fresh when `|now - timestamp| <= skew_budget` (closed on the accept
    /// side).
    pub fn new(
        store: Arc<CredentialStore>,
        cache: ReplayCache,
        clock: Box<dyn TimeSource>,
        skew_budget: i64,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self {
            store,
            cache,
            clock,
            skew_budget,
            metrics,
        }
    }

    /// The replay cache, exposed for observability.
    pub fn cache(&self) -> &ReplayCache {
        &self.cache
    }

    fn run_checks(
        &self,
        transport_identity: &str,
        raw: &[u8],
    ) -> Result<AcceptedMessage, RejectReason> {
        // 1. Parse and schema.
        let message = WireMessage::parse(raw).map_err(RejectReason::Malformed)?;

        // 2. Identity: the self-claimed device_id must match what the
        //    transport session vouched for. Runs before any credential
        //    lookup so a mismatched claim never probes the store.
        if message.device_id != transport_identity {
            return Err(RejectReason::IdentityMismatch {
                claimed: message.device_id.into_owned(),
                transport: transport_identity.to_string(),
            });
        }

        // 3. Freshness, closed boundary on the accept side.
        let delta = message.timestamp - self.clock.now();
        if delta.unsigned_abs() > self.skew_budget.unsigned_abs() {
            return Err(RejectReason::Stale { delta });
        }

        // 4. Replay. The insertion happens here, before the signature
        //    check: an identifier is reserved the moment it passes
        //    freshness, bounding MAC work per identifier under attack.
        if !self
            .cache
            .check_and_insert(&message.device_id, &message.message_id)
        {
            return Err(RejectReason::Replay);
        }

        // 5. Signature, last because it is the most expensive.
        let record = self
            .store
            .lookup(&message.device_id)
            .ok_or(RejectReason::UnknownDevice)?;
        let payload = message.payload_bytes();
        let verified = gateway_crypto::verify_data(
            &message.device_id,
            message.timestamp,
            &message.message_id,
            payload.as_bytes(),
            &record.shared_secret,
            &message.signature,
        )
        .map_err(|e| RejectReason::Internal(e.to_string()))?;
        if !verified {
            return Err(RejectReason::BadSignature);
        }

        Ok(AcceptedMessage {
            device_id: message.device_id.into_owned(),
            payload: payload.to_string(),
        })
    }

    fn log_rejection(&self, transport_identity: &str, reason: &RejectReason) {
        match reason {
            RejectReason::Malformed(detail) => {
                info!(identity = transport_identity, %detail, "rejected malformed message");
            }
            RejectReason::Stale { delta } => {
                warn!(identity = transport_identity, delta, "rejected stale message");
            }
            RejectReason::Internal(detail) => {
                error!(identity = transport_identity, %detail, "message abandoned by internal error");
            }
            other => {
                warn!(identity = transport_identity, reason = other.label(), "rejected message");
            }
        }
    }
}

impl MessageValidatorApi for MessageValidator {
    fn validate(
        &self,
        transport_identity: &str,
        raw: &[u8],
    ) -> Result<AcceptedMessage, RejectReason> {
        let outcome = self.run_checks(transport_identity, raw);
        match &outcome {
            Ok(message) => {
                debug!(device_id = %message.device_id, "message accepted");
                self.metrics.record_accept();
            }
            Err(reason) => {
                self.log_rejection(transport_identity, reason);
                self.metrics.record_reject(reason.label());
            }
        }
        outcome
    }
}
