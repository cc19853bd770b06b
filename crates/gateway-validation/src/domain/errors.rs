//! The rejection taxonomy.
//!
//! Every variant is peer-induced, per-message, and non-fatal except
//! `Internal`, which marks a message abandoned by an unexpected gateway
//! error; the process survives either way.

use thiserror::Error;

/// Why a message was rejected, named by the earliest failing check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The raw bytes did not decode as the strict five-field schema.
    #[error("malformed message: {0}")]
    Malformed(String),

    /// The claimed `device_id` differs from the transport identity.
    #[error("claimed identity {claimed:?} does not match transport identity {transport:?}")]
    IdentityMismatch {
        /// The `device_id` field inside the message.
        claimed: String,
        /// The identity the transport session vouched for.
        transport: String,
    },

    /// The timestamp is outside the skew budget.
    #[error("stale timestamp, delta {delta}s")]
    Stale {
        /// Signed difference `timestamp - now` in seconds.
        delta: i64,
    },

    /// The `(device_id, message_id)` pair was already observed.
    #[error("replayed message identifier")]
    Replay,

    /// No credential record exists for the claimed device.
    #[error("unknown device")]
    UnknownDevice,

    /// The MAC did not verify.
    #[error("bad signature")]
    BadSignature,

    /// Unexpected gateway-side failure; the message is abandoned.
    #[error("internal validation error: {0}")]
    Internal(String),
}

impl RejectReason {
    /// Stable label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            RejectReason::Malformed(_) => "malformed",
            RejectReason::IdentityMismatch { .. } => "identity_mismatch",
            RejectReason::Stale { .. } => "stale",
            RejectReason::Replay => "replay",
            RejectReason::UnknownDevice => "unknown_device",
            RejectReason::BadSignature => "bad_signature",
            RejectReason::Internal(_) => "internal",
        }
    }
}
