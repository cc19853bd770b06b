//! Core domain entities.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::fmt;

/// A provisioned device as loaded from the credential table.
///
/// Records are read once at startup and are immutable for the process
/// lifetime. The shared secret is the device's HMAC key; it never leaves
/// this struct except as a MAC input.
#[derive(Clone)]
pub struct DeviceRecord {
    /// Unique device identifier (primary key in the credential table).
    pub device_id: String,
    /// Shared HMAC secret, at least [`crate::MIN_SECRET_LEN`] bytes.
    pub shared_secret: Vec<u8>,
    /// Provisioning time, seconds since the epoch.
    pub created_at: i64,
}

impl fmt::Debug for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The secret must never reach logs.
        f.debug_struct("DeviceRecord")
            .field("device_id", &self.device_id)
            .field("shared_secret", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// A backend-initiated command, published to the device's command topic.
///
/// The target device is implied by the publication topic, so the envelope
/// carries no `device_id`. The signature covers
/// `decimal(timestamp) || message_id || payload` - the payload bytes exactly
/// as serialized here, which is why `payload` is kept as a raw JSON region
/// rather than a re-serializable value.
#[derive(Debug, Serialize, Deserialize)]
pub struct OutboundCommand {
    /// Gateway wall-clock seconds at construction time.
    pub timestamp: i64,
    /// Fresh UUID identifying this command.
    pub message_id: String,
    /// The command payload, verbatim as signed.
    pub payload: Box<RawValue>,
    /// Lowercase-hex HMAC-SHA256 tag.
    pub signature: String,
}
