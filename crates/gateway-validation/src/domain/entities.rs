//! The on-wire message schema and the validator's accept result.

use serde::Deserialize;
use serde_json::value::RawValue;
use std::borrow::Cow;

/// A device publication as received, borrowed from the raw bytes.
///
/// The schema is strict: exactly these five fields, unknown fields rejected
/// so nothing can ride along outside the signed region. `payload` is kept as
/// the raw JSON region because the MAC covers the sender's serialization
/// byte-for-byte; re-serializing here would break verification for any
/// sender whose serializer disagrees with ours on key order or number
/// formatting.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WireMessage<'a> {
    /// Self-claimed device identity.
    #[serde(borrow)]
    pub device_id: Cow<'a, str>,
    /// Sender wall-clock seconds since the epoch.
    pub timestamp: i64,
    /// Per-device unique message identifier (UUID-shaped, treated as opaque).
    #[serde(borrow)]
    pub message_id: Cow<'a, str>,
    /// The device data, verbatim as signed.
    #[serde(borrow)]
    pub payload: &'a RawValue,
    /// 64 lowercase hex characters of HMAC-SHA256 tag.
    #[serde(borrow)]
    pub signature: Cow<'a, str>,
}

impl<'a> WireMessage<'a> {
    /// Decode and schema-check a raw publication.
    ///
    /// The returned error string names what was wrong; the caller maps it to
    /// the `malformed` rejection.
    pub fn parse(raw: &'a [u8]) -> Result<Self, String> {
        let message: WireMessage<'a> =
            serde_json::from_slice(raw).map_err(|e| e.to_string())?;
        if message.device_id.is_empty() {
            return Err("device_id must be non-empty".to_string());
        }
        if message.message_id.is_empty() {
            return Err("message_id must be non-empty".to_string());
        }
        if !message.payload.get().starts_with('{') {
            return Err("payload must be a JSON object".to_string());
        }
        if !is_wire_tag(&message.signature) {
            return Err("signature must be 64 lowercase hex characters".to_string());
        }
        Ok(message)
    }

    /// The exact payload byte region the signature covers.
    pub fn payload_bytes(&self) -> &'a str {
        self.payload.get()
    }
}

fn is_wire_tag(signature: &str) -> bool {
    signature.len() == 64
        && signature
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// A message that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedMessage {
    /// The authenticated device identity.
    pub device_id: String,
    /// The payload exactly as it appeared on the wire.
    pub payload: String,
}
