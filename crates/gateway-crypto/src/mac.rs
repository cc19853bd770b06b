//! HMAC-SHA256 signing and verification over the canonical signed regions.

use crate::errors::CryptoError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// MAC tag length in bytes (64 hex characters on the wire).
pub const TAG_LEN: usize = 32;

fn keyed(secret: &[u8]) -> Result<HmacSha256, CryptoError> {
    HmacSha256::new_from_slice(secret).map_err(|_| CryptoError::InvalidKey)
}

/// Decode a wire tag. Anything but exactly 64 hex characters is a mismatch,
/// never an error: the caller treats a bad tag the same as a wrong one.
fn decode_tag(tag_hex: &str) -> Option<[u8; TAG_LEN]> {
    let bytes = hex::decode(tag_hex).ok()?;
    bytes.try_into().ok()
}

/// Sign a device data message.
///
/// The region is `device_id || decimal(timestamp) || message_id || payload`,
/// concatenated without separators. Returns the tag as lowercase hex.
pub fn sign_data(
    device_id: &str,
    timestamp: i64,
    message_id: &str,
    payload: &[u8],
    secret: &[u8],
) -> Result<String, CryptoError> {
    let mut mac = keyed(secret)?;
    mac.update(device_id.as_bytes());
    mac.update(timestamp.to_string().as_bytes());
    mac.update(message_id.as_bytes());
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a device data message tag in constant time.
///
/// Returns `Ok(false)` on any mismatch, including tags that are not 64 hex
/// characters.
pub fn verify_data(
    device_id: &str,
    timestamp: i64,
    message_id: &str,
    payload: &[u8],
    secret: &[u8],
    tag_hex: &str,
) -> Result<bool, CryptoError> {
    let Some(tag) = decode_tag(tag_hex) else {
        return Ok(false);
    };
    let mut mac = keyed(secret)?;
    mac.update(device_id.as_bytes());
    mac.update(timestamp.to_string().as_bytes());
    mac.update(message_id.as_bytes());
    mac.update(payload);
    Ok(mac.verify_slice(&tag).is_ok())
}

/// Sign a backend command.
///
/// Commands omit `device_id` from the region; the device verifies against
/// its own identity implicitly because only its command topic carries the
/// message.
pub fn sign_command(
    timestamp: i64,
    message_id: &str,
    payload: &[u8],
    secret: &[u8],
) -> Result<String, CryptoError> {
    let mut mac = keyed(secret)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(message_id.as_bytes());
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a backend command tag in constant time.
pub fn verify_command(
    timestamp: i64,
    message_id: &str,
    payload: &[u8],
    secret: &[u8],
    tag_hex: &str,
) -> Result<bool, CryptoError> {
    let Some(tag) = decode_tag(tag_hex) else {
        return Ok(false);
    };
    let mut mac = keyed(secret)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(message_id.as_bytes());
    mac.update(payload);
    Ok(mac.verify_slice(&tag).is_ok())
}
