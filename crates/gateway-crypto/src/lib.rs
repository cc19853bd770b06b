//! # Gateway Crypto - Message Authentication Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `mac` | HMAC-SHA256 | Device message and command authentication |
//! | `compare` | `subtle` constant-time equality | Bearer token checks |
//!
//! ## Signed regions
//!
//! Device data messages are authenticated over the ordered concatenation
//! `device_id || decimal(timestamp) || message_id || payload_bytes` with no
//! separators. Backend commands omit the leading `device_id` (the target is
//! implied by the publication topic), so their region is
//! `decimal(timestamp) || message_id || payload_bytes`. Tags are transmitted
//! as 64 lowercase hex characters and compared in constant time.
//!
//! The payload component is the sender's serialized bytes, verbatim. Callers
//! must hand this module the exact on-wire payload region; re-serializing the
//! payload breaks verification whenever two serializers disagree on key order
//! or number formatting.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod compare;
pub mod errors;
pub mod mac;

// Re-exports
pub use compare::constant_time_eq;
pub use errors::CryptoError;
pub use mac::{sign_command, sign_data, verify_command, verify_data, TAG_LEN};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
