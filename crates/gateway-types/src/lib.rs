//! # Gateway Types - Shared Domain Entities
//!
//! The Single Source of Truth for types used by more than one gateway
//! subsystem: device records and the credential store built from them, the
//! outbound command envelope, the MQTT topic scheme, and the atomic metrics
//! counters.
//!
//! Everything in this crate is either immutable after construction
//! (`CredentialStore`) or a plain value type; the mutable shared state of the
//! gateway (the replay cache) lives with the validator that owns it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod credentials;
pub mod entities;
pub mod metrics;
pub mod topics;

pub use credentials::{CredentialStore, StoreError, MIN_SECRET_LEN};
pub use entities::{DeviceRecord, OutboundCommand};
pub use metrics::GatewayMetrics;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
