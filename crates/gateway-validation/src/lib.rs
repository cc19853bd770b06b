//! # Gateway Validation - The Per-Message Security Pipeline
//!
//! Binds transport identity to application identity and enforces the
//! message-acceptance policy for every publication the ingress adapter
//! delivers.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     MESSAGE VALIDATOR                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  (transport_identity, raw bytes)                             │
//! │        │                                                     │
//! │        ▼                                                     │
//! │  1. parse + schema ──► malformed                             │
//! │  2. identity        ──► identity_mismatch                    │
//! │  3. freshness       ──► stale            (clock source)      │
//! │  4. replay          ──► replay           (replay cache)      │
//! │  5. signature       ──► unknown_device | bad_signature       │
//! │        │                 (credential store, HMAC verify)     │
//! │        ▼                                                     │
//! │  accepted(device_id, verbatim payload bytes)                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The order is fixed: cheap structural checks run first, freshness precedes
//! replay so stale traffic never pollutes the cache, and the signature check
//! runs last because it is the most expensive and needs a secret lookup.
//! When several checks would fail, the earliest one names the reason.
//!
//! The replay insertion happens during check 4, before the signature check.
//! A tampered message therefore reserves its message identifier: replaying
//! the original bytes afterwards is rejected as a replay. This bounds the
//! MAC work an attacker can force per identifier.
//!
//! # Shared state
//!
//! The replay cache is the only mutable structure on the hot path. It is
//! sharded by device identifier; validations for distinct devices contend
//! only when their shards collide. The credential store is immutable after
//! load and the clock source is a read-only port.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod ports;
pub mod service;

// Re-exports for public API
pub use domain::entities::AcceptedMessage;
pub use domain::errors::RejectReason;
pub use domain::replay::ReplayCache;
pub use ports::inbound::MessageValidatorApi;
pub use ports::outbound::{SystemTimeSource, TimeSource};
pub use service::MessageValidator;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
