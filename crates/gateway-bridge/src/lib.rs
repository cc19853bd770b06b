//! # Gateway Bridge - Ingress, Egress, and the Bridging Pipeline
//!
//! Connects the two asynchronous I/O surfaces of the gateway:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          GATEWAY BRIDGE                          │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  MQTT (mutual TLS, device/+/data)                                │
//! │        │ (identity, raw bytes)                                   │
//! │        ▼                                                         │
//! │  Dispatcher ── identity-sharded worker lanes ──► BridgeService   │
//! │                                                       │          │
//! │                         validator ◄───────────────────┤          │
//! │                                                       ▼          │
//! │                              POST ${backend}/device/<id>/data    │
//! │                                                       │          │
//! │        device/<id>/response ◄── ResponseRouter ◄──────┘          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sharding by identity preserves per-device publication order while letting
//! distinct devices proceed in parallel. The whole pipeline for one message
//! runs under a single deadline; an expired message is abandoned and any
//! partial backend response discarded.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod backoff;
pub mod dispatch;
pub mod ports;
pub mod router;
pub mod service;

// Re-exports for public API
pub use adapters::backend::HttpBackendGateway;
pub use adapters::mqtt::{run_ingress, MqttLink, MqttPublisher, MqttSettings, MqttSetupError};
pub use backoff::Backoff;
pub use dispatch::{Dispatcher, Publication};
pub use ports::outbound::{BackendGateway, BackendReply, BridgeError, DevicePublisher, PublishError};
pub use router::ResponseRouter;
pub use service::{BridgeService, BridgeSettings};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
