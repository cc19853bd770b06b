//! # Gateway Command - Backend-Initiated Command Ingress
//!
//! A minimal HTTP surface the backend drives to push signed commands to a
//! specific device:
//!
//! - `POST /command/:device_id` - bearer-authenticated; constructs
//!   `{timestamp, message_id, payload, signature}` and publishes it on
//!   `device/<device_id>/command`.
//! - `GET /health` - liveness.
//! - `GET /metrics` - gateway counters.
//!
//! Status codes: 202 published, 400 malformed body, 401 bad auth, 404
//! unknown device, 502 publish failure.
//!
//! # Security
//!
//! - The bearer token is compared in constant time.
//! - Commands are signed over `decimal(timestamp) || message_id || payload`;
//!   unlike device data messages there is no `device_id` in the signed
//!   region, because the target is implied by the publication topic and the
//!   command path generates both the payload bytes and the MAC locally.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod auth;
pub mod error;
pub mod service;

pub use auth::BearerAuthLayer;
pub use error::CommandError;
pub use service::{router, CommandState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
