//! Ports: the bridge's external dependencies.

pub mod outbound;
