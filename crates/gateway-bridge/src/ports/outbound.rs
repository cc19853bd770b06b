//! Outbound ports: the backend HTTP surface and the device-facing publisher.

use thiserror::Error;

/// Errors from the backend egress path.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The configured base URL cannot carry path segments.
    #[error("backend base URL rejected: {0}")]
    InvalidBaseUrl(String),

    /// HTTP client construction failed.
    #[error("backend client construction failed: {0}")]
    Client(String),

    /// The backend was unreachable or the request timed out.
    #[error("backend transport error: {0}")]
    Transport(String),
}

/// Transient egress publish failure.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The transport refused or dropped the publish.
    #[error("publish failed: {0}")]
    Failed(String),
}

/// What the backend said. A non-2xx status is a reply, not a transport
/// error: bridging succeeded and the device may observe the backend's own
/// error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body, verbatim.
    pub body: Vec<u8>,
}

impl BackendReply {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Gateway to the backend service.
#[async_trait::async_trait]
pub trait BackendGateway: Send + Sync {
    /// POST a validated payload to the backend's device data endpoint.
    ///
    /// `payload` is the verbatim payload region of the accepted message.
    async fn forward(&self, device_id: &str, payload: &str) -> Result<BackendReply, BridgeError>;
}

/// Publisher on the device-facing transport.
#[async_trait::async_trait]
pub trait DevicePublisher: Send + Sync {
    /// Publish a body to a topic at-least-once.
    async fn publish(&self, topic: String, body: Vec<u8>) -> Result<(), PublishError>;
}
