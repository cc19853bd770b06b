//! Response router: backend replies back onto the device's response topic.

use crate::ports::outbound::{DevicePublisher, PublishError};
use gateway_types::topics;
use std::sync::Arc;

/// Publishes backend response bodies to `device/<device_id>/response`.
///
/// Delivery is at-least-once; duplicates on this path are tolerable because
/// responses are not replay-protected.
#[derive(Clone)]
pub struct ResponseRouter {
    publisher: Arc<dyn DevicePublisher>,
}

impl ResponseRouter {
    /// Create a router over the device-facing publisher.
    pub fn new(publisher: Arc<dyn DevicePublisher>) -> Self {
        Self { publisher }
    }

    /// Publish a body to the device's response topic.
    pub async fn respond(&self, device_id: &str, body: Vec<u8>) -> Result<(), PublishError> {
        self.publisher
            .publish(topics::response_topic(device_id), body)
            .await
    }
}
