//! The fixed MQTT topic scheme.
//!
//! Ingress: `device/<device_id>/data`. Egress: `device/<device_id>/response`
//! for backend replies and `device/<device_id>/command` for backend-initiated
//! commands. The device segment of an ingress topic is the transport identity
//! the broker binds to the publisher's certificate common name.

/// Subscription filter covering every device's data topic.
pub const DATA_TOPIC_FILTER: &str = "device/+/data";

/// Topic a device's backend replies are published to.
pub fn response_topic(device_id: &str) -> String {
    format!("device/{device_id}/response")
}

/// Topic a device's signed commands are published to.
pub fn command_topic(device_id: &str) -> String {
    format!("device/{device_id}/command")
}

/// Extract the device segment from a data-topic publication.
///
/// Returns `None` for any topic outside the `device/<id>/data` scheme,
/// including topics with an empty device segment or extra segments.
pub fn device_from_data_topic(topic: &str) -> Option<&str> {
    let mut segments = topic.split('/');
    if segments.next() != Some("device") {
        return None;
    }
    let device_id = segments.next().filter(|id| !id.is_empty())?;
    if segments.next() != Some("data") || segments.next().is_some() {
        return None;
    }
    Some(device_id)
}
