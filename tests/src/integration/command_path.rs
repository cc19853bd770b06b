//! # Command Path Integration Scenarios
//!
//! Drives the backend → device command ingress through its HTTP surface
//! with a recording publisher behind the device transport port, covering
//! the full status taxonomy (202 / 400 / 401 / 404 / 502) and the
//! command-signing asymmetry: the signed region omits `device_id`.

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use gateway_bridge::{DevicePublisher, PublishError};
    use gateway_command::{router, CommandState};
    use gateway_types::{CredentialStore, DeviceRecord, GatewayMetrics, OutboundCommand};
    use gateway_validation::TimeSource;
    use http_body_util::BodyExt;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tower::ServiceExt;

    const SECRET: &[u8] = b"supersecretkey123";
    const NOW: i64 = 1_727_712_050;
    const TOKEN: &str = "cmd-token-123";

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    struct FixedClock(i64);

    impl TimeSource for FixedClock {
        fn now(&self) -> i64 {
            self.0
        }
    }

    struct RecordingPublisher {
        published: Mutex<Vec<(String, Vec<u8>)>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl DevicePublisher for RecordingPublisher {
        async fn publish(&self, topic: String, body: Vec<u8>) -> Result<(), PublishError> {
            if self.fail {
                return Err(PublishError::Failed("broker gone".to_string()));
            }
            self.published.lock().push((topic, body));
            Ok(())
        }
    }

    fn harness(fail_publish: bool) -> (Router, Arc<RecordingPublisher>) {
        let store = CredentialStore::from_records(vec![DeviceRecord {
            device_id: "sensor_001".to_string(),
            shared_secret: SECRET.to_vec(),
            created_at: 1_727_712_000,
        }])
        .unwrap();
        let publisher = Arc::new(RecordingPublisher {
            published: Mutex::new(Vec::new()),
            fail: fail_publish,
        });
        let state = Arc::new(CommandState::new(
            Arc::new(store),
            Arc::clone(&publisher) as Arc<dyn DevicePublisher>,
            Arc::new(FixedClock(NOW)),
            TOKEN.to_string(),
            Arc::new(GatewayMetrics::new()),
        ));
        (router(state), publisher)
    }

    fn command_request(device_id: &str, token: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(format!("/command/{device_id}"))
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    // =========================================================================
    // SCENARIO: ACCEPTED COMMAND
    // =========================================================================

    /// 202: a signed command lands on the device's command topic, and its
    /// signature verifies over `decimal(timestamp) || message_id || payload`
    /// - without `device_id`.
    #[tokio::test]
    async fn test_command_published_and_signed() {
        let (app, publisher) = harness(false);

        let response = app
            .oneshot(command_request("sensor_001", Some(TOKEN), r#"{"action":"reboot"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let reply = body_json(response).await;
        assert_eq!(reply["status"], "accepted");
        let message_id = reply["message_id"].as_str().unwrap().to_string();

        let published = publisher.published.lock().clone();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "device/sensor_001/command");

        let command: OutboundCommand = serde_json::from_slice(&published[0].1).unwrap();
        assert_eq!(command.timestamp, NOW);
        assert_eq!(command.message_id, message_id);
        assert_eq!(command.payload.get(), r#"{"action":"reboot"}"#);

        // The command region verifies.
        assert!(gateway_crypto::verify_command(
            command.timestamp,
            &command.message_id,
            command.payload.get().as_bytes(),
            SECRET,
            &command.signature,
        )
        .unwrap());

        // The data region (with device_id prepended) does not: commands are
        // deliberately signed without the device identifier.
        assert!(!gateway_crypto::verify_data(
            "sensor_001",
            command.timestamp,
            &command.message_id,
            command.payload.get().as_bytes(),
            SECRET,
            &command.signature,
        )
        .unwrap());
    }

    /// The payload bytes embedded in the envelope are exactly the bytes
    /// that were signed, even when the backend's body used odd formatting.
    #[tokio::test]
    async fn test_payload_canonicalized_once_and_signed() {
        let (app, publisher) = harness(false);

        let response = app
            .oneshot(command_request(
                "sensor_001",
                Some(TOKEN),
                "{ \"action\" : \"reboot\",\n \"delay\": 5 }",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let published = publisher.published.lock().clone();
        let command: OutboundCommand = serde_json::from_slice(&published[0].1).unwrap();
        // Compact serialization, no whitespace.
        assert!(!command.payload.get().contains(' '));
        assert!(gateway_crypto::verify_command(
            command.timestamp,
            &command.message_id,
            command.payload.get().as_bytes(),
            SECRET,
            &command.signature,
        )
        .unwrap());
    }

    // =========================================================================
    // SCENARIOS: STATUS TAXONOMY
    // =========================================================================

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let (app, publisher) = harness(false);
        let response = app
            .oneshot(command_request("sensor_001", None, r#"{"action":"reboot"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(publisher.published.lock().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_token_is_unauthorized() {
        let (app, publisher) = harness(false);
        let response = app
            .oneshot(command_request("sensor_001", Some("wrong"), r#"{"action":"reboot"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(publisher.published.lock().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_device_is_not_found() {
        let (app, publisher) = harness(false);
        let response = app
            .oneshot(command_request("sensor_999", Some(TOKEN), r#"{"action":"reboot"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(publisher.published.lock().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_bad_requests() {
        for body in ["not json", "42", r#"[1,2]"#, r#""text""#, "null"] {
            let (app, publisher) = harness(false);
            let response = app
                .oneshot(command_request("sensor_001", Some(TOKEN), body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
            assert!(publisher.published.lock().is_empty());
        }
    }

    /// Body validation runs before the device lookup, mirroring the
    /// cheap-checks-first ordering of the data path.
    #[tokio::test]
    async fn test_malformed_body_wins_over_unknown_device() {
        let (app, _) = harness(false);
        let response = app
            .oneshot(command_request("sensor_999", Some(TOKEN), "not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_publish_failure_is_bad_gateway() {
        let (app, _) = harness(true);
        let response = app
            .oneshot(command_request("sensor_001", Some(TOKEN), r#"{"action":"reboot"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    // =========================================================================
    // OPEN ENDPOINTS
    // =========================================================================

    #[tokio::test]
    async fn test_health_needs_no_token() {
        let (app, _) = harness(false);
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_metrics_snapshot_is_served() {
        let (app, _) = harness(false);
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["commands_published"], 0);
    }
}
