//! Backend HTTP egress over reqwest.

use crate::ports::outbound::{BackendGateway, BackendReply, BridgeError};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use url::Url;

/// POSTs validated payloads to `${base}/device/<device_id>/data`.
pub struct HttpBackendGateway {
    client: reqwest::Client,
    base: Url,
}

impl HttpBackendGateway {
    /// Build the client with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BridgeError> {
        let base = Url::parse(base_url).map_err(|e| BridgeError::InvalidBaseUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(BridgeError::InvalidBaseUrl(format!(
                "{base_url:?} cannot carry path segments"
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BridgeError::Client(e.to_string()))?;
        Ok(Self { client, base })
    }

    /// The data endpoint for one device, with the identifier path-escaped.
    fn data_url(&self, device_id: &str) -> Result<Url, BridgeError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| BridgeError::InvalidBaseUrl("base has no path".to_string()))?
            .pop_if_empty()
            .extend(["device", device_id, "data"]);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl BackendGateway for HttpBackendGateway {
    async fn forward(&self, device_id: &str, payload: &str) -> Result<BackendReply, BridgeError> {
        let url = self.data_url(device_id)?;
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_owned())
            .send()
            .await
            .map_err(|e| BridgeError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| BridgeError::Transport(e.to_string()))?;
        Ok(BackendReply {
            status,
            body: body.to_vec(),
        })
    }
}
