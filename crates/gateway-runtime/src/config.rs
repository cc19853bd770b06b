//! Gateway configuration with validation.
//!
//! Loaded from a TOML file; every option has a default so a minimal file
//! only needs the deployment-specific values. Unknown keys are rejected so
//! a typo cannot silently fall back to a default.

use gateway_bridge::MqttSettings;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors, fatal at startup only.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file was not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// `broker_host` is empty.
    #[error("broker_host must be set")]
    MissingBrokerHost,

    /// `command_bearer_token` is empty.
    #[error("command_bearer_token must be set")]
    MissingBearerToken,

    /// `skew_budget_seconds` is zero or negative.
    #[error("skew_budget_seconds must be positive")]
    InvalidSkewBudget,

    /// `replay_cache_size` is zero.
    #[error("replay_cache_size cannot be 0")]
    InvalidCacheSize,

    /// `http_timeout_seconds` is zero.
    #[error("http_timeout_seconds cannot be 0")]
    InvalidHttpTimeout,

    /// The per-message deadline does not cover the backend timeout.
    #[error("message_deadline_seconds must exceed http_timeout_seconds")]
    DeadlineTooShort,

    /// `ingress_workers` is zero.
    #[error("ingress_workers cannot be 0")]
    InvalidWorkerCount,
}

/// Main gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Broker hostname for the device transport.
    pub broker_host: String,
    /// Broker TLS port.
    pub broker_port: u16,
    /// Trust anchor for the broker's certificate.
    pub ca_file: PathBuf,
    /// The gateway's own certificate, PEM.
    pub cert_file: PathBuf,
    /// The gateway's private key, PEM.
    pub key_file: PathBuf,
    /// URL prefix for backend data POSTs.
    pub backend_base_url: String,
    /// Freshness tolerance in seconds.
    pub skew_budget_seconds: i64,
    /// Per-device replay identifier retention.
    pub replay_cache_size: usize,
    /// Backend HTTP timeout in seconds.
    pub http_timeout_seconds: u64,
    /// Shared secret accepted by the command ingress.
    pub command_bearer_token: String,
    /// Bind address for the command ingress.
    pub command_listen_addr: SocketAddr,
    /// Path to the devices table.
    pub credentials_path: PathBuf,
    /// Whole-pipeline deadline per message, in seconds.
    pub message_deadline_seconds: u64,
    /// Ingress worker lanes (per-device order is preserved regardless).
    pub ingress_workers: usize,
    /// Queue depth per worker lane.
    pub ingress_queue_depth: usize,
    /// Route non-2xx backend bodies back to the device.
    pub forward_backend_errors: bool,
    /// Publish a failure notice when the backend is unreachable.
    pub report_transport_errors: bool,
    /// MQTT client identifier on the broker.
    pub mqtt_client_id: String,
    /// MQTT keep-alive in seconds.
    pub mqtt_keep_alive_seconds: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 8883,
            ca_file: PathBuf::from("certs/ca.crt"),
            cert_file: PathBuf::from("certs/gateway.crt"),
            key_file: PathBuf::from("certs/gateway.key"),
            backend_base_url: "http://127.0.0.1:5000".to_string(),
            skew_budget_seconds: 300,
            replay_cache_size: 1000,
            http_timeout_seconds: 10,
            command_bearer_token: String::new(),
            command_listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            credentials_path: PathBuf::from("devices.db"),
            message_deadline_seconds: 15,
            ingress_workers: 4,
            ingress_queue_depth: 64,
            forward_backend_errors: true,
            report_transport_errors: false,
            mqtt_client_id: "fieldgate".to_string(),
            mqtt_keep_alive_seconds: 30,
        }
    }
}

impl GatewayConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker_host.is_empty() {
            return Err(ConfigError::MissingBrokerHost);
        }
        if self.command_bearer_token.is_empty() {
            return Err(ConfigError::MissingBearerToken);
        }
        if self.skew_budget_seconds <= 0 {
            return Err(ConfigError::InvalidSkewBudget);
        }
        if self.replay_cache_size == 0 {
            return Err(ConfigError::InvalidCacheSize);
        }
        if self.http_timeout_seconds == 0 {
            return Err(ConfigError::InvalidHttpTimeout);
        }
        if self.message_deadline_seconds <= self.http_timeout_seconds {
            return Err(ConfigError::DeadlineTooShort);
        }
        if self.ingress_workers == 0 {
            return Err(ConfigError::InvalidWorkerCount);
        }
        Ok(())
    }

    /// Backend HTTP timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    /// Whole-pipeline deadline per message.
    pub fn message_deadline(&self) -> Duration {
        Duration::from_secs(self.message_deadline_seconds)
    }

    /// Broker session settings for the ingress adapter.
    pub fn mqtt_settings(&self) -> MqttSettings {
        MqttSettings {
            broker_host: self.broker_host.clone(),
            broker_port: self.broker_port,
            client_id: self.mqtt_client_id.clone(),
            ca_file: self.ca_file.clone(),
            cert_file: self.cert_file.clone(),
            key_file: self.key_file.clone(),
            keep_alive: Duration::from_secs(self.mqtt_keep_alive_seconds),
        }
    }
}
