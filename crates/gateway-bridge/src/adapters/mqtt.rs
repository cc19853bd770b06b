//! MQTT ingress and egress over mutually-authenticated TLS.
//!
//! One session to the broker carries everything: the `device/+/data`
//! subscription in, response and command publishes out. The broker binds
//! each device's certificate common name to its topic prefix, so the device
//! segment of an ingress topic is the transport identity surfaced to the
//! validator.

use crate::backoff::Backoff;
use crate::dispatch::Dispatcher;
use crate::ports::outbound::{DevicePublisher, PublishError};
use gateway_types::topics;
use rumqttc::{
    AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, TlsConfiguration, Transport,
};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

const RECONNECT_BASE: Duration = Duration::from_secs(1);
const RECONNECT_CAP: Duration = Duration::from_secs(30);

/// Broker endpoint and TLS material locations.
#[derive(Debug, Clone)]
pub struct MqttSettings {
    /// Broker hostname.
    pub broker_host: String,
    /// Broker TLS port.
    pub broker_port: u16,
    /// This gateway's client identifier on the broker.
    pub client_id: String,
    /// Trust anchor for the broker's certificate.
    pub ca_file: PathBuf,
    /// The gateway's own certificate, PEM.
    pub cert_file: PathBuf,
    /// The gateway's private key, PEM.
    pub key_file: PathBuf,
    /// MQTT keep-alive interval.
    pub keep_alive: Duration,
}

/// Errors establishing the broker session.
#[derive(Debug, Error)]
pub enum MqttSetupError {
    /// TLS material could not be read.
    #[error("failed to read TLS material {path}: {source}")]
    TlsMaterial {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// The broker session: shared client handle plus the event loop to drive.
pub struct MqttLink {
    /// Shared publish/subscribe handle.
    pub client: AsyncClient,
    /// Event loop; hand it to [`run_ingress`].
    pub eventloop: EventLoop,
}

impl MqttLink {
    /// Configure the mutually-authenticated session. The connection itself
    /// is established lazily as the event loop is polled.
    pub fn connect(settings: &MqttSettings) -> Result<Self, MqttSetupError> {
        let read = |path: &PathBuf| {
            std::fs::read(path).map_err(|source| MqttSetupError::TlsMaterial {
                path: path.clone(),
                source,
            })
        };
        let ca = read(&settings.ca_file)?;
        let client_cert = read(&settings.cert_file)?;
        let client_key = read(&settings.key_file)?;

        let mut options = MqttOptions::new(
            settings.client_id.clone(),
            settings.broker_host.clone(),
            settings.broker_port,
        );
        options.set_keep_alive(settings.keep_alive);
        options.set_transport(Transport::tls_with_config(TlsConfiguration::Simple {
            ca,
            alpn: None,
            client_auth: Some((client_cert, client_key)),
        }));

        let (client, eventloop) = AsyncClient::new(options, 64);
        Ok(Self { client, eventloop })
    }
}

/// Egress publisher over the shared session, QoS 1.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
}

impl MqttPublisher {
    /// Wrap the session's client handle.
    pub fn new(client: AsyncClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl DevicePublisher for MqttPublisher {
    async fn publish(&self, topic: String, body: Vec<u8>) -> Result<(), PublishError> {
        self.client
            .publish(topic, QoS::AtLeastOnce, false, body)
            .await
            .map_err(|e| PublishError::Failed(e.to_string()))
    }
}

/// Drive the broker session until shutdown.
///
/// Dispatches data-topic publications to the worker lanes, resubscribes on
/// every reconnect, and backs off with full jitter when the session drops.
/// Returns when the shutdown signal fires; dropping the dispatcher on
/// return closes the lanes so the workers can drain.
pub async fn run_ingress(
    mut eventloop: EventLoop,
    client: AsyncClient,
    dispatcher: Dispatcher,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut backoff = Backoff::new(RECONNECT_BASE, RECONNECT_CAP);
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                info!("ingress adapter stopping");
                break;
            }
            event = eventloop.poll() => match event {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("transport session established");
                    backoff.reset();
                    if let Err(e) = client
                        .subscribe(topics::DATA_TOPIC_FILTER, QoS::AtLeastOnce)
                        .await
                    {
                        error!(error = %e, "data topic subscription failed");
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    match topics::device_from_data_topic(&publish.topic) {
                        Some(identity) => {
                            dispatcher.dispatch(identity.to_string(), publish.payload).await;
                        }
                        None => {
                            debug!(topic = %publish.topic, "ignoring publication outside the data topic scheme");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    let delay = backoff.next();
                    warn!(error = %e, delay_ms = delay.as_millis() as u64, "transport session lost, backing off");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
