//! Publishing payloads to an MQTT broker.

use std::future::Future;
use std::time::Duration;

use roomsight_common::MqttConfig;
use rumqttc::{AsyncClient, ConnectionError, Event, EventLoop, MqttOptions, Outgoing, Packet};

pub use rumqttc::QoS;

use crate::credentials::Credentials;
use crate::error::PublishError;

/// Request channel capacity for the short-lived client.
const CLIENT_CAPACITY: usize = 10;

/// Upper bound for flushing DISCONNECT after a delivered publish.
const DISCONNECT_GRACE: Duration = Duration::from_secs(1);

/// Capability to deliver one payload to a topic.
///
/// Connection details and credentials are bound at construction time.
pub trait Publisher {
    fn send(
        &mut self,
        topic: &str,
        payload: Vec<u8>,
        qos: QoS,
    ) -> impl Future<Output = Result<(), PublishError>> + Send;
}

/// One-shot MQTT publisher.
///
/// Every [`send`](Publisher::send) opens a fresh connection, publishes,
/// waits for the acknowledgement matching the requested QoS, then
/// disconnects. Nothing is queued between sends.
#[derive(Debug, Clone)]
pub struct MqttPublisher {
    config: MqttConfig,
    credentials: Credentials,
}

impl MqttPublisher {
    /// Create a new publisher.
    pub fn new(config: MqttConfig, credentials: Credentials) -> Self {
        Self {
            config,
            credentials,
        }
    }

    /// Get the broker configuration.
    pub fn config(&self) -> &MqttConfig {
        &self.config
    }

    /// Broker address as `host:port`.
    pub fn broker(&self) -> String {
        format!("{}:{}", self.config.hostname, self.config.port)
    }

    fn options(&self) -> MqttOptions {
        let mut opts = MqttOptions::new(
            self.config.client_id.as_str(),
            self.config.hostname.as_str(),
            self.config.port,
        );
        opts.set_keep_alive(Duration::from_secs(self.config.keep_alive_secs))
            .set_clean_session(true)
            .set_credentials(
                self.credentials.username.as_str(),
                self.credentials.password.as_str(),
            );
        opts
    }

    async fn deliver(&self, topic: &str, payload: Vec<u8>, qos: QoS) -> Result<(), PublishError> {
        let (client, mut eventloop) = AsyncClient::new(self.options(), CLIENT_CAPACITY);

        client
            .publish(topic, qos, false, payload)
            .await
            .map_err(|e| PublishError::Client(e.to_string()))?;

        let timeout = Duration::from_secs(self.config.publish_timeout_secs);
        tokio::time::timeout(timeout, wait_for_delivery(&mut eventloop, qos))
            .await
            .map_err(|_| PublishError::Timeout {
                secs: self.config.publish_timeout_secs,
            })??;

        // Delivery is confirmed; a failed DISCONNECT only leaves the broker to time us out.
        if client.disconnect().await.is_ok() {
            let _ = tokio::time::timeout(DISCONNECT_GRACE, drain_disconnect(&mut eventloop)).await;
        }

        Ok(())
    }
}

impl Publisher for MqttPublisher {
    async fn send(&mut self, topic: &str, payload: Vec<u8>, qos: QoS) -> Result<(), PublishError> {
        self.deliver(topic, payload, qos).await
    }
}

/// Drive the event loop until the broker confirms delivery for `qos`.
async fn wait_for_delivery(eventloop: &mut EventLoop, qos: QoS) -> Result<(), PublishError> {
    loop {
        match eventloop.poll().await {
            Ok(Event::Outgoing(Outgoing::Publish(_))) if qos == QoS::AtMostOnce => return Ok(()),
            Ok(Event::Incoming(Packet::PubAck(_))) if qos == QoS::AtLeastOnce => return Ok(()),
            Ok(Event::Incoming(Packet::PubComp(_))) if qos == QoS::ExactlyOnce => return Ok(()),
            Ok(event) => tracing::trace!(?event, "MQTT event"),
            Err(ConnectionError::ConnectionRefused(code)) => {
                return Err(PublishError::Refused(format!("{:?}", code)));
            }
            Err(e) => return Err(PublishError::Connection(e.to_string())),
        }
    }
}

async fn drain_disconnect(eventloop: &mut EventLoop) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Outgoing(Outgoing::Disconnect)) | Err(_) => break,
            Ok(_) => {}
        }
    }
}
