//! # homesync-adapter-mqtt
//!
//! MQTT adapter, the message bus client of homesync.
//!
//! ## Responsibilities
//! - Connect to the broker with a bounded timeout and fail explicitly
//! - Subscribe to the configured filters, and re-subscribe on every reconnect
//! - Forward every received publication, in receipt order, to the inbound
//!   channel consumed by the coordinator
//! - Implement the `MessagePublisher` port with fire-and-forget publishes
//!
//! ## Dependency rule
//! Same as other adapters: depends on `homesync-app` and `homesync-domain`.

mod config;
mod error;

pub use config::MqttConfig;
pub use error::MqttError;

use rumqttc::{
    AsyncClient, ConnectReturnCode, ConnectionError, Event, EventLoop, MqttOptions, Outgoing,
    Packet, QoS,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use homesync_app::ports::MessagePublisher;
use homesync_domain::error::HomeSyncError;
use homesync_domain::message::Message;

/// A live broker connection.
pub struct MqttSession {
    /// Publisher handle, cheap to clone.
    pub bus: MqttBus,
    /// Every publication received on a subscribed filter.
    pub inbound: mpsc::Receiver<Message>,
    /// Task driving the network event loop. Ends after [`MqttBus::disconnect`]
    /// or once `inbound` is dropped.
    pub pump: JoinHandle<()>,
}

/// Publisher side of the broker connection.
#[derive(Clone)]
pub struct MqttBus {
    client: AsyncClient,
}

impl MqttBus {
    /// Connect to the broker and subscribe to `subscriptions`.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::ConnectTimeout`] when the broker does not
    /// acknowledge within the configured timeout, [`MqttError::Refused`]
    /// when it rejects the connection, and [`MqttError::Connection`] on
    /// network failure.
    pub async fn connect(
        config: &MqttConfig,
        subscriptions: Vec<String>,
    ) -> Result<MqttSession, MqttError> {
        let mut options =
            MqttOptions::new(&config.client_id, &config.broker_host, config.broker_port);
        options.set_keep_alive(config.keep_alive());
        options.set_clean_session(true);

        let capacity = config.channel_capacity.max(1);
        let (client, mut eventloop) = AsyncClient::new(options, capacity);

        tracing::info!(
            host = %config.broker_host,
            port = config.broker_port,
            client_id = %config.client_id,
            "connecting to MQTT broker"
        );
        tokio::time::timeout(config.connect_timeout(), wait_for_connack(&mut eventloop))
            .await
            .map_err(|_| MqttError::ConnectTimeout)??;
        tracing::info!("connected to MQTT broker");

        let (sender, inbound) = mpsc::channel(capacity);
        let pump = tokio::spawn(pump(
            eventloop,
            client.clone(),
            subscriptions.clone(),
            sender,
            config.reconnect_delay(),
        ));

        for filter in &subscriptions {
            client
                .subscribe(filter.as_str(), QoS::AtLeastOnce)
                .await
                .map_err(MqttError::Client)?;
            tracing::info!(%filter, "subscribed");
        }

        Ok(MqttSession {
            bus: Self { client },
            inbound,
            pump,
        })
    }

    /// Ask the broker to close the connection.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Client`] if the request could not be enqueued.
    pub async fn disconnect(&self) -> Result<(), MqttError> {
        self.client.disconnect().await.map_err(MqttError::Client)
    }
}

impl MessagePublisher for MqttBus {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), HomeSyncError> {
        self.client
            .try_publish(topic, QoS::AtLeastOnce, false, payload.as_bytes().to_vec())
            .map_err(|err| HomeSyncError::publish(topic, MqttError::Client(err)))
    }
}

async fn wait_for_connack(eventloop: &mut EventLoop) -> Result<(), MqttError> {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                return match ack.code {
                    ConnectReturnCode::Success => Ok(()),
                    code => Err(MqttError::Refused(code)),
                };
            }
            Ok(other) => tracing::trace!(event = ?other, "waiting for connack"),
            Err(ConnectionError::ConnectionRefused(code)) => return Err(MqttError::Refused(code)),
            Err(err) => return Err(MqttError::Connection(err)),
        }
    }
}

async fn pump(
    mut eventloop: EventLoop,
    client: AsyncClient,
    subscriptions: Vec<String>,
    sender: mpsc::Sender<Message>,
    reconnect_delay: std::time::Duration,
) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let topic = String::from_utf8_lossy(publish.topic.as_ref()).into_owned();
                if !Message::is_lossless_payload(&publish.payload) {
                    tracing::warn!(%topic, "payload is not valid UTF-8, storing it with replacement characters");
                }
                let message = Message::from_bytes(topic, &publish.payload);
                tracing::debug!(topic = %message.topic, "message received");
                if sender.send(message).await.is_err() {
                    tracing::info!("inbound channel closed, stopping MQTT pump");
                    break;
                }
            }
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                tracing::info!("reconnected to MQTT broker");
                for filter in &subscriptions {
                    if let Err(err) = client.try_subscribe(filter.as_str(), QoS::AtLeastOnce) {
                        tracing::error!(%filter, error = %err, "re-subscribe failed");
                    }
                }
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                tracing::info!("disconnected from MQTT broker");
                break;
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, ?reconnect_delay, "MQTT connection error");
                tokio::time::sleep(reconnect_delay).await;
            }
        }
    }
}
