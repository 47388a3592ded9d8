//! MQTT adapter error types.

use homesync_domain::error::HomeSyncError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The broker did not acknowledge the connection in time.
    #[error("timed out waiting for MQTT broker acknowledgement")]
    ConnectTimeout,

    /// The broker answered the connect with a non-success code.
    #[error("MQTT broker refused connection: {0:?}")]
    Refused(rumqttc::ConnectReturnCode),

    /// The network connection to the broker failed.
    #[error("MQTT connection error")]
    Connection(#[source] rumqttc::ConnectionError),

    /// The rumqttc client could not enqueue a request.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),
}

impl From<MqttError> for HomeSyncError {
    fn from(err: MqttError) -> Self {
        Self::Connection(Box::new(err))
    }
}
