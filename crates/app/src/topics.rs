//! Topic namespace shared by every participant on the bus.

use serde::Deserialize;

use homesync_domain::topic;

/// Names of the topics the core reads and writes.
///
/// Every device and viewer must agree on these; a single namespace is
/// assumed for the whole system.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Topics {
    /// Readings published by the telemetry generator.
    pub sensor_telemetry: String,
    /// `on` / `off` / `temp:<float>` commands for the generator.
    pub sensor_control: String,
    /// `on` / `off` commands for the relay.
    pub relay_control: String,
    /// Structured toggle messages from the momentary button.
    pub actuator_trigger: String,
    /// Relay status published after every accepted command.
    pub relay_status: String,
    /// Temperature alerts derived from telemetry, if published at all.
    pub alert: Option<String>,
    /// Filters the coordinator subscribes to.
    pub subscriptions: Vec<String>,
}

impl Default for Topics {
    fn default() -> Self {
        Self {
            sensor_telemetry: "home/sensor/telemetry".to_string(),
            sensor_control: "home/sensor/control".to_string(),
            relay_control: "home/relay/control".to_string(),
            actuator_trigger: "home/actuator/trigger".to_string(),
            relay_status: "home/relay/status".to_string(),
            alert: Some("home/sensor/alert".to_string()),
            subscriptions: vec!["home/#".to_string()],
        }
    }
}

/// Which handler an inbound topic is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    RelayControl,
    ActuatorTrigger,
    SensorControl,
    Telemetry,
    /// Persisted only (status, alerts, foreign topics).
    Unhandled,
}

impl Topics {
    /// Resolve the handler for `topic`.
    #[must_use]
    pub fn route(&self, topic: &str) -> Route {
        if topic == self.relay_control {
            Route::RelayControl
        } else if topic == self.actuator_trigger {
            Route::ActuatorTrigger
        } else if topic == self.sensor_control {
            Route::SensorControl
        } else if topic == self.sensor_telemetry {
            Route::Telemetry
        } else {
            Route::Unhandled
        }
    }

    /// Topics on which viewers may inject commands.
    #[must_use]
    pub fn command_topics(&self) -> [&str; 3] {
        [
            self.sensor_control.as_str(),
            self.relay_control.as_str(),
            self.actuator_trigger.as_str(),
        ]
    }

    #[must_use]
    pub fn is_command_topic(&self, topic: &str) -> bool {
        self.command_topics().contains(&topic)
    }

    /// Topics that must be covered by a subscription for the core to work.
    #[must_use]
    pub fn inbound_topics(&self) -> [&str; 4] {
        [
            self.sensor_control.as_str(),
            self.relay_control.as_str(),
            self.actuator_trigger.as_str(),
            self.sensor_telemetry.as_str(),
        ]
    }

    /// Inbound topics that no subscription filter covers.
    #[must_use]
    pub fn uncovered_topics(&self) -> Vec<&str> {
        self.inbound_topics()
            .into_iter()
            .filter(|name| {
                !self
                    .subscriptions
                    .iter()
                    .any(|filter| topic::matches(filter, name))
            })
            .collect()
    }
}
