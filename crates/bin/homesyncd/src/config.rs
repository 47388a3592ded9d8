//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `homesync.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use homesync_adapter_mqtt::MqttConfig;
use homesync_app::topics::Topics;
use homesync_domain::sensor::{Bounds, ReadingBounds};
use homesync_domain::topic;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Broker connection, shared by every component.
    pub mqtt: MqttConfig,
    /// Topic namespace and subscriptions.
    pub topics: Topics,
    /// Telemetry generator settings.
    pub sensor: SensorConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Telemetry generator configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Milliseconds between two generation ticks.
    pub tick_interval_ms: u64,
    /// Range of generated temperatures.
    pub temperature: Bounds,
    /// Range of generated humidity values.
    pub humidity: Bounds,
}

impl SensorConfig {
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[must_use]
    pub fn bounds(&self) -> ReadingBounds {
        ReadingBounds {
            temperature: self.temperature,
            humidity: self.humidity,
        }
    }
}

impl Config {
    /// Load configuration from `homesync.toml` (if present), apply
    /// environment-variable overrides, then validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("homesync.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("HOMESYNC_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("HOMESYNC_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = lookup("HOMESYNC_MQTT_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Some(val) = lookup("HOMESYNC_MQTT_PORT")
            && let Ok(port) = val.parse()
        {
            self.mqtt.broker_port = port;
        }
        if let Some(val) = lookup("HOMESYNC_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(invalid("port must be non-zero"));
        }
        if self.mqtt.broker_host.is_empty() || self.mqtt.broker_port == 0 {
            return Err(invalid("MQTT broker address must be set"));
        }
        if self.mqtt.connect_timeout_secs == 0 {
            return Err(invalid("MQTT connect timeout must be non-zero"));
        }
        if self.mqtt.keep_alive_secs < 5 {
            return Err(invalid("MQTT keep-alive must be at least 5 seconds"));
        }
        if self.mqtt.channel_capacity == 0 {
            return Err(invalid("MQTT channel capacity must be non-zero"));
        }
        if self.sensor.tick_interval_ms == 0 {
            return Err(invalid("sensor tick interval must be non-zero"));
        }
        if !self.sensor.temperature.is_valid() || !self.sensor.humidity.is_valid() {
            return Err(invalid("sensor bounds must be finite with min <= max"));
        }
        if let Some(filter) = self
            .topics
            .subscriptions
            .iter()
            .find(|filter| !topic::is_valid_filter(filter))
        {
            return Err(ConfigError::Validation(format!(
                "invalid subscription filter {filter:?}"
            )));
        }
        let uncovered = self.topics.uncovered_topics();
        if !uncovered.is_empty() {
            return Err(ConfigError::Validation(format!(
                "no subscription covers {}",
                uncovered.join(", ")
            )));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Validation(reason.to_string())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:homesync.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "homesyncd=info,homesync=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        let bounds = ReadingBounds::default();
        Self {
            tick_interval_ms: 5_000,
            temperature: bounds.temperature,
            humidity: bounds.humidity,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
