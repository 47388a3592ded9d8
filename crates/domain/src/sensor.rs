//! Sensor: control commands, readings and sampling bounds of the
//! temperature/humidity sensor.

use serde::{Deserialize, Serialize};

use crate::alert::AlertClassification;
use crate::decode::{Decoded, switch_token};
use crate::error::DecodeError;

const TEMPERATURE_OVERRIDE_PREFIX: &str = "temp:";

/// A command accepted on the sensor control topic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorCommand {
    /// Resume periodic emission.
    Enable,
    /// Suspend periodic emission.
    Disable,
    /// Emit a single reading with this temperature.
    OverrideTemperature(f64),
}

impl SensorCommand {
    /// Decode a payload received on the sensor control topic.
    ///
    /// Accepts `on`, `off` and `temp:<float>`, case-insensitively.
    #[must_use]
    pub fn decode(payload: &str) -> Decoded<Self> {
        Self::parse(payload).into()
    }

    fn parse(payload: &str) -> Result<Self, DecodeError> {
        if let Some(enabled) = switch_token(payload) {
            return Ok(if enabled { Self::Enable } else { Self::Disable });
        }

        let trimmed = payload.trim();
        let prefix_len = TEMPERATURE_OVERRIDE_PREFIX.len();
        let is_override = trimmed
            .get(..prefix_len)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(TEMPERATURE_OVERRIDE_PREFIX));
        if !is_override {
            return Err(DecodeError::UnknownToken {
                payload: payload.to_string(),
            });
        }

        let value = trimmed[prefix_len..].trim();
        match value.parse::<f64>() {
            Ok(temperature) if temperature.is_finite() => {
                Ok(Self::OverrideTemperature(temperature))
            }
            _ => Err(DecodeError::InvalidTemperature {
                value: value.to_string(),
            }),
        }
    }
}

/// A single temperature/humidity sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature: f64,
    pub humidity: f64,
}

impl Reading {
    /// Round both values to two decimals.
    ///
    /// Values too large to scale are kept as they are.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            temperature: round2(self.temperature),
            humidity: round2(self.humidity),
        }
    }

    /// Classification of this reading's temperature.
    #[must_use]
    pub fn alert(&self) -> AlertClassification {
        AlertClassification::classify(self.temperature)
    }

    /// JSON payload published on the telemetry topic.
    #[must_use]
    pub fn to_payload(&self) -> String {
        serde_json::json!({
            "temperature": self.temperature,
            "humidity": self.humidity,
        })
        .to_string()
    }

    /// Parse a telemetry payload.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Json`] if the payload is not a reading.
    pub fn from_payload(payload: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(payload.trim())?)
    }
}

fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        value
    }
}

/// Inclusive range a generated value is sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether the range is finite and non-empty.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Sampling ranges for generated readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingBounds {
    pub temperature: Bounds,
    pub humidity: Bounds,
}

impl Default for ReadingBounds {
    fn default() -> Self {
        Self {
            temperature: Bounds::new(18.0, 35.0),
            humidity: Bounds::new(30.0, 80.0),
        }
    }
}
