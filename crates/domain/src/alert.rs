//! Alert evaluation: threshold classification of temperatures.
//!
//! Classification is a pure function of the temperature alone. Both
//! thresholds are exclusive: exactly 30 and exactly 20 are [`None`].
//!
//! [`None`]: AlertClassification::None

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Temperatures strictly above this are [`AlertClassification::HighTemperature`].
pub const HIGH_TEMPERATURE_THRESHOLD: f64 = 30.0;

/// Temperatures strictly below this are [`AlertClassification::LowTemperature`].
pub const LOW_TEMPERATURE_THRESHOLD: f64 = 20.0;

/// Alert level derived from a temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertClassification {
    None,
    HighTemperature,
    LowTemperature,
}

impl AlertClassification {
    /// Classify a temperature against the fixed thresholds.
    #[must_use]
    pub fn classify(temperature: f64) -> Self {
        if temperature > HIGH_TEMPERATURE_THRESHOLD {
            Self::HighTemperature
        } else if temperature < LOW_TEMPERATURE_THRESHOLD {
            Self::LowTemperature
        } else {
            Self::None
        }
    }

    /// Classify the `temperature` field of a structured telemetry payload.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the payload is not a JSON object with a
    /// numeric `temperature` field.
    pub fn classify_payload(payload: &str) -> Result<(f64, Self), DecodeError> {
        let value: serde_json::Value = serde_json::from_str(payload.trim())?;
        let temperature = value
            .get("temperature")
            .and_then(serde_json::Value::as_f64)
            .ok_or(DecodeError::MissingField {
                field: "temperature",
            })?;
        Ok((temperature, Self::classify(temperature)))
    }

    /// Whether this classification warrants a notification.
    #[must_use]
    pub fn is_alert(self) -> bool {
        !matches!(self, Self::None)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::HighTemperature => "high_temperature",
            Self::LowTemperature => "low_temperature",
        }
    }
}

impl std::fmt::Display for AlertClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification published on the alert topic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub alert: AlertClassification,
    pub temperature: f64,
}

impl Alert {
    /// Build an alert for `temperature`, or `None` when it is within range.
    #[must_use]
    pub fn for_temperature(temperature: f64) -> Option<Self> {
        let alert = AlertClassification::classify(temperature);
        alert.is_alert().then_some(Self { alert, temperature })
    }

    #[must_use]
    pub fn to_payload(&self) -> String {
        serde_json::json!({
            "alert": self.alert,
            "temperature": self.temperature,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_classify_high_temperature_above_threshold() {
        assert_eq!(
            AlertClassification::classify(30.01),
            AlertClassification::HighTemperature
        );
        assert_eq!(
            AlertClassification::classify(35.0),
            AlertClassification::HighTemperature
        );
    }

    #[test]
    fn should_classify_low_temperature_below_threshold() {
        assert_eq!(
            AlertClassification::classify(19.99),
            AlertClassification::LowTemperature
        );
        assert_eq!(
            AlertClassification::classify(-4.0),
            AlertClassification::LowTemperature
        );
    }

    #[test]
    fn should_classify_boundaries_as_none() {
        assert_eq!(AlertClassification::classify(30.0), AlertClassification::None);
        assert_eq!(AlertClassification::classify(20.0), AlertClassification::None);
        assert_eq!(AlertClassification::classify(25.5), AlertClassification::None);
    }

    #[test]
    fn should_classify_payload_temperature() {
        let (temperature, alert) =
            AlertClassification::classify_payload(r#"{"temperature": 31.2, "humidity": 40}"#)
                .unwrap();
        assert!((temperature - 31.2).abs() < f64::EPSILON);
        assert_eq!(alert, AlertClassification::HighTemperature);
    }

    #[test]
    fn should_accept_integer_temperature_in_payload() {
        let (_, alert) = AlertClassification::classify_payload(r#"{"temperature": 12}"#).unwrap();
        assert_eq!(alert, AlertClassification::LowTemperature);
    }

    #[test]
    fn should_reject_payload_without_numeric_temperature() {
        assert!(matches!(
            AlertClassification::classify_payload(r#"{"humidity": 50}"#),
            Err(DecodeError::MissingField { .. })
        ));
        assert!(matches!(
            AlertClassification::classify_payload(r#"{"temperature": "hot"}"#),
            Err(DecodeError::MissingField { .. })
        ));
        assert!(matches!(
            AlertClassification::classify_payload("ON"),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn should_only_build_alert_outside_range() {
        assert!(Alert::for_temperature(25.0).is_none());
        let alert = Alert::for_temperature(17.5).unwrap();
        assert_eq!(alert.alert, AlertClassification::LowTemperature);
    }

    #[test]
    fn should_serialize_alert_payload() {
        let alert = Alert::for_temperature(33.0).unwrap();
        let value: serde_json::Value = serde_json::from_str(&alert.to_payload()).unwrap();
        assert_eq!(value["alert"], "high_temperature");
        assert_eq!(value["temperature"], 33.0);
    }
}
