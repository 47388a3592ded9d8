//! Relay: the two-state actuator and the commands that drive it.

use serde::{Deserialize, Serialize};

use crate::decode::{Decoded, switch_token};
use crate::error::DecodeError;

/// Discrete state of the relay.
///
/// A fresh process always starts [`Off`](Self::Off): the state is never
/// restored from the bus or the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayState {
    On,
    #[default]
    Off,
}

impl RelayState {
    /// The state reached by applying `command` to `self`.
    #[must_use]
    pub fn apply(self, command: RelayCommand) -> Self {
        match command {
            RelayCommand::On => Self::On,
            RelayCommand::Off => Self::Off,
            RelayCommand::Toggle => match self {
                Self::On => Self::Off,
                Self::Off => Self::On,
            },
        }
    }

    /// Payload published on the status topic for this state.
    #[must_use]
    pub fn as_payload(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }

    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl std::fmt::Display for RelayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_payload())
    }
}

/// A command accepted by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayCommand {
    On,
    Off,
    Toggle,
}

/// Structured message sent by the momentary button.
#[derive(Debug, Deserialize)]
struct TriggerPayload {
    command: Option<String>,
}

impl RelayCommand {
    /// Decode a payload received on the relay control topic.
    ///
    /// Accepts `on` / `off` in any case, surrounded by any whitespace.
    #[must_use]
    pub fn decode_control(payload: &str) -> Decoded<Self> {
        match switch_token(payload) {
            Some(true) => Decoded::Recognized(Self::On),
            Some(false) => Decoded::Recognized(Self::Off),
            None => Decoded::Unrecognized(DecodeError::UnknownToken {
                payload: payload.to_string(),
            }),
        }
    }

    /// Decode a payload received on the actuator trigger topic.
    ///
    /// Only a JSON object whose `command` is `toggle` is recognised.
    #[must_use]
    pub fn decode_trigger(payload: &str) -> Decoded<Self> {
        Self::parse_trigger(payload).into()
    }

    fn parse_trigger(payload: &str) -> Result<Self, DecodeError> {
        let trigger: TriggerPayload = serde_json::from_str(payload.trim())?;
        let command = trigger
            .command
            .ok_or(DecodeError::MissingField { field: "command" })?;
        if command.trim().eq_ignore_ascii_case("toggle") {
            Ok(Self::Toggle)
        } else {
            Err(DecodeError::UnknownToken { payload: command })
        }
    }
}
