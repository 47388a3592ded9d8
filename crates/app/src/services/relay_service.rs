//! Relay state machine: the single authoritative owner of the relay state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use homesync_domain::decode::Decoded;
use homesync_domain::error::HomeSyncError;
use homesync_domain::relay::{RelayCommand, RelayState};

use crate::ports::MessagePublisher;

/// Owns the canonical [`RelayState`] and publishes it after every accepted
/// command, including commands that leave the state unchanged.
pub struct RelayStateMachine<P> {
    state: Mutex<RelayState>,
    publisher: P,
    status_topic: String,
}

impl<P: MessagePublisher> RelayStateMachine<P> {
    /// Create a state machine starting [`Off`](RelayState::Off).
    pub fn new(publisher: P, status_topic: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(RelayState::default()),
            publisher,
            status_topic: status_topic.into(),
        }
    }

    /// Current relay state.
    pub fn state(&self) -> RelayState {
        *self.lock_state()
    }

    /// Apply a command and publish the resulting status.
    ///
    /// The lock is held across the transition and the (non-blocking)
    /// publication so status messages leave in transition order.
    ///
    /// # Errors
    ///
    /// Returns [`HomeSyncError::Publish`] if the status could not be handed
    /// to the bus. The transition itself is kept.
    pub fn apply(&self, command: RelayCommand) -> Result<RelayState, HomeSyncError> {
        let mut state = self.lock_state();
        let previous = *state;
        *state = previous.apply(command);
        tracing::info!(?command, from = %previous, to = %*state, "relay transition");
        self.publisher
            .publish(&self.status_topic, state.as_payload())?;
        Ok(*state)
    }

    /// Handle a payload from the relay control topic.
    ///
    /// Returns `Ok(None)` when the payload is not a command.
    ///
    /// # Errors
    ///
    /// Propagates publish failures from [`apply`](Self::apply).
    pub fn handle_control(&self, payload: &str) -> Result<Option<RelayState>, HomeSyncError> {
        self.handle(RelayCommand::decode_control(payload))
    }

    /// Handle a payload from the actuator trigger topic.
    ///
    /// Returns `Ok(None)` when the payload is not a toggle message.
    ///
    /// # Errors
    ///
    /// Propagates publish failures from [`apply`](Self::apply).
    pub fn handle_trigger(&self, payload: &str) -> Result<Option<RelayState>, HomeSyncError> {
        self.handle(RelayCommand::decode_trigger(payload))
    }

    fn handle(&self, decoded: Decoded<RelayCommand>) -> Result<Option<RelayState>, HomeSyncError> {
        match decoded {
            Decoded::Recognized(command) => self.apply(command).map(Some),
            Decoded::Unrecognized(reason) => {
                tracing::debug!(error = %reason, "relay ignored payload");
                Ok(None)
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, RelayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::testing::RecordingPublisher;

    const STATUS: &str = "home/relay/status";

    fn relay() -> (RelayStateMachine<Arc<RecordingPublisher>>, Arc<RecordingPublisher>) {
        let publisher = Arc::new(RecordingPublisher::default());
        (RelayStateMachine::new(Arc::clone(&publisher), STATUS), publisher)
    }

    #[test]
    fn should_start_off() {
        let (relay, publisher) = relay();
        assert_eq!(relay.state(), RelayState::Off);
        assert!(publisher.all().is_empty());
    }

    #[test]
    fn should_alternate_status_on_repeated_toggles() {
        let (relay, publisher) = relay();
        for _ in 0..5 {
            relay.handle_trigger(r#"{"command":"toggle"}"#).unwrap();
        }
        assert_eq!(publisher.on(STATUS), vec!["on", "off", "on", "off", "on"]);
        assert_eq!(relay.state(), RelayState::On);
    }

    #[test]
    fn should_alternate_from_prior_state() {
        let (relay, publisher) = relay();
        relay.handle_control("on").unwrap();
        relay.handle_trigger(r#"{"command":"toggle"}"#).unwrap();
        relay.handle_trigger(r#"{"command":"toggle"}"#).unwrap();
        assert_eq!(publisher.on(STATUS), vec!["on", "off", "on"]);
    }

    #[test]
    fn should_republish_same_status_on_repeated_command() {
        let (relay, publisher) = relay();
        assert_eq!(relay.handle_control("ON").unwrap(), Some(RelayState::On));
        assert_eq!(relay.handle_control("on").unwrap(), Some(RelayState::On));
        assert_eq!(relay.handle_control("off").unwrap(), Some(RelayState::Off));
        assert_eq!(relay.handle_control(" OFF ").unwrap(), Some(RelayState::Off));
        assert_eq!(publisher.on(STATUS), vec!["on", "on", "off", "off"]);
    }

    #[test]
    fn should_reach_target_state_regardless_of_prior_state() {
        for prior in ["on", "off"] {
            let (relay, _) = relay();
            relay.handle_control(prior).unwrap();
            relay.handle_control("off").unwrap();
            assert_eq!(relay.state(), RelayState::Off);
        }
    }

    #[test]
    fn should_toggle_once_from_off_and_publish_on_exactly_once() {
        let (relay, publisher) = relay();
        let state = relay.handle_trigger(r#"{"command":"toggle"}"#).unwrap();
        assert_eq!(state, Some(RelayState::On));
        assert_eq!(publisher.all(), vec![(STATUS.to_string(), "on".to_string())]);
    }

    #[test]
    fn should_ignore_unrecognized_payloads_without_publishing() {
        let (relay, publisher) = relay();
        assert_eq!(relay.handle_control("blink").unwrap(), None);
        assert_eq!(relay.handle_trigger("toggle").unwrap(), None);
        assert_eq!(relay.handle_trigger(r#"{"command":"hold"}"#).unwrap(), None);
        assert_eq!(relay.state(), RelayState::Off);
        assert!(publisher.all().is_empty());
    }

    #[test]
    fn should_keep_transition_when_publish_fails() {
        let (relay, publisher) = relay();
        publisher.set_failing(true);
        let result = relay.handle_control("on");
        assert!(matches!(result, Err(HomeSyncError::Publish { .. })));
        assert_eq!(relay.state(), RelayState::On);
    }

    #[test]
    fn should_serialize_concurrent_toggles() {
        let (relay, publisher) = relay();
        let relay = Arc::new(relay);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let relay = Arc::clone(&relay);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        relay.apply(RelayCommand::Toggle).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let statuses = publisher.on(STATUS);
        assert_eq!(statuses.len(), 200);
        for pair in statuses.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        assert_eq!(relay.state(), RelayState::Off);
    }
}
