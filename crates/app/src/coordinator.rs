//! Coordinator: persists every inbound bus message, then routes it to the
//! owner of the topic.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use homesync_domain::alert::{Alert, AlertClassification};
use homesync_domain::message::Message;
use homesync_domain::record::StoredRecord;
use homesync_domain::relay::RelayState;
use homesync_domain::sensor::ReadingBounds;

use crate::ports::{MessagePublisher, MessageStore};
use crate::services::relay_service::RelayStateMachine;
use crate::services::telemetry_service::{SensorOutcome, TelemetryGenerator};
use crate::topics::{Route, Topics};

/// What the coordinator did with a message after persisting it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dispatch {
    /// The relay accepted a command and is now in this state.
    Relay(RelayState),
    /// The telemetry generator accepted a control command.
    Sensor(SensorOutcome),
    /// A telemetry reading was classified.
    Evaluated(AlertClassification),
    /// The payload was not understood by the topic owner, or nobody owns
    /// the topic.
    Ignored,
    /// The handler ran but its publication was rejected by the bus.
    Failed,
}

/// Result of [`Coordinator::handle`].
#[derive(Debug, Clone, PartialEq)]
pub struct Observed {
    /// The persisted record, or `None` if the store rejected the append.
    pub record: Option<StoredRecord>,
    pub dispatch: Dispatch,
}

/// Single consumer of the inbound message stream.
///
/// Messages are handled strictly one after the other: the append for a
/// message completes before its handler runs, and before the next message
/// is looked at.
pub struct Coordinator<S, P> {
    store: S,
    relay: Arc<RelayStateMachine<P>>,
    sensor: Arc<TelemetryGenerator<P>>,
    publisher: P,
    topics: Topics,
}

impl<S, P> Coordinator<S, P>
where
    S: MessageStore,
    P: MessagePublisher + Clone,
{
    /// Create a coordinator owning a fresh relay and an entropy-seeded
    /// telemetry generator.
    pub fn new(store: S, publisher: P, topics: Topics, bounds: ReadingBounds) -> Self {
        let sensor = TelemetryGenerator::new(
            publisher.clone(),
            topics.sensor_telemetry.clone(),
            bounds,
        );
        Self::with_generator(store, publisher, topics, sensor)
    }

    /// Create a coordinator around an existing telemetry generator.
    pub fn with_generator(
        store: S,
        publisher: P,
        topics: Topics,
        sensor: TelemetryGenerator<P>,
    ) -> Self {
        let relay = RelayStateMachine::new(publisher.clone(), topics.relay_status.clone());
        Self {
            store,
            relay: Arc::new(relay),
            sensor: Arc::new(sensor),
            publisher,
            topics,
        }
    }

    #[must_use]
    pub fn relay(&self) -> &Arc<RelayStateMachine<P>> {
        &self.relay
    }

    /// The telemetry generator, shared with the periodic ticker.
    #[must_use]
    pub fn sensor(&self) -> &Arc<TelemetryGenerator<P>> {
        &self.sensor
    }

    #[must_use]
    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    /// Persist `message` and dispatch it to the owner of its topic.
    ///
    /// A failed append is logged and the message is still dispatched.
    pub async fn handle(&self, message: Message) -> Observed {
        let route = self.topics.route(&message.topic);
        let topic = message.topic.clone();
        let payload = message.payload.clone();

        let record = match self.store.append(message).await {
            Ok(record) => {
                tracing::debug!(id = %record.id, %topic, "message persisted");
                Some(record)
            }
            Err(err) => {
                tracing::error!(error = %err, %topic, "failed to persist message");
                None
            }
        };

        let dispatch = self.dispatch(route, &payload);
        Observed { record, dispatch }
    }

    fn dispatch(&self, route: Route, payload: &str) -> Dispatch {
        let outcome = match route {
            Route::RelayControl => self
                .relay
                .handle_control(payload)
                .map(|state| state.map_or(Dispatch::Ignored, Dispatch::Relay)),
            Route::ActuatorTrigger => self
                .relay
                .handle_trigger(payload)
                .map(|state| state.map_or(Dispatch::Ignored, Dispatch::Relay)),
            Route::SensorControl => self
                .sensor
                .handle_control(payload)
                .map(|outcome| outcome.map_or(Dispatch::Ignored, Dispatch::Sensor)),
            Route::Telemetry => Ok(self.evaluate(payload)),
            Route::Unhandled => Ok(Dispatch::Ignored),
        };

        outcome.unwrap_or_else(|err| {
            tracing::error!(error = %err, ?route, "handler publication failed");
            Dispatch::Failed
        })
    }

    fn evaluate(&self, payload: &str) -> Dispatch {
        let (temperature, classification) =
            match AlertClassification::classify_payload(payload) {
                Ok(evaluated) => evaluated,
                Err(reason) => {
                    tracing::debug!(error = %reason, "telemetry without temperature");
                    return Dispatch::Ignored;
                }
            };

        let Some(alert) = Alert::for_temperature(temperature) else {
            return Dispatch::Evaluated(classification);
        };
        tracing::warn!(temperature, alert = %classification, "temperature alert");

        if let Some(alert_topic) = &self.topics.alert
            && let Err(err) = self.publisher.publish(alert_topic, &alert.to_payload())
        {
            tracing::error!(error = %err, "failed to publish temperature alert");
            return Dispatch::Failed;
        }
        Dispatch::Evaluated(classification)
    }

    /// Handle messages from `inbound` until `shutdown` flips or the stream
    /// ends.
    ///
    /// On shutdown the message in progress completes and every message
    /// already queued is still persisted and dispatched. Returns the number
    /// of messages handled.
    pub async fn run(
        &self,
        mut inbound: mpsc::Receiver<Message>,
        mut shutdown: watch::Receiver<bool>,
    ) -> u64 {
        let mut handled = 0_u64;
        tracing::info!(subscriptions = ?self.topics.subscriptions, "coordinator started");

        loop {
            tokio::select! {
                message = inbound.recv() => {
                    let Some(message) = message else {
                        tracing::info!(handled, "inbound stream closed");
                        return handled;
                    };
                    self.handle(message).await;
                    handled += 1;
                }
                _ = shutdown.changed() => break,
            }
        }

        let mut drained = 0_u64;
        while let Ok(message) = inbound.try_recv() {
            self.handle(message).await;
            drained += 1;
        }
        handled += drained;
        tracing::info!(handled, drained, "coordinator stopped");
        handled
    }
}
