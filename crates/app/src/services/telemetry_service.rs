//! Sensor telemetry generator: the gate and the periodic reading emission.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::watch;

use homesync_domain::decode::Decoded;
use homesync_domain::error::HomeSyncError;
use homesync_domain::sensor::{Bounds, Reading, ReadingBounds, SensorCommand};

use crate::ports::MessagePublisher;

/// What a control payload did to the generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorOutcome {
    Enabled,
    Disabled,
    /// A one-shot reading was published.
    Emitted(Reading),
}

/// Owns the sensor gate and publishes readings on the telemetry topic.
pub struct TelemetryGenerator<P> {
    enabled: Mutex<bool>,
    rng: Mutex<ChaCha8Rng>,
    bounds: ReadingBounds,
    publisher: P,
    telemetry_topic: String,
}

impl<P: MessagePublisher> TelemetryGenerator<P> {
    /// Create an enabled generator seeded from OS entropy.
    pub fn new(publisher: P, telemetry_topic: impl Into<String>, bounds: ReadingBounds) -> Self {
        Self::with_rng(
            publisher,
            telemetry_topic,
            bounds,
            ChaCha8Rng::from_entropy(),
        )
    }

    /// Create an enabled generator drawing from `rng`.
    pub fn with_rng(
        publisher: P,
        telemetry_topic: impl Into<String>,
        bounds: ReadingBounds,
        rng: ChaCha8Rng,
    ) -> Self {
        Self {
            enabled: Mutex::new(true),
            rng: Mutex::new(rng),
            bounds,
            publisher,
            telemetry_topic: telemetry_topic.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self.lock_gate()
    }

    /// Emit one random reading if the gate is open.
    ///
    /// Returns `Ok(None)` while disabled.
    ///
    /// # Errors
    ///
    /// Returns [`HomeSyncError::Publish`] if the reading could not be handed
    /// to the bus.
    pub fn tick(&self) -> Result<Option<Reading>, HomeSyncError> {
        let gate = self.lock_gate();
        if !*gate {
            tracing::trace!("sensor disabled, skipping tick");
            return Ok(None);
        }
        let reading = self.sample();
        self.emit(reading)?;
        drop(gate);
        Ok(Some(reading))
    }

    /// Emit a single reading with the given temperature.
    ///
    /// Overrides are explicit one-shot requests and are not gated. The
    /// temperature is published exactly as requested; only the humidity
    /// draw is rounded.
    ///
    /// # Errors
    ///
    /// Returns [`HomeSyncError::Publish`] if the reading could not be handed
    /// to the bus.
    pub fn emit_override(&self, temperature: f64) -> Result<Reading, HomeSyncError> {
        let _gate = self.lock_gate();
        let reading = Reading {
            temperature,
            humidity: self.sample().humidity,
        };
        self.emit(reading)?;
        Ok(reading)
    }

    /// Handle a payload from the sensor control topic.
    ///
    /// Returns `Ok(None)` when the payload is not a command; a malformed
    /// `temp:` override changes nothing and publishes nothing.
    ///
    /// # Errors
    ///
    /// Propagates publish failures of a temperature override.
    pub fn handle_control(&self, payload: &str) -> Result<Option<SensorOutcome>, HomeSyncError> {
        let command = match SensorCommand::decode(payload) {
            Decoded::Recognized(command) => command,
            Decoded::Unrecognized(reason) => {
                tracing::debug!(error = %reason, "sensor ignored payload");
                return Ok(None);
            }
        };

        let outcome = match command {
            SensorCommand::Enable => {
                self.set_enabled(true);
                SensorOutcome::Enabled
            }
            SensorCommand::Disable => {
                self.set_enabled(false);
                SensorOutcome::Disabled
            }
            SensorCommand::OverrideTemperature(temperature) => {
                SensorOutcome::Emitted(self.emit_override(temperature)?)
            }
        };
        Ok(Some(outcome))
    }

    /// Draw a random reading within the configured bounds.
    pub fn sample(&self) -> Reading {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Reading {
            temperature: draw(&mut *rng, self.bounds.temperature),
            humidity: draw(&mut *rng, self.bounds.humidity),
        }
        .rounded()
    }

    fn emit(&self, reading: Reading) -> Result<(), HomeSyncError> {
        self.publisher
            .publish(&self.telemetry_topic, &reading.to_payload())?;
        tracing::info!(
            temperature = reading.temperature,
            humidity = reading.humidity,
            alert = %reading.alert(),
            "telemetry published"
        );
        Ok(())
    }

    fn set_enabled(&self, enabled: bool) {
        let mut gate = self.lock_gate();
        if *gate != enabled {
            tracing::info!(enabled, "sensor gate changed");
        }
        *gate = enabled;
    }

    fn lock_gate(&self) -> MutexGuard<'_, bool> {
        self.enabled.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn draw(rng: &mut impl Rng, bounds: Bounds) -> f64 {
    if bounds.min >= bounds.max {
        return bounds.min;
    }
    rng.gen_range(bounds.min..=bounds.max)
}

/// Drive [`TelemetryGenerator::tick`] every `period` until `shutdown` flips.
///
/// Publish failures are logged and the next tick proceeds normally.
pub async fn run_ticker<P: MessagePublisher>(
    generator: &TelemetryGenerator<P>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    tracing::info!(?period, "telemetry ticker started");
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(err) = generator.tick() {
                    tracing::error!(error = %err, "failed to publish telemetry");
                }
            }
            _ = shutdown.changed() => break,
        }
    }
    tracing::info!("telemetry ticker stopped");
}
