//! # homesync-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `MessagePublisher`: fire-and-forget publication onto the bus
//!   - `MessageStore`: durable append & "latest N" queries
//! - Own the singleton device state:
//!   - `RelayStateMachine`: the only writer of the relay state
//!   - `TelemetryGenerator`: the sensor gate and reading emission
//! - Route inbound bus messages through the `Coordinator`, which persists
//!   every message before any handler sees it
//! - Provide **in-process infrastructure** (loopback bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `homesync-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod coordinator;
pub mod loopback_bus;
pub mod ports;
pub mod services;
pub mod topics;

#[cfg(test)]
pub(crate) mod testing;
