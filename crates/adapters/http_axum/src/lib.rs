//! # homesync-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a small JSON API for viewers:
//!   - `GET  /api/messages?limit=N`: latest persisted messages, newest first,
//!     with the alert classification of telemetry records
//!   - `POST /api/commands`: inject a command onto one of the command topics
//! - Map application results and errors into HTTP responses
//!
//! Viewers never hold authoritative state: relay status and readings are
//! read back from the message history.
//!
//! ## Dependency rule
//! Depends on `homesync-app` (for port traits and topics) and `homesync-domain`
//! (for domain types used in response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod stubs;
