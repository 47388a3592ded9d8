//! # homesync-domain
//!
//! Pure domain model for the homesync device coordination core.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Messages** (topic + opaque payload observed on the bus)
//! - Define **Topic filters** (MQTT-style `+` / `#` wildcard matching)
//! - Define the **Relay** state machine and its command decoders
//! - Define **Sensor** commands, readings and sampling bounds
//! - Define **Alerts** (threshold classification of temperatures)
//! - Define **Stored records** (the durable form of a message)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod alert;
pub mod decode;
pub mod message;
pub mod record;
pub mod relay;
pub mod sensor;
pub mod topic;
