//! Application services: the owners of device state.
//!
//! Each service accepts a port trait implementation via a generic parameter
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod relay_service;
pub mod telemetry_service;
