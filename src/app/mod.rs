//! Application core: domain orchestration, zero I/O.
//!
//! This module wires the geofence alarm controller to the outside world.
//! All interaction with hardware and networks happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
