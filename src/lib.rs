//! GeoGuard firmware library.
//!
//! Exposes the alarm core and its adapters for integration testing and
//! simulation.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod channels;
pub mod config;
pub mod error;
pub mod fsm;
pub mod geo;
pub mod pins;

pub mod adapters;
pub mod drivers;
