//! Hardware adapter: bridges the buzzer driver to the domain port.
//!
//! Owns the [`BuzzerDriver`] and exposes it through [`ActuatorPort`].
//! This is the only module in the system that touches the buzzer pin.

use embedded_hal::digital::OutputPin;

use crate::app::ports::ActuatorPort;
use crate::drivers::buzzer::BuzzerDriver;
use crate::error::{ActuatorError, Result};

/// Concrete adapter that puts the buzzer behind the port trait.
pub struct HardwareAdapter<P: OutputPin> {
    buzzer: BuzzerDriver<P>,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(buzzer: BuzzerDriver<P>) -> Self {
        Self { buzzer }
    }

    /// Claim `pin` for the buzzer, driving it LOW before the first fix.
    pub fn from_pin(pin: P) -> Result<Self> {
        Ok(Self::new(BuzzerDriver::new(pin)?))
    }
}

impl<P: OutputPin> ActuatorPort for HardwareAdapter<P> {
    fn set_buzzer(&mut self, on: bool) -> core::result::Result<(), ActuatorError> {
        self.buzzer.set(on)
    }

    fn is_buzzer_on(&self) -> bool {
        self.buzzer.is_on()
    }
}
