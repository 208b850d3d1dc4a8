//! Active buzzer driver.
//!
//! A single digital output, HIGH = sounding.  Generic over any
//! `embedded_hal::digital::OutputPin`, so the same driver runs on an
//! ESP-IDF `PinDriver` on the device and on a recording fake in tests.
//!
//! ## Failure contract
//!
//! A failed pin write is logged and reported, never retried.  The cached
//! level only changes on a successful write, so [`BuzzerDriver::is_on`]
//! always reflects the last level the pin actually accepted.

use embedded_hal::digital::OutputPin;
use log::{debug, warn};

use crate::error::ActuatorError;

pub struct BuzzerDriver<P: OutputPin> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> BuzzerDriver<P> {
    /// Take ownership of `pin` and drive it LOW.
    pub fn new(pin: P) -> Result<Self, ActuatorError> {
        let mut driver = Self { pin, on: true };
        driver.set(false)?;
        Ok(driver)
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        let res = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match res {
            Ok(()) => {
                if self.on != on {
                    debug!("Buzzer {}", if on { "ON" } else { "OFF" });
                }
                self.on = on;
                Ok(())
            }
            Err(e) => {
                warn!("Buzzer pin write failed: {:?}", e);
                Err(ActuatorError::GpioWriteFailed)
            }
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Release the pin (driven LOW first, best-effort).
    pub fn release(mut self) -> P {
        let _ = self.set(false);
        self.pin
    }
}
