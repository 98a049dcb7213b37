//! embedded-hal 1.0 adapters
//!
//! Wrap ordinary `embedded-hal` pins so they can serve as the TX lock line
//! or the feedback indicator.

use embedded_hal::digital as hal;

use crate::gpio::{ControlLine, Level, OutputPin};

/// TX lock line backed by an `embedded-hal` pin
///
/// The pin must support both reading and driving (a flex or open-drain
/// pin). A read error is reported as [`Level::Asserted`] so a faulty line
/// is treated as busy rather than free.
///
/// A failed write leaves the pin where it was. [`ControlLine::write`] has
/// no error path, so callers detect it by reading the line back.
pub struct EhControlLine<P> {
    pin: P,
    /// If true, asserted = pin LOW
    inverted: bool,
}

impl<P: hal::InputPin + hal::OutputPin> EhControlLine<P> {
    /// Create a lock line
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin wired to the shared lock net
    /// - `inverted`: If true, the line is asserted when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        Self { pin, inverted }
    }

    /// Create a lock line that is asserted when HIGH
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a lock line that is asserted when LOW
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Recover the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: hal::InputPin + hal::OutputPin> ControlLine for EhControlLine<P> {
    fn read(&mut self) -> Level {
        match self.pin.is_high() {
            Ok(high) => Level::from_high(high, self.inverted),
            Err(_) => Level::Asserted,
        }
    }

    fn write(&mut self, level: Level) {
        let _ = self.pin.set_state(level.is_high(self.inverted).into());
    }
}

/// Indicator output backed by an `embedded-hal` pin
///
/// Keeps its own copy of the driven state so `is_set_high` does not need
/// to touch the hardware.
pub struct EhOutputPin<P> {
    pin: P,
    high: bool,
}

impl<P: hal::OutputPin> EhOutputPin<P> {
    /// Wrap a pin, driving it low
    pub fn new(pin: P) -> Self {
        let mut out = Self { pin, high: true };
        out.set_low();
        out
    }

    /// Recover the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: hal::OutputPin> OutputPin for EhOutputPin<P> {
    fn set_high(&mut self) {
        if self.pin.set_high().is_ok() {
            self.high = true;
        }
    }

    fn set_low(&mut self) {
        if self.pin.set_low().is_ok() {
            self.high = false;
        }
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}
