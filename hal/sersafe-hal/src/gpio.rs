//! GPIO pin abstractions
//!
//! Provides the two kinds of digital lines the protocol needs: the shared
//! TX lock line, which is both read back and driven, and a plain indicator
//! output used for feedback flashing.

/// Logic level of the TX lock line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Line is held; someone owns the channel
    Asserted,
    /// Line is free
    Deasserted,
}

impl Level {
    /// Convert from an electrical high/low reading
    ///
    /// `inverted` is true for active-low lock lines.
    pub const fn from_high(high: bool, inverted: bool) -> Self {
        if high != inverted {
            Level::Asserted
        } else {
            Level::Deasserted
        }
    }

    /// Electrical level that represents this logic level
    pub const fn is_high(self, inverted: bool) -> bool {
        matches!(self, Level::Asserted) != inverted
    }
}

/// Shared TX lock line
///
/// The line must be output-capable and must read back the level actually
/// present on the wire, since other transmitters drive it too.
pub trait ControlLine {
    /// Sample the current level of the line
    fn read(&mut self) -> Level;

    /// Drive the line to a level
    fn write(&mut self, level: Level);

    /// Drive the line asserted
    fn assert(&mut self) {
        self.write(Level::Asserted);
    }

    /// Drive the line deasserted
    fn deassert(&mut self) {
        self.write(Level::Deasserted);
    }

    /// Check whether the line currently reads asserted
    fn is_asserted(&mut self) -> bool {
        self.read() == Level::Asserted
    }
}

impl<T: ControlLine + ?Sized> ControlLine for &mut T {
    fn read(&mut self) -> Level {
        T::read(self)
    }

    fn write(&mut self, level: Level) {
        T::write(self, level)
    }
}

/// Digital output pin
///
/// Used for the feedback indicator LED.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Toggle the pin state
    fn toggle(&mut self) {
        if self.is_set_high() {
            self.set_low();
        } else {
            self.set_high();
        }
    }

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

impl<T: OutputPin + ?Sized> OutputPin for &mut T {
    fn set_high(&mut self) {
        T::set_high(self)
    }

    fn set_low(&mut self) {
        T::set_low(self)
    }

    fn is_set_high(&self) -> bool {
        T::is_set_high(self)
    }

    fn toggle(&mut self) {
        T::toggle(self)
    }
}
