//! UART serial communication abstractions
//!
//! The protocol assumes the channel is already opened at a fixed baud rate;
//! this module only describes the byte-level operations it performs on it.

/// Pre-configured duplex byte channel
///
/// All operations are non-blocking from the protocol's point of view:
/// `read_byte` is only called after `available` reported data, and
/// `write` may accept fewer bytes than offered.
pub trait Channel {
    /// Error type for channel operations
    type Error;

    /// Number of bytes that can be read without blocking
    ///
    /// Ports that cannot count may report 1 while any byte is ready.
    fn available(&mut self) -> usize;

    /// Read a single byte from the receive buffer
    fn read_byte(&mut self) -> Result<u8, Self::Error>;

    /// Queue bytes for transmission
    ///
    /// Returns the number of bytes accepted, which may be short when the
    /// transmit buffer is full.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any driver-level outbound buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

impl<T: Channel + ?Sized> Channel for &mut T {
    type Error = T::Error;

    fn available(&mut self) -> usize {
        T::available(self)
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        T::read_byte(self)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        T::write(self, data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        T::flush(self)
    }
}

/// UART configuration
///
/// Only the baud rate matters to the protocol; it sizes the post-transmit
/// drain delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self { baudrate: 115200 }
    }
}

impl UartConfig {
    /// Time to clock out two characters plus one of overhead, in µs
    ///
    /// Returns `None` for a zero baud rate.
    pub const fn drain_pause_us(&self) -> Option<u32> {
        if self.baudrate == 0 {
            None
        } else {
            Some(3_000_000 / self.baudrate)
        }
    }
}
