//! embedded-io adapter
//!
//! Turns any blocking `embedded-io` port that can report read readiness
//! into a [`Channel`].

use embedded_io::{Read, ReadReady, Write};

use crate::uart::Channel;

/// Error from an [`IoChannel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoChannelError<E> {
    /// Underlying port error
    Io(E),
    /// Read returned no data although the port reported ready
    NoData,
}

/// [`Channel`] over an `embedded-io` port
///
/// `embedded-io` only says whether a read would block, not how much is
/// buffered, so [`Channel::available`] reports 0 or 1.
///
/// [`Channel::available`] has no error path. A `read_ready` error is
/// reported as 0 bytes waiting; the port error itself surfaces on the next
/// `read_byte`, `write` or `flush`.
pub struct IoChannel<T> {
    port: T,
}

impl<T> IoChannel<T> {
    /// Wrap a port
    pub fn new(port: T) -> Self {
        Self { port }
    }

    /// Recover the wrapped port
    pub fn into_inner(self) -> T {
        self.port
    }
}

impl<T: Read + Write + ReadReady> Channel for IoChannel<T> {
    type Error = IoChannelError<T::Error>;

    fn available(&mut self) -> usize {
        // Port errors read as "nothing waiting"
        match self.port.read_ready() {
            Ok(true) => 1,
            _ => 0,
        }
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        match self.port.read(&mut buf).map_err(IoChannelError::Io)? {
            0 => Err(IoChannelError::NoData),
            _ => Ok(buf[0]),
        }
    }

    /// Keeps writing until the port stops accepting bytes
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        let mut written = 0;
        while written < data.len() {
            match self.port.write(&data[written..]).map_err(IoChannelError::Io)? {
                0 => break,
                n => written += n,
            }
        }
        Ok(written)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.port.flush().map_err(IoChannelError::Io)
    }
}
