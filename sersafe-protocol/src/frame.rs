//! Outbound packet framing
//!
//! Frame format:
//! - START (1 byte): `send_start` marker
//! - PAYLOAD (N bytes): raw payload, unescaped
//! - END (1 byte): `send_end` marker
//!
//! There is no length prefix and no checksum; the frame length is implied
//! by the single write that carries it.

use heapless::Vec;

/// Bytes added to every payload (start + end marker)
pub const FRAME_OVERHEAD: usize = 2;

/// Default capacity of a sender's frame buffer, markers included
pub const DEFAULT_FRAME_CAPACITY: usize = 64;

/// Errors that can occur during framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Output buffer cannot hold payload plus markers
    BufferTooSmall,
}

/// Wraps payloads in start/end markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketFramer {
    start: u8,
    end: u8,
}

impl PacketFramer {
    pub const fn new(start: u8, end: u8) -> Self {
        Self { start, end }
    }

    /// Length of the framed form of a payload
    pub const fn framed_len(payload_len: usize) -> usize {
        payload_len + FRAME_OVERHEAD
    }

    /// Frame a payload into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, payload: &[u8], buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = Self::framed_len(payload.len());
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = self.start;
        buffer[1..frame_len - 1].copy_from_slice(payload);
        buffer[frame_len - 1] = self.end;

        Ok(frame_len)
    }

    /// Frame a payload into a heapless Vec
    pub fn frame<const N: usize>(&self, payload: &[u8]) -> Result<Vec<u8, N>, FrameError> {
        let mut vec = Vec::new();
        vec.push(self.start).map_err(|_| FrameError::BufferTooSmall)?;
        vec.extend_from_slice(payload)
            .map_err(|_| FrameError::BufferTooSmall)?;
        vec.push(self.end).map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }
}
