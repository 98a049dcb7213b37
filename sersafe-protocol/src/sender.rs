//! Arbitrated packet sender
//!
//! A send runs through a fixed sequence:
//!
//! ```text
//! (payload too large) ────────────────────────▶ Done(SendFailed)
//! Locking ──fail──────────────────────────────▶ Done(LockFailed)
//!    │
//!    ▼
//! Framing ──too large── release ──────────────▶ Done(SendFailed)
//!    │
//!    ▼
//! Writing ── outcome = Good | SendFailed
//!    │
//!    ▼
//! Draining ── settle, flush, release ─────────▶ Done(outcome)
//! ```
//!
//! The outcome is decided at write time but only reported after the drain,
//! which happens under the lock so no peer can start while bytes are still
//! leaving the UART. Nothing is retried.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use sersafe_hal::{Channel, ControlLine};

use crate::arbiter::TxLockArbiter;
use crate::config::SenderConfig;
use crate::error::{ConfigError, ErrorCode};
use crate::frame::{PacketFramer, DEFAULT_FRAME_CAPACITY, FRAME_OVERHEAD};
use crate::scanner::ReadBufferScanner;

/// Send path states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum SendState {
    Locking,
    Framing,
    Writing,
    Draining(ErrorCode),
    Done(ErrorCode),
}

/// Sender and receiver for one shared channel
///
/// `N` is the frame buffer capacity including both markers, so payloads
/// of up to `N - 2` bytes can be sent.
pub struct SafeSender<C, L, D, const N: usize = DEFAULT_FRAME_CAPACITY> {
    channel: C,
    arbiter: TxLockArbiter<L>,
    delay: D,
    config: SenderConfig,
    framer: PacketFramer,
    scanner: ReadBufferScanner,
}

impl<C: Channel, L: ControlLine, D: DelayNs> SafeSender<C, L, D> {
    /// Create a sender with the default frame capacity
    ///
    /// The channel must already be open at `config.baudrate`. The lock
    /// line is driven deasserted.
    pub fn new(channel: C, line: L, delay: D, config: SenderConfig) -> Result<Self, ConfigError> {
        Self::with_frame_capacity(channel, line, delay, config)
    }
}

impl<C: Channel, L: ControlLine, D: DelayNs, const N: usize> SafeSender<C, L, D, N> {
    /// Create a sender with a frame capacity of `N` bytes
    pub fn with_frame_capacity(
        channel: C,
        mut line: L,
        delay: D,
        config: SenderConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if N < FRAME_OVERHEAD {
            return Err(ConfigError::FrameCapacityTooSmall);
        }

        line.deassert();

        let markers = config.markers;
        Ok(Self {
            channel,
            arbiter: TxLockArbiter::with_poll_interval(line, config.lock_poll_ms),
            delay,
            framer: PacketFramer::new(markers.send_start, markers.send_end),
            scanner: ReadBufferScanner::new(
                markers.recv_start,
                markers.recv_end,
                config.scan_policy,
            ),
            config,
        })
    }

    /// Largest payload that fits in the frame buffer
    pub const fn max_payload() -> usize {
        N.saturating_sub(FRAME_OVERHEAD)
    }

    pub fn config(&self) -> &SenderConfig {
        &self.config
    }

    /// Frame and transmit a payload under the TX lock
    ///
    /// A payload longer than [`max_payload`](Self::max_payload) fails with
    /// [`ErrorCode::SendFailed`] without touching the lock line.
    pub fn send(&mut self, payload: &[u8]) -> ErrorCode {
        if PacketFramer::framed_len(payload.len()) > N {
            warn!(
                "payload of {} bytes exceeds {} byte frame",
                payload.len(),
                N
            );
            return ErrorCode::SendFailed;
        }

        let mut frame: Vec<u8, N> = Vec::new();
        let mut state = SendState::Locking;

        loop {
            state = match state {
                SendState::Locking => {
                    if self.start_transmit() {
                        SendState::Framing
                    } else {
                        SendState::Done(ErrorCode::LockFailed)
                    }
                }
                SendState::Framing => match self.framer.frame::<N>(payload) {
                    Ok(framed) => {
                        frame = framed;
                        SendState::Writing
                    }
                    Err(_) => {
                        warn!("framing failed");
                        // Nothing was written, so there is nothing to drain
                        self.arbiter.release();
                        SendState::Done(ErrorCode::SendFailed)
                    }
                },
                SendState::Writing => SendState::Draining(self.write_verified(&frame)),
                SendState::Draining(outcome) => {
                    self.wait_transmit_complete();
                    SendState::Done(outcome)
                }
                SendState::Done(code) => return code,
            };
        }
    }

    /// Write the whole frame in one call and check the count
    fn write_verified(&mut self, frame: &[u8]) -> ErrorCode {
        match self.channel.write(frame) {
            Ok(n) if n == frame.len() => ErrorCode::Good,
            Ok(n) => {
                warn!("short write: {} of {} bytes", n, frame.len());
                ErrorCode::SendFailed
            }
            Err(_) => {
                warn!("channel write failed");
                ErrorCode::SendFailed
            }
        }
    }

    /// Wait for the TX lock line and assert it
    ///
    /// Returns `false` on timeout. Pair a `true` result with exactly one
    /// [`wait_transmit_complete`](Self::wait_transmit_complete).
    pub fn start_transmit(&mut self) -> bool {
        self.arbiter
            .acquire(&mut self.delay, self.config.lock_timeout_ms)
    }

    /// Let the last bytes leave the UART, flush, then release the TX lock
    pub fn wait_transmit_complete(&mut self) {
        self.delay.delay_us(self.config.drain_pause_us());
        if self.channel.flush().is_err() {
            warn!("channel flush failed");
        }
        self.arbiter.release();
    }

    /// Bytes waiting on the inbound side
    pub fn available(&mut self) -> usize {
        self.channel.available()
    }

    /// Discard everything in the inbound buffer
    ///
    /// Also abandons any packet the scanner was assembling. Returns the
    /// number of bytes dropped.
    pub fn flush_read_buffer(&mut self) -> usize {
        let mut dropped = 0;
        while self.channel.available() > 0 {
            if self.channel.read_byte().is_err() {
                break;
            }
            dropped += 1;
        }
        self.scanner.reset();
        dropped
    }

    /// Scan inbound bytes for a complete packet
    ///
    /// See [`ReadBufferScanner::scan`].
    pub fn scan(&mut self, buffer: &mut [u8], max_length: usize) -> Option<usize> {
        self.scanner.scan(&mut self.channel, buffer, max_length)
    }

    /// Scan inbound bytes and return the packet as a slice of `buffer`
    pub fn scan_packet<'b>(&mut self, buffer: &'b mut [u8], max_length: usize) -> Option<&'b [u8]> {
        self.scanner.scan_packet(&mut self.channel, buffer, max_length)
    }

    /// Tear down, handing back the channel, lock line and delay
    pub fn release(self) -> (C, L, D) {
        (self.channel, self.arbiter.into_inner(), self.delay)
    }
}
