//! Inbound packet extraction
//!
//! Consumes whatever the channel has buffered and reassembles delimited
//! packets into a caller-supplied fixed buffer:
//!
//! ```text
//! noise  START  payload (≤ max_length)  END  noise  START ...
//! ```
//!
//! Bytes outside a packet are dropped. A candidate longer than
//! `max_length` is discarded whole and the buffer cleared, so a fragment
//! is never mistaken for a packet. When several packets complete in one
//! scan, the last one wins.

use sersafe_hal::Channel;

/// How candidate state is carried between scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanPolicy {
    /// An unfinished packet is kept and completed by a later scan. Only
    /// packets whose end marker has arrived are reported.
    #[default]
    Persistent,
    /// Every scan starts outside a packet. An unfinished packet is
    /// reported with its partial length and then abandoned (legacy
    /// behaviour, for bit-exact compatibility with older peers).
    PerCall,
}

/// Incremental packet scanner
#[derive(Debug, Clone)]
pub struct ReadBufferScanner {
    start: u8,
    end: u8,
    policy: ScanPolicy,
    in_packet: bool,
    write_pos: usize,
}

impl ReadBufferScanner {
    /// Create a scanner for packets delimited by `start`/`end`
    pub const fn new(start: u8, end: u8, policy: ScanPolicy) -> Self {
        Self {
            start,
            end,
            policy,
            in_packet: false,
            write_pos: 0,
        }
    }

    /// Forget any packet in progress
    pub fn reset(&mut self) {
        self.in_packet = false;
        self.write_pos = 0;
    }

    /// Check if a packet start has been seen without its end
    pub fn is_in_packet(&self) -> bool {
        self.in_packet
    }

    /// Bytes of the unfinished packet already stored in the buffer
    pub fn pending_len(&self) -> usize {
        self.write_pos
    }

    pub fn policy(&self) -> ScanPolicy {
        self.policy
    }

    /// Drain all currently available bytes from `channel`
    ///
    /// Returns the payload length of the most recent complete packet now
    /// held in `buffer[..len]`, or `None`. `max_length` is clamped to the
    /// buffer size. With [`ScanPolicy::Persistent`] the same buffer must
    /// be passed on every call, since it holds the unfinished packet.
    ///
    /// A read error is treated as line corruption: the packet in progress
    /// is dropped and the scan ends.
    pub fn scan<C: Channel>(
        &mut self,
        channel: &mut C,
        buffer: &mut [u8],
        max_length: usize,
    ) -> Option<usize> {
        let max_length = max_length.min(buffer.len());
        if self.policy == ScanPolicy::PerCall {
            self.reset();
        }

        let mut result = None;
        while channel.available() > 0 {
            let byte = match channel.read_byte() {
                Ok(byte) => byte,
                Err(_) => {
                    warn!("RX read error, dropping packet in progress");
                    if self.in_packet {
                        self.reset();
                        result = None;
                    }
                    break;
                }
            };
            self.step(byte, buffer, max_length, &mut result);
        }
        result
    }

    /// Scan and return the complete packet as a slice of `buffer`
    pub fn scan_packet<'b, C: Channel>(
        &mut self,
        channel: &mut C,
        buffer: &'b mut [u8],
        max_length: usize,
    ) -> Option<&'b [u8]> {
        let len = self.scan(channel, buffer, max_length)?;
        Some(&buffer[..len])
    }

    fn step(&mut self, byte: u8, buffer: &mut [u8], max_length: usize, result: &mut Option<usize>) {
        if !self.in_packet && byte == self.start {
            // A new packet supersedes anything reported earlier in this scan
            self.in_packet = true;
            *result = None;
        } else if self.in_packet && byte == self.end {
            self.in_packet = false;
            if self.policy == ScanPolicy::Persistent {
                *result = Some(self.write_pos);
            }
            trace!("RX packet complete, {} bytes", self.write_pos);
            self.write_pos = 0;
        } else if self.write_pos >= max_length {
            debug!("RX packet exceeds {} bytes, discarded", max_length);
            self.in_packet = false;
            buffer[..max_length].fill(0);
            *result = None;
            self.write_pos = 0;
        } else if self.in_packet {
            buffer[self.write_pos] = byte;
            self.write_pos += 1;
            if self.policy == ScanPolicy::PerCall {
                *result = Some(self.write_pos);
            }
        }
        // Otherwise: noise between packets
    }
}
