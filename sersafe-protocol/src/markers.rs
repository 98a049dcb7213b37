//! Frame delimiter bytes

/// Default start of an inbound packet
pub const DEFAULT_RECV_START: u8 = b':';
/// Default end of an inbound packet
pub const DEFAULT_RECV_END: u8 = b'\n';
/// Default start of an outbound packet (ASCII STX)
pub const DEFAULT_SEND_START: u8 = 0x02;
/// Default end of an outbound packet
pub const DEFAULT_SEND_END: u8 = b'\n';

/// Start/end marker bytes for both directions
///
/// Markers are structural: there is no escaping, so payloads must not
/// contain the marker values of their direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameMarkers {
    pub recv_start: u8,
    pub recv_end: u8,
    pub send_start: u8,
    pub send_end: u8,
}

impl Default for FrameMarkers {
    fn default() -> Self {
        Self::new(
            DEFAULT_RECV_START,
            DEFAULT_RECV_END,
            DEFAULT_SEND_START,
            DEFAULT_SEND_END,
        )
    }
}

impl FrameMarkers {
    pub const fn new(recv_start: u8, recv_end: u8, send_start: u8, send_end: u8) -> Self {
        Self {
            recv_start,
            recv_end,
            send_start,
            send_end,
        }
    }

    /// Check whether a payload can be sent without being misread by a peer
    /// that uses these markers
    pub fn is_transparent(&self, payload: &[u8]) -> bool {
        !payload
            .iter()
            .any(|&b| b == self.send_start || b == self.send_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let m = FrameMarkers::default();
        assert_eq!(m.recv_start, b':');
        assert_eq!(m.recv_end, b'\n');
        assert_eq!(m.send_start, 0x02);
        assert_eq!(m.send_end, b'\n');
    }

    #[test]
    fn test_transparency() {
        let m = FrameMarkers::default();
        assert!(m.is_transparent(b"TEMP 21.5"));
        assert!(!m.is_transparent(b"two\nlines"));
        assert!(!m.is_transparent(&[0x41, 0x02]));
    }
}
