//! Protocol outcome and configuration errors

/// Outcome of a single send attempt
///
/// Produced exactly once per [`SafeSender::send`](crate::SafeSender::send)
/// and never retried by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorCode {
    /// Packet written in full
    Good = 0,
    /// Channel accepted fewer bytes than the framed packet, or failed
    SendFailed = 1,
    /// TX lock not obtained before the timeout
    LockFailed = 2,
    /// Not produced by a correct send path; its presence indicates a logic defect
    Unknown = 3,
}

impl ErrorCode {
    /// Check if this is a successful outcome
    pub const fn is_good(self) -> bool {
        matches!(self, ErrorCode::Good)
    }

    /// Numeric code, stable across firmware versions
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ErrorCode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            0 => Ok(ErrorCode::Good),
            1 => Ok(ErrorCode::SendFailed),
            2 => Ok(ErrorCode::LockFailed),
            3 => Ok(ErrorCode::Unknown),
            other => Err(other),
        }
    }
}

/// Invalid sender configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Baud rate of zero; the drain delay is undefined
    ZeroBaudRate,
    /// Lock poll interval of zero would spin without advancing the timeout
    ZeroPollInterval,
    /// Frame buffer cannot hold the two marker bytes
    FrameCapacityTooSmall,
}
