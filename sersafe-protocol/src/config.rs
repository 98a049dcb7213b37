//! Sender configuration

use sersafe_hal::UartConfig;

use crate::arbiter::{GET_LOCK_TIMEOUT_MS, GET_LOCK_WAIT_MS};
use crate::error::ConfigError;
use crate::markers::FrameMarkers;
use crate::scanner::ScanPolicy;

/// Settings fixed for the lifetime of a [`SafeSender`](crate::SafeSender)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SenderConfig {
    /// Baud rate the channel was opened at; sizes the drain delay
    pub baudrate: u32,
    /// How long to wait for the TX lock (ms)
    pub lock_timeout_ms: u32,
    /// Lock line poll interval (ms)
    pub lock_poll_ms: u32,
    /// Packet delimiters for both directions
    pub markers: FrameMarkers,
    /// Whether an unfinished inbound packet survives between scans
    pub scan_policy: ScanPolicy,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self::new(UartConfig::default().baudrate)
    }
}

impl SenderConfig {
    /// Default settings for a channel running at `baudrate`
    pub const fn new(baudrate: u32) -> Self {
        Self {
            baudrate,
            lock_timeout_ms: GET_LOCK_TIMEOUT_MS,
            lock_poll_ms: GET_LOCK_WAIT_MS,
            markers: FrameMarkers::new(
                crate::markers::DEFAULT_RECV_START,
                crate::markers::DEFAULT_RECV_END,
                crate::markers::DEFAULT_SEND_START,
                crate::markers::DEFAULT_SEND_END,
            ),
            scan_policy: ScanPolicy::Persistent,
        }
    }

    pub const fn with_lock_timeout_ms(mut self, ms: u32) -> Self {
        self.lock_timeout_ms = ms;
        self
    }

    pub const fn with_lock_poll_ms(mut self, ms: u32) -> Self {
        self.lock_poll_ms = ms;
        self
    }

    pub const fn with_markers(mut self, markers: FrameMarkers) -> Self {
        self.markers = markers;
        self
    }

    pub const fn with_scan_policy(mut self, policy: ScanPolicy) -> Self {
        self.scan_policy = policy;
        self
    }

    /// Check the settings before any hardware is touched
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baudrate == 0 {
            return Err(ConfigError::ZeroBaudRate);
        }
        if self.lock_poll_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }

    /// Settle time after a write: two characters plus one of overhead (µs)
    pub fn drain_pause_us(&self) -> u32 {
        UartConfig {
            baudrate: self.baudrate,
        }
        .drain_pause_us()
        .unwrap_or(0)
    }
}
