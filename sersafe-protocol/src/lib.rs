//! Arbitrated Serial Framing Protocol
//!
//! Lets several independent transmitters share one half-duplex or
//! multi-drop UART. A dedicated control line acts as the TX lock: a node
//! asserts it before writing and releases it only after its bytes have
//! left the wire.
//!
//! # Wire format
//!
//! Outbound and inbound packets use separate marker pairs:
//! ```text
//! outbound: ┌────────────┬─────────────┬──────────┐
//!           │ send_start │ PAYLOAD     │ send_end │
//!           │ 1B (0x02)  │ N bytes     │ 1B ('\n')│
//!           └────────────┴─────────────┴──────────┘
//! inbound:  ┌────────────┬─────────────┬──────────┐
//!           │ recv_start │ PAYLOAD     │ recv_end │
//!           │ 1B (':')   │ ≤ max_length│ 1B ('\n')│
//!           └────────────┴─────────────┴──────────┘
//! ```
//!
//! There is no escaping, length prefix, or checksum. Payloads must not
//! contain the marker bytes of their direction.
//!
//! Everything is blocking and allocation-free, for single-threaded
//! cooperative firmware.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod arbiter;
pub mod config;
pub mod error;
pub mod feedback;
pub mod frame;
pub mod markers;
pub mod scanner;
pub mod sender;

#[cfg(test)]
mod mock;

pub use arbiter::{TxLockArbiter, TxLockGuard, GET_LOCK_TIMEOUT_MS, GET_LOCK_WAIT_MS};
pub use config::SenderConfig;
pub use error::{ConfigError, ErrorCode};
pub use feedback::{FeedbackSender, Indicator, PinIndicator, SignalPattern};
pub use frame::{FrameError, PacketFramer, DEFAULT_FRAME_CAPACITY, FRAME_OVERHEAD};
pub use markers::FrameMarkers;
pub use scanner::{ReadBufferScanner, ScanPolicy};
pub use sender::SafeSender;

pub use sersafe_hal as hal;
