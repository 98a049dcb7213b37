//! Sersafe Hardware Abstraction Layer
//!
//! This crate defines the hardware boundary of the sersafe protocol. The
//! protocol core never touches registers; it drives these traits, which
//! chip-specific code (or the bundled adapters) implements.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (polls, sends)             │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sersafe-protocol (arbiter, framing)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sersafe-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │  embedded-io  │
//! │    pins       │       │    ports      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::ControlLine`] - Shared TX lock line (read back + drive)
//! - [`gpio::OutputPin`] - Indicator output
//! - [`uart::Channel`] - Pre-configured duplex byte channel

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "embedded-hal")]
pub mod eh;
pub mod gpio;
#[cfg(feature = "embedded-io")]
pub mod io;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::{ControlLine, Level, OutputPin};
pub use uart::{Channel, UartConfig};
