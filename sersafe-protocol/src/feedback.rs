//! Flash-code feedback for send outcomes
//!
//! Boards without a display report what happened by flashing an LED. Each
//! outcome has a distinct count so it can be read off in the field.

use embedded_hal::delay::DelayNs;
use sersafe_hal::{Channel, ControlLine, OutputPin};

use crate::error::ErrorCode;
use crate::frame::DEFAULT_FRAME_CAPACITY;
use crate::sender::SafeSender;

/// How to flash an indicator: `flashes` on/off cycles, `delay_ms` per edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalPattern {
    pub flashes: u32,
    pub delay_ms: u32,
}

/// Packet received and accepted
pub const RECV_GOOD: SignalPattern = SignalPattern::new(1, 100);
/// Packet received but not understood by the application
pub const BAD_PACKET: SignalPattern = SignalPattern::new(3, 100);
/// Channel took fewer bytes than the frame
pub const SEND_FAILED: SignalPattern = SignalPattern::new(5, 100);
/// TX lock timed out
pub const LOCK_FAILED: SignalPattern = SignalPattern::new(7, 100);
/// Outcome that should never occur
pub const UNKNOWN: SignalPattern = SignalPattern::new(2, 250);
/// Power-on
pub const STARTUP: SignalPattern = SignalPattern::new(2, 500);
pub const CELEBRATE: SignalPattern = SignalPattern::new(15, 20);

impl SignalPattern {
    pub const fn new(flashes: u32, delay_ms: u32) -> Self {
        Self { flashes, delay_ms }
    }

    /// Pattern reported for a send outcome
    pub const fn for_code(code: ErrorCode) -> Self {
        match code {
            ErrorCode::Good => RECV_GOOD,
            ErrorCode::SendFailed => SEND_FAILED,
            ErrorCode::LockFailed => LOCK_FAILED,
            ErrorCode::Unknown => UNKNOWN,
        }
    }

    /// Number of pin toggles, saturating at `u32::MAX`
    pub const fn toggles(&self) -> u32 {
        self.flashes.saturating_mul(2)
    }

    /// Total time the pattern blocks for (ms), saturating at `u32::MAX`
    pub const fn duration_ms(&self) -> u32 {
        self.toggles().saturating_mul(self.delay_ms)
    }
}

/// Something that can show a [`SignalPattern`]
///
/// Presenting blocks until the pattern has finished.
pub trait Indicator {
    fn present(&mut self, pattern: SignalPattern);
}

impl<T: Indicator + ?Sized> Indicator for &mut T {
    fn present(&mut self, pattern: SignalPattern) {
        T::present(self, pattern)
    }
}

/// LED indicator on a single output pin
pub struct PinIndicator<P, D> {
    pin: P,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> PinIndicator<P, D> {
    /// Take the pin and drive it low
    pub fn new(mut pin: P, delay: D) -> Self {
        pin.set_low();
        Self { pin, delay }
    }

    pub fn into_inner(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

impl<P: OutputPin, D: DelayNs> Indicator for PinIndicator<P, D> {
    /// Toggle `2 × flashes` times, pausing after each toggle, then leave
    /// the pin low
    fn present(&mut self, pattern: SignalPattern) {
        for _ in 0..pattern.toggles() {
            self.pin.toggle();
            self.delay.delay_ms(pattern.delay_ms);
        }
        self.pin.set_low();
    }
}

/// [`SafeSender`] that flashes every send outcome on an indicator
///
/// The flash runs before `send` returns, so the caller is blocked for
/// [`SignalPattern::duration_ms`]. Use the bare sender and signal
/// separately when that is not acceptable.
pub struct FeedbackSender<C, L, D, I, const N: usize = DEFAULT_FRAME_CAPACITY> {
    sender: SafeSender<C, L, D, N>,
    indicator: I,
}

impl<C, L, D, I, const N: usize> FeedbackSender<C, L, D, I, N>
where
    C: Channel,
    L: ControlLine,
    D: DelayNs,
    I: Indicator,
{
    pub fn new(sender: SafeSender<C, L, D, N>, indicator: I) -> Self {
        Self { sender, indicator }
    }

    /// Send a payload, then flash its outcome
    ///
    /// The returned code is exactly what the wrapped sender produced.
    pub fn send(&mut self, payload: &[u8]) -> ErrorCode {
        let code = self.sender.send(payload);
        debug!("send outcome {}", code);
        self.indicator.present(SignalPattern::for_code(code));
        code
    }

    /// Show an application-level pattern such as [`STARTUP`]
    pub fn signal(&mut self, pattern: SignalPattern) {
        self.indicator.present(pattern);
    }

    pub fn sender(&self) -> &SafeSender<C, L, D, N> {
        &self.sender
    }

    /// Access the wrapped sender, e.g. to scan for inbound packets
    pub fn sender_mut(&mut self) -> &mut SafeSender<C, L, D, N> {
        &mut self.sender
    }

    pub fn into_parts(self) -> (SafeSender<C, L, D, N>, I) {
        (self.sender, self.indicator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SenderConfig;
    use crate::mock::{Bench, Event, MockChannel, MockDelay, MockLine, MockPin};

    #[test]
    fn test_pattern_table() {
        assert_eq!(SignalPattern::for_code(ErrorCode::Good), SignalPattern::new(1, 100));
        assert_eq!(
            SignalPattern::for_code(ErrorCode::SendFailed),
            SignalPattern::new(5, 100)
        );
        assert_eq!(
            SignalPattern::for_code(ErrorCode::LockFailed),
            SignalPattern::new(7, 100)
        );
        assert_eq!(
            SignalPattern::for_code(ErrorCode::Unknown),
            SignalPattern::new(2, 250)
        );
    }

    #[test]
    fn test_pattern_duration() {
        assert_eq!(RECV_GOOD.duration_ms(), 200);
        assert_eq!(LOCK_FAILED.duration_ms(), 1400);
        assert_eq!(UNKNOWN.duration_ms(), 1000);
        assert_eq!(CELEBRATE.toggles(), 30);
    }

    #[test]
    fn test_huge_pattern_saturates() {
        let pattern = SignalPattern::new(u32::MAX / 2 + 1, 1);
        assert_eq!(pattern.toggles(), u32::MAX);
        assert_eq!(pattern.duration_ms(), u32::MAX);
        assert_eq!(SignalPattern::new(1000, u32::MAX).duration_ms(), u32::MAX);
    }

    #[test]
    fn test_pin_indicator_flashes_and_ends_low() {
        let bench = Bench::new();
        let pin = MockPin {
            bench: &bench,
            high: false,
        };
        let mut indicator = PinIndicator::new(pin, MockDelay { bench: &bench });
        bench.events.borrow_mut().clear();

        indicator.present(SignalPattern::new(2, 50));

        assert_eq!(
            bench.events.borrow().as_slice(),
            &[
                Event::Pin(true),
                Event::Pin(false),
                Event::Pin(true),
                Event::Pin(false),
                Event::Pin(false),
            ]
        );
        assert_eq!(bench.elapsed_ms(), 200);
        let (pin, _) = indicator.into_inner();
        assert!(!pin.is_set_high());
    }

    #[test]
    fn test_pin_indicator_from_high_still_ends_low() {
        let bench = Bench::new();
        let mut pin = MockPin {
            bench: &bench,
            high: false,
        };
        pin.set_high();
        let mut indicator = PinIndicator::new(pin, MockDelay { bench: &bench });
        indicator.present(RECV_GOOD);
        assert!(!indicator.into_inner().0.is_set_high());
    }

    #[test]
    fn test_feedback_on_success() {
        let bench = Bench::new();
        let sender = SafeSender::new(
            MockChannel::new(&bench),
            MockLine::free(&bench),
            MockDelay { bench: &bench },
            SenderConfig::new(9600),
        )
        .unwrap();
        let indicator = PinIndicator::new(
            MockPin {
                bench: &bench,
                high: false,
            },
            MockDelay { bench: &bench },
        );
        let mut fb = FeedbackSender::new(sender, indicator);
        bench.events.borrow_mut().clear();

        assert_eq!(fb.send(b"OK"), ErrorCode::Good);

        // One flash after the lock is released
        let released = bench.position(Event::Line(sersafe_hal::Level::Deasserted));
        let first_flash = bench.position(Event::Pin(true));
        assert!(released < first_flash);
        assert_eq!(bench.count(|e| *e == Event::Pin(true)), 1);
        assert_eq!(bench.elapsed_us(), 312 + 200_000);
    }

    #[test]
    fn test_feedback_on_lock_failure() {
        let bench = Bench::new();
        let sender = SafeSender::new(
            MockChannel::new(&bench),
            MockLine::stuck(&bench),
            MockDelay { bench: &bench },
            SenderConfig::new(9600),
        )
        .unwrap();
        let mut pin = MockPin {
            bench: &bench,
            high: false,
        };
        let indicator = PinIndicator::new(&mut pin, MockDelay { bench: &bench });
        let mut fb = FeedbackSender::new(sender, indicator);

        assert_eq!(fb.send(b"OK"), ErrorCode::LockFailed);
        assert_eq!(bench.count(|e| *e == Event::Pin(true)), 7);
        assert_eq!(bench.elapsed_ms(), 15 + 1400);
    }

    #[test]
    fn test_signal_custom_pattern() {
        struct Recorder {
            last: Option<SignalPattern>,
        }

        impl Indicator for Recorder {
            fn present(&mut self, pattern: SignalPattern) {
                self.last = Some(pattern);
            }
        }

        let bench = Bench::new();
        let sender = SafeSender::new(
            MockChannel::new(&bench),
            MockLine::free(&bench),
            MockDelay { bench: &bench },
            SenderConfig::default(),
        )
        .unwrap();
        let mut fb = FeedbackSender::new(sender, Recorder { last: None });

        fb.signal(STARTUP);
        let (_, recorder) = fb.into_parts();
        assert_eq!(recorder.last, Some(STARTUP));
    }
}
