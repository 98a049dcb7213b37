//! Test doubles for the hardware boundary
//!
//! All mocks share a [`Bench`] holding a virtual clock and an ordered
//! event log, so tests can check what happened while the lock was held.

use core::cell::{Cell, RefCell};

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use sersafe_hal::{Channel, ControlLine, Level, OutputPin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Line(Level),
    Write(usize),
    Flush,
    Pin(bool),
}

pub struct Bench {
    /// Virtual time in nanoseconds
    pub clock: Cell<u64>,
    pub events: RefCell<Vec<Event, 128>>,
}

impl Bench {
    pub fn new() -> Self {
        Self {
            clock: Cell::new(0),
            events: RefCell::new(Vec::new()),
        }
    }

    pub fn elapsed_us(&self) -> u64 {
        self.clock.get() / 1000
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.clock.get() / 1_000_000
    }

    fn log(&self, event: Event) {
        let _ = self.events.borrow_mut().push(event);
    }

    pub fn position(&self, event: Event) -> Option<usize> {
        self.events.borrow().iter().position(|e| *e == event)
    }

    pub fn count(&self, f: impl Fn(&Event) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| f(e)).count()
    }
}

pub struct MockDelay<'a> {
    pub bench: &'a Bench,
}

impl DelayNs for MockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.bench.clock.set(self.bench.clock.get() + ns as u64);
    }
}

/// Lock line shared with a simulated peer
pub struct MockLine<'a> {
    pub bench: &'a Bench,
    pub own: Level,
    /// Peer holds the line until this virtual time (ns)
    pub peer_until: u64,
    /// Writes are logged but never reach the wire
    pub dead: bool,
}

impl<'a> MockLine<'a> {
    pub fn free(bench: &'a Bench) -> Self {
        Self {
            bench,
            own: Level::Deasserted,
            peer_until: 0,
            dead: false,
        }
    }

    pub fn held_by_peer_for_ms(bench: &'a Bench, ms: u64) -> Self {
        Self {
            bench,
            own: Level::Deasserted,
            peer_until: bench.clock.get() + ms * 1_000_000,
            dead: false,
        }
    }

    pub fn stuck(bench: &'a Bench) -> Self {
        Self {
            bench,
            own: Level::Deasserted,
            peer_until: u64::MAX,
            dead: false,
        }
    }

    /// Free line whose driver is broken
    pub fn dead(bench: &'a Bench) -> Self {
        Self {
            dead: true,
            ..Self::free(bench)
        }
    }
}

impl ControlLine for MockLine<'_> {
    fn read(&mut self) -> Level {
        if self.own == Level::Asserted || self.bench.clock.get() < self.peer_until {
            Level::Asserted
        } else {
            Level::Deasserted
        }
    }

    fn write(&mut self, level: Level) {
        if !self.dead {
            self.own = level;
        }
        self.bench.log(Event::Line(level));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

pub struct MockChannel<'a> {
    pub bench: &'a Bench,
    pub rx: Vec<u8, 256>,
    pub rx_pos: usize,
    /// Read fails when `rx_pos` reaches this index (the byte is consumed)
    pub rx_error_at: Option<usize>,
    pub tx: Vec<u8, 256>,
    pub write_calls: usize,
    /// Max bytes accepted per write; `None` accepts everything
    pub accept: Option<usize>,
    pub fail_write: bool,
    pub fail_flush: bool,
}

impl<'a> MockChannel<'a> {
    pub fn new(bench: &'a Bench) -> Self {
        Self {
            bench,
            rx: Vec::new(),
            rx_pos: 0,
            rx_error_at: None,
            tx: Vec::new(),
            write_calls: 0,
            accept: None,
            fail_write: false,
            fail_flush: false,
        }
    }

    pub fn with_rx(bench: &'a Bench, bytes: &[u8]) -> Self {
        let mut chan = Self::new(bench);
        chan.feed(bytes);
        chan
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        // Compact before appending so long tests don't run out of room
        let rest: Vec<u8, 256> = Vec::from_slice(&self.rx[self.rx_pos..]).unwrap();
        self.rx = rest;
        self.rx_pos = 0;
        self.rx.extend_from_slice(bytes).unwrap();
    }
}

impl Channel for MockChannel<'_> {
    type Error = MockError;

    fn available(&mut self) -> usize {
        self.rx.len() - self.rx_pos
    }

    fn read_byte(&mut self) -> Result<u8, MockError> {
        let pos = self.rx_pos;
        self.rx_pos += 1;
        if self.rx_error_at == Some(pos) {
            return Err(MockError);
        }
        self.rx.get(pos).copied().ok_or(MockError)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, MockError> {
        self.write_calls += 1;
        if self.fail_write {
            return Err(MockError);
        }
        let n = self.accept.map_or(data.len(), |max| data.len().min(max));
        self.tx.extend_from_slice(&data[..n]).unwrap();
        self.bench.log(Event::Write(n));
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), MockError> {
        self.bench.log(Event::Flush);
        if self.fail_flush {
            Err(MockError)
        } else {
            Ok(())
        }
    }
}

pub struct MockPin<'a> {
    pub bench: &'a Bench,
    pub high: bool,
}

impl OutputPin for MockPin<'_> {
    fn set_high(&mut self) {
        self.high = true;
        self.bench.log(Event::Pin(true));
    }

    fn set_low(&mut self) {
        self.high = false;
        self.bench.log(Event::Pin(false));
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}
