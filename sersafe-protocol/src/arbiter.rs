//! TX lock arbitration over a shared control line
//!
//! Every transmitter on the channel watches the same line. A transmitter
//! may only drive the channel while it holds the line asserted; anyone
//! finding it asserted waits, in fixed poll steps, up to a timeout.
//!
//! The arbiter keeps no state besides the line itself. Each successful
//! [`TxLockArbiter::acquire`] must be paired with exactly one
//! [`TxLockArbiter::release`], or use [`TxLockArbiter::lock`] and let the
//! guard release on drop.

use core::ops::{Deref, DerefMut};

use embedded_hal::delay::DelayNs;
use sersafe_hal::ControlLine;

/// Milliseconds to wait before re-sampling a busy line
pub const GET_LOCK_WAIT_MS: u32 = 1;

/// Milliseconds to wait for the line before giving up
pub const GET_LOCK_TIMEOUT_MS: u32 = 15;

/// Owner of the TX lock line
pub struct TxLockArbiter<L> {
    line: L,
    poll_ms: u32,
}

impl<L: ControlLine> TxLockArbiter<L> {
    /// Take ownership of the lock line with the default poll interval
    pub fn new(line: L) -> Self {
        Self::with_poll_interval(line, GET_LOCK_WAIT_MS)
    }

    /// Take ownership of the lock line
    ///
    /// A zero `poll_ms` is raised to 1 so the timeout always advances.
    pub fn with_poll_interval(line: L, poll_ms: u32) -> Self {
        Self {
            line,
            poll_ms: poll_ms.max(1),
        }
    }

    /// Wait for the line to be free, then assert it
    ///
    /// Returns `false` once `timeout_ms` has been spent waiting without
    /// seeing the line deasserted. The line is never forced on failure.
    ///
    /// The line is read back after asserting it. If it does not read
    /// asserted the drive failed; the line is released again and the
    /// acquire fails.
    pub fn acquire<D: DelayNs>(&mut self, delay: &mut D, timeout_ms: u32) -> bool {
        let mut remaining = timeout_ms;
        while self.line.is_asserted() {
            delay.delay_ms(self.poll_ms);
            remaining = remaining.saturating_sub(self.poll_ms);
            if remaining == 0 {
                warn!("TX lock timeout after {} ms", timeout_ms);
                return false;
            }
        }
        self.line.assert();
        if !self.line.is_asserted() {
            warn!("TX lock line did not assert");
            self.line.deassert();
            return false;
        }
        trace!("TX lock acquired");
        true
    }

    /// Deassert the line unconditionally
    pub fn release(&mut self) {
        self.line.deassert();
        trace!("TX lock released");
    }

    /// Acquire the line and hold it for the lifetime of the returned guard
    pub fn lock<D: DelayNs>(
        &mut self,
        delay: &mut D,
        timeout_ms: u32,
    ) -> Option<TxLockGuard<'_, L>> {
        if self.acquire(delay, timeout_ms) {
            Some(TxLockGuard { arbiter: self })
        } else {
            None
        }
    }

    /// Check whether anyone currently holds the line
    pub fn is_busy(&mut self) -> bool {
        self.line.is_asserted()
    }

    /// Poll interval in milliseconds
    pub fn poll_ms(&self) -> u32 {
        self.poll_ms
    }

    /// Recover the line
    pub fn into_inner(self) -> L {
        self.line
    }
}

/// Held TX lock; deasserts the line when dropped
pub struct TxLockGuard<'a, L: ControlLine> {
    arbiter: &'a mut TxLockArbiter<L>,
}

impl<L: ControlLine> Deref for TxLockGuard<'_, L> {
    type Target = L;
    fn deref(&self) -> &L {
        &self.arbiter.line
    }
}

impl<L: ControlLine> DerefMut for TxLockGuard<'_, L> {
    fn deref_mut(&mut self) -> &mut L {
        &mut self.arbiter.line
    }
}

impl<L: ControlLine> Drop for TxLockGuard<'_, L> {
    fn drop(&mut self) {
        self.arbiter.release();
    }
}
