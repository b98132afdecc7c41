//! TX admission token bank.
//!
//! A counting permit bank sized to the TX ring depth. Acquiring a token gates
//! descriptor publication; the reclaim path returns one token per completed
//! slot. The live in-flight count is always `capacity - available`, which is
//! also what bounds the reclaim walk.

use embedded_hal::delay::DelayNs;

use super::primitives::CriticalSectionCell;
use crate::internal::constants::TOKEN_POLL_INTERVAL_US;

/// Counting resource bank bounding in-flight TX descriptors.
pub struct TxTokenBank {
    available: CriticalSectionCell<usize>,
    capacity: usize,
}

impl TxTokenBank {
    /// Create a bank with all `capacity` tokens available.
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self {
            available: CriticalSectionCell::new(capacity),
            capacity,
        }
    }

    /// Take one token without waiting. Returns `false` when none are free.
    pub fn try_acquire(&self) -> bool {
        self.available.with(|count| {
            if *count > 0 {
                *count -= 1;
                true
            } else {
                false
            }
        })
    }

    /// Take one token, polling for up to `timeout_ms` milliseconds.
    ///
    /// The wait is a bounded poll through the caller's delay provider; the
    /// token bank itself never blocks with interrupts masked.
    pub fn acquire<D: DelayNs>(&self, timeout_ms: u32, delay: &mut D) -> bool {
        if self.try_acquire() {
            return true;
        }
        let budget_us = u64::from(timeout_ms) * 1_000;
        let mut waited_us = 0u64;
        while waited_us < budget_us {
            delay.delay_us(TOKEN_POLL_INTERVAL_US);
            waited_us += u64::from(TOKEN_POLL_INTERVAL_US);
            if self.try_acquire() {
                return true;
            }
        }
        false
    }

    /// Return one token to the bank (non-blocking, ISR-safe).
    pub fn release(&self) {
        self.available.with(|count| {
            debug_assert!(*count < self.capacity, "token released twice");
            if *count < self.capacity {
                *count += 1;
            }
        });
    }

    /// Number of free tokens.
    pub fn available(&self) -> usize {
        self.available.with(|count| *count)
    }

    /// Number of descriptors currently in flight.
    pub fn in_flight(&self) -> usize {
        self.capacity - self.available()
    }

    /// Total number of tokens the bank was created with.
    #[inline(always)]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
