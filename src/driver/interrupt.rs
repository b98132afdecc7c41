//! Interrupt-to-worker event bridging.
//!
//! The interrupt handlers do the minimum at interrupt priority: acknowledge
//! the peripheral with a status read, set a sticky event flag, and wake the
//! single owning worker with a non-blocking notification. All descriptor
//! scanning is deferred to the woken worker.
//!
//! One [`ChannelEvents`] instance binds one channel to its worker: the
//! worker-side [`GemChannel`](crate::GemChannel) and the ISR-side
//! [`EventBridge`] both hold a reference to it. There is no global handle
//! table.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::hal::regs::GemRegisters;

// =============================================================================
// Event Flags
// =============================================================================

const EVENT_TX_COMPLETE: u32 = 1 << 0;
const EVENT_RX_READY: u32 = 1 << 1;

/// Snapshot of pending events, taken atomically by the worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventSet {
    bits: u32,
}

impl EventSet {
    /// A TX-complete interrupt fired since the last drain.
    #[inline(always)]
    #[must_use]
    pub const fn tx_complete(&self) -> bool {
        self.bits & EVENT_TX_COMPLETE != 0
    }

    /// An RX-ready interrupt fired since the last drain.
    #[inline(always)]
    #[must_use]
    pub const fn rx_ready(&self) -> bool {
        self.bits & EVENT_RX_READY != 0
    }

    /// No events pending.
    #[inline(always)]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

/// Sticky event state shared between one channel and its worker.
///
/// Interrupt handlers set bits; the worker drains them with [`take`]
/// (Self::take). Bits stay set until drained, so an event cannot be lost
/// between the ISR firing and the worker running.
pub struct ChannelEvents {
    flags: AtomicU32,
    tx_busy: AtomicBool,
}

impl ChannelEvents {
    /// Create with no events pending (const, suitable for statics).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            flags: AtomicU32::new(0),
            tx_busy: AtomicBool::new(false),
        }
    }

    /// Post the TX-complete event (ISR context).
    #[inline]
    pub fn post_tx_complete(&self) {
        self.flags.fetch_or(EVENT_TX_COMPLETE, Ordering::SeqCst);
    }

    /// Post the RX-ready event (ISR context).
    #[inline]
    pub fn post_rx_ready(&self) {
        self.flags.fetch_or(EVENT_RX_READY, Ordering::SeqCst);
    }

    /// Atomically drain all pending events (worker context).
    #[inline]
    pub fn take(&self) -> EventSet {
        EventSet {
            bits: self.flags.swap(0, Ordering::SeqCst),
        }
    }

    /// Peek at pending events without draining them.
    #[inline]
    pub fn pending(&self) -> EventSet {
        EventSet {
            bits: self.flags.load(Ordering::SeqCst),
        }
    }

    /// Mark the transmitter busy/idle. Set when START-TX is pulsed, cleared
    /// by the TX-complete interrupt.
    #[inline]
    pub fn set_tx_busy(&self, busy: bool) {
        self.tx_busy.store(busy, Ordering::SeqCst);
    }

    /// True while a transmission kicked by the worker has not completed.
    #[inline]
    pub fn is_tx_busy(&self) -> bool {
        self.tx_busy.load(Ordering::SeqCst)
    }
}

impl Default for ChannelEvents {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Worker Notification
// =============================================================================

/// Non-blocking wake primitive for the owning worker context.
///
/// Implementations must be callable from interrupt priority and must not
/// block: a task notification, a semaphore give-from-ISR, a waker.
pub trait WorkerNotifier {
    /// Wake the worker. Spurious wakes are harmless; the worker re-reads the
    /// event flags after every wake.
    fn notify(&self);
}

// =============================================================================
// Event Bridge (ISR entry points)
// =============================================================================

/// ISR-side half of the channel-to-worker binding.
///
/// Holds its own register handle (for the status read-backs), the shared
/// [`ChannelEvents`], and the wake primitive. Register this object's
/// [`on_tx_complete`](Self::on_tx_complete) and
/// [`on_rx_ready`](Self::on_rx_ready) as the interrupt service entry points,
/// passing the bridge as the opaque channel-context argument.
pub struct EventBridge<'a, R: GemRegisters, W: WorkerNotifier> {
    regs: R,
    events: &'a ChannelEvents,
    notifier: W,
}

impl<'a, R: GemRegisters, W: WorkerNotifier> EventBridge<'a, R, W> {
    /// Create the bridge for one channel.
    pub const fn new(regs: R, events: &'a ChannelEvents, notifier: W) -> Self {
        Self {
            regs,
            events,
            notifier,
        }
    }

    /// TX-complete interrupt service entry point.
    pub fn on_tx_complete(&self) {
        // The peripheral's own handler has already cleared the TX status bits
        // (clear-on-read register) but never reads the register back, which
        // can leave the interrupt line asserted and the ISR re-entering
        // forever. Read it back here.
        let _ = self.regs.read_tx_status();

        self.events.post_tx_complete();
        self.events.set_tx_busy(false);
        self.notifier.notify();
    }

    /// RX-ready interrupt service entry point.
    pub fn on_rx_ready(&self) {
        // Same read-back quirk as the TX side.
        let _ = self.regs.read_rx_status();

        self.events.post_rx_ready();
        self.notifier.notify();
    }

    /// The shared event state this bridge posts into.
    pub fn events(&self) -> &ChannelEvents {
        self.events
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
