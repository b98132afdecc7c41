//! Per-channel DMA ring engine.
//!
//! This module contains the main [`GemChannel`] structure and the four core
//! operations the owning worker drives:
//!
//! - Bring-up ([`initialize`](GemChannel::initialize))
//! - Frame transmission ([`submit`](GemChannel::submit))
//! - Transmit reclaim ([`process_tx_completions`](GemChannel::process_tx_completions))
//! - Receive scanning ([`process_rx_ready`](GemChannel::process_rx_ready))
//!   with the RX stall-recovery heuristic
//!   ([`check_rx_liveness`](GemChannel::check_rx_liveness))
//!
//! For the pre-stack packet filter, see [`filtering`](super::filtering).
//! For the ISR entry points, see [`interrupt`](super::interrupt).

use embedded_hal::delay::DelayNs;

#[cfg(feature = "log")]
use log::warn;

use super::config::{ChannelConfig, State};
use super::error::{ConfigError, DmaError, IoError, RejectedFrame, Result};
use super::filtering;
use super::interrupt::ChannelEvents;
use crate::buffer::{BufferPool, FrameBuffer, FrameChain, FrameSink};
use crate::hal::barrier::data_sync_barrier;
use crate::hal::cache::CacheMaintenance;
use crate::hal::regs::GemRegisters;
use crate::internal::constants::{MIN_FRAME_SIZE, net_ctrl};
use crate::internal::dma::descriptor::rx::{STATUS_LEN_JUMBO_MASK, STATUS_LEN_MASK};
use crate::internal::dma::{DescriptorRing, RxDescriptor, SlotMap, TxDescriptor};
use crate::sync::tokens::TxTokenBank;

// =============================================================================
// Channel
// =============================================================================

/// One physical channel's DMA ring engine.
///
/// Owns the TX/RX descriptor rings, the buffer slot maps, and the TX
/// admission token bank for a single channel, and holds the collaborator
/// seams it drives them through. Exactly one worker context calls into a
/// channel; the only state shared with interrupt context is the
/// [`ChannelEvents`] binding and the token bank.
///
/// # Type Parameters
/// * `R` - register access ([`GemRegisters`])
/// * `C` - cache maintenance ([`CacheMaintenance`])
/// * `P` - buffer pool ([`BufferPool`])
/// * `S` - network stack sink ([`FrameSink`])
/// * `TX_DESC` / `RX_DESC` - ring depths
pub struct GemChannel<'e, R, C, P, S, const TX_DESC: usize, const RX_DESC: usize> {
    regs: R,
    cache: C,
    pool: P,
    sink: S,
    config: ChannelConfig,
    events: &'e ChannelEvents,
    tx_ring: DescriptorRing<TxDescriptor, TX_DESC>,
    rx_ring: DescriptorRing<RxDescriptor, RX_DESC>,
    tx_slots: SlotMap<TX_DESC>,
    rx_slots: SlotMap<RX_DESC>,
    tx_tokens: TxTokenBank,
    /// Received-frame counter reading at the previous liveness check
    last_rx_frame_count: u32,
    state: State,
}

impl<'e, R, C, P, S, const TX_DESC: usize, const RX_DESC: usize>
    GemChannel<'e, R, C, P, S, TX_DESC, RX_DESC>
where
    R: GemRegisters,
    C: CacheMaintenance,
    P: BufferPool,
    S: FrameSink,
{
    /// Create a channel in the `Uninitialized` state.
    ///
    /// `events` is the channel-to-worker binding also handed to the
    /// [`EventBridge`](super::interrupt::EventBridge) registered for this
    /// channel's interrupts.
    pub fn new(
        regs: R,
        cache: C,
        pool: P,
        sink: S,
        events: &'e ChannelEvents,
        config: ChannelConfig,
    ) -> Self {
        Self {
            regs,
            cache,
            pool,
            sink,
            config,
            events,
            tx_ring: DescriptorRing::new([const { TxDescriptor::new() }; TX_DESC]),
            rx_ring: DescriptorRing::new([const { RxDescriptor::new() }; RX_DESC]),
            tx_slots: SlotMap::new(),
            rx_slots: SlotMap::new(),
            tx_tokens: TxTokenBank::new(TX_DESC),
            last_rx_frame_count: 0,
            state: State::Uninitialized,
        }
    }

    // =========================================================================
    // State Accessors
    // =========================================================================

    /// Get the current state.
    #[inline(always)]
    pub fn state(&self) -> State {
        self.state
    }

    /// Get the active configuration.
    #[inline(always)]
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    // =========================================================================
    // Bring-up
    // =========================================================================

    /// Build the rings and post the initial RX buffers.
    ///
    /// The TX ring starts empty-of-work (every descriptor idle, wrap marker
    /// on the final slot); every RX slot is armed with a freshly allocated
    /// buffer. Any failure unwinds completely - buffers go back to the pool
    /// and the channel stays `Uninitialized`.
    ///
    /// # Errors
    /// - `AlreadyInitialized` - bring-up ran twice
    /// - `InvalidConfig` - buffer size below the minimum frame or beyond the
    ///   descriptor length field
    /// - `RingAlignment` - descriptor storage misaligned for the DMA engine
    /// - `BufferExhausted` - the pool could not cover the RX ring
    pub fn initialize(&mut self) -> Result<()> {
        if self.state != State::Uninitialized {
            return Err(ConfigError::AlreadyInitialized.into());
        }

        let max_len = if self.config.jumbo_frames {
            STATUS_LEN_JUMBO_MASK as usize
        } else {
            STATUS_LEN_MASK as usize
        };
        if self.config.buffer_size < MIN_FRAME_SIZE || self.config.buffer_size > max_len {
            return Err(ConfigError::InvalidConfig.into());
        }

        if !self.tx_ring.is_aligned() || !self.rx_ring.is_aligned() {
            return Err(ConfigError::RingAlignment.into());
        }

        self.reset_tx_ring();

        for index in 0..RX_DESC {
            let Some(buffer) = self.pool.try_allocate(self.config.buffer_size) else {
                #[cfg(feature = "log")]
                warn!("bring-up: buffer pool exhausted after {index} RX buffers");
                self.unwind_rx_ring();
                return Err(ConfigError::BufferExhausted.into());
            };
            if self.cache.is_cached(buffer.as_ptr()) {
                self.cache.invalidate_range(buffer.as_ptr(), buffer.capacity());
            }
            self.rx_ring
                .get(index)
                .arm(buffer.bus_address(), self.rx_ring.is_last_slot(index));
            self.rx_slots.insert(index, buffer);
        }
        self.rx_ring.reset_cursors();

        data_sync_barrier();
        self.state = State::Ready;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "gem dma channel ready: {} tx, {} rx descriptors",
            TX_DESC,
            RX_DESC
        );

        Ok(())
    }

    /// Reset every TX descriptor to the idle state and both cursors to 0.
    fn reset_tx_ring(&mut self) {
        for index in 0..TX_DESC {
            self.tx_ring
                .get(index)
                .reset_idle(self.tx_ring.is_last_slot(index));
        }
        self.tx_ring.reset_cursors();
    }

    /// Undo a partial RX bring-up: return posted buffers, clear descriptors.
    fn unwind_rx_ring(&mut self) {
        for index in 0..RX_DESC {
            if let Some(buffer) = self.rx_slots.take(index) {
                self.pool.release(buffer);
            }
            self.rx_ring.get(index).clear();
        }
        self.rx_ring.reset_cursors();
    }

    // =========================================================================
    // Transmit Path
    // =========================================================================

    /// Submit one frame for transmission.
    ///
    /// Takes ownership of the buffer; on success it stays with the channel
    /// until [`process_tx_completions`](Self::process_tx_completions) returns
    /// it to the pool. On failure the buffer comes back inside
    /// [`RejectedFrame`] without a token or descriptor having been consumed.
    ///
    /// Blocks (via `delay`) for at most the configured admission timeout
    /// waiting for a free descriptor. Each submission occupies exactly one
    /// descriptor slot.
    pub fn submit<D: DelayNs>(
        &mut self,
        frame: FrameBuffer,
        delay: &mut D,
    ) -> core::result::Result<(), RejectedFrame> {
        if self.state != State::Ready {
            return Err(RejectedFrame {
                error: IoError::InvalidState.into(),
                frame,
            });
        }

        let len = frame.len();
        if len < MIN_FRAME_SIZE {
            return Err(RejectedFrame {
                error: DmaError::FrameTooShort.into(),
                frame,
            });
        }
        if len > self.config.buffer_size {
            return Err(RejectedFrame {
                error: DmaError::FrameTooLarge.into(),
                frame,
            });
        }

        if !self.tx_tokens.acquire(self.config.tx_timeout_ms, delay) {
            #[cfg(feature = "log")]
            warn!("submit: timed out waiting for a TX descriptor");
            return Err(RejectedFrame {
                error: DmaError::AdmissionTimeout.into(),
                frame,
            });
        }

        // Write visibility must precede the descriptor publish.
        if self.cache.is_cached(frame.as_ptr()) {
            self.cache.flush_range(frame.as_ptr(), len);
        }

        let head = self.tx_ring.head();
        let address = frame.bus_address();
        let wrap = self.tx_ring.is_last_slot(head);

        // Ownership of the buffer passes to hardware with the publish.
        self.tx_slots.insert(head, frame);
        self.tx_ring.get(head).publish(address, len, wrap);
        self.tx_ring.advance_head();

        data_sync_barrier();
        self.start_transmit();
        data_sync_barrier();

        Ok(())
    }

    /// Pulse the start-transmit control bit.
    fn start_transmit(&mut self) {
        let ctrl = self.regs.read_net_ctrl();
        self.events.set_tx_busy(true);
        self.regs.write_net_ctrl(ctrl | net_ctrl::START_TX);
        // Read back so the write has reached the peripheral before returning.
        let _ = self.regs.read_net_ctrl();
    }

    // =========================================================================
    // Transmit Reclaim
    // =========================================================================

    /// Reclaim completed TX descriptors. Invoked after a TX-complete event.
    ///
    /// Walks from `tail` while descriptors remain in flight and hardware has
    /// marked them complete. The walk is bounded by the token count alone:
    /// idle descriptors also read as complete, so the in-flight count - not
    /// cursor equality - decides when the window is exhausted.
    ///
    /// Returns the number of slots reclaimed. Idempotent on an idle ring.
    pub fn process_tx_completions(&mut self) -> usize {
        if self.state != State::Ready {
            return 0;
        }

        let mut reclaimed = 0;
        while self.tx_tokens.in_flight() > 0 {
            let tail = self.tx_ring.tail();
            if !self.tx_ring.get(tail).is_complete() {
                break;
            }

            #[cfg(feature = "log")]
            if self.tx_ring.get(tail).has_error() {
                warn!(
                    "tx completion error at slot {tail}: status {:#010x}",
                    self.tx_ring.get(tail).error_flags()
                );
            }

            match self.tx_slots.take(tail) {
                Some(buffer) => self.pool.release(buffer),
                None => {
                    // Already-reclaimed or terminator slot; note it and keep
                    // walking.
                    #[cfg(feature = "log")]
                    warn!("tx reclaim: no buffer recorded at slot {tail}");
                }
            }

            self.tx_ring
                .get(tail)
                .reset_idle(self.tx_ring.is_last_slot(tail));
            self.tx_tokens.release();
            self.tx_ring.advance_tail();
            reclaimed += 1;
        }
        reclaimed
    }

    // =========================================================================
    // Receive Path
    // =========================================================================

    /// Scan the RX ring and forward completed frames to the stack.
    ///
    /// Invoked after an RX-ready event, and harmless to call speculatively.
    /// Runs the stall-recovery check first, then walks from `head` while the
    /// new-data marker is set and a buffer is recorded at the slot. Every
    /// processed slot is re-armed - with a fresh buffer when the frame was
    /// accepted and a replacement could be allocated, with the original
    /// buffer otherwise.
    ///
    /// Returns the number of frames forwarded toward the stack.
    pub fn process_rx_ready(&mut self) -> usize {
        if self.state != State::Ready {
            return 0;
        }

        self.check_rx_liveness();

        let mut forwarded = 0;
        let mut chain: FrameChain<RX_DESC> = FrameChain::new();

        loop {
            let head = self.rx_ring.head();
            if !self.rx_ring.get(head).is_new_data() {
                break;
            }
            let Some(mut buffer) = self.rx_slots.take(head) else {
                break;
            };

            let rx_bytes = self.rx_ring.get(head).frame_length(self.config.jumbo_frames);
            buffer.set_len(rx_bytes);

            let filter = self.config.filter;
            let accepted = filtering::may_accept_frame(buffer.as_slice(), &filter, &mut self.sink);

            // A rejected frame never costs an allocation; its buffer goes
            // straight back to hardware.
            let replacement = if accepted {
                self.pool.try_allocate(self.config.buffer_size)
            } else {
                None
            };

            let rearm = match replacement {
                Some(new_buffer) => {
                    let endpoint = self.sink.matching_endpoint(buffer.as_slice());
                    buffer.set_endpoint(endpoint);

                    if self.cache.is_cached(buffer.as_ptr()) {
                        self.cache.invalidate_range(buffer.as_ptr(), rx_bytes);
                    }

                    if self.config.chained_rx_delivery {
                        if chain.is_full() {
                            // Hardware can refill re-armed slots during the
                            // walk; flush in order rather than grow.
                            self.forward(&mut chain);
                        }
                        if let Err(frame) = chain.push(buffer) {
                            self.pool.release(frame);
                        }
                    } else {
                        let mut single: FrameChain<RX_DESC> = FrameChain::new();
                        if let Err(frame) = single.push(buffer) {
                            self.pool.release(frame);
                        }
                        self.forward(&mut single);
                    }
                    forwarded += 1;
                    new_buffer
                }
                None => {
                    #[cfg(feature = "log")]
                    if accepted {
                        warn!("rx: no replacement buffer, dropping frame at slot {head}");
                    }
                    buffer
                }
            };

            // Covers the whole receive window hardware may write.
            if self.cache.is_cached(rearm.as_ptr()) {
                self.cache.invalidate_range(rearm.as_ptr(), rearm.capacity());
            }
            let address = rearm.bus_address();
            self.rx_slots.insert(head, rearm);
            self.rx_ring
                .get(head)
                .arm(address, self.rx_ring.is_last_slot(head));

            self.rx_ring.advance_head();
        }

        self.forward(&mut chain);
        forwarded
    }

    /// Hand a chain of frames to the stack; on rejection release every
    /// buffer back to the pool.
    fn forward(&mut self, chain: &mut FrameChain<RX_DESC>) {
        if chain.is_empty() {
            return;
        }
        let outgoing = core::mem::replace(chain, FrameChain::new());
        if let Err(mut rejected) = self.sink.deliver(outgoing) {
            // Stack busy. The frames are lost but the memory is not.
            #[cfg(feature = "log")]
            warn!("rx: stack rejected {} frame(s)", rejected.len());
            for frame in rejected.drain() {
                self.pool.release(frame);
            }
        }
    }

    // =========================================================================
    // Stall Recovery
    // =========================================================================

    /// RX-path liveness heuristic, run on every RX scan and suitable as a
    /// periodic hook.
    ///
    /// A hardware erratum can wedge the receive path under sustained load.
    /// If the received-frame counter reads zero on two consecutive checks,
    /// the receive-enable bit is toggled off and on. Best effort only; a
    /// healthy channel is unaffected.
    pub fn check_rx_liveness(&mut self) {
        if self.state != State::Ready {
            return;
        }

        let count = self.regs.read_rx_frame_count();
        if count == 0 && self.last_rx_frame_count == 0 {
            let ctrl = self.regs.read_net_ctrl();
            self.regs.write_net_ctrl(ctrl & !net_ctrl::RX_ENABLE);
            let ctrl = self.regs.read_net_ctrl();
            self.regs.write_net_ctrl(ctrl | net_ctrl::RX_ENABLE);
        }
        self.last_rx_frame_count = count;
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Number of free TX descriptors (admission tokens available).
    pub fn tx_descriptors_available(&self) -> usize {
        self.tx_tokens.available()
    }

    /// Number of TX descriptors currently in flight.
    pub fn tx_in_flight(&self) -> usize {
        self.tx_tokens.in_flight()
    }

    /// Current TX producer index.
    pub fn tx_head(&self) -> usize {
        self.tx_ring.head()
    }

    /// Current TX consumer index.
    pub fn tx_tail(&self) -> usize {
        self.tx_ring.tail()
    }

    /// Current RX scan index.
    pub fn rx_head(&self) -> usize {
        self.rx_ring.head()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
