//! Testing utilities and mock implementations
//!
//! This module provides mock collaborators for testing the ring engine on
//! the host without hardware access: a register file, a buffer pool backed
//! by heap blocks, a recording frame sink, a scripted cache gate, and a
//! counting worker notifier.
//!
//! Only available when running `cargo test`.

#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::{Cell, RefCell};
use core::ptr::NonNull;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::buffer::{BufferPool, EndpointId, FrameBuffer, FrameChain, FrameSink};
use crate::driver::interrupt::WorkerNotifier;
use crate::hal::cache::CacheMaintenance;
use crate::hal::regs::GemRegisters;

// =============================================================================
// Mock Registers
// =============================================================================

#[derive(Debug, Default)]
struct RegFile {
    net_ctrl: u32,
    net_ctrl_writes: Vec<u32>,
    tx_status: u32,
    rx_status: u32,
    tx_status_reads: usize,
    rx_status_reads: usize,
    rx_frame_count: u32,
}

/// Mock GEM register file.
///
/// Handles are cheap clones over shared state, so a test can hold one handle
/// while the channel or bridge owns another - mirroring how the worker and
/// the ISR each hold a register handle on hardware.
#[derive(Clone, Default)]
pub struct MockRegisters {
    state: Rc<RefCell<RegFile>>,
}

impl MockRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current network-control register value.
    pub fn net_ctrl(&self) -> u32 {
        self.state.borrow().net_ctrl
    }

    /// Preload the network-control register.
    pub fn set_net_ctrl(&self, value: u32) {
        self.state.borrow_mut().net_ctrl = value;
    }

    /// Every value written to the network-control register, in order.
    pub fn net_ctrl_writes(&self) -> Vec<u32> {
        self.state.borrow().net_ctrl_writes.clone()
    }

    pub fn clear_net_ctrl_writes(&self) {
        self.state.borrow_mut().net_ctrl_writes.clear();
    }

    pub fn tx_status_reads(&self) -> usize {
        self.state.borrow().tx_status_reads
    }

    pub fn rx_status_reads(&self) -> usize {
        self.state.borrow().rx_status_reads
    }

    /// Program the received-frames statistics counter.
    pub fn set_rx_frame_count(&self, count: u32) {
        self.state.borrow_mut().rx_frame_count = count;
    }
}

impl GemRegisters for MockRegisters {
    fn read_net_ctrl(&self) -> u32 {
        self.state.borrow().net_ctrl
    }

    fn write_net_ctrl(&mut self, value: u32) {
        let mut state = self.state.borrow_mut();
        state.net_ctrl = value;
        state.net_ctrl_writes.push(value);
    }

    fn read_tx_status(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.tx_status_reads += 1;
        state.tx_status
    }

    fn read_rx_status(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.rx_status_reads += 1;
        state.rx_status
    }

    fn read_rx_frame_count(&self) -> u32 {
        self.state.borrow().rx_frame_count
    }
}

// =============================================================================
// Mock Buffer Pool
// =============================================================================

struct Block {
    storage: std::boxed::Box<[u8]>,
    in_use: bool,
}

#[derive(Default)]
struct PoolState {
    blocks: Vec<Block>,
    exhausted: bool,
    allow_limit: Option<usize>,
    allocated: usize,
    released: usize,
}

/// Mock buffer pool backed by heap blocks.
///
/// Every allocation creates a fresh block, so block index `i` is the `i`-th
/// allocation the engine made - during bring-up that maps one-to-one onto RX
/// ring slots, which lets tests write received-frame bytes into the right
/// buffer.
#[derive(Clone, Default)]
pub struct MockPool {
    state: Rc<RefCell<PoolState>>,
}

impl MockPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make further allocations fail, simulating pool exhaustion.
    pub fn set_exhausted(&self, exhausted: bool) {
        self.state.borrow_mut().exhausted = exhausted;
    }

    /// Serve at most `limit` allocations in total, then fail.
    pub fn set_allow(&self, limit: usize) {
        self.state.borrow_mut().allow_limit = Some(limit);
    }

    /// Total number of allocations served.
    pub fn allocated(&self) -> usize {
        self.state.borrow().allocated
    }

    /// Total number of buffers released back.
    pub fn released(&self) -> usize {
        self.state.borrow().released
    }

    /// Number of blocks currently out on loan.
    pub fn in_use(&self) -> usize {
        self.state.borrow().blocks.iter().filter(|b| b.in_use).count()
    }

    /// Base address of the `index`-th allocated block.
    pub fn block_addr(&self, index: usize) -> usize {
        self.state.borrow().blocks[index].storage.as_ptr() as usize
    }

    /// Write bytes into the `index`-th allocated block, as DMA hardware
    /// would.
    pub fn write(&self, index: usize, offset: usize, bytes: &[u8]) {
        let mut state = self.state.borrow_mut();
        let storage = &mut state.blocks[index].storage;
        storage[offset..offset + bytes.len()].copy_from_slice(bytes);
    }
}

impl BufferPool for MockPool {
    fn try_allocate(&mut self, capacity: usize) -> Option<FrameBuffer> {
        let mut state = self.state.borrow_mut();
        if state.exhausted {
            return None;
        }
        if let Some(limit) = state.allow_limit
            && state.allocated >= limit
        {
            return None;
        }
        state.blocks.push(Block {
            storage: std::vec![0u8; capacity].into_boxed_slice(),
            in_use: true,
        });
        state.allocated += 1;
        let block = state.blocks.last_mut().unwrap();
        let ptr = NonNull::new(block.storage.as_mut_ptr()).unwrap();
        // SAFETY: the block stays alive in the pool for the test's duration
        // and is handed out exactly once until released.
        Some(unsafe { FrameBuffer::from_raw(ptr, capacity) })
    }

    fn release(&mut self, buffer: FrameBuffer) {
        let mut state = self.state.borrow_mut();
        let addr = buffer.as_ptr() as usize;
        let block = state
            .blocks
            .iter_mut()
            .find(|b| b.storage.as_ptr() as usize == addr)
            .expect("released buffer does not belong to this pool");
        assert!(block.in_use, "buffer released twice");
        block.in_use = false;
        state.released += 1;
    }
}

// =============================================================================
// Mock Frame Sink
// =============================================================================

#[derive(Default)]
struct SinkState {
    frames: Vec<Vec<u8>>,
    chain_sizes: Vec<usize>,
    held: Vec<FrameBuffer>,
    endpoints: Vec<Option<EndpointId>>,
    reject: bool,
    udp_ports: Vec<u16>,
    endpoint: Option<EndpointId>,
}

/// Mock network stack sink recording everything delivered to it.
#[derive(Clone)]
pub struct MockSink {
    state: Rc<RefCell<SinkState>>,
}

impl Default for MockSink {
    fn default() -> Self {
        let state = SinkState {
            endpoint: Some(EndpointId(1)),
            ..SinkState::default()
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload copies of every delivered frame, in delivery order.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.state.borrow().frames.clone()
    }

    /// Length of each delivered chain, in delivery order.
    pub fn chain_sizes(&self) -> Vec<usize> {
        self.state.borrow().chain_sizes.clone()
    }

    /// Endpoint stamped on each delivered frame, in delivery order.
    pub fn endpoints(&self) -> Vec<Option<EndpointId>> {
        self.state.borrow().endpoints.clone()
    }

    /// Make `deliver` reject (stack-busy) until cleared.
    pub fn set_reject(&self, reject: bool) {
        self.state.borrow_mut().reject = reject;
    }

    /// Register a listening UDP port for the acceptance filter.
    pub fn register_udp_port(&mut self, port: u16) {
        self.state.borrow_mut().udp_ports.push(port);
    }

    /// Set the endpoint returned by the best-match lookup.
    pub fn set_endpoint(&self, endpoint: Option<EndpointId>) {
        self.state.borrow_mut().endpoint = endpoint;
    }
}

impl FrameSink for MockSink {
    fn deliver<const N: usize>(
        &mut self,
        chain: FrameChain<N>,
    ) -> core::result::Result<(), FrameChain<N>> {
        let mut state = self.state.borrow_mut();
        if state.reject {
            return Err(chain);
        }
        let mut chain = chain;
        let mut count = 0;
        for frame in chain.drain() {
            state.frames.push(frame.as_slice().to_vec());
            state.endpoints.push(frame.endpoint());
            state.held.push(frame);
            count += 1;
        }
        state.chain_sizes.push(count);
        Ok(())
    }

    fn matching_endpoint(&mut self, _frame: &[u8]) -> Option<EndpointId> {
        self.state.borrow().endpoint
    }

    fn has_udp_listener(&mut self, port: u16) -> bool {
        self.state.borrow().udp_ports.contains(&port)
    }
}

// =============================================================================
// Mock Cache Gate
// =============================================================================

#[derive(Default)]
struct CacheState {
    cached: bool,
    flushes: Vec<(usize, usize)>,
    invalidates: Vec<(usize, usize)>,
}

/// Scripted cache gate recording every maintenance call.
#[derive(Clone, Default)]
pub struct MockCache {
    state: Rc<RefCell<CacheState>>,
}

impl MockCache {
    /// `cached` controls what `is_cached` reports for every address.
    pub fn new(cached: bool) -> Self {
        let mock = Self::default();
        mock.state.borrow_mut().cached = cached;
        mock
    }

    /// Every `(addr, len)` flushed, in order.
    pub fn flushes(&self) -> Vec<(usize, usize)> {
        self.state.borrow().flushes.clone()
    }

    /// Every `(addr, len)` invalidated, in order.
    pub fn invalidates(&self) -> Vec<(usize, usize)> {
        self.state.borrow().invalidates.clone()
    }
}

impl CacheMaintenance for MockCache {
    fn is_cached(&self, _addr: *const u8) -> bool {
        self.state.borrow().cached
    }

    fn flush_range(&self, addr: *const u8, len: usize) {
        self.state.borrow_mut().flushes.push((addr as usize, len));
    }

    fn invalidate_range(&self, addr: *const u8, len: usize) {
        self.state.borrow_mut().invalidates.push((addr as usize, len));
    }
}

// =============================================================================
// Worker Notifier / Delay
// =============================================================================

/// Notifier counting how many times the worker was woken.
#[derive(Clone, Default)]
pub struct CountingNotifier {
    count: Rc<Cell<usize>>,
}

impl CountingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl WorkerNotifier for CountingNotifier {
    fn notify(&self) {
        self.count.set(self.count.get() + 1);
    }
}

/// Delay provider that does not actually wait - timeout loops run their full
/// iteration count instantly.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
