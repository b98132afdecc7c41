//! Data-cache maintenance around DMA boundaries.
//!
//! Buffers may live in cached or uncached memory depending on how the pool
//! carves them out. Every hand-off across the driver/hardware boundary goes
//! through this gate: flush before the DMA engine reads (TX), invalidate
//! before the CPU reads what the DMA engine wrote (RX).

/// Cache-maintenance operations for DMA buffer memory.
pub trait CacheMaintenance {
    /// True if `addr` lies in CPU-cached memory and therefore needs explicit
    /// maintenance around DMA transfers.
    fn is_cached(&self, addr: *const u8) -> bool;

    /// Write back `len` bytes at `addr` from the cache to memory, making CPU
    /// writes visible to the DMA engine.
    fn flush_range(&self, addr: *const u8, len: usize);

    /// Invalidate `len` bytes at `addr` in the cache, making DMA writes
    /// visible to the CPU.
    fn invalidate_range(&self, addr: *const u8, len: usize);
}

/// Cache gate for platforms whose DMA buffers live in uncached memory.
///
/// Reports every address as uncached, so no maintenance is performed.
#[derive(Debug, Clone, Copy, Default)]
pub struct UncachedMemory;

impl CacheMaintenance for UncachedMemory {
    #[inline(always)]
    fn is_cached(&self, _addr: *const u8) -> bool {
        false
    }

    #[inline(always)]
    fn flush_range(&self, _addr: *const u8, _len: usize) {}

    #[inline(always)]
    fn invalidate_range(&self, _addr: *const u8, _len: usize) {}
}

// =============================================================================
// Unit Tests
// =============================================================================
