//! Transmit DMA Descriptor
//!
//! The TX descriptor hands one frame buffer to the DMA engine and reports
//! completion status afterwards. Ownership is carried by the USED bit in the
//! status word: software sets it while it owns the slot, clears it to publish
//! the slot to hardware, and hardware sets it again once the frame is out.

use super::VolatileCell;

// =============================================================================
// TX Status Word Bits
// =============================================================================

/// Used bit - set while software owns the descriptor; hardware sets it back
/// when transmission of the buffer is complete
pub const STATUS_USED: u32 = 1 << 31;
/// Wrap bit - this is the last descriptor in the ring, hardware loops to 0
pub const STATUS_WRAP: u32 = 1 << 30;
/// Retry limit exceeded during transmission
pub const STATUS_RETRY_EXCEEDED: u32 = 1 << 29;
/// Frame corruption due to a bus error while fetching the buffer
pub const STATUS_BUS_ERROR: u32 = 1 << 27;
/// Late collision detected
pub const STATUS_LATE_COLLISION: u32 = 1 << 26;
/// Last buffer of the frame
pub const STATUS_LAST: u32 = 1 << 15;
/// Frame length mask (14 bits)
pub const STATUS_LEN_MASK: u32 = 0x3FFF;

/// All completion error bits reported in the status word
pub const STATUS_ALL_ERRORS: u32 = STATUS_RETRY_EXCEEDED | STATUS_BUS_ERROR | STATUS_LATE_COLLISION;

// =============================================================================
// TxDescriptor Structure
// =============================================================================

/// Transmit DMA Descriptor (two 32-bit words).
///
/// All fields are accessed through volatile operations. The descriptor array
/// itself must live in DMA-visible memory; alignment of the array is enforced
/// by the ring that contains it.
#[repr(C)]
pub struct TxDescriptor {
    /// Buffer bus address (full 32 bits)
    address: VolatileCell<u32>,
    /// Status and control bits
    status: VolatileCell<u32>,
}

impl TxDescriptor {
    /// Create a new descriptor in the idle state (software-owned, no wrap).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            address: VolatileCell::new(0),
            status: VolatileCell::new(STATUS_USED),
        }
    }

    /// Publish a frame to hardware.
    ///
    /// Writes the buffer address first, then the status word with USED
    /// cleared - the status write is what transfers ownership, so it must
    /// come last.
    pub fn publish(&self, address: u32, len: usize, wrap: bool) {
        let mut flags = (len as u32) & STATUS_LEN_MASK;
        // One frame per descriptor, so every published buffer is the last.
        flags |= STATUS_LAST;
        if wrap {
            flags |= STATUS_WRAP;
        }
        self.address.set(address);
        self.status.set(flags);
    }

    /// Check whether hardware has finished with this descriptor.
    ///
    /// True both for completed and never-published (idle) descriptors; the
    /// caller bounds reclaim walks with the in-flight count.
    #[inline(always)]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        (self.status.get() & STATUS_USED) != 0
    }

    /// Check whether the descriptor is currently owned by hardware.
    #[inline(always)]
    #[must_use]
    pub fn is_hardware_owned(&self) -> bool {
        !self.is_complete()
    }

    /// Check if the completed transmission reported any error.
    #[inline(always)]
    #[must_use]
    pub fn has_error(&self) -> bool {
        (self.status.get() & STATUS_ALL_ERRORS) != 0
    }

    /// Get all completion error flags.
    #[inline(always)]
    #[must_use]
    pub fn error_flags(&self) -> u32 {
        self.status.get() & STATUS_ALL_ERRORS
    }

    /// Check if the wrap marker is set.
    #[inline(always)]
    #[must_use]
    pub fn has_wrap(&self) -> bool {
        (self.status.get() & STATUS_WRAP) != 0
    }

    /// Frame length recorded in the status word.
    #[inline(always)]
    #[must_use]
    pub fn frame_length(&self) -> usize {
        (self.status.get() & STATUS_LEN_MASK) as usize
    }

    /// Check if the last-buffer marker is set.
    #[inline(always)]
    #[must_use]
    pub fn is_last_segment(&self) -> bool {
        (self.status.get() & STATUS_LAST) != 0
    }

    /// Reset the descriptor to the idle software-owned state, clearing
    /// everything but the wrap marker (which is preserved only on the final
    /// ring slot).
    pub fn reset_idle(&self, wrap: bool) {
        let mut flags = STATUS_USED;
        if wrap {
            flags |= STATUS_WRAP;
        }
        self.status.set(flags);
        self.address.set(0);
    }

    /// Get the raw address word (for diagnostics).
    #[inline(always)]
    #[must_use]
    pub fn raw_address(&self) -> u32 {
        self.address.get()
    }

    /// Get the raw status word (for diagnostics).
    #[inline(always)]
    #[must_use]
    pub fn raw_status(&self) -> u32 {
        self.status.get()
    }

    /// Simulate hardware completing this descriptor (sets USED, preserves
    /// the other status bits).
    #[cfg(test)]
    pub(crate) fn simulate_complete(&self) {
        self.status.update(|v| v | STATUS_USED);
    }

    /// Simulate hardware completing this descriptor with an error report.
    #[cfg(test)]
    pub(crate) fn simulate_error_complete(&self, errors: u32) {
        self.status.update(|v| v | STATUS_USED | (errors & STATUS_ALL_ERRORS));
    }
}

impl Default for TxDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

// Safety: TxDescriptor uses volatile cells for all DMA-accessed fields
unsafe impl Sync for TxDescriptor {}
unsafe impl Send for TxDescriptor {}

// =============================================================================
// Unit Tests
// =============================================================================
