//! Receive DMA Descriptor
//!
//! The RX descriptor posts one empty buffer to the DMA engine and reports the
//! received frame afterwards. Ownership is carried by the NEW-DATA bit in the
//! low bits of the *address* word: hardware sets it after writing a frame;
//! software clears it by rewriting the address word when it re-arms the slot.

use super::VolatileCell;

// =============================================================================
// RX Address Word Bits
// =============================================================================

/// New-data bit - hardware sets this after storing a received frame
pub const ADDR_NEW_DATA: u32 = 1 << 0;
/// Wrap bit - this is the last descriptor in the ring, hardware loops to 0
pub const ADDR_WRAP: u32 = 1 << 1;
/// Mask selecting the buffer address (the low two bits are control flags)
pub const ADDR_MASK: u32 = 0xFFFF_FFFC;

// =============================================================================
// RX Status Word Bits
// =============================================================================

/// Frame length mask for standard frames (13 bits)
pub const STATUS_LEN_MASK: u32 = 0x0000_1FFF;
/// Frame length mask when jumbo frames are enabled (14 bits)
pub const STATUS_LEN_JUMBO_MASK: u32 = 0x0000_3FFF;
/// Start-of-frame marker
pub const STATUS_START_OF_FRAME: u32 = 1 << 14;
/// End-of-frame marker
pub const STATUS_END_OF_FRAME: u32 = 1 << 15;

// =============================================================================
// RxDescriptor Structure
// =============================================================================

/// Receive DMA Descriptor (two 32-bit words).
///
/// All fields are accessed through volatile operations. The descriptor array
/// itself must live in DMA-visible memory; alignment of the array is enforced
/// by the ring that contains it.
#[repr(C)]
pub struct RxDescriptor {
    /// Buffer bus address, with the new-data and wrap flags in the low bits
    address: VolatileCell<u32>,
    /// Frame status (length, start/end-of-frame)
    status: VolatileCell<u32>,
}

impl RxDescriptor {
    /// Create a new cleared descriptor. Call [`arm`](Self::arm) before
    /// exposing it to hardware.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            address: VolatileCell::new(0),
            status: VolatileCell::new(0),
        }
    }

    /// Arm the descriptor with a buffer and hand it to hardware.
    ///
    /// Clears the status word, then rewrites the address word with the
    /// new-data bit clear (which is what returns the slot to hardware) and
    /// reads it back so the write has reached memory before the slot counts
    /// as re-armed.
    pub fn arm(&self, address: u32, wrap: bool) {
        let mut word = address & ADDR_MASK;
        if wrap {
            word |= ADDR_WRAP;
        }
        self.status.set(0);
        self.address.set(word);
        // Read back to force visibility before the slot counts as armed.
        let _ = self.address.get();
    }

    /// Check whether hardware has stored a frame in this slot.
    #[inline(always)]
    #[must_use]
    pub fn is_new_data(&self) -> bool {
        (self.address.get() & ADDR_NEW_DATA) != 0
    }

    /// Check if the wrap marker is set.
    #[inline(always)]
    #[must_use]
    pub fn has_wrap(&self) -> bool {
        (self.address.get() & ADDR_WRAP) != 0
    }

    /// Buffer bus address with the control bits masked off.
    #[inline(always)]
    #[must_use]
    pub fn buffer_address(&self) -> u32 {
        self.address.get() & ADDR_MASK
    }

    /// Received frame length.
    ///
    /// Selects the jumbo-capable length mask when jumbo frames are enabled.
    #[inline(always)]
    #[must_use]
    pub fn frame_length(&self, jumbo: bool) -> usize {
        let mask = if jumbo {
            STATUS_LEN_JUMBO_MASK
        } else {
            STATUS_LEN_MASK
        };
        (self.status.get() & mask) as usize
    }

    /// Check if this buffer holds the start of a frame.
    #[inline(always)]
    #[must_use]
    pub fn is_start_of_frame(&self) -> bool {
        (self.status.get() & STATUS_START_OF_FRAME) != 0
    }

    /// Check if this buffer holds the end of a frame.
    #[inline(always)]
    #[must_use]
    pub fn is_end_of_frame(&self) -> bool {
        (self.status.get() & STATUS_END_OF_FRAME) != 0
    }

    /// Clear both words (used only while unwinding a failed bring-up).
    pub fn clear(&self) {
        self.status.set(0);
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

    /// Simulate hardware storing a complete frame of `len` bytes.
    #[cfg(test)]
    pub(crate) fn simulate_frame(&self, len: usize) {
        self.status
            .set((len as u32) | STATUS_START_OF_FRAME | STATUS_END_OF_FRAME);
        self.address.update(|v| v | ADDR_NEW_DATA);
    }
}

impl Default for RxDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

// Safety: RxDescriptor uses volatile cells for all DMA-accessed fields
unsafe impl Sync for RxDescriptor {}
unsafe impl Send for RxDescriptor {}

// =============================================================================
// Unit Tests
// =============================================================================
