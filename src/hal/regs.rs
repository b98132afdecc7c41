//! GEM register operations consumed by the ring engine.
//!
//! Register addresses and the full register map belong to the vendor
//! bring-up collaborator; the engine only needs the five operations below.
//! Bit positions inside the network-control register are defined in
//! [`crate::internal::constants::net_ctrl`] (accessible through the crate's
//! internals) so the read-modify-write sequences stay inside the engine.

/// Register access required by the DMA ring engine.
///
/// Reads take `&self` so an interrupt-side holder of a second handle can
/// perform the status read-backs without mutable access. Implementations are
/// expected to be thin MMIO accessors; handles are cloned so the worker-side
/// channel and the ISR-side bridge each own one.
pub trait GemRegisters {
    /// Read the network-control register.
    fn read_net_ctrl(&self) -> u32;

    /// Write the network-control register.
    ///
    /// Callers follow every action-gating write with [`read_net_ctrl`]
    /// (Self::read_net_ctrl) to force completion before proceeding.
    fn write_net_ctrl(&mut self, value: u32);

    /// Read the transmit status register.
    ///
    /// The peripheral clears status bits on read; the engine relies on this
    /// read as the acknowledgment side effect.
    fn read_tx_status(&self) -> u32;

    /// Read the receive status register (clear-on-read, as TX).
    fn read_rx_status(&self) -> u32;

    /// Read the received-frames statistics counter.
    fn read_rx_frame_count(&self) -> u32;
}
