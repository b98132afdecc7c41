//! Hardware abstraction seams for the DMA engine.
//!
//! The engine touches the platform through three narrow interfaces:
//!
//! - [`cache`] - data-cache maintenance around DMA boundaries
//! - [`regs`] - the handful of GEM register operations the ring protocol
//!   needs (the full register layout belongs to the peripheral bring-up
//!   collaborator)
//! - [`barrier`] - the data-synchronization barrier used when publishing
//!   descriptors and kicking the hardware

pub mod barrier;
pub mod cache;
pub mod regs;

pub use cache::{CacheMaintenance, UncachedMemory};
pub use regs::GemRegisters;
