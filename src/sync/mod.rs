//! Synchronization primitives for the single-worker / ISR split.
//!
//! - [`primitives`] - critical-section-protected interior mutability
//! - [`tokens`] - the counting TX admission token bank

pub mod primitives;
pub mod tokens;

pub use primitives::CriticalSectionCell;
pub use tokens::TxTokenBank;
