//! DMA Ring Machinery
//!
//! This module provides the descriptor rings and buffer slot maps that carry
//! the producer/consumer protocol between the driver and the GEM DMA engine.
//!
//! # Architecture
//!
//! - [`descriptor`]: the 2-word GEM TX/RX descriptor layouts with named
//!   accessors over the raw bit fields
//! - [`ring`]: circular descriptor array with independent head/tail cursors
//! - [`slots`]: ownership-tagged buffer slot maps, one entry per ring slot

pub(crate) mod descriptor;
pub(crate) mod ring;
pub(crate) mod slots;

pub(crate) use descriptor::{RxDescriptor, TxDescriptor};
pub(crate) use ring::DescriptorRing;
pub(crate) use slots::SlotMap;
