//! Core driver components for the GEM DMA ring engine.
//!
//! This module contains the essential building blocks for operating one
//! physical channel:
//!
//! - [`config`] - Configuration types and builder patterns
//! - [`error`] - Error types and result aliases
//! - [`channel`] - The per-channel ring engine implementation
//! - [`filtering`] - The pre-stack packet acceptance filter
//! - [`interrupt`] - Event flags and ISR entry points

// Submodules
pub mod channel;
pub mod config;
pub mod error;
pub mod filtering;
pub mod interrupt;

// Re-exports for convenience
pub use channel::GemChannel;
pub use config::{ChannelConfig, FilterConfig, State};
pub use error::{
    ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, RejectedFrame,
    Result,
};
pub use filtering::may_accept_frame;
pub use interrupt::{ChannelEvents, EventBridge, EventSet, WorkerNotifier};
