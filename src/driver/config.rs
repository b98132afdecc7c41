//! Configuration types for the GEM DMA ring engine.

use crate::internal::constants::{JUMBO_BUFFER_SIZE, STANDARD_BUFFER_SIZE, TX_TOKEN_TIMEOUT_MS};

// =============================================================================
// Channel State
// =============================================================================

/// Lifecycle state of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Rings not yet built; no operation is valid except `initialize`
    #[default]
    Uninitialized,
    /// Rings built and buffers posted; the channel is serving traffic
    Ready,
}

// =============================================================================
// Acceptance Filter Configuration
// =============================================================================

/// Configuration of the pre-stack packet acceptance filter.
///
/// The well-known service ports mirror services the stack may have compiled
/// in; a disabled flag removes that port from the admission set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilterConfig {
    /// Apply the deep IPv4 checks (fragments, header length, UDP ports).
    /// When false only the EtherType gate applies.
    pub enabled: bool,
    /// Admit LLMNR traffic (port 5355, either direction)
    pub llmnr: bool,
    /// Admit NetBIOS name-service traffic (port 137, either direction)
    pub nbns: bool,
    /// Admit DNS replies (source port 53)
    pub dns: bool,
}

impl FilterConfig {
    /// Default filter: deep checks on, DNS admitted, LLMNR/NBNS off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enabled: true,
            llmnr: false,
            nbns: false,
            dns: true,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Channel Configuration
// =============================================================================

/// Per-channel configuration.
///
/// Built with the `with_*` methods:
///
/// ```ignore
/// let config = ChannelConfig::new()
///     .with_chained_rx_delivery(true)
///     .with_tx_timeout_ms(2_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Capacity of every DMA buffer, and the upper bound on frame size
    pub buffer_size: usize,
    /// Use the jumbo-capable length mask when reading received lengths
    pub jumbo_frames: bool,
    /// Collect each RX scan into one linked chain before forwarding
    /// (reduces per-frame hand-off overhead); when false every accepted
    /// frame is forwarded individually
    pub chained_rx_delivery: bool,
    /// Acceptance filter settings
    pub filter: FilterConfig,
    /// Bound on the wait for a free TX descriptor, in milliseconds
    pub tx_timeout_ms: u32,
}

impl ChannelConfig {
    /// Default configuration: standard frames, chained RX delivery, the
    /// default filter, and the standard admission timeout.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer_size: STANDARD_BUFFER_SIZE,
            jumbo_frames: false,
            chained_rx_delivery: true,
            filter: FilterConfig::new(),
            tx_timeout_ms: TX_TOKEN_TIMEOUT_MS,
        }
    }

    /// Set the DMA buffer capacity.
    #[must_use]
    pub const fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Enable jumbo frames; also grows the buffers to the jumbo size.
    #[must_use]
    pub const fn with_jumbo_frames(mut self, enabled: bool) -> Self {
        self.jumbo_frames = enabled;
        if enabled {
            self.buffer_size = JUMBO_BUFFER_SIZE;
        }
        self
    }

    /// Select chained or per-frame RX delivery.
    #[must_use]
    pub const fn with_chained_rx_delivery(mut self, chained: bool) -> Self {
        self.chained_rx_delivery = chained;
        self
    }

    /// Replace the acceptance-filter settings.
    #[must_use]
    pub const fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Set the TX admission timeout in milliseconds.
    #[must_use]
    pub const fn with_tx_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.tx_timeout_ms = timeout_ms;
        self
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
