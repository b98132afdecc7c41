//! Centralized Constants
//!
//! This module provides a single source of truth for the magic numbers used
//! throughout the DMA engine.
//!
//! # Organization
//!
//! Constants are grouped by category:
//! - **Frame/buffer sizes**: Ethernet frame dimensions and DMA buffer sizing
//! - **Ring geometry**: descriptor alignment requirements
//! - **Timing**: admission timeouts and polling intervals
//! - **Network control**: bit positions in the GEM network-control register
//! - **Acceptance filter**: EtherTypes, IP fields, well-known service ports
//!
//! # Note
//!
//! Descriptor word bit definitions live with the descriptor types in
//! `internal::dma::descriptor` as they are specific to that layout.

// =============================================================================
// Frame and Buffer Sizes
// =============================================================================

/// Standard Ethernet MTU (Maximum Transmission Unit)
pub const MTU: usize = 1500;

/// Ethernet header size (dst MAC + src MAC + EtherType)
pub const ETH_HEADER_SIZE: usize = 14;

/// Smallest frame the transmit path will accept.
///
/// Sized to the smallest protocol frame the stack produces: an ARP packet
/// (14-byte Ethernet header + 28-byte ARP body).
pub const MIN_FRAME_SIZE: usize = 42;

/// Default DMA buffer size for standard frames (MTU + headers, rounded)
pub const STANDARD_BUFFER_SIZE: usize = 1536;

/// DMA buffer size when jumbo frames are enabled
pub const JUMBO_BUFFER_SIZE: usize = 10240;

// =============================================================================
// Ring Geometry
// =============================================================================

/// Minimum alignment of a descriptor ring base address.
///
/// The GEM DMA engine requires the descriptor list to start on a 64-byte
/// boundary. Bring-up fails if the ring storage does not satisfy this.
pub const RING_ALIGNMENT: usize = 64;

// =============================================================================
// Timing Constants
// =============================================================================

/// Default bound on the wait for a free TX descriptor, in milliseconds
pub const TX_TOKEN_TIMEOUT_MS: u32 = 5_000;

/// Interval between TX admission token polls, in microseconds
pub const TOKEN_POLL_INTERVAL_US: u32 = 100;

// =============================================================================
// Network Control Register Bits
// =============================================================================

/// Bit positions in the GEM network-control register.
///
/// Only the bits this engine manipulates are defined here; the full register
/// layout belongs to the peripheral bring-up collaborator.
pub mod net_ctrl {
    /// Receive enable
    pub const RX_ENABLE: u32 = 1 << 2;
    /// Start transmission (pulsed to kick the TX DMA)
    pub const START_TX: u32 = 1 << 9;
}

// =============================================================================
// Acceptance Filter
// =============================================================================

/// EtherType: IPv4
pub const ETHERTYPE_IPV4: u16 = 0x0800;

/// EtherType: ARP
pub const ETHERTYPE_ARP: u16 = 0x0806;

/// EtherType: IPv6
pub const ETHERTYPE_IPV6: u16 = 0x86DD;

/// IPv4 protocol number for UDP
pub const IP_PROTO_UDP: u8 = 17;

/// Smallest valid IPv4 version/IHL byte (IPv4, 20-byte header)
pub const IPV4_MIN_VERSION_IHL: u8 = 0x45;

/// Largest valid IPv4 version/IHL byte (IPv4, 60-byte header)
pub const IPV4_MAX_VERSION_IHL: u8 = 0x4F;

/// Mask over the IPv4 flags/fragment-offset field selecting the
/// more-fragments flag and the 13-bit fragment offset. Any set bit marks the
/// packet as fragmented.
pub const IPV4_FRAGMENT_BITS: u16 = 0x3FFF;

/// DNS service port
pub const DNS_PORT: u16 = 53;

/// LLMNR (link-local name resolution) service port
pub const LLMNR_PORT: u16 = 5355;

/// NetBIOS name service port
pub const NBNS_PORT: u16 = 137;
