//! Error types for the GEM DMA ring engine.
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Bring-up failures - always fatal to the interface
//! - [`DmaError`]: Transmit admission failures - recoverable by the caller
//! - [`IoError`]: Operations issued in the wrong state
//!
//! The unified [`Error`] enum wraps all domain errors. Receive-side
//! conditions (allocation exhaustion, stack saturation) are recovered
//! locally and traced, never surfaced through these types.

use crate::buffer::FrameBuffer;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Bring-up errors.
///
/// Any of these means the interface must not start; no partial-ring state is
/// left live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Channel already initialized
    AlreadyInitialized,
    /// Invalid configuration parameter
    InvalidConfig,
    /// Descriptor ring storage does not satisfy the DMA alignment requirement
    RingAlignment,
    /// Buffer pool could not supply the initial RX buffers
    BufferExhausted,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::AlreadyInitialized => "already initialized",
            ConfigError::InvalidConfig => "invalid configuration",
            ConfigError::RingAlignment => "descriptor ring misaligned",
            ConfigError::BufferExhausted => "buffer pool exhausted at bring-up",
        }
    }
}

// =============================================================================
// DMA Errors
// =============================================================================

/// Transmit admission errors.
///
/// These are surfaced to the caller together with the rejected buffer; no
/// token or descriptor is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// No free TX descriptor within the wait bound
    AdmissionTimeout,
    /// Frame shorter than the smallest protocol frame
    FrameTooShort,
    /// Frame exceeds the buffer capacity
    FrameTooLarge,
}

impl core::fmt::Display for DmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DmaError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DmaError::AdmissionTimeout => "timed out waiting for a TX descriptor",
            DmaError::FrameTooShort => "frame below minimum size",
            DmaError::FrameTooLarge => "frame exceeds buffer capacity",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime state errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Invalid state for operation (channel not initialized)
    InvalidState,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::InvalidState => "invalid state for operation",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// Unified error wrapping all domain errors.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::RingAlignment)) => { /* ... */ }
///     Err(Error::Dma(DmaError::AdmissionTimeout)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// DMA admission error
    Dma(DmaError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Dma(e) => write!(f, "dma: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

// From impls for automatic conversion
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DmaError> for Error {
    fn from(e: DmaError) -> Self {
        Error::Dma(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for engine operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for DMA operations
pub type DmaResult<T> = core::result::Result<T, DmaError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Rejected Frames
// =============================================================================

/// A frame the transmit path refused, with its buffer handed back.
///
/// Ownership of the buffer returns to the caller, which releases it to the
/// pool (or retries) per its own policy.
#[derive(Debug)]
pub struct RejectedFrame {
    /// Why the frame was refused
    pub error: Error,
    /// The buffer, unchanged
    pub frame: FrameBuffer,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    use super::*;

    #[test]
    fn config_error_as_str_non_empty() {
        let variants = [
            ConfigError::AlreadyInitialized,
            ConfigError::InvalidConfig,
            ConfigError::RingAlignment,
            ConfigError::BufferExhausted,
        ];

        for variant in variants {
            assert!(!variant.as_str().is_empty(), "{variant:?} has empty string");
        }
    }

    #[test]
    fn dma_error_display() {
        let err = DmaError::AdmissionTimeout;
        assert_eq!(format!("{err}"), "timed out waiting for a TX descriptor");
    }

    #[test]
    fn error_from_config_error() {
        let err: Error = ConfigError::RingAlignment.into();
        assert_eq!(err, Error::Config(ConfigError::RingAlignment));
    }

    #[test]
    fn error_from_dma_error() {
        let err: Error = DmaError::FrameTooLarge.into();
        assert_eq!(err, Error::Dma(DmaError::FrameTooLarge));
    }

    #[test]
    fn error_from_io_error() {
        let err: Error = IoError::InvalidState.into();
        assert_eq!(err, Error::Io(IoError::InvalidState));
    }

    #[test]
    fn error_display_prefixes_domain() {
        assert!(format!("{}", Error::Config(ConfigError::RingAlignment)).contains("config"));
        assert!(format!("{}", Error::Dma(DmaError::FrameTooShort)).contains("dma"));
        assert!(format!("{}", Error::Io(IoError::InvalidState)).contains("io"));
    }

    #[test]
    fn result_aliases_work() {
        fn config() -> ConfigResult<()> {
            Err(ConfigError::InvalidConfig)
        }
        fn dma() -> DmaResult<()> {
            Err(DmaError::FrameTooShort)
        }
        fn io() -> IoResult<()> {
            Err(IoError::InvalidState)
        }
        fn unified() -> Result<u32> {
            Ok(7)
        }
        assert!(config().is_err());
        assert!(dma().is_err());
        assert!(io().is_err());
        assert_eq!(unified().unwrap(), 7);
    }
}
