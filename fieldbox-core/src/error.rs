//! Error types for channel configuration and conversion setup

/// Errors raised when validating channel configuration arguments
///
/// These are always caller-fixable: a bad channel number or an index
/// outside the fixed gain/rate tables. Nothing here is retried internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// Channel number outside the device's channel range (1-based)
    BadChannel(u8),
    /// PGA gain index outside `0..=7`
    BadGain(u8),
    /// Samples-per-second rate index outside `0..=7`
    BadRate(u8),
}

/// Errors raised when validating a resistive lookup table
///
/// Detected when the table is installed, not on the read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    /// Interpolation needs at least two entries
    TooShort,
    /// Table exceeds the fixed storage capacity
    TooLong,
    /// Table entries are not strictly monotonic
    NotMonotonic,
}
