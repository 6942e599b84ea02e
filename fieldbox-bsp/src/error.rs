//! Board-level error type

use fieldbox_core::{ChannelError, TableError};

/// Errors surfaced by the board API, generic over the bus error type
///
/// Argument errors (`Channel`, `ExclusiveFlags`) and configuration errors
/// (`Table`) are caller-fixable and never touch the hardware. A `Bus`
/// error is surfaced immediately without retry; whether to reset the
/// device is the application's call.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Bad channel number, gain index or rate index
    Channel(ChannelError),
    /// Invalid or missing resistive calibration table
    Table(TableError),
    /// `raw` and `electric_value` requested together
    ExclusiveFlags,
    /// Shared-bus transaction failed
    Bus(E),
}

impl<E> From<ChannelError> for Error<E> {
    fn from(e: ChannelError) -> Self {
        Error::Channel(e)
    }
}

impl<E> From<TableError> for Error<E> {
    fn from(e: TableError) -> Self {
        Error::Table(e)
    }
}
