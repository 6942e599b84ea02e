//! GPIO expanders

pub mod sx1503;

pub use sx1503::{PinMode, Sx1503};
