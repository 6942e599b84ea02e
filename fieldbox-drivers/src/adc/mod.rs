//! Analog-to-digital converters

pub mod ads1015;

pub use ads1015::Ads1015;
