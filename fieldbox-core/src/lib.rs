//! Board-agnostic core logic for the Fieldbox I/O controller
//!
//! This crate contains everything about the analog acquisition subsystem
//! that does not depend on specific hardware:
//!
//! - Error taxonomy for channel configuration and conversion
//! - Per-channel gain/sample-rate configuration banks
//! - The three signal-conditioning pipelines (linear 0-10V/4-20mA scaling,
//!   resistive lookup-table interpolation, current/power estimation)
//! - Fixed physical constants of the analog front ends
//!
//! Everything here is pure computation over already-acquired raw codes, so
//! the whole crate is testable on the host.

#![no_std]
#![deny(unsafe_code)]

pub mod channel;
pub mod convert;
pub mod error;

pub use channel::{ChannelBank, ChannelConfig, GAIN_STEPS, RATE_STEPS, VREF_TABLE};
pub use error::{ChannelError, TableError};
