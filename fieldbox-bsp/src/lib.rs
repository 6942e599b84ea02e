//! Board support for the Fieldbox industrial I/O controller
//!
//! The board presents a heterogeneous set of chips on one shared I2C bus:
//! three ADS1015-class ADCs behind different analog front ends (0-10V /
//! 4-20mA, resistive, current transformer) and an SX1503 GPIO expander
//! carrying LEDs, relays, sinks and isolated inputs. This crate owns the
//! bus discipline and composes the drivers into one thread-safe device,
//! [`FieldBox`], so application code reads calibrated values and drives
//! actuators without touching raw bus transactions.
//!
//! ```no_run
//! # fn demo<I2C: embedded_hal::i2c::I2c>(i2c: I2C) -> Result<(), fieldbox_bsp::Error<I2C::Error>> {
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use fieldbox_bsp::{FieldBox, Reading};
//!
//! let mut board: FieldBox<CriticalSectionRawMutex, _> = FieldBox::new(i2c)?;
//! board.configure_channel_010_420(1, 2, 7)?;
//! match board.read_010(1, false, false)? {
//!     Reading::Converted(Some(_value)) => { /* scaled engineering value */ }
//!     Reading::Converted(None) => { /* out of range, no sentinel set */ }
//!     _ => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod analog;
pub mod bus;
pub mod device;
pub mod error;
pub mod pins;

pub use analog::Reading;
pub use bus::BusArbiter;
pub use device::{FieldBox, PowerSource};
pub use error::Error;
pub use pins::LedColor;
