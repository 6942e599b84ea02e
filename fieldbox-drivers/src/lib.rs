//! Register-level chip drivers for the Fieldbox board
//!
//! The onboard chips all sit on one shared I2C bus, so the drivers here
//! hold no bus handle of their own: every operation borrows
//! `&mut impl embedded_hal::i2c::I2c` for exactly one transaction sequence.
//! Serializing those sequences is the job of the BSP's bus arbiter, not of
//! the drivers.
//!
//! - [`adc`]: ADS1015-class 12-bit ADC (three instances, one per analog
//!   front end)
//! - [`expander`]: SX1503-class 16-pin GPIO expander (LEDs, relays, sinks,
//!   isolated inputs)

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod expander;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
