//! Current and power estimation for the current-transformer front end
//!
//! The current inputs read the secondary of an external current
//! transformer across an on-board burden resistor. A burst of consecutive
//! samples is reduced to its peak-to-peak amplitude; half of that is the
//! peak of the (assumed sinusoidal) secondary current, which the
//! transformer ratio and coil turns scale back to the primary side.
//! Power is the peak-referenced amplitude times the nominal line voltage
//! and 1/sqrt(2) - an effective-power approximation, not a true RMS
//! power measurement.

use core::num::NonZeroU16;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Burden resistor on the transformer secondary, in ohms
pub const BURDEN_OHMS: f32 = 20.0;

/// Converter range used for the peak-to-peak scaling (full scale + 1)
pub const CODE_SPAN: f32 = 2048.0;

/// Peak-to-RMS factor for a sinusoidal load (1/sqrt(2))
pub const RMS_FACTOR: f32 = 0.7071;

/// Burst and transformer parameters for one current channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurrentParams {
    /// Samples per burst; the burst always runs to completion
    pub samples: NonZeroU16,
    /// Number of primary-conductor turns through the transformer
    pub coil_turns: NonZeroU16,
    /// Transformer ratio (secondary:primary)
    pub ratio: f32,
    /// Nominal line voltage for the power estimate, in volts
    pub voltage: f32,
    /// Additive offset on the power estimate, in watts
    pub offset: f32,
}

impl Default for CurrentParams {
    fn default() -> Self {
        Self {
            samples: NonZeroU16::new(400).unwrap(),
            coil_turns: NonZeroU16::new(1).unwrap(),
            ratio: 2000.0,
            voltage: 220.0,
            offset: 0.0,
        }
    }
}

impl CurrentParams {
    /// Primary-side RMS current from a burst's peak-to-peak code
    pub fn primary_current(&self, peak_to_peak: i16, vref: f32) -> f32 {
        let i_secondary = peak_to_peak as f32 / 2.0 * vref / CODE_SPAN / BURDEN_OHMS;
        self.ratio * i_secondary / self.coil_turns.get() as f32
    }

    /// Effective power estimate from a primary-side current
    pub fn power(&self, current: f32) -> f32 {
        current * self.voltage * RMS_FACTOR + self.offset
    }
}
