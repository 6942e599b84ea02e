//! Linear scaling for the 0-10V / 4-20mA front end
//!
//! The input stage is a 5:1 attenuator (AD8277-class difference amplifier)
//! in front of the converter, so the electric value is the raw code scaled
//! by the reference voltage and the inverse front-end gain. The 4-20mA
//! path reads the same voltage across an on-board sense resistor and
//! reports milliamps.

use crate::convert::FULL_SCALE_CODE;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inverse gain of the front-end attenuator
pub const INVERSE_FRONTEND_GAIN: f32 = 5.0;

/// On-board current-loop sense resistor, in ohms
pub const LOOP_SENSE_OHMS: f32 = 124.0;

/// Physical input range of the voltage front end, in volts
pub const RANGE_010: (f32, f32) = (0.0, 10.0);

/// Physical input range of the current-loop front end, in milliamps
pub const RANGE_420: (f32, f32) = (4.0, 20.0);

/// Raw code to volts at the input terminals
pub fn electric_010(raw: i16, vref: f32) -> f32 {
    raw as f32 / FULL_SCALE_CODE * vref * INVERSE_FRONTEND_GAIN
}

/// Raw code to loop current in milliamps
pub fn electric_420(raw: i16, vref: f32) -> f32 {
    electric_010(raw, vref) / LOOP_SENSE_OHMS * 1000.0
}

/// Two-point linear scaling with out-of-range thresholds
///
/// Maps the physical input range onto `[y_min, y_max]` and adds `offset`
/// after interpolation. An electric value outside the physical range
/// returns the corresponding threshold verbatim; `None` means no threshold
/// was configured for that side.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearParams {
    /// Output at the bottom of the physical input range
    pub y_min: f32,
    /// Output at the top of the physical input range
    pub y_max: f32,
    /// Additive offset, applied after interpolation
    pub offset: f32,
    /// Value returned verbatim when the input is below the physical range
    pub under_range: Option<f32>,
    /// Value returned verbatim when the input is above the physical range
    pub over_range: Option<f32>,
}

impl Default for LinearParams {
    fn default() -> Self {
        Self {
            y_min: 0.0,
            y_max: 100.0,
            offset: 0.0,
            under_range: None,
            over_range: None,
        }
    }
}

impl LinearParams {
    /// Scale an electric value `x` measured on `(x_min, x_max)`
    ///
    /// The thresholds are not extrapolations: whatever is configured comes
    /// back unchanged, including `None`.
    pub fn scale(&self, x: f32, (x_min, x_max): (f32, f32)) -> Option<f32> {
        if x < x_min {
            return self.under_range;
        }
        if x > x_max {
            return self.over_range;
        }
        Some(self.y_min + (x - x_min) * (self.y_max - self.y_min) / (x_max - x_min) + self.offset)
    }
}
