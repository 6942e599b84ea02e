//! Lookup-table interpolation for the resistive front end
//!
//! The resistive input reads a sensor (NTC thermistor, potentiometer)
//! against a fixed pull-up network: the electric value is the sensor
//! resistance computed from the divider. Conversion to an engineering
//! value goes through a calibration table of raw resistance readings taken
//! at uniform steps of the target quantity, so the x-axis of the
//! interpolation is the synthetic progression `v_min + delta * i`, not
//! literal voltages.

use heapless::Vec;

use crate::convert::FULL_SCALE_CODE;
use crate::error::TableError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// On-board pull-up resistance, in ohms
pub const PULLUP_OHMS: f32 = 43.0;

/// Supply voltage of the pull-up network, in volts
pub const SUPPLY_VOLTS: f32 = 3.3;

/// Maximum number of calibration table entries
pub const MAX_TABLE_LEN: usize = 64;

/// Raw code to sensor resistance via the pull-up divider
pub fn electric_resistance(raw: i16, vref: f32) -> f32 {
    let v = raw as f32 / FULL_SCALE_CODE * vref;
    v * PULLUP_OHMS / (SUPPLY_VOLTS - v)
}

/// Calibration table and interpolation parameters for one resistive channel
///
/// The table may be supplied ascending or descending; lookups normalize to
/// descending order (resistance falling as the index grows, the usual NTC
/// shape). `out_of_range` is returned verbatim, `None` included, whenever
/// the measured value falls outside the table.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResistiveParams {
    /// Engineering value at table index 0 (post-normalization)
    pub v_min: f32,
    /// Raw sensor readings at each uniform step
    pub table: Vec<f32, MAX_TABLE_LEN>,
    /// Engineering-value increment between adjacent table entries
    pub delta: f32,
    /// Accepted for configuration parity; not applied to the
    /// interpolation result
    pub offset: f32,
    /// Value returned verbatim when the lookup misses the table
    pub out_of_range: Option<f32>,
}

impl ResistiveParams {
    /// Build params from a table slice, validating it
    pub fn from_table(
        v_min: f32,
        table: &[f32],
        delta: f32,
        out_of_range: Option<f32>,
    ) -> Result<Self, TableError> {
        let params = Self {
            v_min,
            table: Vec::from_slice(table).map_err(|_| TableError::TooLong)?,
            delta,
            offset: 0.0,
            out_of_range,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check the table invariants: at least two entries, strictly
    /// monotonic in either direction
    pub fn validate(&self) -> Result<(), TableError> {
        if self.table.len() < 2 {
            return Err(TableError::TooShort);
        }
        let ascending = self.table[0] < self.table[self.table.len() - 1];
        for pair in self.table.windows(2) {
            let ok = if ascending {
                pair[0] < pair[1]
            } else {
                pair[0] > pair[1]
            };
            if !ok {
                return Err(TableError::NotMonotonic);
            }
        }
        Ok(())
    }

    /// Interpolate a measured value against the calibration table
    ///
    /// A value at or above the highest table entry short-circuits to
    /// `out_of_range`; a value below the lowest entry returns it after the
    /// scan comes up empty. In between, the result is the line through the
    /// bracketing entries' `(reading, v_min + delta*i)` points evaluated
    /// at `value`.
    pub fn interpolate(&self, value: f32) -> Result<Option<f32>, TableError> {
        let n = self.table.len();
        if n < 2 {
            return Err(TableError::TooShort);
        }
        let ascending = self.table[0] < self.table[n - 1];
        // Normalized (descending) view of the table
        let at = |i: usize| -> f32 {
            if ascending {
                self.table[n - 1 - i]
            } else {
                self.table[i]
            }
        };

        if value >= at(0) {
            return Ok(self.out_of_range);
        }
        for i in 0..n - 1 {
            if value < at(i + 1) {
                continue;
            }
            let x1 = at(i);
            let y1 = self.v_min + self.delta * i as f32;
            let x2 = at(i + 1);
            let y2 = self.v_min + self.delta * (i + 1) as f32;
            let m = (y2 - y1) / (x2 - x1);
            let q = (x2 * y1 - x1 * y2) / (x2 - x1);
            return Ok(Some(m * value + q));
        }
        Ok(self.out_of_range)
    }
}
