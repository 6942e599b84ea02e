//! Signal-conditioning pipelines
//!
//! Three independent pipelines turn raw ADC codes into engineering values:
//!
//! - [`linear`]: 0-10V / 4-20mA inputs, two-point linear scaling with
//!   verbatim under/over-range thresholds
//! - [`resistive`]: NTC/potentiometer inputs, lookup-table interpolation
//! - [`power`]: current-transformer inputs, peak-to-peak burst reduction
//!   to RMS current and effective power
//!
//! Each pipeline is a pure function of the raw code and the per-channel
//! parameters; acquisition (and its bus locking) lives in the BSP crate.

pub mod linear;
pub mod power;
pub mod resistive;

pub use linear::LinearParams;
pub use power::CurrentParams;
pub use resistive::ResistiveParams;

/// Full-scale raw code of the 12-bit signed converter
pub const FULL_SCALE_CODE: f32 = 2047.0;
