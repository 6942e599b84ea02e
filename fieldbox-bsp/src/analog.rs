//! Analog acquisition and the four read operations
//!
//! Each read composes the same stages: validate arguments, acquire under
//! the bus lock (configure the chip from the channel's stored settings,
//! then read the conversion register), and run the channel's conversion
//! pipeline. The `raw` and `electric_value` flags short-circuit after the
//! first and second stage respectively; they are mutually exclusive.
//!
//! Nothing is cached: every call re-triggers hardware acquisition.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::i2c::I2c;

use fieldbox_core::channel::ChannelConfig;
use fieldbox_core::convert::{linear, resistive};
use fieldbox_core::convert::{CurrentParams, LinearParams, ResistiveParams};
use fieldbox_drivers::adc::Ads1015;

use crate::device::FieldBox;
use crate::error::Error;

/// Result of one read operation, depending on the requested output mode
///
/// For `read_power` the raw value is the burst's peak-to-peak code rather
/// than a single sample, and the electric value is the primary-side RMS
/// current in amps.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    /// Untouched converter output
    Raw(i16),
    /// Physical-unit value at the input terminals (V, mA, ohms, A)
    Electric(f32),
    /// Full pipeline output; `None` when the value fell out of range and
    /// no sentinel was configured
    Converted(Option<f32>),
}

/// Output stage selected by the `raw` / `electric_value` flags
enum OutputMode {
    Converted,
    Raw,
    Electric,
}

impl OutputMode {
    fn from_flags<E>(raw: bool, electric_value: bool) -> Result<Self, Error<E>> {
        match (raw, electric_value) {
            (true, true) => Err(Error::ExclusiveFlags),
            (true, false) => Ok(OutputMode::Raw),
            (false, true) => Ok(OutputMode::Electric),
            (false, false) => Ok(OutputMode::Converted),
        }
    }
}

impl<M: RawMutex, BUS: I2c> FieldBox<M, BUS> {
    /// Reconfigure gain and sample rate of a 0-10V/4-20mA channel (1-4)
    ///
    /// Takes effect on the next read; an acquisition already in flight is
    /// not affected.
    pub fn configure_channel_010_420(
        &mut self,
        ch: u8,
        gain: u8,
        rate: u8,
    ) -> Result<(), Error<BUS::Error>> {
        self.volt_channels.configure(ch, gain, rate)?;
        Ok(())
    }

    /// Reconfigure gain and sample rate of a resistive channel (1-4)
    pub fn configure_channel_resistive(
        &mut self,
        ch: u8,
        gain: u8,
        rate: u8,
    ) -> Result<(), Error<BUS::Error>> {
        self.resistive_channels.configure(ch, gain, rate)?;
        Ok(())
    }

    /// Reconfigure gain and sample rate of a current channel (1-3)
    pub fn configure_channel_current(
        &mut self,
        ch: u8,
        gain: u8,
        rate: u8,
    ) -> Result<(), Error<BUS::Error>> {
        self.current_channels.configure(ch, gain, rate)?;
        Ok(())
    }

    /// Install linear scaling parameters for a 0-10V/4-20mA channel
    pub fn set_linear_params(
        &mut self,
        ch: u8,
        params: LinearParams,
    ) -> Result<(), Error<BUS::Error>> {
        let idx = self.volt_channels.index(ch)?;
        self.volt_params[idx] = params;
        Ok(())
    }

    /// Install the calibration table for a resistive channel
    ///
    /// The table is validated here, not on the read path.
    pub fn set_resistive_params(
        &mut self,
        ch: u8,
        params: ResistiveParams,
    ) -> Result<(), Error<BUS::Error>> {
        let idx = self.resistive_channels.index(ch)?;
        params.validate()?;
        self.resistive_params[idx] = params;
        Ok(())
    }

    /// Install burst and transformer parameters for a current channel
    pub fn set_current_params(
        &mut self,
        ch: u8,
        params: CurrentParams,
    ) -> Result<(), Error<BUS::Error>> {
        let idx = self.current_channels.index(ch)?;
        self.current_params[idx] = params;
        Ok(())
    }

    /// Read a 0-10V channel
    ///
    /// `raw` returns the converter code, `electric_value` the voltage at
    /// the terminals; otherwise the linear pipeline output.
    pub fn read_010(
        &mut self,
        ch: u8,
        raw: bool,
        electric_value: bool,
    ) -> Result<Reading, Error<BUS::Error>> {
        let mode = OutputMode::from_flags(raw, electric_value)?;
        let idx = self.volt_channels.index(ch)?;
        let cfg = *self.volt_channels.channel(ch)?;
        let code = self
            .acquire_single(self.adc_volt, ch, &cfg)
            .map_err(Error::Bus)?;
        if let OutputMode::Raw = mode {
            return Ok(Reading::Raw(code));
        }
        let volts = linear::electric_010(code, cfg.reference_voltage());
        if let OutputMode::Electric = mode {
            return Ok(Reading::Electric(volts));
        }
        Ok(Reading::Converted(
            self.volt_params[idx].scale(volts, linear::RANGE_010),
        ))
    }

    /// Read a 4-20mA channel
    ///
    /// Same stages as [`read_010`](Self::read_010), with the electric
    /// value in milliamps across the loop sense resistor.
    pub fn read_420(
        &mut self,
        ch: u8,
        raw: bool,
        electric_value: bool,
    ) -> Result<Reading, Error<BUS::Error>> {
        let mode = OutputMode::from_flags(raw, electric_value)?;
        let idx = self.volt_channels.index(ch)?;
        let cfg = *self.volt_channels.channel(ch)?;
        let code = self
            .acquire_single(self.adc_volt, ch, &cfg)
            .map_err(Error::Bus)?;
        if let OutputMode::Raw = mode {
            return Ok(Reading::Raw(code));
        }
        let milliamps = linear::electric_420(code, cfg.reference_voltage());
        if let OutputMode::Electric = mode {
            return Ok(Reading::Electric(milliamps));
        }
        Ok(Reading::Converted(
            self.volt_params[idx].scale(milliamps, linear::RANGE_420),
        ))
    }

    /// Read a resistive channel
    ///
    /// The electric value is the sensor resistance in ohms; the converted
    /// value interpolates the channel's calibration table.
    pub fn read_resistive(
        &mut self,
        ch: u8,
        raw: bool,
        electric_value: bool,
    ) -> Result<Reading, Error<BUS::Error>> {
        let mode = OutputMode::from_flags(raw, electric_value)?;
        let idx = self.resistive_channels.index(ch)?;
        let cfg = *self.resistive_channels.channel(ch)?;
        let code = self
            .acquire_single(self.adc_resistive, ch, &cfg)
            .map_err(Error::Bus)?;
        if let OutputMode::Raw = mode {
            return Ok(Reading::Raw(code));
        }
        let ohms = resistive::electric_resistance(code, cfg.reference_voltage());
        if let OutputMode::Electric = mode {
            return Ok(Reading::Electric(ohms));
        }
        Ok(Reading::Converted(self.resistive_params[idx].interpolate(ohms)?))
    }

    /// Read a current channel as a power estimate
    ///
    /// Acquires the channel's whole sample burst in one bus-lock scope and
    /// reduces it to peak-to-peak. `raw` returns the peak-to-peak code,
    /// `electric_value` the primary-side current in amps; otherwise the
    /// effective power in watts.
    pub fn read_power(
        &mut self,
        ch: u8,
        raw: bool,
        electric_value: bool,
    ) -> Result<Reading, Error<BUS::Error>> {
        let mode = OutputMode::from_flags(raw, electric_value)?;
        let idx = self.current_channels.index(ch)?;
        let cfg = *self.current_channels.channel(ch)?;
        let params = self.current_params[idx];
        let (min, max) = self
            .acquire_burst(self.adc_current, ch, &cfg, params.samples.get())
            .map_err(Error::Bus)?;
        let peak_to_peak = max - min;
        if let OutputMode::Raw = mode {
            return Ok(Reading::Raw(peak_to_peak));
        }
        let amps = params.primary_current(peak_to_peak, cfg.reference_voltage());
        if let OutputMode::Electric = mode {
            return Ok(Reading::Electric(amps));
        }
        Ok(Reading::Converted(Some(params.power(amps))))
    }

    /// One configure + read sequence under the bus lock
    fn acquire_single(
        &self,
        adc: Ads1015,
        ch: u8,
        cfg: &ChannelConfig,
    ) -> Result<i16, BUS::Error> {
        let mux = Ads1015::single_ended(ch - 1);
        self.bus
            .with_bus(|bus| adc.convert_once(bus, mux, cfg.gain(), cfg.sample_rate()))
    }

    /// Configure once, then read a full burst, all under one lock scope
    ///
    /// Always performs exactly `samples` reads; the burst runs to
    /// completion once started.
    fn acquire_burst(
        &self,
        adc: Ads1015,
        ch: u8,
        cfg: &ChannelConfig,
        samples: u16,
    ) -> Result<(i16, i16), BUS::Error> {
        let mux = Ads1015::single_ended(ch - 1);
        self.bus.with_bus(|bus| {
            adc.configure(bus, mux, cfg.gain(), cfg.sample_rate())?;
            let mut min = i16::MAX;
            let mut max = i16::MIN;
            for _ in 0..samples {
                let code = adc.read_raw(bus)?;
                min = min.min(code);
                max = max.max(code);
            }
            Ok((min, max))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::num::NonZeroU16;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use fieldbox_core::{ChannelError, TableError};
    use fieldbox_drivers::adc::ads1015::{ADDR_SCL, ADDR_VDD};
    use fieldbox_drivers::mock::MockBus;

    type TestBox = FieldBox<NoopRawMutex, MockBus>;

    fn board_with(f: impl FnOnce(&mut MockBus)) -> TestBox {
        let mut bus = MockBus::new();
        f(&mut bus);
        TestBox::new(bus).unwrap()
    }

    #[test]
    fn raw_mode_bypasses_conversion() {
        let mut board = board_with(|bus| bus.push_code(321));
        // Conversion params must not matter in raw mode
        board
            .set_linear_params(
                1,
                LinearParams {
                    y_min: -1000.0,
                    y_max: 1000.0,
                    offset: 99.0,
                    under_range: Some(-1.0),
                    over_range: Some(1.0),
                },
            )
            .unwrap();
        assert_eq!(board.read_010(1, true, false), Ok(Reading::Raw(321)));
    }

    #[test]
    fn flags_are_mutually_exclusive() {
        let mut board = board_with(|_| {});
        assert_eq!(board.read_010(1, true, true), Err(Error::ExclusiveFlags));
        assert_eq!(board.read_power(1, true, true), Err(Error::ExclusiveFlags));
    }

    #[test]
    fn channel_range_is_per_adc() {
        let mut board = board_with(|_| {});
        assert_eq!(
            board.read_010(5, false, false),
            Err(Error::Channel(ChannelError::BadChannel(5)))
        );
        assert_eq!(
            board.read_resistive(0, false, false),
            Err(Error::Channel(ChannelError::BadChannel(0)))
        );
        // The current ADC only has three channels
        assert_eq!(
            board.read_power(4, false, false),
            Err(Error::Channel(ChannelError::BadChannel(4)))
        );
        assert!(board.read_010(4, false, false).is_ok());
    }

    #[test]
    fn electric_value_uses_stored_reference() {
        let mut board = board_with(|bus| bus.fixed_code = 2047);
        // Default gain 2: full scale is 2.048 * 5 = 10.24V
        match board.read_010(1, false, true).unwrap() {
            Reading::Electric(v) => assert!((v - 10.24).abs() < 1e-3),
            other => panic!("unexpected {other:?}"),
        }
        // Gain 0 widens the span to 6.144 * 5
        board.configure_channel_010_420(1, 0, 7).unwrap();
        match board.read_010(1, false, true).unwrap() {
            Reading::Electric(v) => assert!((v - 30.72).abs() < 1e-3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn converted_read_scales_and_applies_thresholds() {
        let mut board = board_with(|bus| bus.fixed_code = 1000);
        let expected = 1000.0 / 2047.0 * 2.048 * 5.0 * 10.0;
        match board.read_010(1, false, false).unwrap() {
            Reading::Converted(Some(v)) => assert!((v - expected).abs() < 1e-3),
            other => panic!("unexpected {other:?}"),
        }

        // Negative code falls under range: default sentinel is None
        let mut board = board_with(|bus| bus.fixed_code = -10);
        assert_eq!(
            board.read_010(1, false, false),
            Ok(Reading::Converted(None))
        );
        board
            .set_linear_params(
                1,
                LinearParams {
                    under_range: Some(0.0),
                    ..LinearParams::default()
                },
            )
            .unwrap();
        assert_eq!(
            board.read_010(1, false, false),
            Ok(Reading::Converted(Some(0.0)))
        );
    }

    #[test]
    fn loop_read_reports_milliamps() {
        // Full scale: 10.24V across 124 ohms = 82.58mA, far over range
        let mut board = board_with(|bus| bus.fixed_code = 2047);
        board
            .set_linear_params(
                2,
                LinearParams {
                    over_range: Some(100.0),
                    ..LinearParams::default()
                },
            )
            .unwrap();
        match board.read_420(2, false, true).unwrap() {
            Reading::Electric(ma) => assert!((ma - 82.58).abs() < 0.05),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            board.read_420(2, false, false),
            Ok(Reading::Converted(Some(100.0)))
        );
    }

    #[test]
    fn resistive_read_interpolates_the_table() {
        // Code 1649 puts ~1.65V on the divider: R is about 43 ohms
        let mut board = board_with(|bus| bus.fixed_code = 1649);
        assert_eq!(
            board.read_resistive(1, false, false),
            Err(Error::Table(TableError::TooShort))
        );
        board
            .set_resistive_params(
                1,
                ResistiveParams::from_table(10.0, &[50.0, 10.0], 10.0, Some(-1.0)).unwrap(),
            )
            .unwrap();
        // Line through (50, 10) and (10, 20) evaluated at the resistance
        match board.read_resistive(1, false, false).unwrap() {
            Reading::Converted(Some(v)) => assert!((v - 11.75).abs() < 0.05),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn burst_always_runs_to_completion() {
        let mut board = board_with(|bus| bus.fixed_code = 100);
        board.read_power(1, false, false).unwrap();
        let reads = board
            .bus_arbiter()
            .with_bus(|bus| bus.conversion_reads(ADDR_SCL));
        assert_eq!(reads, 400);

        // A shorter burst does exactly as many reads
        board
            .set_current_params(
                2,
                CurrentParams {
                    samples: NonZeroU16::new(16).unwrap(),
                    ..CurrentParams::default()
                },
            )
            .unwrap();
        board.read_power(2, false, false).unwrap();
        let reads = board
            .bus_arbiter()
            .with_bus(|bus| bus.conversion_reads(ADDR_SCL));
        assert_eq!(reads, 400 + 16);
    }

    #[test]
    fn power_pipeline_from_peak_to_peak() {
        // Swing between 100 and 300 around the fixed midpoint
        let mut board = board_with(|bus| {
            bus.fixed_code = 200;
            bus.push_code(100);
            bus.push_code(300);
        });
        assert_eq!(board.read_power(1, true, false), Ok(Reading::Raw(200)));

        // Same swing again for the full pipeline: 200 codes peak-to-peak
        // at vref 2.048 and ratio 2000 is 10A, 1555.6W at 220V
        board
            .bus_arbiter()
            .with_bus(|bus| {
                bus.push_code(100);
                bus.push_code(300);
            });
        match board.read_power(1, false, false).unwrap() {
            Reading::Converted(Some(w)) => assert!((w - 10.0 * 220.0 * 0.7071).abs() < 0.5),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn acquisition_reconfigures_the_chip_every_read() {
        let mut board = board_with(|_| {});
        board.read_010(1, true, false).unwrap();
        let first = board
            .bus_arbiter()
            .with_bus(|bus| bus.written_word(ADDR_VDD, 0x01))
            .unwrap();
        board.configure_channel_010_420(1, 4, 3).unwrap();
        board.read_010(1, true, false).unwrap();
        let second = board
            .bus_arbiter()
            .with_bus(|bus| bus.written_word(ADDR_VDD, 0x01))
            .unwrap();
        assert_ne!(first, second);
        // Gain bits 11:9 and rate bits 7:5 reflect the new settings
        assert_eq!((second >> 9) & 0b111, 4);
        assert_eq!((second >> 5) & 0b111, 3);
    }

    #[test]
    fn single_read_is_one_configure_one_conversion() {
        let mut board = board_with(|bus| bus.push_code(7));
        assert_eq!(board.read_010(1, true, false), Ok(Reading::Raw(7)));
        let reads = board
            .bus_arbiter()
            .with_bus(|bus| bus.conversion_reads(ADDR_VDD));
        assert_eq!(reads, 1);
        assert!(board
            .bus_arbiter()
            .with_bus(|bus| bus.written_word(ADDR_VDD, 0x01))
            .is_some());
    }

    #[test]
    fn bus_errors_surface_without_retry() {
        let mut board = board_with(|_| {});
        board.bus_arbiter().with_bus(|bus| bus.fail_next = true);
        assert!(matches!(
            board.read_010(1, false, false),
            Err(Error::Bus(_))
        ));
        // The failure is not sticky; the next read succeeds
        assert!(board.read_010(1, false, false).is_ok());
    }
}
