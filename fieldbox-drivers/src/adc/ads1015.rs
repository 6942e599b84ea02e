//! ADS1015 12-bit I2C ADC
//!
//! The board carries three of these on the shared bus, one per analog
//! front end, distinguished only by their address strap:
//!
//! - 0x49 (ADDR to VDD): 0-10V / 4-20mA inputs
//! - 0x48 (ADDR to GND): resistive inputs
//! - 0x4B (ADDR to SCL): current-transformer inputs
//!
//! The driver writes the config register to select the input mux, PGA
//! gain and data rate in continuous-conversion mode, then reads the
//! conversion register for the latest code. Burst acquisition re-reads
//! the conversion register without reconfiguring.
//!
//! The conversion register holds the 12-bit two's-complement result
//! left-justified in 16 bits, so the raw code is the register value
//! shifted right by four.

use embedded_hal::i2c::I2c;

/// ADS1015 register addresses
pub mod reg {
    /// Conversion result (read-only)
    pub const CONVERSION: u8 = 0x00;
    /// Mux / PGA / mode / data-rate configuration
    pub const CONFIG: u8 = 0x01;
}

/// Address with the ADDR pin strapped to GND
pub const ADDR_GND: u8 = 0x48;
/// Address with the ADDR pin strapped to VDD
pub const ADDR_VDD: u8 = 0x49;
/// Address with the ADDR pin strapped to SDA
pub const ADDR_SDA: u8 = 0x4A;
/// Address with the ADDR pin strapped to SCL
pub const ADDR_SCL: u8 = 0x4B;

/// Comparator disabled (COMP_QUE = 11)
const COMP_DISABLE: u16 = 0b11;

/// One ADS1015 on the shared bus
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ads1015 {
    address: u8,
}

impl Ads1015 {
    /// Create a driver for the converter at `address`
    pub const fn new(address: u8) -> Self {
        Self { address }
    }

    /// 7-bit bus address of this converter
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Mux field value for single-ended input `ain` (0..=3) vs GND
    pub const fn single_ended(ain: u8) -> u8 {
        0b100 | (ain & 0b11)
    }

    /// Config register word: continuous conversion, comparator off
    fn config_word(mux: u8, gain: u8, rate: u8) -> u16 {
        ((mux as u16 & 0b111) << 12)
            | ((gain as u16 & 0b111) << 9)
            | ((rate as u16 & 0b111) << 5)
            | COMP_DISABLE
    }

    /// Select input mux, PGA gain and data rate
    ///
    /// Conversions start as soon as the register is written; the first
    /// result is available within one conversion period of the selected
    /// data rate.
    pub fn configure<I2C: I2c>(
        &self,
        bus: &mut I2C,
        mux: u8,
        gain: u8,
        rate: u8,
    ) -> Result<(), I2C::Error> {
        let word = Self::config_word(mux, gain, rate).to_be_bytes();
        bus.write(self.address, &[reg::CONFIG, word[0], word[1]])
    }

    /// Read the latest conversion as a signed 12-bit code
    pub fn read_raw<I2C: I2c>(&self, bus: &mut I2C) -> Result<i16, I2C::Error> {
        let mut buf = [0u8; 2];
        bus.write_read(self.address, &[reg::CONVERSION], &mut buf)?;
        Ok(i16::from_be_bytes(buf) >> 4)
    }

    /// Configure and read back one sample
    pub fn convert_once<I2C: I2c>(
        &self,
        bus: &mut I2C,
        mux: u8,
        gain: u8,
        rate: u8,
    ) -> Result<i16, I2C::Error> {
        self.configure(bus, mux, gain, rate)?;
        self.read_raw(bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBus;

    #[test]
    fn single_ended_mux_values() {
        assert_eq!(Ads1015::single_ended(0), 0b100);
        assert_eq!(Ads1015::single_ended(3), 0b111);
    }

    #[test]
    fn config_word_encoding() {
        // AIN0 single-ended, gain 2, rate 7:
        // mux=100, pga=010, dr=111, comparator off
        let word = Ads1015::config_word(0b100, 2, 7);
        assert_eq!(word, 0b0100_010_0_111_0_0_0_11);
    }

    #[test]
    fn configure_writes_config_register() {
        let mut bus = MockBus::new();
        let adc = Ads1015::new(ADDR_VDD);
        adc.configure(&mut bus, Ads1015::single_ended(1), 1, 4).unwrap();
        assert_eq!(
            bus.written_word(ADDR_VDD, reg::CONFIG),
            Some(Ads1015::config_word(0b101, 1, 4))
        );
    }

    #[test]
    fn raw_code_is_sign_extended() {
        let mut bus = MockBus::new();
        let adc = Ads1015::new(ADDR_GND);
        bus.push_code(2047);
        bus.push_code(-2048);
        bus.push_code(-1);
        assert_eq!(adc.read_raw(&mut bus).unwrap(), 2047);
        assert_eq!(adc.read_raw(&mut bus).unwrap(), -2048);
        assert_eq!(adc.read_raw(&mut bus).unwrap(), -1);
    }

    #[test]
    fn convert_once_configures_then_reads() {
        let mut bus = MockBus::new();
        let adc = Ads1015::new(ADDR_SCL);
        bus.push_code(123);
        let code = adc.convert_once(&mut bus, Ads1015::single_ended(0), 2, 7).unwrap();
        assert_eq!(code, 123);
        assert_eq!(bus.conversion_reads(ADDR_SCL), 1);
        assert!(bus.written_word(ADDR_SCL, reg::CONFIG).is_some());
    }

    #[test]
    fn bus_errors_surface_unmodified() {
        let mut bus = MockBus::new();
        let adc = Ads1015::new(ADDR_GND);
        bus.fail_next = true;
        assert!(adc.read_raw(&mut bus).is_err());
    }
}
