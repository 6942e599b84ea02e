//! SX1503 16-pin I2C GPIO expander
//!
//! Carries all of the board's slow digital I/O: status LEDs, relay and
//! sink drivers, isolated inputs and the supply-detect line. Pins 0-7
//! live in bank A, pins 8-15 in bank B; each bank has its own data and
//! direction registers.
//!
//! The driver shadows the data and direction registers so pin updates are
//! single-byte writes instead of read-modify-write transactions. Reads of
//! input pins always go to the chip.

use embedded_hal::i2c::I2c;

/// SX1503 register addresses
pub mod reg {
    /// Pin state, bank B (pins 8-15)
    pub const DATA_B: u8 = 0x00;
    /// Pin state, bank A (pins 0-7)
    pub const DATA_A: u8 = 0x01;
    /// Direction, bank B (1 = input)
    pub const DIR_B: u8 = 0x02;
    /// Direction, bank A (1 = input)
    pub const DIR_A: u8 = 0x03;
}

/// Fixed 7-bit address of the SX1503
pub const ADDRESS: u8 = 0x20;

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    Input,
    Output,
}

/// SX1503 driver with shadowed data/direction registers
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sx1503 {
    address: u8,
    /// Shadow of the output data registers (reset value: all high)
    data: u16,
    /// Shadow of the direction registers (reset value: all input)
    dir: u16,
}

impl Sx1503 {
    /// Create a driver assuming the chip is in its reset state
    pub const fn new(address: u8) -> Self {
        Self {
            address,
            data: 0xFFFF,
            dir: 0xFFFF,
        }
    }

    fn write_bank<I2C: I2c>(
        &self,
        bus: &mut I2C,
        pin: u8,
        reg_b: u8,
        reg_a: u8,
        shadow: u16,
    ) -> Result<(), I2C::Error> {
        if pin < 8 {
            bus.write(self.address, &[reg_a, shadow as u8])
        } else {
            bus.write(self.address, &[reg_b, (shadow >> 8) as u8])
        }
    }

    /// Set one pin's direction
    pub fn set_mode<I2C: I2c>(
        &mut self,
        bus: &mut I2C,
        pin: u8,
        mode: PinMode,
    ) -> Result<(), I2C::Error> {
        debug_assert!(pin < 16);
        match mode {
            PinMode::Input => self.dir |= 1 << pin,
            PinMode::Output => self.dir &= !(1 << pin),
        }
        self.write_bank(bus, pin, reg::DIR_B, reg::DIR_A, self.dir)
    }

    /// Drive one output pin
    pub fn write_pin<I2C: I2c>(
        &mut self,
        bus: &mut I2C,
        pin: u8,
        high: bool,
    ) -> Result<(), I2C::Error> {
        debug_assert!(pin < 16);
        if high {
            self.data |= 1 << pin;
        } else {
            self.data &= !(1 << pin);
        }
        self.write_bank(bus, pin, reg::DATA_B, reg::DATA_A, self.data)
    }

    /// Read one pin's level from the chip
    pub fn read_pin<I2C: I2c>(&self, bus: &mut I2C, pin: u8) -> Result<bool, I2C::Error> {
        debug_assert!(pin < 16);
        let reg = if pin < 8 { reg::DATA_A } else { reg::DATA_B };
        let mut buf = [0u8; 1];
        bus.write_read(self.address, &[reg], &mut buf)?;
        Ok(buf[0] & (1 << (pin & 0x7)) != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBus;

    #[test]
    fn low_pins_hit_bank_a() {
        let mut bus = MockBus::new();
        let mut exp = Sx1503::new(ADDRESS);
        exp.write_pin(&mut bus, 5, false).unwrap();
        assert_eq!(bus.written_word(ADDRESS, reg::DATA_A), Some(0b1101_1111));
    }

    #[test]
    fn high_pins_hit_bank_b() {
        let mut bus = MockBus::new();
        let mut exp = Sx1503::new(ADDRESS);
        exp.write_pin(&mut bus, 14, false).unwrap();
        exp.write_pin(&mut bus, 15, false).unwrap();
        // Bank B byte covers pins 8-15; 14 and 15 cleared
        assert_eq!(bus.written_word(ADDRESS, reg::DATA_B), Some(0b0011_1111));
    }

    #[test]
    fn direction_shadow_accumulates() {
        let mut bus = MockBus::new();
        let mut exp = Sx1503::new(ADDRESS);
        exp.set_mode(&mut bus, 0, PinMode::Output).unwrap();
        exp.set_mode(&mut bus, 5, PinMode::Output).unwrap();
        assert_eq!(bus.written_word(ADDRESS, reg::DIR_A), Some(0b1101_1110));
        // Going back to input restores the bit
        exp.set_mode(&mut bus, 5, PinMode::Input).unwrap();
        assert_eq!(bus.written_word(ADDRESS, reg::DIR_A), Some(0b1111_1110));
    }

    #[test]
    fn read_pin_reflects_chip_state() {
        let mut bus = MockBus::new();
        bus.expander_pins = 1 << 13;
        let exp = Sx1503::new(ADDRESS);
        assert!(exp.read_pin(&mut bus, 13).unwrap());
        assert!(!exp.read_pin(&mut bus, 12).unwrap());
        assert!(!exp.read_pin(&mut bus, 5).unwrap());
    }
}
