//! Scripted I2C bus for host tests
//!
//! Stands in for the shared board bus: it understands just enough of the
//! ADS1015 and SX1503 register maps to answer the drivers' transactions,
//! records every register write, and counts conversion-register reads so
//! tests can assert on burst lengths.
//!
//! Compiled only for tests, or for dependents that enable the `mock`
//! feature in their dev-dependencies.

use embedded_hal::i2c::{Error, ErrorKind, ErrorType, I2c, Operation};
use heapless::{Deque, LinearMap};

/// Address the mock treats as the GPIO expander
const EXPANDER_ADDRESS: u8 = 0x20;

/// Error returned when a scripted failure is armed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

impl Error for MockBusError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Scripted I2C bus
pub struct MockBus {
    /// Register pointer last addressed, per device
    pointers: LinearMap<u8, u8, 8>,
    /// Last value written to each (device, register)
    written: LinearMap<(u8, u8), u16, 32>,
    /// Queued conversion codes, shared by all ADC addresses
    codes: Deque<i16, 64>,
    /// Code returned once the queue is empty
    pub fixed_code: i16,
    /// Conversion-register reads per device
    reads: LinearMap<u8, usize, 8>,
    /// Input state visible through the expander data registers
    pub expander_pins: u16,
    /// Fail the next transaction, then clear
    pub fail_next: bool,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            pointers: LinearMap::new(),
            written: LinearMap::new(),
            codes: Deque::new(),
            fixed_code: 0,
            reads: LinearMap::new(),
            expander_pins: 0,
            fail_next: false,
        }
    }

    /// Queue a conversion code; after the queue drains, `fixed_code`
    /// answers every read
    pub fn push_code(&mut self, code: i16) {
        self.codes.push_back(code).expect("mock code queue full");
    }

    /// Last value written to a device register (one- or two-byte writes)
    pub fn written_word(&self, address: u8, register: u8) -> Option<u16> {
        self.written.get(&(address, register)).copied()
    }

    /// Number of conversion-register reads issued to a device
    pub fn conversion_reads(&self, address: u8) -> usize {
        self.reads.get(&address).copied().unwrap_or(0)
    }

    fn handle_write(&mut self, address: u8, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let register = bytes[0];
        let _ = self.pointers.insert(address, register);
        match bytes.len() {
            2 => {
                let _ = self.written.insert((address, register), bytes[1] as u16);
            }
            3 => {
                let word = u16::from_be_bytes([bytes[1], bytes[2]]);
                let _ = self.written.insert((address, register), word);
            }
            _ => {}
        }
    }

    fn handle_read(&mut self, address: u8, buf: &mut [u8]) {
        let pointer = self.pointers.get(&address).copied().unwrap_or(0);
        if address == EXPANDER_ADDRESS {
            // Data registers reflect the scripted pin state; everything
            // else reads back the last write
            buf[0] = match pointer {
                0x00 => (self.expander_pins >> 8) as u8,
                0x01 => self.expander_pins as u8,
                other => self.written_word(address, other).unwrap_or(0) as u8,
            };
            return;
        }
        // ADC: pointer 0 is the conversion register, left-justified code
        if pointer == 0x00 {
            let code = self.codes.pop_front().unwrap_or(self.fixed_code);
            let count = self.conversion_reads(address) + 1;
            let _ = self.reads.insert(address, count);
            buf.copy_from_slice(&(code << 4).to_be_bytes());
        } else {
            let word = self.written_word(address, pointer).unwrap_or(0);
            buf.copy_from_slice(&word.to_be_bytes());
        }
    }
}

impl Default for MockBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorType for MockBus {
    type Error = MockBusError;
}

impl I2c for MockBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail_next {
            self.fail_next = false;
            return Err(MockBusError);
        }
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => self.handle_write(address, bytes),
                Operation::Read(buf) => self.handle_read(address, buf),
            }
        }
        Ok(())
    }
}
