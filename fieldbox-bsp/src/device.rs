//! The composed board device

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::i2c::I2c;

use fieldbox_core::channel::ChannelBank;
use fieldbox_core::convert::{CurrentParams, LinearParams, ResistiveParams};
use fieldbox_core::ChannelError;
use fieldbox_drivers::adc::{ads1015, Ads1015};
use fieldbox_drivers::expander::{sx1503, PinMode, Sx1503};

use crate::bus::BusArbiter;
use crate::error::Error;
use crate::pins::{self, LedColor};

/// Supply currently powering the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerSource {
    External,
    Battery,
}

/// The Fieldbox board: three analog front ends and the expander I/O,
/// behind one bus arbiter
///
/// All configuration state lives here, per ADC and per channel; nothing
/// is static. The `&mut self` receivers make concurrent reconfiguration
/// and acquisition on the same instance structurally impossible; wrap the
/// whole device in your own mutex to share it between tasks.
pub struct FieldBox<M: RawMutex, BUS> {
    pub(crate) bus: BusArbiter<M, BUS>,
    pub(crate) expander: Sx1503,
    pub(crate) adc_volt: Ads1015,
    pub(crate) adc_resistive: Ads1015,
    pub(crate) adc_current: Ads1015,
    pub(crate) volt_channels: ChannelBank<4>,
    pub(crate) volt_params: [LinearParams; 4],
    pub(crate) resistive_channels: ChannelBank<4>,
    pub(crate) resistive_params: [ResistiveParams; 4],
    pub(crate) current_channels: ChannelBank<3>,
    pub(crate) current_params: [CurrentParams; 3],
}

impl<M: RawMutex, BUS: I2c> FieldBox<M, BUS> {
    /// Take ownership of the I2C bus and bring up the board
    ///
    /// Initializes the expander: sinks and relays are driven low before
    /// their direction is set, to avoid a click at power-up; LEDs are
    /// active low and released. Every ADC channel starts at the power-up
    /// defaults (gain 2, fastest rate).
    pub fn new(bus: BUS) -> Result<Self, Error<BUS::Error>> {
        let arbiter = BusArbiter::new(bus);
        let mut expander = Sx1503::new(sx1503::ADDRESS);

        arbiter
            .with_bus(|bus| -> Result<(), BUS::Error> {
                for pin in [pins::SNK_1, pins::SNK_2, pins::REL_1, pins::REL_2] {
                    expander.write_pin(bus, pin, false)?;
                }
                for pin in [
                    pins::LED_R,
                    pins::LED_G,
                    pins::LED_B,
                    pins::REL_1,
                    pins::REL_2,
                    pins::SNK_1,
                    pins::SNK_2,
                    pins::RS485_EN,
                    pins::NRST,
                ] {
                    expander.set_mode(bus, pin, PinMode::Output)?;
                }
                for pin in [pins::ISO_1, pins::ISO_2, pins::EXTV] {
                    expander.set_mode(bus, pin, PinMode::Input)?;
                }
                // Hold the PHY out of reset, receiver direction on RS-485
                expander.write_pin(bus, pins::NRST, true)?;
                expander.write_pin(bus, pins::RS485_EN, false)?;
                for pin in pins::LED_PINS {
                    expander.write_pin(bus, pin, true)?;
                }
                Ok(())
            })
            .map_err(Error::Bus)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("fieldbox: expander up, analog front ends at defaults");

        Ok(Self {
            bus: arbiter,
            expander,
            adc_volt: Ads1015::new(ads1015::ADDR_VDD),
            adc_resistive: Ads1015::new(ads1015::ADDR_GND),
            adc_current: Ads1015::new(ads1015::ADDR_SCL),
            volt_channels: ChannelBank::new(),
            volt_params: [LinearParams::default(); 4],
            resistive_channels: ChannelBank::new(),
            resistive_params: core::array::from_fn(|_| ResistiveParams::default()),
            current_channels: ChannelBank::new(),
            current_params: [CurrentParams::default(); 3],
        })
    }

    /// The shared-bus arbiter, for extra peripherals on the same bus
    /// (e.g. click-board sockets)
    pub fn bus_arbiter(&self) -> &BusArbiter<M, BUS> {
        &self.bus
    }

    /// Light the status LED in the given color
    pub fn set_led(&mut self, color: LedColor) -> Result<(), Error<BUS::Error>> {
        let Self { bus, expander, .. } = self;
        bus.with_bus(|bus| -> Result<(), BUS::Error> {
            for pin in pins::LED_PINS {
                expander.write_pin(bus, pin, true)?;
            }
            for &pin in color.pins() {
                expander.write_pin(bus, pin, false)?;
            }
            Ok(())
        })
        .map_err(Error::Bus)
    }

    /// Turn the status LED off
    pub fn clear_led(&mut self) -> Result<(), Error<BUS::Error>> {
        let Self { bus, expander, .. } = self;
        bus.with_bus(|bus| -> Result<(), BUS::Error> {
            for pin in pins::LED_PINS {
                expander.write_pin(bus, pin, true)?;
            }
            Ok(())
        })
        .map_err(Error::Bus)
    }

    fn relay_pin(n: u8) -> Result<u8, ChannelError> {
        match n {
            1 => Ok(pins::REL_1),
            2 => Ok(pins::REL_2),
            _ => Err(ChannelError::BadChannel(n)),
        }
    }

    fn sink_pin(n: u8) -> Result<u8, ChannelError> {
        match n {
            1 => Ok(pins::SNK_1),
            2 => Ok(pins::SNK_2),
            _ => Err(ChannelError::BadChannel(n)),
        }
    }

    /// Close relay `n` (1 or 2): COM over to the NO contact
    pub fn relay_on(&mut self, n: u8) -> Result<(), Error<BUS::Error>> {
        let pin = Self::relay_pin(n)?;
        self.write_expander_pin(pin, true)
    }

    /// Release relay `n` (1 or 2): COM back to the NC contact
    pub fn relay_off(&mut self, n: u8) -> Result<(), Error<BUS::Error>> {
        let pin = Self::relay_pin(n)?;
        self.write_expander_pin(pin, false)
    }

    /// Short sink channel `n` (1 or 2) to ground
    pub fn sink_on(&mut self, n: u8) -> Result<(), Error<BUS::Error>> {
        let pin = Self::sink_pin(n)?;
        self.write_expander_pin(pin, true)
    }

    /// Release sink channel `n` (1 or 2)
    pub fn sink_off(&mut self, n: u8) -> Result<(), Error<BUS::Error>> {
        let pin = Self::sink_pin(n)?;
        self.write_expander_pin(pin, false)
    }

    /// Read isolated input `n` (1 or 2); true when a signal is present
    ///
    /// The optocoupler pulls the expander pin low when driven, hence the
    /// inversion.
    pub fn opto(&mut self, n: u8) -> Result<bool, Error<BUS::Error>> {
        let pin = match n {
            1 => pins::ISO_1,
            2 => pins::ISO_2,
            _ => return Err(ChannelError::BadChannel(n).into()),
        };
        let Self { bus, expander, .. } = self;
        let level = bus
            .with_bus(|bus| expander.read_pin(bus, pin))
            .map_err(Error::Bus)?;
        Ok(!level)
    }

    /// Which supply is powering the board right now
    pub fn power_source(&mut self) -> Result<PowerSource, Error<BUS::Error>> {
        let Self { bus, expander, .. } = self;
        let external = bus
            .with_bus(|bus| expander.read_pin(bus, pins::EXTV))
            .map_err(Error::Bus)?;
        Ok(if external {
            PowerSource::External
        } else {
            PowerSource::Battery
        })
    }

    fn write_expander_pin(&mut self, pin: u8, high: bool) -> Result<(), Error<BUS::Error>> {
        let Self { bus, expander, .. } = self;
        bus.with_bus(|bus| expander.write_pin(bus, pin, high))
            .map_err(Error::Bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use fieldbox_drivers::expander::sx1503::{reg, ADDRESS};
    use fieldbox_drivers::mock::MockBus;

    type TestBox = FieldBox<NoopRawMutex, MockBus>;

    fn data_a(board: &TestBox) -> u16 {
        board
            .bus_arbiter()
            .with_bus(|bus| bus.written_word(ADDRESS, reg::DATA_A))
            .unwrap()
    }

    #[test]
    fn init_parks_relays_and_releases_leds() {
        let board = TestBox::new(MockBus::new()).unwrap();
        // Bank A: RS485EN(0), REL_1(5), REL_2(6) low, LED_R(7) high
        assert_eq!(data_a(&board), 0b1001_1110);
        let data_b = board
            .bus_arbiter()
            .with_bus(|bus| bus.written_word(ADDRESS, reg::DATA_B))
            .unwrap();
        // Bank B: SNK_1(9), SNK_2(10) low, nRST(11) and LEDs high
        assert_eq!(data_b, 0b1111_1001);
    }

    #[test]
    fn led_color_drives_elements_low() {
        let mut board = TestBox::new(MockBus::new()).unwrap();
        board.set_led(LedColor::Red).unwrap();
        assert_eq!(data_a(&board) & (1 << pins::LED_R), 0);
        // Switching colors releases the previous elements
        board.set_led(LedColor::Cyan).unwrap();
        assert_ne!(data_a(&board) & (1 << pins::LED_R), 0);
        board.clear_led().unwrap();
        assert_ne!(data_a(&board) & (1 << pins::LED_R), 0);
    }

    #[test]
    fn relay_and_sink_validation() {
        let mut board = TestBox::new(MockBus::new()).unwrap();
        board.relay_on(1).unwrap();
        assert_ne!(data_a(&board) & (1 << pins::REL_1), 0);
        board.relay_off(1).unwrap();
        assert_eq!(data_a(&board) & (1 << pins::REL_1), 0);
        assert_eq!(
            board.relay_on(3),
            Err(Error::Channel(ChannelError::BadChannel(3)))
        );
        assert_eq!(
            board.sink_off(0),
            Err(Error::Channel(ChannelError::BadChannel(0)))
        );
    }

    #[test]
    fn opto_inputs_are_inverted() {
        let mut board = TestBox::new(MockBus::new()).unwrap();
        assert!(board.opto(1).unwrap());
        board
            .bus_arbiter()
            .with_bus(|bus| bus.expander_pins = 1 << pins::ISO_1);
        assert!(!board.opto(1).unwrap());
        assert!(board.opto(2).unwrap());
    }

    #[test]
    fn power_source_follows_extv() {
        let mut board = TestBox::new(MockBus::new()).unwrap();
        assert_eq!(board.power_source().unwrap(), PowerSource::Battery);
        board
            .bus_arbiter()
            .with_bus(|bus| bus.expander_pins = 1 << pins::EXTV);
        assert_eq!(board.power_source().unwrap(), PowerSource::External);
    }
}
