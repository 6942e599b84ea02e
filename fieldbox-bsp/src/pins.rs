//! Expander pin map and LED colors
//!
//! All of the board's slow digital I/O routes through the SX1503; these
//! are the fixed pin assignments of the PCB.

/// RS-485 transmit/receive direction
pub const RS485_EN: u8 = 0;
/// AN pin, mikroBUS slot 2
pub const AN_2: u8 = 1;
/// Spare I/O on the screw connector
pub const IO_2: u8 = 2;
/// PWM pin, mikroBUS slot 2
pub const PWM_2: u8 = 3;
/// INT pin, mikroBUS slot 2
pub const INT_2: u8 = 4;
/// Relay 1 coil driver
pub const REL_1: u8 = 5;
/// Relay 2 coil driver
pub const REL_2: u8 = 6;
/// Status LED, red element (active low)
pub const LED_R: u8 = 7;
/// Isolated input 2
pub const ISO_2: u8 = 8;
/// Sink driver 1
pub const SNK_1: u8 = 9;
/// Sink driver 2
pub const SNK_2: u8 = 10;
/// Ethernet PHY reset (active low)
pub const NRST: u8 = 11;
/// External-supply detect
pub const EXTV: u8 = 12;
/// Isolated input 1
pub const ISO_1: u8 = 13;
/// Status LED, green element (active low)
pub const LED_G: u8 = 14;
/// Status LED, blue element (active low)
pub const LED_B: u8 = 15;

/// All three LED elements
pub const LED_PINS: [u8; 3] = [LED_R, LED_G, LED_B];

/// Status LED color, mixed from the three active-low elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedColor {
    Red,
    Green,
    Blue,
    Magenta,
    Yellow,
    Cyan,
    White,
}

impl LedColor {
    /// Expander pins driven low for this color
    pub fn pins(self) -> &'static [u8] {
        match self {
            LedColor::Red => &[LED_R],
            LedColor::Green => &[LED_G],
            LedColor::Blue => &[LED_B],
            LedColor::Magenta => &[LED_R, LED_B],
            LedColor::Yellow => &[LED_R, LED_G],
            LedColor::Cyan => &[LED_G, LED_B],
            LedColor::White => &[LED_R, LED_G, LED_B],
        }
    }
}
