//! Per-channel ADC configuration storage
//!
//! Each of the three onboard ADCs keeps one [`ChannelConfig`] per input
//! channel: the PGA gain index, the samples-per-second rate index and the
//! full-scale reference voltage derived from the gain. A [`ChannelBank`]
//! owns the configs for one ADC instance; the device struct owns one bank
//! per ADC, so there is no ambient/static configuration state.

use crate::error::ChannelError;

/// Number of PGA gain steps on the ADS1015-class converter
pub const GAIN_STEPS: u8 = 8;

/// Number of samples-per-second rate steps
pub const RATE_STEPS: u8 = 8;

/// Full-scale reference voltage per PGA gain index
///
/// Indices 5..=7 all select the narrowest ±0.256V span, per the converter
/// datasheet.
pub const VREF_TABLE: [f32; 8] = [6.144, 4.096, 2.048, 1.024, 0.512, 0.256, 0.256, 0.256];

/// Default PGA gain index at power-up (±2.048V span)
pub const DEFAULT_GAIN: u8 = 2;

/// Default rate index at power-up (fastest, 3300 SPS)
pub const DEFAULT_RATE: u8 = 7;

/// Configuration of a single ADC input channel
///
/// `reference_voltage` is not independently settable: it always reflects
/// the last-set gain index via [`VREF_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    gain: u8,
    sample_rate: u8,
    reference_voltage: f32,
}

impl ChannelConfig {
    /// Create a config, validating both indices against the fixed tables
    pub fn new(gain: u8, sample_rate: u8) -> Result<Self, ChannelError> {
        if gain >= GAIN_STEPS {
            return Err(ChannelError::BadGain(gain));
        }
        if sample_rate >= RATE_STEPS {
            return Err(ChannelError::BadRate(sample_rate));
        }
        Ok(Self {
            gain,
            sample_rate,
            reference_voltage: VREF_TABLE[gain as usize],
        })
    }

    /// PGA gain index (0..=7)
    pub fn gain(&self) -> u8 {
        self.gain
    }

    /// Samples-per-second rate index (0..=7)
    pub fn sample_rate(&self) -> u8 {
        self.sample_rate
    }

    /// Full-scale reference voltage for the current gain, in volts
    pub fn reference_voltage(&self) -> f32 {
        self.reference_voltage
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            gain: DEFAULT_GAIN,
            sample_rate: DEFAULT_RATE,
            reference_voltage: VREF_TABLE[DEFAULT_GAIN as usize],
        }
    }
}

/// Configuration bank for one ADC instance with `N` input channels
///
/// Channels are numbered 1..=N on the board silkscreen and throughout the
/// public API; the bank maps them to zero-based storage.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelBank<const N: usize> {
    channels: [ChannelConfig; N],
}

impl<const N: usize> Default for ChannelBank<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ChannelBank<N> {
    /// Create a bank with every channel at the power-up defaults
    pub fn new() -> Self {
        Self {
            channels: [ChannelConfig::default(); N],
        }
    }

    /// Map a 1-based channel number to a storage index
    pub fn index(&self, ch: u8) -> Result<usize, ChannelError> {
        if ch == 0 || ch as usize > N {
            return Err(ChannelError::BadChannel(ch));
        }
        Ok(ch as usize - 1)
    }

    /// Get the stored config for a 1-based channel number
    pub fn channel(&self, ch: u8) -> Result<&ChannelConfig, ChannelError> {
        Ok(&self.channels[self.index(ch)?])
    }

    /// Reconfigure one channel's gain and sample rate
    ///
    /// Overwrites the stored reference voltage from the gain table. Takes
    /// effect on the next acquisition; in-flight reads are unaffected.
    pub fn configure(&mut self, ch: u8, gain: u8, sample_rate: u8) -> Result<(), ChannelError> {
        let idx = self.index(ch)?;
        self.channels[idx] = ChannelConfig::new(gain, sample_rate)?;
        Ok(())
    }
}
