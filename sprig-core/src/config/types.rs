//! Configuration type definitions
//!
//! These types describe the board behaviour that can be tuned without
//! touching code. The firmware builds its `BOARD` constant from
//! `board.toml` at compile time.

use crate::graphics::{Color, Rgb8Policy};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fastest SPI clock the RP2040 can generate from a 125 MHz system clock
pub const MAX_SPI_FREQUENCY_HZ: u32 = 62_500_000;

/// Majority rule used when a debounce window is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ThresholdPolicy {
    /// More than 5/6 of the window must be high (`> 53` of 64)
    #[default]
    Supermajority,
    /// Stock firmware rule: `(5 / 6) * 64` in integer math is 0, so a
    /// single high sample is enough
    Truncated,
}

/// Electrical sense of a button line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Polarity {
    /// Pressed pulls the line low (pull-up input)
    #[default]
    ActiveLow,
    /// Pressed drives the line high
    ActiveHigh,
}

impl Polarity {
    /// Line level while the button is pressed
    pub const fn active_level(self) -> bool {
        matches!(self, Polarity::ActiveHigh)
    }

    /// Line level while the button is released
    pub const fn idle_level(self) -> bool {
        !self.active_level()
    }
}

/// Debounce configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DebounceConfig {
    /// Window evaluation rule
    pub threshold: ThresholdPolicy,
    /// Button line polarity
    pub polarity: Polarity,
}

/// Display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Shared background color (clear color and sprite transparency key)
    pub background: Color,
    /// Packing rule for 8-bit color channels
    pub rgb8_policy: Rgb8Policy,
    /// SPI clock for the panel
    pub spi_frequency_hz: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            rgb8_policy: Rgb8Policy::Corrected,
            spi_frequency_hz: 30_000_000,
        }
    }
}

/// LED configuration
///
/// Divisors are applied to the PWM maximum duty: 4 means on a quarter of
/// the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LedConfig {
    /// Left (white) LED duty divisor
    pub white_divisor: u16,
    /// Right (blue) LED duty divisor
    pub blue_divisor: u16,
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            white_divisor: 8,
            blue_divisor: 4,
        }
    }
}

/// Complete board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    /// Button debounce settings
    pub debounce: DebounceConfig,
    /// Display settings
    pub display: DisplayConfig,
    /// LED settings
    pub leds: LedConfig,
    /// Control-loop tick interval (microseconds)
    pub poll_interval_us: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            debounce: DebounceConfig::default(),
            display: DisplayConfig::default(),
            leds: LedConfig::default(),
            poll_interval_us: 250,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// An LED duty divisor is zero
    ZeroLedDivisor,
    /// Poll interval is zero
    ZeroPollInterval,
    /// SPI frequency is zero or above the controller limit
    InvalidSpiFrequency,
}

impl BoardConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.leds.white_divisor == 0 || self.leds.blue_divisor == 0 {
            return Err(ConfigError::ZeroLedDivisor);
        }
        if self.poll_interval_us == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.display.spi_frequency_hz == 0
            || self.display.spi_frequency_hz > MAX_SPI_FREQUENCY_HZ
        {
            return Err(ConfigError::InvalidSpiFrequency);
        }
        Ok(())
    }
}
