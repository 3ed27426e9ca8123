//! GPIO button lines
//!
//! Adapts an `embedded_hal` input pin to the core [`ButtonLine`] trait.

use embedded_hal::digital::InputPin;
use sprig_core::config::Polarity;
use sprig_core::traits::ButtonLine;

/// Button line backed by a GPIO input
pub struct PinLine<P> {
    pin: P,
    /// Level reported when the pin cannot be read
    idle: bool,
}

impl<P: InputPin> PinLine<P> {
    /// Wrap a configured input pin
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self {
            pin,
            idle: polarity.idle_level(),
        }
    }

    /// Wrap a pull-up input where pressing grounds the line
    pub fn pull_up(pin: P) -> Self {
        Self::new(pin, Polarity::ActiveLow)
    }

    /// Release the pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> ButtonLine for PinLine<P> {
    fn is_high(&mut self) -> bool {
        self.pin.is_high().unwrap_or(self.idle)
    }
}
