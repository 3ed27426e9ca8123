//! PWM status LEDs
//!
//! The board has two LEDs on PWM channels. "On" is a fixed fraction of the
//! channel's maximum duty, set by a divisor so each LED can be dimmed to
//! taste without touching the PWM period.

use embedded_hal::pwm::SetDutyCycle;

/// LED driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    /// Duty divisor of zero
    ZeroDivisor,
    /// PWM channel rejected the duty cycle
    Pwm,
}

/// A dimmable LED on one PWM channel
pub struct PwmLed<P> {
    pwm: P,
    divisor: u16,
    on: bool,
}

impl<P: SetDutyCycle> PwmLed<P> {
    /// Create an LED, initially off
    pub fn new(pwm: P, divisor: u16) -> Result<Self, LedError> {
        if divisor == 0 {
            return Err(LedError::ZeroDivisor);
        }
        let mut led = Self {
            pwm,
            divisor,
            on: false,
        };
        led.off()?;
        Ok(led)
    }

    /// Duty applied while on
    pub fn on_duty(&self) -> u16 {
        self.pwm.max_duty_cycle() / self.divisor
    }

    /// Turn the LED on at its configured brightness
    pub fn on(&mut self) -> Result<(), LedError> {
        let duty = self.on_duty();
        self.pwm.set_duty_cycle(duty).map_err(|_| LedError::Pwm)?;
        self.on = true;
        Ok(())
    }

    /// Turn the LED off
    pub fn off(&mut self) -> Result<(), LedError> {
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(|_| LedError::Pwm)?;
        self.on = false;
        Ok(())
    }

    /// Switch on or off
    pub fn set(&mut self, on: bool) -> Result<(), LedError> {
        if on {
            self.on()
        } else {
            self.off()
        }
    }

    /// Check if the LED is lit
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Brightness divisor
    pub fn divisor(&self) -> u16 {
        self.divisor
    }

    /// Release the PWM channel
    pub fn release(self) -> P {
        self.pwm
    }
}
