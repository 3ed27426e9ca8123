//! Sprig - Handheld Game Board Firmware
//!
//! Main firmware binary for the RP2040-based Sprig console: eight
//! debounced buttons, two PWM LEDs and a 160x128 ST7735 TFT driven
//! without a frame buffer.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::spi::{self, Spi};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use sprig_core::config::Polarity;
use sprig_core::graphics::Display;
use sprig_core::input::ButtonBank;
use sprig_drivers::{Font8x8, LedError, PinLine, PwmLed, St7735};

use crate::app::{App, Led};
use crate::board::BOARD;

mod app;
mod board;
mod tasks;

/// PWM counter wrap for the LED channels (~1.9 kHz at 125 MHz)
const LED_PWM_TOP: u16 = 0xFFFF;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Sprig firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    if let Err(e) = BOARD.validate() {
        error!("Invalid board configuration: {}", e);
    }

    // Backlight on before the panel wakes up
    let backlight = Output::new(p.PIN_17, Level::High);

    // Setup SPI0 for the TFT (SCK=GPIO18, MOSI=GPIO19, MISO=GPIO16)
    let mut spi_config = spi::Config::default();
    spi_config.frequency = BOARD.display.spi_frequency_hz;
    let spi = Spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, spi_config);

    // CS=GPIO20, DC=GPIO22, RST=GPIO26
    let cs = Output::new(p.PIN_20, Level::High);
    let dc = Output::new(p.PIN_22, Level::Low);
    let rst = Output::new(p.PIN_26, Level::Low);

    let mut panel = St7735::new(spi, cs, dc, rst);
    match panel.init(&mut Delay) {
        Ok(()) => info!("Display initialized"),
        Err(e) => error!("Display init failed, drawing disabled: {:?}", defmt::Debug2Format(&e)),
    }
    let display = Display::new(panel, Font8x8::new(), &BOARD.display);

    // Buttons in bank order: W A S D I J K L
    let polarity = BOARD.debounce.polarity;
    let pull = match polarity {
        Polarity::ActiveLow => Pull::Up,
        Polarity::ActiveHigh => Pull::Down,
    };
    let lines = [
        PinLine::new(Input::new(p.PIN_5, pull), polarity),
        PinLine::new(Input::new(p.PIN_7, pull), polarity),
        PinLine::new(Input::new(p.PIN_6, pull), polarity),
        PinLine::new(Input::new(p.PIN_8, pull), polarity),
        PinLine::new(Input::new(p.PIN_12, pull), polarity),
        PinLine::new(Input::new(p.PIN_14, pull), polarity),
        PinLine::new(Input::new(p.PIN_13, pull), polarity),
        PinLine::new(Input::new(p.PIN_15, pull), polarity),
    ];
    let buttons = ButtonBank::new(lines, &BOARD.debounce);
    info!("Buttons initialized ({:?})", BOARD.debounce.threshold);

    // LEDs: white on PWM6 A (GPIO28), blue on PWM2 A (GPIO4)
    let mut pwm_config = pwm::Config::default();
    pwm_config.top = LED_PWM_TOP;

    let (white, _) = Pwm::new_output_a(p.PWM_SLICE6, p.PIN_28, pwm_config.clone()).split();
    let (blue, _) = Pwm::new_output_a(p.PWM_SLICE2, p.PIN_4, pwm_config).split();
    let white = make_led("white", white, BOARD.leds.white_divisor);
    let blue = make_led("blue", blue, BOARD.leds.blue_divisor);

    let app = unwrap!(App::new(buttons, display, white, blue, backlight));

    spawner.spawn(tasks::control_task(app)).unwrap();

    info!("All tasks spawned, firmware running");
}

/// Wrap a PWM channel as an LED, logging failures
fn make_led(name: &str, channel: Option<pwm::PwmOutput<'static>>, divisor: u16) -> Option<Led> {
    match channel.ok_or(LedError::Pwm).and_then(|ch| PwmLed::new(ch, divisor)) {
        Ok(led) => Some(led),
        Err(e) => {
            warn!("{} LED unavailable: {}", name, e);
            None
        }
    }
}
