//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in sprig-core for the board's peripherals:
//!
//! - ST7735 TFT panel over SPI (display transport)
//! - Button lines over GPIO inputs
//! - PWM-dimmed status LEDs
//! - 8x8 glyph table rasterised from an embedded-graphics font

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod font;
pub mod input;
pub mod led;

pub use display::{St7735, St7735Error};
pub use font::Font8x8;
pub use input::PinLine;
pub use led::{LedError, PwmLed};
