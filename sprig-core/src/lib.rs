//! Board-agnostic core logic for the Sprig handheld
//!
//! This crate contains all logic that does not depend on specific
//! hardware implementations:
//!
//! - Hardware abstraction traits (button line, display transport, glyphs)
//! - Button history debounce and the eight-button bank
//! - RGB565 colors and screen geometry
//! - Sprite arena, registries and the z-ordered compositor
//! - Character grid text layer
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod graphics;
pub mod input;
pub mod traits;
