//! Hardware abstraction traits
//!
//! These traits define the interface between the board logic
//! and hardware-specific implementations.

pub mod display;
pub mod input;

pub use display::{DisplayExt, DisplayTransport, GlyphSource, Window, GLYPH_SIZE};
pub use input::ButtonLine;
