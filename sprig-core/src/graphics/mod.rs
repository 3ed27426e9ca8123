//! Screen graphics
//!
//! RGB565 colors, screen geometry, sprites with z-ordered compositing, and
//! the character grid. All drawing goes through a
//! [`DisplayTransport`](crate::traits::DisplayTransport).

pub mod color;
pub mod display;
pub mod geometry;
pub mod registry;
pub mod sprite;
pub mod text;

pub use color::{Color, Rgb8Policy};
pub use display::Display;
pub use geometry::{Point, Rect, SCREEN, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use registry::SpriteRegistry;
pub use sprite::{
    Sprite, SpriteArena, SpriteError, SpriteId, MAX_SPRITES, MAX_SPRITE_DIM, MAX_SPRITE_PIXELS,
};
pub use text::{Cell, Placement, TextError, TextGrid, TEXT_COLS, TEXT_ROWS};
