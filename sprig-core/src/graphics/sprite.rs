//! Sprites and the sprite arena
//!
//! A sprite is a fixed-size grid of colors placed on screen with a layering
//! key. Sprites live in a [`SpriteArena`] and are referenced by stable
//! [`SpriteId`]s, so any number of registries can share one sprite without
//! owning it.

use heapless::Vec;

use super::color::Color;
use super::geometry::{Point, Rect};

/// Largest sprite edge in pixels
pub const MAX_SPRITE_DIM: u16 = 32;

/// Largest sprite grid in pixels
pub const MAX_SPRITE_PIXELS: usize = (MAX_SPRITE_DIM as usize) * (MAX_SPRITE_DIM as usize);

/// Arena and registry capacity (power of two for the group index)
pub const MAX_SPRITES: usize = 16;

/// Sprite errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpriteError {
    /// Width or height above [`MAX_SPRITE_DIM`]
    TooLarge,
    /// Pixel data length does not match width x height
    SizeMismatch,
    /// Pixel coordinate outside the sprite grid
    OutOfBounds,
    /// Arena has no free slot
    ArenaFull,
    /// Registry has no free slot
    RegistryFull,
    /// Id does not name a sprite in the arena
    UnknownSprite,
}

/// Stable handle to a sprite in a [`SpriteArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpriteId(u8);

impl SpriteId {
    /// Arena slot index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A positioned, layered grid of colors
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Screen X of the top-left pixel
    pub x: i16,
    /// Screen Y of the top-left pixel
    pub y: i16,
    /// Layering key (higher draws on top)
    pub z: u8,
    width: u16,
    height: u16,
    /// Row-major pixel grid
    pixels: Vec<Color, MAX_SPRITE_PIXELS>,
}

impl Sprite {
    /// Create a sprite filled with one color
    pub fn new(
        x: i16,
        y: i16,
        z: u8,
        width: u16,
        height: u16,
        fill: Color,
    ) -> Result<Self, SpriteError> {
        Self::check_size(width, height)?;
        let mut pixels = Vec::new();
        pixels
            .resize(width as usize * height as usize, fill)
            .map_err(|_| SpriteError::TooLarge)?;
        Ok(Self {
            x,
            y,
            z,
            width,
            height,
            pixels,
        })
    }

    /// Create a sprite from row-major pixel data
    pub fn from_pixels(
        x: i16,
        y: i16,
        z: u8,
        width: u16,
        height: u16,
        data: &[Color],
    ) -> Result<Self, SpriteError> {
        Self::check_size(width, height)?;
        if data.len() != width as usize * height as usize {
            return Err(SpriteError::SizeMismatch);
        }
        let pixels = Vec::from_slice(data).map_err(|_| SpriteError::TooLarge)?;
        Ok(Self {
            x,
            y,
            z,
            width,
            height,
            pixels,
        })
    }

    fn check_size(width: u16, height: u16) -> Result<(), SpriteError> {
        if width > MAX_SPRITE_DIM || height > MAX_SPRITE_DIM {
            return Err(SpriteError::TooLarge);
        }
        Ok(())
    }

    /// Grid width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Grid height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// True if the grid has no pixels
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Screen origin (the compositing group key)
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Screen footprint
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Move the sprite
    pub fn move_to(&mut self, x: i16, y: i16) {
        self.x = x;
        self.y = y;
    }

    /// Pixel at local `(col, row)`
    pub fn pixel(&self, col: u16, row: u16) -> Option<Color> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.pixels
            .get(row as usize * self.width as usize + col as usize)
            .copied()
    }

    /// Set the pixel at local `(col, row)`
    pub fn set_pixel(&mut self, col: u16, row: u16, color: Color) -> Result<(), SpriteError> {
        if col >= self.width || row >= self.height {
            return Err(SpriteError::OutOfBounds);
        }
        let idx = row as usize * self.width as usize + col as usize;
        self.pixels[idx] = color;
        Ok(())
    }

    /// Paint every pixel one color
    pub fn fill(&mut self, color: Color) {
        self.pixels.iter_mut().for_each(|p| *p = color);
    }

    /// Row-major pixel grid
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Mutable row-major pixel grid (dimensions stay fixed)
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }
}

/// Fixed-capacity store of sprites with stable ids
///
/// Sprites are never removed, so an id stays valid for the arena's
/// lifetime.
pub struct SpriteArena {
    sprites: Vec<Sprite, MAX_SPRITES>,
}

impl Default for SpriteArena {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteArena {
    /// Create an empty arena
    pub const fn new() -> Self {
        Self {
            sprites: Vec::new(),
        }
    }

    /// Add a sprite, returning its id
    pub fn insert(&mut self, sprite: Sprite) -> Result<SpriteId, SpriteError> {
        let id = SpriteId(self.sprites.len() as u8);
        self.sprites
            .push(sprite)
            .map_err(|_| SpriteError::ArenaFull)?;
        Ok(id)
    }

    /// Look up a sprite
    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(id.index())
    }

    /// Look up a sprite for mutation
    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.get_mut(id.index())
    }

    /// Number of sprites
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// True if the arena holds no sprites
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_grid() {
        let s = Sprite::new(3, 4, 1, 4, 2, Color::RED).unwrap();
        assert_eq!(s.pixels().len(), 8);
        assert!(s.pixels().iter().all(|&c| c == Color::RED));
        assert_eq!(s.origin(), Point::new(3, 4));
        assert_eq!(s.bounds(), Rect::new(3, 4, 4, 2));
    }

    #[test]
    fn test_rejects_oversize() {
        assert_eq!(
            Sprite::new(0, 0, 0, MAX_SPRITE_DIM + 1, 1, Color::RED).unwrap_err(),
            SpriteError::TooLarge
        );
        assert!(Sprite::new(0, 0, 0, MAX_SPRITE_DIM, MAX_SPRITE_DIM, Color::RED).is_ok());
    }

    #[test]
    fn test_from_pixels_checks_length() {
        let data = [Color::RED; 6];
        assert!(Sprite::from_pixels(0, 0, 0, 3, 2, &data).is_ok());
        assert_eq!(
            Sprite::from_pixels(0, 0, 0, 2, 2, &data).unwrap_err(),
            SpriteError::SizeMismatch
        );
    }

    #[test]
    fn test_pixel_access_is_row_major() {
        let data = [Color(1), Color(2), Color(3), Color(4), Color(5), Color(6)];
        let mut s = Sprite::from_pixels(0, 0, 0, 3, 2, &data).unwrap();
        assert_eq!(s.pixel(0, 0), Some(Color(1)));
        assert_eq!(s.pixel(2, 0), Some(Color(3)));
        assert_eq!(s.pixel(0, 1), Some(Color(4)));
        assert_eq!(s.pixel(3, 0), None);
        assert_eq!(s.pixel(0, 2), None);

        s.set_pixel(1, 1, Color::WHITE).unwrap();
        assert_eq!(s.pixels()[4], Color::WHITE);
        assert_eq!(s.set_pixel(3, 1, Color::WHITE), Err(SpriteError::OutOfBounds));
    }

    #[test]
    fn test_empty_sprite() {
        let s = Sprite::new(0, 0, 0, 0, 5, Color::RED).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn test_arena_ids_are_stable() {
        let mut arena = SpriteArena::new();
        let a = arena.insert(Sprite::new(0, 0, 0, 1, 1, Color::RED).unwrap()).unwrap();
        let b = arena.insert(Sprite::new(5, 5, 0, 1, 1, Color::BLUE).unwrap()).unwrap();
        assert_ne!(a, b);

        arena.get_mut(a).unwrap().move_to(10, 10);
        assert_eq!(arena.get(a).unwrap().origin(), Point::new(10, 10));
        assert_eq!(arena.get(b).unwrap().origin(), Point::new(5, 5));
    }

    #[test]
    fn test_arena_full() {
        let mut arena = SpriteArena::new();
        for _ in 0..MAX_SPRITES {
            arena.insert(Sprite::new(0, 0, 0, 1, 1, Color::RED).unwrap()).unwrap();
        }
        assert_eq!(
            arena.insert(Sprite::new(0, 0, 0, 1, 1, Color::RED).unwrap()),
            Err(SpriteError::ArenaFull)
        );
    }
}
