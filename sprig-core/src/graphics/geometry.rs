//! Screen geometry
//!
//! Coordinates are signed so sprites can sit partly off-screen; anything
//! sent to the panel is clipped to [`SCREEN`] first.

/// Panel width in pixels
pub const SCREEN_WIDTH: u16 = 160;

/// Panel height in pixels
pub const SCREEN_HEIGHT: u16 = 128;

/// The whole addressable surface
pub const SCREEN: Rect = Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT);

/// A pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle (origin + size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: i16, y: i16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True if the rectangle covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i32 {
        self.x as i32 + self.width as i32
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> i32 {
        self.y as i32 + self.height as i32
    }

    /// Overlapping region of two rectangles, if any
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = (self.x as i32).max(other.x as i32);
        let top = (self.y as i32).max(other.y as i32);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left || bottom <= top {
            return None;
        }

        Some(Rect {
            x: left as i16,
            y: top as i16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        })
    }

    /// Inclusive panel window bounds `(x_start, x_end, y_start, y_end)`
    ///
    /// Only meaningful for non-empty rectangles inside [`SCREEN`].
    pub fn window_bounds(&self) -> (u16, u16, u16, u16) {
        let x_start = self.x.max(0) as u16;
        let y_start = self.y.max(0) as u16;
        (
            x_start,
            x_start + self.width.saturating_sub(1),
            y_start,
            y_start + self.height.saturating_sub(1),
        )
    }

    /// Number of pixels covered
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
