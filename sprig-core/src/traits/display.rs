//! Display transport trait for the TFT panel
//!
//! The panel is driven without a frame buffer: a rectangular window is
//! addressed, pixels are streamed into it row-major, and the window is
//! closed. Everything the compositor and text layer draw goes through
//! these three calls.

use crate::graphics::{Color, Rect};

/// Glyph cell edge length in pixels
pub const GLYPH_SIZE: usize = 8;

/// Window + pixel-stream protocol to the physical panel
///
/// Implementations must treat all three calls as no-ops while the panel is
/// not initialized, so callers never need to special-case start-up order.
/// Transfer failures are absorbed by the implementation.
pub trait DisplayTransport {
    /// Address the inclusive region `[x_start, x_end] x [y_start, y_end]`
    ///
    /// Must be paired with exactly one [`end_window`](Self::end_window).
    fn begin_window(&mut self, x_start: u16, x_end: u16, y_start: u16, y_end: u16);

    /// Stream one pixel into the open window
    fn push_pixel(&mut self, color: Color);

    /// Finish the current window transfer
    fn end_window(&mut self);

    /// Check if the panel accepts pixel data
    fn is_ready(&self) -> bool;
}

/// An open display window
///
/// Closes the window when dropped, so every exit path of a render leaves
/// the transport idle.
pub struct Window<'a, T: DisplayTransport + ?Sized> {
    transport: &'a mut T,
}

impl<'a, T: DisplayTransport + ?Sized> Window<'a, T> {
    /// Stream one pixel
    pub fn push(&mut self, color: Color) {
        self.transport.push_pixel(color);
    }

    /// Stream the same color `count` times
    pub fn push_repeated(&mut self, color: Color, count: usize) {
        for _ in 0..count {
            self.transport.push_pixel(color);
        }
    }
}

impl<'a, T: DisplayTransport + ?Sized> Drop for Window<'a, T> {
    fn drop(&mut self) {
        self.transport.end_window();
    }
}

/// Helpers built on the raw transport calls
pub trait DisplayExt: DisplayTransport {
    /// Open a window over `area`, which must already be clipped to the screen
    fn window(&mut self, area: Rect) -> Window<'_, Self> {
        let (x_start, x_end, y_start, y_end) = area.window_bounds();
        self.begin_window(x_start, x_end, y_start, y_end);
        Window { transport: self }
    }

    /// Fill a rectangle with one color (clipped to the screen)
    fn fill_rect(&mut self, area: Rect, color: Color) {
        if let Some(area) = area.intersect(&crate::graphics::SCREEN) {
            let mut window = self.window(area);
            window.push_repeated(color, area.area());
        }
    }
}

// Blanket implementation for all DisplayTransport types
impl<T: DisplayTransport + ?Sized> DisplayExt for T {}

/// Source of 8x8 character bitmaps
///
/// Each glyph is eight row bytes, top row first. Bit `i` of a row (least
/// significant first) is column `i`.
pub trait GlyphSource {
    /// Bitmap for a character byte
    fn glyph(&self, ch: u8) -> [u8; GLYPH_SIZE];
}

#[cfg(test)]
pub(crate) mod mock {
    //! Recording transport shared by the graphics tests

    use super::*;
    use std::vec::Vec;

    /// One recorded transport call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Op {
        Begin(u16, u16, u16, u16),
        Pixel(Color),
        End,
    }

    /// Transport that records every call
    pub struct RecordingTransport {
        pub ops: Vec<Op>,
        pub ready: bool,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self {
                ops: Vec::new(),
                ready: true,
            }
        }

        /// Pixels of each window, in order
        pub fn windows(&self) -> Vec<((u16, u16, u16, u16), Vec<Color>)> {
            let mut out = Vec::new();
            for op in &self.ops {
                match op {
                    Op::Begin(x0, x1, y0, y1) => out.push(((*x0, *x1, *y0, *y1), Vec::new())),
                    Op::Pixel(c) => {
                        if let Some((_, pixels)) = out.last_mut() {
                            pixels.push(*c);
                        }
                    }
                    Op::End => {}
                }
            }
            out
        }

        /// True if every begin has a matching end and nothing is left open
        pub fn balanced(&self) -> bool {
            let mut open = false;
            for op in &self.ops {
                match op {
                    Op::Begin(..) if open => return false,
                    Op::Begin(..) => open = true,
                    Op::End if !open => return false,
                    Op::End => open = false,
                    Op::Pixel(_) if !open => return false,
                    Op::Pixel(_) => {}
                }
            }
            !open
        }
    }

    impl DisplayTransport for RecordingTransport {
        fn begin_window(&mut self, x_start: u16, x_end: u16, y_start: u16, y_end: u16) {
            if self.ready {
                self.ops.push(Op::Begin(x_start, x_end, y_start, y_end));
            }
        }

        fn push_pixel(&mut self, color: Color) {
            if self.ready {
                self.ops.push(Op::Pixel(color));
            }
        }

        fn end_window(&mut self) {
            if self.ready {
                self.ops.push(Op::End);
            }
        }

        fn is_ready(&self) -> bool {
            self.ready
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{Op, RecordingTransport};
    use super::*;

    #[test]
    fn test_window_closes_on_drop() {
        let mut t = RecordingTransport::new();
        {
            let mut w = t.window(Rect::new(0, 0, 2, 1));
            w.push(Color::RED);
            w.push(Color::BLUE);
        }
        assert_eq!(
            t.ops,
            vec![
                Op::Begin(0, 1, 0, 0),
                Op::Pixel(Color::RED),
                Op::Pixel(Color::BLUE),
                Op::End
            ]
        );
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut t = RecordingTransport::new();
        t.fill_rect(Rect::new(158, 126, 4, 4), Color::GREEN);
        let windows = t.windows();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].0, (158, 159, 126, 127));
        assert_eq!(windows[0].1.len(), 4);
        assert!(t.balanced());
    }

    #[test]
    fn test_fill_rect_offscreen_is_noop() {
        let mut t = RecordingTransport::new();
        t.fill_rect(Rect::new(200, 0, 4, 4), Color::GREEN);
        assert!(t.ops.is_empty());
    }
}
