//! 8x8 glyph table
//!
//! The text grid needs one 8x8 bitmap per character byte. The table is
//! rasterised once from embedded-graphics' 5x8 ASCII font, drawn one pixel
//! in from the left edge so neighbouring cells keep a gap.

use embedded_graphics::{
    mono_font::{ascii::FONT_5X8, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use sprig_core::traits::{GlyphSource, GLYPH_SIZE};

/// Character codes covered by the table (7-bit ASCII)
const GLYPH_COUNT: usize = 128;

/// Left margin of each glyph inside its cell
const GLYPH_X_OFFSET: i32 = 1;

/// Rasterised ASCII glyphs
///
/// Space, control codes and bytes above 0x7F render blank.
pub struct Font8x8 {
    glyphs: [[u8; GLYPH_SIZE]; GLYPH_COUNT],
}

impl Default for Font8x8 {
    fn default() -> Self {
        Self::new()
    }
}

impl Font8x8 {
    /// Rasterise the table
    pub fn new() -> Self {
        let style = MonoTextStyle::new(&FONT_5X8, BinaryColor::On);
        let mut glyphs = [[0u8; GLYPH_SIZE]; GLYPH_COUNT];

        for (code, glyph) in glyphs.iter_mut().enumerate() {
            let ch = code as u8;
            if !ch.is_ascii_graphic() {
                continue;
            }

            let mut utf8 = [0u8; 4];
            let text = char::from(ch).encode_utf8(&mut utf8);
            let mut canvas = GlyphCanvas::default();
            // Drawing into the canvas cannot fail
            let _ = Text::with_baseline(text, Point::new(GLYPH_X_OFFSET, 0), style, Baseline::Top)
                .draw(&mut canvas);
            *glyph = canvas.rows;
        }

        Self { glyphs }
    }
}

impl GlyphSource for Font8x8 {
    fn glyph(&self, ch: u8) -> [u8; GLYPH_SIZE] {
        self.glyphs
            .get(ch as usize)
            .copied()
            .unwrap_or([0; GLYPH_SIZE])
    }
}

/// One-cell draw target packing pixels into row bytes (bit i = column i)
#[derive(Default)]
struct GlyphCanvas {
    rows: [u8; GLYPH_SIZE],
}

impl DrawTarget for GlyphCanvas {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            let (Ok(col), Ok(row)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if col >= GLYPH_SIZE || row >= GLYPH_SIZE {
                continue;
            }
            let mask = 1u8 << col;
            if color.is_on() {
                self.rows[row] |= mask;
            } else {
                self.rows[row] &= !mask;
            }
        }
        Ok(())
    }
}

impl OriginDimensions for GlyphCanvas {
    fn size(&self) -> Size {
        Size::new(GLYPH_SIZE as u32, GLYPH_SIZE as u32)
    }
}
