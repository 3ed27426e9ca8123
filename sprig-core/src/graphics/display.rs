//! Display context
//!
//! Owns everything that draws to the panel: the transport, the glyph
//! table, the shared background color and the character grid. The control
//! loop holds one of these instead of process-wide state.
//!
//! Text and sprites are not composited with each other; whichever renders
//! last owns the pixels.

use super::color::{Color, Rgb8Policy};
use super::geometry::{Rect, SCREEN};
use super::registry::SpriteRegistry;
use super::sprite::SpriteArena;
use super::text::{Placement, TextError, TextGrid, TEXT_COLS, TEXT_ROWS};
use crate::config::DisplayConfig;
use crate::traits::{DisplayExt, DisplayTransport, GlyphSource, GLYPH_SIZE};

/// Panel drawing context
pub struct Display<T, G> {
    transport: T,
    glyphs: G,
    background: Color,
    rgb8_policy: Rgb8Policy,
    text: TextGrid,
}

impl<T: DisplayTransport, G: GlyphSource> Display<T, G> {
    /// Create a display context
    pub fn new(transport: T, glyphs: G, config: &DisplayConfig) -> Self {
        Self {
            transport,
            glyphs,
            background: config.background,
            rgb8_policy: config.rgb8_policy,
            text: TextGrid::new(),
        }
    }

    /// Shared background color
    pub fn background(&self) -> Color {
        self.background
    }

    /// Change the background color
    ///
    /// Affects subsequent renders only; nothing is redrawn.
    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Build a color from 8-bit channels using the configured policy
    pub fn rgb(&self, r: u8, g: u8, b: u8) -> Color {
        Color::from_rgb8_with(r, g, b, self.rgb8_policy)
    }

    /// Character grid state
    pub fn text(&self) -> &TextGrid {
        &self.text
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the underlying transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Paint the whole screen with the background color
    pub fn fill_screen(&mut self) {
        let background = self.background;
        self.transport.fill_rect(SCREEN, background);
    }

    /// Composite and draw every sprite in `registry`
    pub fn render_sprites(&mut self, registry: &SpriteRegistry, arena: &SpriteArena) {
        registry.render_all(arena, self.background, &mut self.transport);
    }

    /// Clear the character grid and redraw every cell as background
    pub fn clear_text(&mut self) {
        self.text.clear();
        self.render_all_text();
    }

    /// Append a string at the cursor
    ///
    /// Stops at the first character that does not fit and returns true
    /// (overflowed). Characters written before that stay on screen.
    pub fn append_string(&mut self, s: &str, color: Color) -> bool {
        s.bytes().any(|ch| self.append_character(ch, color))
    }

    /// Append one character at the cursor
    ///
    /// Returns true if the grid is full and the character was dropped.
    pub fn append_character(&mut self, ch: u8, color: Color) -> bool {
        match self.text.advance(ch) {
            Placement::Write { x, y } => {
                let written = self.set_character(ch, color, x, y);
                debug_assert!(written.is_ok(), "cursor placed outside the grid");
                written.is_err()
            }
            Placement::NewLine => false,
            Placement::Overflow => true,
        }
    }

    /// Write a character to a cell and redraw just that cell
    pub fn set_character(
        &mut self,
        ch: u8,
        color: Color,
        x: usize,
        y: usize,
    ) -> Result<(), TextError> {
        self.text.set(x, y, ch, color)?;
        self.render_char(x, y);
        Ok(())
    }

    /// Redraw one cell from the grid
    fn render_char(&mut self, x: usize, y: usize) {
        let Some(cell) = self.text.cell(x, y).copied() else {
            return;
        };
        let bitmap = self.glyphs.glyph(cell.ch);
        let area = Rect::new(
            (x * GLYPH_SIZE) as i16,
            (y * GLYPH_SIZE) as i16,
            GLYPH_SIZE as u16,
            GLYPH_SIZE as u16,
        );

        let background = self.background;
        let mut window = self.transport.window(area);
        for row in bitmap {
            for bit in 0..GLYPH_SIZE {
                let on = (row >> bit) & 1 == 1;
                window.push(if on && cell.set { cell.color } else { background });
            }
        }
    }

    /// Redraw every cell
    fn render_all_text(&mut self) {
        for y in 0..TEXT_ROWS {
            for x in 0..TEXT_COLS {
                self.render_char(x, y);
            }
        }
    }

    /// Release the transport and glyph table
    pub fn release(self) -> (T, G) {
        (self.transport, self.glyphs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::Sprite;
    use crate::traits::display::mock::{Op, RecordingTransport};

    /// Glyph table where every character is a single top-left dot
    struct DotGlyphs;

    impl GlyphSource for DotGlyphs {
        fn glyph(&self, ch: u8) -> [u8; GLYPH_SIZE] {
            if ch == b' ' {
                [0; GLYPH_SIZE]
            } else {
                [0b0000_0001, 0, 0, 0, 0, 0, 0, 0b1000_0000]
            }
        }
    }

    fn display() -> Display<RecordingTransport, DotGlyphs> {
        Display::new(RecordingTransport::new(), DotGlyphs, &DisplayConfig::default())
    }

    #[test]
    fn test_set_character_renders_one_cell() {
        let mut d = display();
        d.set_character(b'A', Color::WHITE, 2, 3).unwrap();

        let windows = d.transport().windows();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].0, (16, 23, 24, 31));
        let pixels = &windows[0].1;
        assert_eq!(pixels.len(), 64);
        assert_eq!(pixels[0], Color::WHITE);
        assert_eq!(pixels[1], Color::BLACK);
        // Bit 7 of the last row is its right-most pixel
        assert_eq!(pixels[63], Color::WHITE);
        assert_eq!(pixels.iter().filter(|&&c| c == Color::WHITE).count(), 2);
        assert!(d.transport().balanced());
    }

    #[test]
    fn test_set_character_out_of_bounds() {
        let mut d = display();
        assert_eq!(
            d.set_character(b'A', Color::WHITE, TEXT_COLS, 0),
            Err(TextError::OutOfBounds)
        );
        assert!(d.transport().ops.is_empty());
    }

    #[test]
    fn test_append_string_writes_cells() {
        let mut d = display();
        assert!(!d.append_string("hi\nyo", Color::RED));
        assert_eq!(d.text().cell(0, 0).unwrap().ch, b'h');
        assert_eq!(d.text().cell(1, 0).unwrap().ch, b'i');
        assert_eq!(d.text().cell(0, 1).unwrap().ch, b'y');
        assert_eq!(d.text().cursor(), (2, 1));
        assert_eq!(d.transport().windows().len(), 4);
    }

    #[test]
    fn test_exact_fill_does_not_overflow() {
        let mut d = display();
        let line = "abcdefghijklmnopqrst";
        for _ in 0..TEXT_ROWS {
            assert!(!d.append_string(line, Color::RED));
        }
        assert!(d.text().is_full());
        assert!(d.append_character(b'!', Color::RED));
    }

    #[test]
    fn test_overflow_keeps_written_characters() {
        let mut d = display();
        let mut long = std::string::String::new();
        for i in 0..(TEXT_COLS * TEXT_ROWS + 5) {
            long.push((b'a' + (i % 26) as u8) as char);
        }
        assert!(d.append_string(&long, Color::GREEN));

        let last = d.text().cell(TEXT_COLS - 1, TEXT_ROWS - 1).unwrap();
        assert!(last.set);
        assert_eq!(last.ch, b'a' + ((TEXT_COLS * TEXT_ROWS - 1) % 26) as u8);
        assert_eq!(d.transport().windows().len(), TEXT_COLS * TEXT_ROWS);
    }

    #[test]
    fn test_append_after_cursor_parked_at_row_end() {
        let mut d = display();
        d.text.set_cursor(TEXT_COLS, 0).unwrap();

        assert!(!d.append_character(b'Z', Color::RED));
        let cell = d.text().cell(0, 1).unwrap();
        assert!(cell.set);
        assert_eq!(cell.ch, b'Z');
        assert_eq!(d.transport().windows().len(), 1);
        assert_eq!(d.transport().windows()[0].0, (0, 7, 8, 15));
    }

    #[test]
    fn test_clear_text_redraws_all_cells() {
        let mut d = display();
        d.append_string("abc", Color::RED);
        d.transport_mut().ops.clear();

        d.clear_text();
        let windows = d.transport().windows();
        assert_eq!(windows.len(), TEXT_COLS * TEXT_ROWS);
        assert!(windows
            .iter()
            .all(|(_, pixels)| pixels.iter().all(|&c| c == Color::BLACK)));
        assert_eq!(d.text().cursor(), (0, 0));
    }

    #[test]
    fn test_background_drives_text_and_sprites() {
        let mut d = display();
        let blue = Color::BLUE;
        d.set_background(blue);
        d.set_character(b'A', Color::WHITE, 0, 0).unwrap();
        assert_eq!(d.transport().windows()[0].1[1], blue);

        let mut arena = SpriteArena::new();
        let low = arena.insert(Sprite::new(0, 0, 0, 1, 1, Color::RED).unwrap()).unwrap();
        let high = arena.insert(Sprite::new(0, 0, 1, 1, 1, blue).unwrap()).unwrap();
        let mut reg = SpriteRegistry::new();
        reg.register(low).unwrap();
        reg.register(high).unwrap();

        d.transport_mut().ops.clear();
        d.render_sprites(&reg, &arena);
        let windows = d.transport().windows();
        assert_eq!(windows[1].1, vec![Color::RED]);
    }

    #[test]
    fn test_not_ready_transport_absorbs_calls() {
        let mut transport = RecordingTransport::new();
        transport.ready = false;
        let mut d = Display::new(transport, DotGlyphs, &DisplayConfig::default());

        d.clear_text();
        assert!(!d.append_string("hello", Color::RED));
        assert!(d.transport().ops.is_empty());
        // State is still tracked for later redraws
        assert_eq!(d.text().cell(0, 0).unwrap().ch, b'h');
    }

    #[test]
    fn test_fill_screen() {
        let mut d = display();
        d.fill_screen();
        assert_eq!(d.transport().ops[0], Op::Begin(0, 159, 0, 127));
        assert_eq!(d.transport().windows()[0].1.len(), 160 * 128);
    }

    #[test]
    fn test_rgb_uses_policy() {
        let config = DisplayConfig {
            rgb8_policy: Rgb8Policy::Compatible,
            ..DisplayConfig::default()
        };
        let d = Display::new(RecordingTransport::new(), DotGlyphs, &config);
        assert_eq!(d.rgb(255, 0, 255).raw(), 0x19E3);
        assert_eq!(display().rgb(255, 0, 255), Color::MAGENTA);
    }
}
