//! Character grid
//!
//! The screen doubles as a 20 x 16 grid of 8 x 8 character cells. This
//! module only tracks cell contents and the write cursor; drawing happens
//! in [`Display`](super::Display).

use super::color::Color;

/// Characters per row
pub const TEXT_COLS: usize = 20;

/// Character rows
pub const TEXT_ROWS: usize = 16;

/// Text errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextError {
    /// Cell coordinate outside the grid
    OutOfBounds,
}

/// One character cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cell {
    /// Character byte
    pub ch: u8,
    /// Foreground color
    pub color: Color,
    /// Cell has been written since the last clear
    pub set: bool,
}

/// Result of advancing the cursor for one character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Placement {
    /// Write the character at this cell
    Write { x: usize, y: usize },
    /// Line feed consumed, nothing to draw
    NewLine,
    /// Grid is full; nothing written, cursor unchanged
    Overflow,
}

/// Character grid state
///
/// Cursor `x` stays in `0..=TEXT_COLS` and `y` in `0..=TEXT_ROWS`;
/// `y == TEXT_ROWS` means the grid is full.
#[derive(Debug, Clone)]
pub struct TextGrid {
    cells: [[Cell; TEXT_COLS]; TEXT_ROWS],
    cursor_x: usize,
    cursor_y: usize,
}

impl Default for TextGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl TextGrid {
    /// Create an empty grid with the cursor at the top-left
    pub const fn new() -> Self {
        Self {
            cells: [[Cell {
                ch: 0,
                color: Color::BLACK,
                set: false,
            }; TEXT_COLS]; TEXT_ROWS],
            cursor_x: 0,
            cursor_y: 0,
        }
    }

    /// Reset every cell and the cursor
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Current cursor `(x, y)`
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_x, self.cursor_y)
    }

    /// Move the cursor
    pub fn set_cursor(&mut self, x: usize, y: usize) -> Result<(), TextError> {
        if x > TEXT_COLS || y > TEXT_ROWS {
            return Err(TextError::OutOfBounds);
        }
        self.cursor_x = x;
        self.cursor_y = y;
        Ok(())
    }

    /// Check if further characters would overflow
    pub fn is_full(&self) -> bool {
        self.cursor_y >= TEXT_ROWS
    }

    /// Advance the cursor for `ch`
    ///
    /// A line feed moves to the start of the next row. Any other character
    /// is placed at the cursor, which then moves right and wraps after the
    /// last column.
    pub fn advance(&mut self, ch: u8) -> Placement {
        if self.is_full() {
            return Placement::Overflow;
        }

        if ch == b'\n' {
            self.cursor_x = 0;
            self.cursor_y += 1;
            return Placement::NewLine;
        }

        // A cursor parked past the last column wraps before placing
        if self.cursor_x >= TEXT_COLS {
            if self.cursor_y + 1 >= TEXT_ROWS {
                return Placement::Overflow;
            }
            self.cursor_x = 0;
            self.cursor_y += 1;
        }

        let (x, y) = (self.cursor_x, self.cursor_y);
        self.cursor_x += 1;
        if self.cursor_x >= TEXT_COLS {
            self.cursor_x = 0;
            self.cursor_y += 1;
        }
        Placement::Write { x, y }
    }

    /// Store a character in a cell
    pub fn set(&mut self, x: usize, y: usize, ch: u8, color: Color) -> Result<(), TextError> {
        let cell = self
            .cells
            .get_mut(y)
            .and_then(|row| row.get_mut(x))
            .ok_or(TextError::OutOfBounds)?;
        *cell = Cell {
            ch,
            color,
            set: true,
        };
        Ok(())
    }

    /// Read a cell
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.cells.get(y).and_then(|row| row.get(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_places_left_to_right() {
        let mut grid = TextGrid::new();
        assert_eq!(grid.advance(b'a'), Placement::Write { x: 0, y: 0 });
        assert_eq!(grid.advance(b'b'), Placement::Write { x: 1, y: 0 });
        assert_eq!(grid.cursor(), (2, 0));
    }

    #[test]
    fn test_wraps_after_last_column() {
        let mut grid = TextGrid::new();
        for _ in 0..TEXT_COLS - 1 {
            grid.advance(b'x');
        }
        assert_eq!(
            grid.advance(b'x'),
            Placement::Write {
                x: TEXT_COLS - 1,
                y: 0
            }
        );
        assert_eq!(grid.cursor(), (0, 1));
        assert_eq!(grid.advance(b'x'), Placement::Write { x: 0, y: 1 });
    }

    #[test]
    fn test_newline() {
        let mut grid = TextGrid::new();
        grid.advance(b'a');
        assert_eq!(grid.advance(b'\n'), Placement::NewLine);
        assert_eq!(grid.cursor(), (0, 1));
    }

    #[test]
    fn test_full_grid_overflows() {
        let mut grid = TextGrid::new();
        for _ in 0..TEXT_COLS * TEXT_ROWS {
            assert!(matches!(grid.advance(b'x'), Placement::Write { .. }));
        }
        assert!(grid.is_full());
        assert_eq!(grid.cursor(), (0, TEXT_ROWS));
        assert_eq!(grid.advance(b'x'), Placement::Overflow);
        assert_eq!(grid.advance(b'\n'), Placement::Overflow);
        assert_eq!(grid.cursor(), (0, TEXT_ROWS));
    }

    #[test]
    fn test_newline_into_last_row_boundary() {
        let mut grid = TextGrid::new();
        for _ in 0..TEXT_ROWS {
            assert_eq!(grid.advance(b'\n'), Placement::NewLine);
        }
        assert!(grid.is_full());
        assert_eq!(grid.advance(b'\n'), Placement::Overflow);
    }

    #[test]
    fn test_set_and_clear() {
        let mut grid = TextGrid::new();
        grid.set(3, 4, b'Q', Color::RED).unwrap();
        let cell = grid.cell(3, 4).unwrap();
        assert_eq!(cell.ch, b'Q');
        assert!(cell.set);

        assert_eq!(grid.set(TEXT_COLS, 0, b'Q', Color::RED), Err(TextError::OutOfBounds));
        assert_eq!(grid.set(0, TEXT_ROWS, b'Q', Color::RED), Err(TextError::OutOfBounds));

        grid.advance(b'a');
        grid.clear();
        assert!(!grid.cell(3, 4).unwrap().set);
        assert_eq!(grid.cursor(), (0, 0));
    }

    #[test]
    fn test_cursor_past_last_column_wraps() {
        let mut grid = TextGrid::new();
        grid.set_cursor(TEXT_COLS, 0).unwrap();
        assert_eq!(grid.advance(b'Z'), Placement::Write { x: 0, y: 1 });
        assert_eq!(grid.cursor(), (1, 1));

        grid.set_cursor(TEXT_COLS, TEXT_ROWS - 1).unwrap();
        assert_eq!(grid.advance(b'Z'), Placement::Overflow);
        assert_eq!(grid.cursor(), (TEXT_COLS, TEXT_ROWS - 1));
        // A line feed still moves on to the full state
        assert_eq!(grid.advance(b'\n'), Placement::NewLine);
        assert!(grid.is_full());
    }

    #[test]
    fn test_set_cursor_bounds() {
        let mut grid = TextGrid::new();
        assert!(grid.set_cursor(TEXT_COLS, TEXT_ROWS).is_ok());
        assert_eq!(grid.set_cursor(TEXT_COLS + 1, 0), Err(TextError::OutOfBounds));
    }
}
