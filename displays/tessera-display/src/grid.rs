//! Character cell grid
//!
//! Backing store for the terminal: the visible lines as colored cells, so
//! the view can be redrawn after a scroll without reading the display back.

use embedded_graphics::primitives::Rectangle;
use heapless::Vec;
use tessera_font::Font;

use crate::error::WidgetError;
use crate::raster::ColorPair;

/// Default grid capacity in rows
pub const DEFAULT_ROWS: usize = 16;

/// Default grid capacity in cells per row
pub const DEFAULT_COLS: usize = 64;

/// One drawn character and the colors it was drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cell {
    /// Character code
    pub code: u8,
    /// Colors at the time it was printed
    pub colors: ColorPair,
}

/// Fixed-capacity grid of visible lines
///
/// Only the first `active` rows are used; the rest of the capacity is idle.
#[derive(Debug, Clone)]
pub struct Grid<const ROWS: usize = DEFAULT_ROWS, const COLS: usize = DEFAULT_COLS> {
    lines: [Vec<Cell, COLS>; ROWS],
    active: usize,
}

impl<const ROWS: usize, const COLS: usize> Default for Grid<ROWS, COLS> {
    fn default() -> Self {
        Self::new(ROWS)
    }
}

impl<const ROWS: usize, const COLS: usize> Grid<ROWS, COLS> {
    /// Create an empty grid using `rows` rows (clamped to capacity)
    pub fn new(rows: usize) -> Self {
        Self {
            lines: core::array::from_fn(|_| Vec::new()),
            active: rows.min(ROWS),
        }
    }

    /// Number of rows in use
    pub const fn rows(&self) -> usize {
        self.active
    }

    /// Maximum cells per row
    pub const fn cols(&self) -> usize {
        COLS
    }

    /// Clear every row
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
    }

    /// Append a cell to a row
    ///
    /// Returns false if the row is full or out of range.
    pub fn push(&mut self, row: usize, cell: Cell) -> bool {
        if row >= self.active {
            return false;
        }
        self.lines[row].push(cell).is_ok()
    }

    /// Check if a row has no room for another cell
    pub fn is_row_full(&self, row: usize) -> bool {
        self.lines.get(row).map_or(true, |line| line.is_full())
    }

    /// Cells of a row (empty if out of range)
    pub fn row(&self, row: usize) -> &[Cell] {
        if row < self.active {
            &self.lines[row]
        } else {
            &[]
        }
    }

    /// Character codes of a row
    pub fn row_text(&self, row: usize) -> impl Iterator<Item = u8> + '_ {
        self.row(row).iter().map(|cell| cell.code)
    }

    /// Discard the top row and move every other row up by one
    ///
    /// The bottom row comes back empty.
    pub fn scroll_up(&mut self) {
        if self.active == 0 {
            return;
        }
        self.lines[..self.active].rotate_left(1);
        self.lines[self.active - 1].clear();
    }
}

/// Rows and nominal columns of character cells that fit `area`
///
/// Columns are the width over the font's average advance. Fails with
/// [`WidgetError::TooSmall`] if not even one line of the widest glyph fits.
pub(crate) fn cell_grid(area: &Rectangle, font: &Font<'_>) -> Result<(u32, u32), WidgetError> {
    let rows = area.size.height / font.line_height();
    let average = font.average_advance();

    if rows == 0 || average == 0 || area.size.width < font.max_advance() {
        #[cfg(feature = "defmt")]
        defmt::warn!("widget: {} too small for one character cell", area);
        return Err(WidgetError::TooSmall);
    }

    Ok((rows, area.size.width / average))
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::*;
    use tessera_font::probe::{PROBE_ADVANCE, PROBE_FONT, PROBE_LINE_HEIGHT};

    fn cell(code: u8) -> Cell {
        Cell {
            code,
            colors: ColorPair::default(),
        }
    }

    fn text<const R: usize, const C: usize>(grid: &Grid<R, C>, row: usize) -> std::vec::Vec<u8> {
        grid.row_text(row).collect()
    }

    #[test]
    fn test_grid_push_and_read() {
        let mut grid: Grid<4, 8> = Grid::new(3);
        assert!(grid.push(0, cell(b'a')));
        assert!(grid.push(0, cell(b'b')));
        assert!(grid.push(2, cell(b'z')));

        assert_eq!(text(&grid, 0), b"ab");
        assert_eq!(text(&grid, 2), b"z");
        // Row beyond the active rows
        assert!(!grid.push(3, cell(b'x')));
        assert!(grid.row(3).is_empty());
    }

    #[test]
    fn test_grid_row_capacity() {
        let mut grid: Grid<1, 2> = Grid::new(1);
        assert!(grid.push(0, cell(b'a')));
        assert!(!grid.is_row_full(0));
        assert!(grid.push(0, cell(b'b')));
        assert!(grid.is_row_full(0));
        assert!(!grid.push(0, cell(b'c')));
    }

    #[test]
    fn test_grid_rows_clamped() {
        let grid: Grid<4, 8> = Grid::new(10);
        assert_eq!(grid.rows(), 4);
    }

    #[test]
    fn test_scroll_up() {
        let mut grid: Grid<4, 8> = Grid::new(3);
        grid.push(0, cell(b'1'));
        grid.push(1, cell(b'2'));
        grid.push(2, cell(b'3'));

        grid.scroll_up();

        assert_eq!(text(&grid, 0), b"2");
        assert_eq!(text(&grid, 1), b"3");
        assert!(grid.row(2).is_empty());
    }

    #[test]
    fn test_clear() {
        let mut grid: Grid<2, 4> = Grid::new(2);
        grid.push(0, cell(b'a'));
        grid.push(1, cell(b'b'));
        grid.clear();
        assert!(grid.row(0).is_empty());
        assert!(grid.row(1).is_empty());
    }

    #[test]
    fn test_cell_grid() {
        let rect = |w, h| Rectangle::new(Point::zero(), Size::new(w, h));

        assert_eq!(
            cell_grid(&rect(10 * PROBE_ADVANCE + 3, 4 * PROBE_LINE_HEIGHT), &PROBE_FONT),
            Ok((4, 10))
        );
        assert_eq!(
            cell_grid(&rect(100, PROBE_LINE_HEIGHT - 1), &PROBE_FONT),
            Err(WidgetError::TooSmall)
        );
        assert_eq!(
            cell_grid(&rect(PROBE_ADVANCE - 1, 100), &PROBE_FONT),
            Err(WidgetError::TooSmall)
        );
    }
}
