//! Scrolling text terminal
//!
//! A fixed grid of character rows inside a screen rectangle. Text is
//! wrapped at the rectangle width; when a line break happens on the last
//! row, the oldest row is discarded and the remaining rows move up by one.
//!
//! The terminal keeps every visible character in a [`Grid`] and scrolls by
//! redrawing from it, so it works on write-only panels.
//!
//! A break on the last row is held back until something is printed after
//! it. Printing `"done\n"` therefore leaves `done` on screen instead of
//! scrolling it up to make room for an empty line.

use core::fmt;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use tessera_font::Font;

use crate::error::WidgetError;
use crate::grid::{cell_grid, Cell, Grid, DEFAULT_COLS, DEFAULT_ROWS};
use crate::layout::{format_chunks, LineBreaker};
use crate::raster::{draw_glyph, ColorPair, Raster};

/// Cursor position in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    /// Row, 0 at the top
    pub row: u32,
    /// Glyphs already on the row
    ///
    /// Bounded by the grid capacity `COLS`, not by [`Terminal::cols`]: with a
    /// proportional font a row can hold more narrow glyphs than the nominal
    /// column count.
    pub col: u32,
}

/// Scrolling terminal widget
///
/// `ROWS` and `COLS` bound the backing grid; a rectangle holding more rows
/// than `ROWS` is clamped to `ROWS`. A row wraps once it reaches the
/// rectangle width or holds `COLS` glyphs, whichever comes first.
pub struct Terminal<'f, const ROWS: usize = DEFAULT_ROWS, const COLS: usize = DEFAULT_COLS> {
    area: Rectangle,
    font: &'f Font<'f>,
    colors: ColorPair,
    grid: Grid<ROWS, COLS>,
    rows: u32,
    cols: u32,
    cursor: Cursor,
    /// Pen offset from the left edge, in pixels
    pen_x: u32,
    scroll_pending: bool,
}

impl<'f, const ROWS: usize, const COLS: usize> Terminal<'f, ROWS, COLS> {
    /// Create a terminal covering `area`
    ///
    /// Rows are `area.height / line_height`, columns are
    /// `area.width / average_advance`. Fails with [`WidgetError::TooSmall`]
    /// if the rectangle cannot hold a single character cell.
    ///
    /// Nothing is drawn until the first `print` or `clear`.
    pub fn create(area: Rectangle, font: &'f Font<'f>, colors: ColorPair) -> Result<Self, WidgetError> {
        let (rows, cols) = cell_grid(&area, font)?;

        if ROWS == 0 || COLS == 0 {
            return Err(WidgetError::TooSmall);
        }

        let rows = if rows as usize > ROWS {
            #[cfg(feature = "defmt")]
            defmt::warn!("terminal: {} rows clamped to {}", rows, ROWS);
            ROWS as u32
        } else {
            rows
        };
        let cols = cols.min(COLS as u32);

        #[cfg(feature = "defmt")]
        defmt::debug!("terminal: {}x{} cells at {}", cols, rows, area);

        Ok(Self {
            area,
            font,
            colors,
            grid: Grid::new(rows as usize),
            rows,
            cols,
            cursor: Cursor::default(),
            pen_x: 0,
            scroll_pending: false,
        })
    }

    /// Create a terminal of `rows` text lines and `width` pixels at `origin`
    pub fn with_rows(
        origin: Point,
        rows: u32,
        width: u32,
        font: &'f Font<'f>,
        colors: ColorPair,
    ) -> Result<Self, WidgetError> {
        let area = Rectangle::new(origin, Size::new(width, font.text_height(rows)));
        Self::create(area, font, colors)
    }

    /// Screen rectangle
    pub fn area(&self) -> Rectangle {
        self.area
    }

    /// Visible rows
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Nominal columns (rectangle width over the average advance)
    ///
    /// For sizing only. Wrapping follows pixel width and grid capacity, so
    /// [`Cursor::col`] may exceed this with a proportional font.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Current cursor
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Colors used for subsequent text
    pub fn colors(&self) -> ColorPair {
        self.colors
    }

    /// Characters currently shown on `row`
    pub fn row_cells(&self, row: u32) -> &[Cell] {
        self.grid.row(row as usize)
    }

    /// Character codes currently shown on `row`
    pub fn row_text(&self, row: u32) -> impl Iterator<Item = u8> + '_ {
        self.grid.row_text(row as usize)
    }

    /// Set colors for subsequent prints
    ///
    /// Text already on screen keeps its colors, including across scrolls.
    pub fn set_color(&mut self, fg: Rgb565, bg: Rgb565) {
        self.colors = ColorPair::new(fg, bg);
    }

    /// Print text at the cursor
    ///
    /// Lines wrap at the rectangle width or after `COLS` glyphs, breaking at
    /// the last space when there is one. Codes the font does not cover are
    /// skipped.
    pub fn print<D>(&mut self, target: &mut D, text: impl AsRef<[u8]>) -> Result<(), D::Error>
    where
        D: Raster,
    {
        let area = self.area;
        let mut target = target.clipped(&area);

        let lines = LineBreaker::new(self.font, text.as_ref(), self.pen_x, Some(area.size.width))
            .with_cell_limit(COLS, self.cursor.col as usize);
        for line in lines {
            for &code in line.text {
                self.put(&mut target, code)?;
            }
            if line.end.is_break() {
                self.newline(&mut target)?;
            }
        }

        Ok(())
    }

    /// Print formatted text at the cursor
    ///
    /// # Example
    /// ```ignore
    /// terminal.print_fmt(&mut display, format_args!("\nTransfering {} byte(s)...", n))?;
    /// ```
    pub fn print_fmt<D>(&mut self, target: &mut D, args: fmt::Arguments<'_>) -> Result<(), D::Error>
    where
        D: Raster,
    {
        format_chunks(args, |chunk| self.print(target, chunk))
    }

    /// Fill the rectangle with the background color and home the cursor
    pub fn clear<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: Raster,
    {
        target.fill_solid(&self.area, self.colors.bg)?;
        self.grid.clear();
        self.cursor = Cursor::default();
        self.pen_x = 0;
        self.scroll_pending = false;
        Ok(())
    }

    fn put<D>(&mut self, target: &mut D, code: u8) -> Result<(), D::Error>
    where
        D: Raster,
    {
        if !self.font.contains(code) {
            return Ok(());
        }

        if self.scroll_pending {
            self.scroll(target)?;
        }

        let baseline = self.row_origin(self.cursor.row)
            + Point::new(self.pen_x as i32, self.font.ascent() as i32);
        let advance = draw_glyph(target, self.font, code, baseline, self.colors)?;

        self.grid.push(
            self.cursor.row as usize,
            Cell {
                code,
                colors: self.colors,
            },
        );
        self.pen_x += advance;
        self.cursor.col += 1;
        Ok(())
    }

    fn newline<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: Raster,
    {
        if self.scroll_pending {
            self.scroll(target)?;
        }

        self.pen_x = 0;
        self.cursor.col = 0;
        if self.cursor.row + 1 < self.rows {
            self.cursor.row += 1;
        } else {
            self.scroll_pending = true;
        }
        Ok(())
    }

    fn scroll<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: Raster,
    {
        #[cfg(feature = "defmt")]
        defmt::debug!("terminal: scroll");

        self.scroll_pending = false;
        self.grid.scroll_up();
        self.redraw(target)
    }

    /// Repaint every row from the grid
    fn redraw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: Raster,
    {
        let line_height = self.font.line_height();
        let ascent = Point::new(0, self.font.ascent() as i32);

        for row in 0..self.rows {
            let origin = self.row_origin(row);
            let band = Rectangle::new(origin, Size::new(self.area.size.width, line_height));
            target.fill_solid(&band, self.colors.bg)?;

            let mut x = 0;
            for cell in self.grid.row(row as usize) {
                let baseline = origin + ascent + Point::new(x as i32, 0);
                x += draw_glyph(target, self.font, cell.code, baseline, cell.colors)?;
            }
        }

        Ok(())
    }

    fn row_origin(&self, row: u32) -> Point {
        self.area.top_left + Point::new(0, (row * self.font.line_height()) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Framebuffer;
    use proptest::prelude::*;
    use tessera_font::probe::{PROBE_ADVANCE, PROBE_FONT, PROBE_LINE_HEIGHT};

    const COLORS: ColorPair = ColorPair::new(Rgb565::WHITE, Rgb565::BLACK);

    fn area(x: i32, y: i32, cells: u32, rows: u32) -> Rectangle {
        Rectangle::new(
            Point::new(x, y),
            Size::new(cells * PROBE_ADVANCE, rows * PROBE_LINE_HEIGHT),
        )
    }

    fn screen_row<const R: usize, const C: usize>(
        fb: &Framebuffer,
        term: &Terminal<'_, R, C>,
        row: u32,
    ) -> String {
        let origin = term.area().top_left + Point::new(0, (row * PROBE_LINE_HEIGHT) as i32);
        fb.probe_text(origin, Rgb565::WHITE)
    }

    fn grid_row<const R: usize, const C: usize>(term: &Terminal<'_, R, C>, row: u32) -> String {
        term.row_text(row).map(char::from).collect()
    }

    #[test]
    fn test_create_sizes_grid() {
        let term: Terminal<'_> = Terminal::create(area(0, 0, 20, 9), &PROBE_FONT, COLORS).unwrap();
        assert_eq!(term.rows(), 9);
        assert_eq!(term.cols(), 20);
        assert_eq!(term.cursor(), Cursor::default());
    }

    #[test]
    fn test_create_too_small() {
        let short = Rectangle::new(Point::zero(), Size::new(100, PROBE_LINE_HEIGHT - 1));
        let narrow = Rectangle::new(Point::zero(), Size::new(PROBE_ADVANCE - 1, 100));

        assert_eq!(
            Terminal::<'_, 16, 64>::create(short, &PROBE_FONT, COLORS).err(),
            Some(WidgetError::TooSmall)
        );
        assert_eq!(
            Terminal::<'_, 16, 64>::create(narrow, &PROBE_FONT, COLORS).err(),
            Some(WidgetError::TooSmall)
        );
        assert_eq!(
            Terminal::<'_, 0, 8>::create(area(0, 0, 4, 4), &PROBE_FONT, COLORS).err(),
            Some(WidgetError::TooSmall)
        );
    }

    #[test]
    fn test_rows_clamped_to_capacity() {
        let term = Terminal::<'_, 4, 32>::create(area(0, 0, 10, 9), &PROBE_FONT, COLORS).unwrap();
        assert_eq!(term.rows(), 4);
    }

    #[test]
    fn test_with_rows() {
        let term: Terminal<'_> =
            Terminal::with_rows(Point::new(10, 250), 9, 300, &PROBE_FONT, COLORS).unwrap();
        assert_eq!(term.rows(), 9);
        assert_eq!(term.area().size, Size::new(300, 9 * PROBE_LINE_HEIGHT));
    }

    #[test]
    fn test_scroll_keeps_last_rows() {
        let mut fb = Framebuffer::new(200, 120, Rgb565::BLACK);
        let mut term: Terminal<'_> = Terminal::create(area(5, 10, 20, 9), &PROBE_FONT, COLORS).unwrap();

        let text = (1..=12).map(|n| format!("L{}", n)).collect::<std::vec::Vec<_>>().join("\n");
        term.print(&mut fb, &text).unwrap();

        for row in 0..9 {
            let expected = format!("L{}", row + 4);
            assert_eq!(screen_row(&fb, &term, row), expected);
            assert_eq!(grid_row(&term, row), expected);
        }
    }

    #[test]
    fn test_trailing_newline_defers_scroll() {
        let mut fb = Framebuffer::new(100, 40, Rgb565::BLACK);
        let mut term: Terminal<'_> = Terminal::create(area(0, 0, 8, 3), &PROBE_FONT, COLORS).unwrap();

        term.print(&mut fb, "a\nb\nc\n").unwrap();
        assert_eq!(screen_row(&fb, &term, 0), "a");
        assert_eq!(screen_row(&fb, &term, 2), "c");

        term.print(&mut fb, "d").unwrap();
        assert_eq!(screen_row(&fb, &term, 0), "b");
        assert_eq!(screen_row(&fb, &term, 1), "c");
        assert_eq!(screen_row(&fb, &term, 2), "d");
    }

    #[test]
    fn test_blank_lines_scroll() {
        let mut fb = Framebuffer::new(100, 40, Rgb565::BLACK);
        let mut term: Terminal<'_> = Terminal::create(area(0, 0, 8, 3), &PROBE_FONT, COLORS).unwrap();

        term.print(&mut fb, "a\nb\nc\n\nd").unwrap();
        assert_eq!(screen_row(&fb, &term, 0), "c");
        assert_eq!(screen_row(&fb, &term, 1), "");
        assert_eq!(screen_row(&fb, &term, 2), "d");
    }

    #[test]
    fn test_wraps_at_width() {
        let mut fb = Framebuffer::new(100, 40, Rgb565::BLACK);
        let mut term: Terminal<'_> = Terminal::create(area(0, 0, 3, 3), &PROBE_FONT, COLORS).unwrap();

        term.print(&mut fb, "abcdef").unwrap();
        assert_eq!(screen_row(&fb, &term, 0), "abc");
        assert_eq!(screen_row(&fb, &term, 1), "def");
        assert_eq!(term.cursor(), Cursor { row: 1, col: 3 });
    }

    #[test]
    fn test_print_continues_line() {
        let mut fb = Framebuffer::new(200, 40, Rgb565::BLACK);
        let mut term: Terminal<'_> = Terminal::create(area(0, 0, 20, 3), &PROBE_FONT, COLORS).unwrap();

        term.print(&mut fb, "ab").unwrap();
        term.print(&mut fb, "cd").unwrap();
        assert_eq!(screen_row(&fb, &term, 0), "abcd");
    }

    #[test]
    fn test_no_writes_outside_area() {
        let mut fb = Framebuffer::new(200, 100, Rgb565::MAGENTA);
        let rect = area(20, 20, 6, 3);
        let mut term: Terminal<'_> = Terminal::create(rect, &PROBE_FONT, COLORS).unwrap();

        for n in 0..10 {
            term.print_fmt(&mut fb, format_args!("line {} with words\n", n)).unwrap();
        }
        term.clear(&mut fb).unwrap();
        term.print(&mut fb, "x").unwrap();

        assert_eq!(fb.changed_outside(&rect, Rgb565::MAGENTA), 0);
        assert_eq!(fb.out_of_bounds(), 0);
    }

    #[test]
    fn test_set_color_affects_later_text() {
        let mut fb = Framebuffer::new(100, 40, Rgb565::BLACK);
        let mut term: Terminal<'_> = Terminal::create(area(0, 0, 8, 2), &PROBE_FONT, COLORS).unwrap();

        term.print(&mut fb, "a\nb").unwrap();
        term.set_color(Rgb565::RED, Rgb565::BLACK);
        term.print(&mut fb, "\nc").unwrap();

        // "b" scrolled up to row 0 and keeps its original colors
        assert_eq!(term.row_cells(0)[0].colors.fg, Rgb565::WHITE);
        assert_eq!(term.row_cells(1)[0].colors.fg, Rgb565::RED);
        assert_eq!(fb.probe_text(Point::zero(), Rgb565::WHITE), "b");
        assert_eq!(
            fb.probe_text(Point::new(0, PROBE_LINE_HEIGHT as i32), Rgb565::RED),
            "c"
        );
    }

    #[test]
    fn test_clear_homes_cursor() {
        let mut fb = Framebuffer::new(100, 40, Rgb565::BLACK);
        let mut term: Terminal<'_> = Terminal::create(area(0, 0, 8, 3), &PROBE_FONT, COLORS).unwrap();

        term.print(&mut fb, "a\nb").unwrap();
        term.clear(&mut fb).unwrap();

        assert_eq!(term.cursor(), Cursor::default());
        assert_eq!(fb.count(|c| c != Rgb565::BLACK), 0);
        assert_eq!(grid_row(&term, 0), "");

        term.print(&mut fb, "z").unwrap();
        assert_eq!(screen_row(&fb, &term, 0), "z");
    }

    #[test]
    fn test_uncovered_codes_are_skipped() {
        let mut fb = Framebuffer::new(100, 40, Rgb565::BLACK);
        let mut term: Terminal<'_> = Terminal::create(area(0, 0, 8, 3), &PROBE_FONT, COLORS).unwrap();

        term.print(&mut fb, b"a\x07b\xffc").unwrap();
        assert_eq!(screen_row(&fb, &term, 0), "abc");
        assert_eq!(term.cursor().col, 3);
    }

    #[test]
    fn test_capacity_wrap_breaks_at_space() {
        let mut fb = Framebuffer::new(100, 60, Rgb565::BLACK);
        // Wide enough for ten cells, grid rows hold four
        let mut term = Terminal::<'_, 4, 4>::create(area(0, 0, 10, 4), &PROBE_FONT, COLORS).unwrap();

        term.print(&mut fb, "ab cd ef").unwrap();

        assert_eq!(grid_row(&term, 0), "ab");
        assert_eq!(grid_row(&term, 1), "cd");
        assert_eq!(grid_row(&term, 2), "ef");
        assert_eq!(fb.probe_text(Point::new(0, PROBE_LINE_HEIGHT as i32), Rgb565::WHITE), "cd");
        assert_eq!(term.cursor(), Cursor { row: 2, col: 2 });
    }

    #[test]
    fn test_capacity_wrap_across_prints() {
        let mut fb = Framebuffer::new(100, 60, Rgb565::BLACK);
        let mut term = Terminal::<'_, 4, 4>::create(area(0, 0, 10, 4), &PROBE_FONT, COLORS).unwrap();

        term.print(&mut fb, "abc").unwrap();
        term.print(&mut fb, "de").unwrap();

        assert_eq!(grid_row(&term, 0), "abcd");
        assert_eq!(grid_row(&term, 1), "e");
    }

    proptest! {
        #[test]
        fn prop_shows_last_rows(
            rows in 1u32..8,
            extra in 0usize..20,
            cells in 2u32..8,
            words in prop::collection::vec("[a-z]{1,12}", 28)
        ) {
            let mut fb = Framebuffer::new(100, 100, Rgb565::BLACK);
            let mut term =
                Terminal::<'_, 8, 4>::create(area(0, 0, cells, rows), &PROBE_FONT, COLORS).unwrap();

            let lines = &words[..rows as usize + extra];
            term.print(&mut fb, lines.join("\n")).unwrap();

            // No spaces, so every word hard-breaks into chunks of the row limit
            let chunk = (cells as usize).min(4);
            let expected: std::vec::Vec<String> = lines
                .iter()
                .flat_map(|word| {
                    word.as_bytes()
                        .chunks(chunk)
                        .map(|c| String::from_utf8_lossy(c).into_owned())
                        .collect::<std::vec::Vec<_>>()
                })
                .collect();

            let visible = expected.len().min(rows as usize);
            let first = expected.len() - visible;
            for row in 0..rows {
                let shown = grid_row(&term, row);
                if (row as usize) < visible {
                    prop_assert_eq!(&shown, &expected[first + row as usize]);
                    prop_assert_eq!(&screen_row(&fb, &term, row), &expected[first + row as usize]);
                } else {
                    prop_assert_eq!(shown, "");
                }
                prop_assert!(term.row_cells(row).len() <= 4);
            }
        }
    }
}
