//! Text layout engine
//!
//! Splits a byte string into lines that fit a wrap width, and walks a pen
//! across them calling the rasterizer.
//!
//! # Line breaking
//!
//! - `\n` and `\r` end the current line; the pen returns to the left margin
//!   and moves down one line height.
//! - With a wrap width, a glyph that would start at or past the width, or
//!   end past it, starts a new line instead. The break goes at the last
//!   space or tab of the current line (which is dropped); without one the
//!   word is broken at the overflowing glyph.
//! - A glyph at the start of an empty line is always placed, so a single
//!   glyph wider than the box still makes progress.
//!
//! Layout is byte-oriented: each byte is one character code of the font.

use core::fmt;

use embedded_graphics::prelude::*;
use heapless::Vec;
use tessera_font::Font;

use crate::raster::{draw_glyph, ColorPair, Raster};

/// Buffer size used to resolve `format_args!` before layout
pub const FMT_CAPACITY: usize = 64;

/// How a line ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineEnd {
    /// Explicit `\n` or `\r`
    Newline,
    /// Implicit break inserted to respect the wrap width
    Wrap,
    /// End of the input text; the pen stays on this line
    End,
}

impl LineEnd {
    /// Returns true if the pen moves to the next line after this one
    pub fn is_break(self) -> bool {
        !matches!(self, LineEnd::End)
    }
}

/// One laid-out line of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'t> {
    /// Character codes to draw, without the break character
    pub text: &'t [u8],
    /// Pen offset from the left margin where the line starts
    pub start_x: u32,
    /// How the line ended
    pub end: LineEnd,
}

/// Iterator splitting text into lines
///
/// The first line starts at `start_x` (text already on the pen's line);
/// every following line starts at the margin. The final item always has
/// [`LineEnd::End`], even when it is empty.
#[derive(Debug, Clone)]
pub struct LineBreaker<'t, 'f> {
    font: &'f Font<'f>,
    text: &'t [u8],
    pos: usize,
    x: u32,
    wrap_width: Option<u32>,
    max_cells: Option<usize>,
    cells: usize,
    done: bool,
}

impl<'t, 'f> LineBreaker<'t, 'f> {
    /// Create a line breaker
    ///
    /// - `start_x`: pen offset from the left margin before the first byte
    /// - `wrap_width`: line width in pixels, `None` for no wrapping
    pub fn new(font: &'f Font<'f>, text: &'t [u8], start_x: u32, wrap_width: Option<u32>) -> Self {
        Self {
            font,
            text,
            pos: 0,
            x: start_x,
            wrap_width,
            max_cells: None,
            cells: 0,
            done: false,
        }
    }

    /// Also break lines after `max_cells` glyphs
    ///
    /// `start_cells` is the number of glyphs already on the pen's line.
    /// Codes the font does not cover take no cell. Capacity breaks use the
    /// same whitespace search as width breaks.
    pub fn with_cell_limit(mut self, max_cells: usize, start_cells: usize) -> Self {
        self.max_cells = Some(max_cells);
        self.cells = start_cells;
        self
    }

    /// Pen offset from the margin where the next line will start
    pub fn pen_x(&self) -> u32 {
        self.x
    }

    fn finish(&mut self, start: usize, end: usize, next: usize, start_x: u32, kind: LineEnd) -> Line<'t> {
        self.pos = next;
        self.x = 0;
        self.cells = 0;
        Line {
            text: &self.text[start..end],
            start_x,
            end: kind,
        }
    }
}

fn is_space(code: u8) -> bool {
    code == b' ' || code == b'\t'
}

impl<'t, 'f> Iterator for LineBreaker<'t, 'f> {
    type Item = Line<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let start = self.pos;
        let start_x = self.x;
        let start_cells = self.cells;
        let mut x = start_x;
        let mut cells = start_cells;
        let mut last_space = None;

        for (i, &code) in self.text.iter().enumerate().skip(start) {
            if code == b'\n' || code == b'\r' {
                return Some(self.finish(start, i, i + 1, start_x, LineEnd::Newline));
            }

            let advance = self.font.advance(code);
            let covered = self.font.contains(code);

            let too_wide = self
                .wrap_width
                .is_some_and(|width| x >= width || x + advance > width);
            let too_many = covered && self.max_cells.is_some_and(|max| cells >= max);

            if (too_wide || too_many) && (i > start || start_x > 0 || start_cells > 0) {
                let line = if is_space(code) {
                    self.finish(start, i, i + 1, start_x, LineEnd::Wrap)
                } else if let Some(space) = last_space {
                    self.finish(start, space, space + 1, start_x, LineEnd::Wrap)
                } else {
                    self.finish(start, i, i, start_x, LineEnd::Wrap)
                };
                return Some(line);
            }

            if is_space(code) {
                last_space = Some(i);
            }
            x += advance;
            if covered {
                cells += 1;
            }
        }

        self.done = true;
        self.pos = self.text.len();
        self.x = x;
        self.cells = cells;
        Some(Line {
            text: &self.text[start..],
            start_x,
            end: LineEnd::End,
        })
    }
}

/// Pen state for a drawing pass
///
/// `position` is the top-left of the next glyph cell; the rasterizer gets
/// `position + (0, ascent)` as the baseline. `left` is the margin the pen
/// returns to on a new line.
#[derive(Debug, Clone, Copy)]
pub struct Pen<'f> {
    font: &'f Font<'f>,
    left: i32,
    position: Point,
    colors: ColorPair,
}

impl<'f> Pen<'f> {
    /// Create a pen at `origin`, which also sets the left margin
    pub fn new(font: &'f Font<'f>, origin: Point, colors: ColorPair) -> Self {
        Self {
            font,
            left: origin.x,
            position: origin,
            colors,
        }
    }

    /// Move the pen and margin to `origin`
    pub fn reset(&mut self, origin: Point) {
        self.left = origin.x;
        self.position = origin;
    }

    /// Top-left of the next glyph cell
    pub fn position(&self) -> Point {
        self.position
    }

    /// Baseline point of the next glyph
    pub fn baseline(&self) -> Point {
        self.position + Point::new(0, self.font.ascent() as i32)
    }

    /// Pen offset from the left margin
    pub fn line_offset(&self) -> u32 {
        (self.position.x - self.left).max(0) as u32
    }

    /// Font in use
    pub fn font(&self) -> &'f Font<'f> {
        self.font
    }

    /// Current colors
    pub fn colors(&self) -> ColorPair {
        self.colors
    }

    /// Change colors for subsequent glyphs
    pub fn set_colors(&mut self, colors: ColorPair) {
        self.colors = colors;
    }

    /// Draw one glyph and advance; returns the advance
    pub fn put<D>(&mut self, target: &mut D, code: u8) -> Result<u32, D::Error>
    where
        D: Raster + ?Sized,
    {
        let advance = draw_glyph(target, self.font, code, self.baseline(), self.colors)?;
        self.position.x += advance as i32;
        Ok(advance)
    }

    /// Return to the margin on the next line
    pub fn newline(&mut self) {
        self.position = Point::new(self.left, self.position.y + self.font.line_height() as i32);
    }

    /// Lay out and draw `text`, continuing from the current position
    pub fn write<D>(&mut self, target: &mut D, text: &[u8], wrap_width: Option<u32>) -> Result<(), D::Error>
    where
        D: Raster + ?Sized,
    {
        for line in LineBreaker::new(self.font, text, self.line_offset(), wrap_width) {
            for &code in line.text {
                self.put(target, code)?;
            }
            if line.end.is_break() {
                self.newline();
            }
        }
        Ok(())
    }
}

/// Draw text with its first line's top-left at `origin`
///
/// Returns the final pen position (top-left of the next glyph cell).
pub fn draw_text<D>(
    target: &mut D,
    font: &Font<'_>,
    text: impl AsRef<[u8]>,
    origin: Point,
    colors: ColorPair,
    wrap_width: Option<u32>,
) -> Result<Point, D::Error>
where
    D: Raster + ?Sized,
{
    let mut pen = Pen::new(font, origin, colors);
    pen.write(target, text.as_ref(), wrap_width)?;
    Ok(pen.position())
}

/// Draw formatted text with its first line's top-left at `origin`
///
/// # Example
/// ```ignore
/// draw_fmt(&mut display, &FONT, Point::new(10, 10), colors, format_args!("{} byte(s)", n))?;
/// ```
pub fn draw_fmt<D>(
    target: &mut D,
    font: &Font<'_>,
    origin: Point,
    colors: ColorPair,
    args: fmt::Arguments<'_>,
) -> Result<Point, D::Error>
where
    D: Raster + ?Sized,
{
    let mut pen = Pen::new(font, origin, colors);
    format_chunks(args, |chunk| pen.write(target, chunk, None))?;
    Ok(pen.position())
}

/// Resolve `args` to bytes and hand them to `sink` in chunks of at most
/// [`FMT_CAPACITY`] bytes
pub(crate) fn format_chunks<E>(
    args: fmt::Arguments<'_>,
    sink: impl FnMut(&[u8]) -> Result<(), E>,
) -> Result<(), E> {
    let mut chunker = Chunker {
        buf: Vec::new(),
        sink,
        error: None,
    };

    // A formatting error without a sink error comes from a Display impl;
    // whatever was produced before it is still drawn.
    let _ = fmt::write(&mut chunker, args);
    if let Some(e) = chunker.error.take() {
        return Err(e);
    }
    chunker.flush_sink()
}

struct Chunker<F, E> {
    buf: Vec<u8, FMT_CAPACITY>,
    sink: F,
    error: Option<E>,
}

impl<F, E> Chunker<F, E>
where
    F: FnMut(&[u8]) -> Result<(), E>,
{
    fn flush_sink(&mut self) -> Result<(), E> {
        if !self.buf.is_empty() {
            (self.sink)(&self.buf)?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl<F, E> fmt::Write for Chunker<F, E>
where
    F: FnMut(&[u8]) -> Result<(), E>,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &byte in s.as_bytes() {
            if self.buf.is_full() {
                if let Err(e) = self.flush_sink() {
                    self.error = Some(e);
                    return Err(fmt::Error);
                }
            }
            // Cannot fail: the buffer was just drained if it was full
            let _ = self.buf.push(byte);
        }
        Ok(())
    }
}
