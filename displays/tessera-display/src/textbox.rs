//! Word-wrapping text box
//!
//! A screen rectangle that accepts text until it is full. Lines wrap at the
//! rectangle width; once the next line would not fit below the last one,
//! further text is dropped until [`Textbox::clear`].

use core::fmt;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use tessera_font::Font;

use crate::error::WidgetError;
use crate::grid::cell_grid;
use crate::layout::{format_chunks, LineBreaker, Pen};
use crate::raster::{ColorPair, Raster};

/// Clamp-on-overflow text box widget
pub struct Textbox<'f> {
    area: Rectangle,
    pen: Pen<'f>,
    columns: u32,
    rows: u32,
}

impl<'f> Textbox<'f> {
    /// Create a text box covering `area`
    ///
    /// Sized like [`Terminal::create`](crate::Terminal::create): fails with
    /// [`WidgetError::TooSmall`] if no character cell fits.
    pub fn create(area: Rectangle, font: &'f Font<'f>, colors: ColorPair) -> Result<Self, WidgetError> {
        let (rows, columns) = cell_grid(&area, font)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("textbox: {}x{} cells at {}", columns, rows, area);

        Ok(Self {
            area,
            pen: Pen::new(font, area.top_left, colors),
            columns,
            rows,
        })
    }

    /// Create a text box of `rows` text lines and `width` pixels at `origin`
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

    /// Width in average characters
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Height in text lines
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Pen position relative to the rectangle's top-left corner
    pub fn cursor(&self) -> Point {
        self.pen.position() - self.area.top_left
    }

    /// Colors used for subsequent text
    pub fn colors(&self) -> ColorPair {
        self.pen.colors()
    }

    /// Returns true if the current line no longer fits in the rectangle
    pub fn is_full(&self) -> bool {
        let bottom = self.area.top_left.y + self.area.size.height as i32;
        self.pen.position().y + self.pen.font().line_height() as i32 > bottom
    }

    /// Set colors for subsequent prints
    pub fn set_color(&mut self, fg: Rgb565, bg: Rgb565) {
        self.pen.set_colors(ColorPair::new(fg, bg));
    }

    /// Print text at the pen
    ///
    /// Text that would land below the rectangle is dropped.
    pub fn print<D>(&mut self, target: &mut D, text: impl AsRef<[u8]>) -> Result<(), D::Error>
    where
        D: Raster,
    {
        let area = self.area;
        let mut target = target.clipped(&area);

        let lines = LineBreaker::new(
            self.pen.font(),
            text.as_ref(),
            self.pen.line_offset(),
            Some(area.size.width),
        );
        for line in lines {
            if self.is_full() {
                #[cfg(feature = "defmt")]
                defmt::debug!("textbox: full, dropping text");
                break;
            }
            for &code in line.text {
                self.pen.put(&mut target, code)?;
            }
            if line.end.is_break() {
                self.pen.newline();
            }
        }

        Ok(())
    }

    /// Print formatted text at the pen
    pub fn print_fmt<D>(&mut self, target: &mut D, args: fmt::Arguments<'_>) -> Result<(), D::Error>
    where
        D: Raster,
    {
        format_chunks(args, |chunk| self.print(target, chunk))
    }

    /// Fill the rectangle with the background color and return the pen to
    /// the top-left corner
    pub fn clear<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: Raster,
    {
        target.fill_solid(&self.area, self.pen.colors().bg)?;
        self.pen.reset(self.area.top_left);
        Ok(())
    }
}
