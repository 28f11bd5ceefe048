//! In-memory framebuffer for widget tests

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use tessera_font::probe::{decode_top_row, PROBE_ADVANCE};

/// RGB565 framebuffer that records every write
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb565>,
    writes: usize,
    out_of_bounds: usize,
}

impl Framebuffer {
    /// Create a framebuffer filled with `fill`
    pub fn new(width: u32, height: u32, fill: Rgb565) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; (width * height) as usize],
            writes: 0,
            out_of_bounds: 0,
        }
    }

    /// Read a pixel, `None` outside the buffer
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Number of pixels matching `pred`
    pub fn count(&self, pred: impl Fn(Rgb565) -> bool) -> usize {
        self.pixels.iter().filter(|&&c| pred(c)).count()
    }

    /// Number of pixels that do not match `fill`, outside of `area`
    pub fn changed_outside(&self, area: &Rectangle, fill: Rgb565) -> usize {
        let mut changed = 0;
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let p = Point::new(x, y);
                if !area.contains(p) && self.pixel(x, y) != Some(fill) {
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Total pixel writes received
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Writes that fell outside the buffer
    pub fn out_of_bounds(&self) -> usize {
        self.out_of_bounds
    }

    /// Read back a line of probe-font text whose cells start at `origin`
    ///
    /// `origin` is the top-left of the first cell and `fg` the text color.
    /// Reading stops at the first empty cell.
    pub fn probe_text(&self, origin: Point, fg: Rgb565) -> String {
        let mut text = String::new();
        let mut x = origin.x;

        loop {
            let code = decode_top_row(|col| {
                self.pixel(x + col as i32, origin.y) == Some(fg)
            });
            if code == 0 {
                break;
            }
            text.push(code as char);
            x += PROBE_ADVANCE as i32;
        }

        text
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.writes += 1;
            if point.x < 0
                || point.y < 0
                || point.x as u32 >= self.width
                || point.y as u32 >= self.height
            {
                self.out_of_bounds += 1;
                continue;
            }
            let index = point.y as usize * self.width as usize + point.x as usize;
            self.pixels[index] = color;
        }
        Ok(())
    }
}
