//! Glyph rasterizer
//!
//! The only place text reaches the display. Each glyph is sent as one
//! rectangular `fill_contiguous` run, which panel drivers turn into a single
//! address-window write.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use tessera_font::Font;

/// Display surface the widgets draw on
///
/// Any `embedded_graphics` draw target with `Rgb565` color qualifies:
/// - `draw_iter` sets individual pixels
/// - `fill_solid` fills a rectangle
/// - `fill_contiguous` streams a 1bpp glyph expanded to colors
///
/// Pixels outside the target are ignored by the target, never by callers.
pub trait Raster: DrawTarget<Color = Rgb565> {}

// Blanket implementation for all Rgb565 draw targets
impl<T: DrawTarget<Color = Rgb565> + ?Sized> Raster for T {}

/// Foreground/background color pair for text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorPair {
    /// Color of set glyph bits
    pub fg: Rgb565,
    /// Color of clear glyph bits and cleared regions
    pub bg: Rgb565,
}

impl ColorPair {
    /// Create a color pair
    pub const fn new(fg: Rgb565, bg: Rgb565) -> Self {
        Self { fg, bg }
    }

    /// Swap foreground and background
    pub const fn inverted(self) -> Self {
        Self {
            fg: self.bg,
            bg: self.fg,
        }
    }
}

impl Default for ColorPair {
    fn default() -> Self {
        Self::new(Rgb565::WHITE, Rgb565::BLACK)
    }
}

/// Draw one glyph with its origin on `baseline`
///
/// The bitmap box is placed at `baseline + (x_offset, y_offset)`; set bits
/// are painted `colors.fg`, clear bits `colors.bg`. Returns the glyph's
/// `x_advance`.
///
/// Codes the font does not cover are skipped: nothing is drawn and the
/// advance is 0.
pub fn draw_glyph<D>(
    target: &mut D,
    font: &Font<'_>,
    code: u8,
    baseline: Point,
    colors: ColorPair,
) -> Result<u32, D::Error>
where
    D: Raster + ?Sized,
{
    let Some(glyph) = font.glyph(code) else {
        return Ok(0);
    };

    if !glyph.is_blank() {
        let bitmap = font.bitmap_of(&glyph);
        let width = glyph.width as u32;
        let height = glyph.height as u32;

        let area = Rectangle::new(
            baseline + Point::new(glyph.x_offset as i32, glyph.y_offset as i32),
            Size::new(width, height),
        );

        let pixels = (0..height)
            .flat_map(move |y| (0..width).map(move |x| (x, y)))
            .map(move |(x, y)| {
                if glyph.pixel(bitmap, x, y) {
                    colors.fg
                } else {
                    colors.bg
                }
            });

        target.fill_contiguous(&area, pixels)?;
    }

    Ok(glyph.x_advance as u32)
}
