//! Font tables and glyph lookup

use crate::glyph::Glyph;

/// Errors found while validating a font table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontError {
    /// `first_char` is greater than `last_char`
    EmptyRange,
    /// Glyph table length does not match the character range
    GlyphCountMismatch,
    /// A glyph's bitmap region runs past the end of the blob
    GlyphOutOfBounds { code: u8 },
    /// A glyph's bitmap region overlaps an earlier glyph's region
    GlyphOverlap { code: u8 },
    /// Line height is zero
    ZeroLineHeight,
}

/// An immutable bitmap font
///
/// Construct with [`Font::new`] in a `static` so the table is checked at
/// compile time, or with [`Font::try_new`] for tables loaded at runtime.
/// After construction every in-range glyph is known to lie inside the
/// bitmap blob.
#[derive(Debug, Clone, Copy)]
pub struct Font<'a> {
    bitmap: &'a [u8],
    glyphs: &'a [Glyph],
    first_char: u8,
    last_char: u8,
    y_advance: u8,
    /// Tallest extent above the baseline over all glyphs
    ascent: u8,
}

impl<'a> Font<'a> {
    /// Create a font, panicking on an invalid table
    ///
    /// Intended for `static` fonts, where the panic becomes a build error.
    pub const fn new(
        bitmap: &'a [u8],
        glyphs: &'a [Glyph],
        first_char: u8,
        last_char: u8,
        y_advance: u8,
    ) -> Self {
        match Self::try_new(bitmap, glyphs, first_char, last_char, y_advance) {
            Ok(font) => font,
            Err(FontError::EmptyRange) => panic!("font: first_char > last_char"),
            Err(FontError::GlyphCountMismatch) => panic!("font: glyph count does not match range"),
            Err(FontError::GlyphOutOfBounds { .. }) => panic!("font: glyph bitmap out of bounds"),
            Err(FontError::GlyphOverlap { .. }) => panic!("font: glyph bitmaps overlap"),
            Err(FontError::ZeroLineHeight) => panic!("font: zero line height"),
        }
    }

    /// Create a font, validating the table
    pub const fn try_new(
        bitmap: &'a [u8],
        glyphs: &'a [Glyph],
        first_char: u8,
        last_char: u8,
        y_advance: u8,
    ) -> Result<Self, FontError> {
        if first_char > last_char {
            return Err(FontError::EmptyRange);
        }
        if glyphs.len() != (last_char - first_char) as usize + 1 {
            return Err(FontError::GlyphCountMismatch);
        }
        if y_advance == 0 {
            return Err(FontError::ZeroLineHeight);
        }

        let mut ascent: i16 = 0;
        let mut i = 0;
        while i < glyphs.len() {
            let glyph = glyphs[i];
            let code = first_char + i as u8;

            if glyph.bitmap_end() > bitmap.len() {
                return Err(FontError::GlyphOutOfBounds { code });
            }

            if !glyph.is_blank() {
                let start = glyph.bitmap_offset as usize;
                let end = glyph.bitmap_end();

                let mut j = 0;
                while j < i {
                    let other = glyphs[j];
                    if !other.is_blank()
                        && start < other.bitmap_end()
                        && (other.bitmap_offset as usize) < end
                    {
                        return Err(FontError::GlyphOverlap { code });
                    }
                    j += 1;
                }

                let above = -(glyph.y_offset as i16);
                if above > ascent {
                    ascent = above;
                }
            }

            i += 1;
        }

        Ok(Self {
            bitmap,
            glyphs,
            first_char,
            last_char,
            y_advance,
            ascent: if ascent > u8::MAX as i16 {
                u8::MAX
            } else {
                ascent as u8
            },
        })
    }

    /// Look up the glyph for a character code
    ///
    /// Returns `None` iff `code` is outside `first_char..=last_char`.
    pub fn glyph(&self, code: u8) -> Option<Glyph> {
        if !self.contains(code) {
            return None;
        }
        self.glyphs.get((code - self.first_char) as usize).copied()
    }

    /// Look up the glyph for a `char`
    pub fn glyph_for(&self, ch: char) -> Option<Glyph> {
        u8::try_from(ch).ok().and_then(|code| self.glyph(code))
    }

    /// Returns true if the font covers `code`
    pub const fn contains(&self, code: u8) -> bool {
        code >= self.first_char && code <= self.last_char
    }

    /// The bitmap region of a glyph from this font
    ///
    /// Regions were checked at construction; a foreign glyph that does not
    /// fit yields an empty slice rather than a panic.
    pub fn bitmap_of(&self, glyph: &Glyph) -> &'a [u8] {
        self.bitmap
            .get(glyph.bitmap_offset as usize..glyph.bitmap_end())
            .unwrap_or(&[])
    }

    /// Pixels the pen advances for `code` (0 if not covered)
    pub fn advance(&self, code: u8) -> u32 {
        self.glyph(code).map_or(0, |g| g.x_advance as u32)
    }

    /// First covered character code
    pub const fn first_char(&self) -> u8 {
        self.first_char
    }

    /// Last covered character code
    pub const fn last_char(&self) -> u8 {
        self.last_char
    }

    /// Distance between consecutive baselines
    pub const fn line_height(&self) -> u32 {
        self.y_advance as u32
    }

    /// Height of the tallest glyph above the baseline
    pub const fn ascent(&self) -> u32 {
        self.ascent as u32
    }

    /// Height in pixels of a block of `lines` lines of text
    pub const fn text_height(&self, lines: u32) -> u32 {
        self.y_advance as u32 * lines
    }

    /// Widest advance of any glyph
    pub fn max_advance(&self) -> u32 {
        self.glyphs
            .iter()
            .map(|g| g.x_advance as u32)
            .max()
            .unwrap_or(0)
    }

    /// Mean advance over glyphs that move the pen (0 if none do)
    pub fn average_advance(&self) -> u32 {
        let (sum, count) = self
            .glyphs
            .iter()
            .filter(|g| g.x_advance > 0)
            .fold((0u32, 0u32), |(sum, count), g| {
                (sum + g.x_advance as u32, count + 1)
            });

        if count == 0 {
            0
        } else {
            sum / count
        }
    }

    /// Width in pixels of the widest line of `text`
    ///
    /// `\n` and `\r` start a new line; codes the font does not cover
    /// measure zero.
    pub fn text_width(&self, text: &[u8]) -> u32 {
        text.split(|&b| b == b'\n' || b == b'\r')
            .map(|line| line.iter().map(|&code| self.advance(code)).sum::<u32>())
            .max()
            .unwrap_or(0)
    }

    /// Number of glyphs in the table
    pub const fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}
