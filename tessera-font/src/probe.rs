//! Diagnostic probe font
//!
//! Covers `0x20..=0x7E` with fixed 8x8 cells. The top row of every glyph is
//! the glyph's own character code (MSB on the left) and the bottom row is a
//! solid underline, so rendered text can be read back from a framebuffer
//! during panel bring-up or in tests.

use crate::font::Font;
use crate::glyph::Glyph;

/// Glyph bitmap width and height
pub const PROBE_GLYPH_SIZE: u32 = 8;

/// Pen advance per glyph (one column of spacing)
pub const PROBE_ADVANCE: u32 = 9;

/// Baseline to baseline distance
pub const PROBE_LINE_HEIGHT: u32 = 10;

const FIRST: u8 = 0x20;
const LAST: u8 = 0x7E;
const COUNT: usize = (LAST - FIRST) as usize + 1;
const BYTES_PER_GLYPH: usize = PROBE_GLYPH_SIZE as usize;

const BITMAP: [u8; COUNT * BYTES_PER_GLYPH] = {
    let mut bitmap = [0u8; COUNT * BYTES_PER_GLYPH];
    let mut i = 0;
    while i < COUNT {
        bitmap[i * BYTES_PER_GLYPH] = FIRST + i as u8;
        bitmap[i * BYTES_PER_GLYPH + BYTES_PER_GLYPH - 1] = 0xFF;
        i += 1;
    }
    bitmap
};

const GLYPHS: [Glyph; COUNT] = {
    let mut glyphs = [Glyph::EMPTY; COUNT];
    let mut i = 0;
    while i < COUNT {
        glyphs[i] = Glyph {
            bitmap_offset: (i * BYTES_PER_GLYPH) as u16,
            width: PROBE_GLYPH_SIZE as u8,
            height: PROBE_GLYPH_SIZE as u8,
            x_advance: PROBE_ADVANCE as u8,
            x_offset: 0,
            y_offset: -(PROBE_GLYPH_SIZE as i8),
        };
        i += 1;
    }
    glyphs
};

/// The probe font
pub static PROBE_FONT: Font<'static> =
    Font::new(&BITMAP, &GLYPHS, FIRST, LAST, PROBE_LINE_HEIGHT as u8);

/// Recover a character code from the top row of a rendered probe glyph
///
/// `is_set(col)` reports whether the pixel `col` columns right of the
/// glyph's left edge is foreground. Returns 0 for an empty cell.
pub fn decode_top_row(mut is_set: impl FnMut(u32) -> bool) -> u8 {
    (0..PROBE_GLYPH_SIZE).fold(0u8, |code, col| {
        (code << 1) | u8::from(is_set(col))
    })
}
