//! Glyph metrics and the packed glyph record
//!
//! Record format (7 bytes, little-endian):
//! - BITMAP_OFFSET (2 bytes): start of the glyph bitmap in the font blob
//! - WIDTH (1 byte): bitmap width in pixels
//! - HEIGHT (1 byte): bitmap height in pixels
//! - X_ADVANCE (1 byte): pen advance after drawing
//! - X_OFFSET (1 byte, signed): pen to bitmap left edge
//! - Y_OFFSET (1 byte, signed): baseline to bitmap top edge

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Size of one packed glyph record in bytes
pub const GLYPH_RECORD_SIZE: usize = 7;

/// One character's bitmap location and metrics
///
/// `repr(C)` keeps the field order of the C glyph table so fonts generated
/// for C firmware can be linked in unchanged.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Glyph {
    /// Start index into the font bitmap (bytes)
    pub bitmap_offset: u16,
    /// Bitmap width in pixels
    pub width: u8,
    /// Bitmap height in pixels
    pub height: u8,
    /// Distance to advance the pen (x axis)
    pub x_advance: u8,
    /// X distance from pen position to the bitmap's left edge
    pub x_offset: i8,
    /// Y distance from the baseline to the bitmap's top edge
    pub y_offset: i8,
}

impl Glyph {
    /// A glyph with no bitmap and no advance
    pub const EMPTY: Self = Self {
        bitmap_offset: 0,
        width: 0,
        height: 0,
        x_advance: 0,
        x_offset: 0,
        y_offset: 0,
    };

    /// Bytes per bitmap row (rows are rounded up to whole bytes)
    pub const fn stride(&self) -> usize {
        (self.width as usize + 7) / 8
    }

    /// Number of bitmap bytes this glyph occupies
    pub const fn bitmap_len(&self) -> usize {
        self.stride() * self.height as usize
    }

    /// One past the last bitmap byte of this glyph
    pub const fn bitmap_end(&self) -> usize {
        self.bitmap_offset as usize + self.bitmap_len()
    }

    /// Returns true if the glyph has no pixels to draw
    pub const fn is_blank(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Read one pixel from this glyph's bitmap slice
    ///
    /// `bitmap` is the glyph's own region (see [`crate::Font::bitmap_of`]).
    /// Coordinates outside the glyph, or a short slice, read as clear.
    pub fn pixel(&self, bitmap: &[u8], x: u32, y: u32) -> bool {
        if x >= self.width as u32 || y >= self.height as u32 {
            return false;
        }

        let index = y as usize * self.stride() + (x as usize / 8);
        match bitmap.get(index) {
            Some(byte) => byte & (0x80 >> (x % 8)) != 0,
            None => false,
        }
    }

    /// Parse a glyph from its packed record
    pub const fn from_le_bytes(record: [u8; GLYPH_RECORD_SIZE]) -> Self {
        Self {
            bitmap_offset: u16::from_le_bytes([record[0], record[1]]),
            width: record[2],
            height: record[3],
            x_advance: record[4],
            x_offset: record[5] as i8,
            y_offset: record[6] as i8,
        }
    }

    /// Convert to the packed record
    pub const fn to_le_bytes(&self) -> [u8; GLYPH_RECORD_SIZE] {
        let offset = self.bitmap_offset.to_le_bytes();
        [
            offset[0],
            offset[1],
            self.width,
            self.height,
            self.x_advance,
            self.x_offset as u8,
            self.y_offset as u8,
        ]
    }
}
