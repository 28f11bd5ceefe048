//! Bitmap font model for Tessera
//!
//! Fonts are compiled-in tables: a shared 1bpp bitmap blob plus one
//! [`Glyph`] record per character code in `first_char..=last_char`.
//!
//! # Bitmap format
//!
//! ```text
//!  bitmap_offset
//!  │
//!  ▼
//! ┌──────────┬──────────┬─────┬──────────┐
//! │ row 0    │ row 1    │ ... │ row h-1  │   ceil(width / 8) bytes per row
//! └──────────┴──────────┴─────┴──────────┘
//!   MSB = leftmost pixel, set bit = foreground
//! ```
//!
//! Every table is validated once by [`Font::new`] (at compile time for
//! `static` fonts) so lookups and bitmap reads never go out of bounds.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod font;
pub mod glyph;

#[cfg(any(test, feature = "probe-font"))]
pub mod probe;

pub use font::{Font, FontError};
pub use glyph::{Glyph, GLYPH_RECORD_SIZE};
