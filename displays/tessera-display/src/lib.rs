//! Text layout and stateful display widgets for Tessera
//!
//! This crate provides:
//! - `draw_glyph`, the 1bpp glyph rasterizer
//! - `LineBreaker` and `Pen`, the text layout engine (advance, newline, wrap)
//! - `Terminal`, a character grid that scrolls on overflow
//! - `Textbox`, a word-wrapping region that clamps on overflow
//! - `Graph`, a framed plot that streams samples as connected segments
//!
//! # Architecture
//!
//! ```text
//! Font ──► draw_glyph ──► LineBreaker / Pen ──► Terminal, Textbox
//!   └──────────┴────────────────────────────► Graph (labels)
//! ```
//!
//! Widgets never own the display. Every drawing call borrows an
//! `embedded_graphics` draw target with `Rgb565` color for its duration, so
//! any panel driver (or an in-memory framebuffer) can sit underneath.
//! Widgets are expected to own disjoint rectangles; nothing here composes
//! overlapping regions.
//!
//! All operations run to completion on the caller's context. If more than
//! one context can draw, the caller serializes access to the display.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod error;
pub mod graph;
pub mod grid;
pub mod layout;
pub mod raster;
pub mod terminal;
pub mod textbox;

#[cfg(test)]
mod testing;

// Re-export key types
pub use error::WidgetError;
pub use graph::{Domain, Graph, GraphConfig, GraphPalette, GridStep, SeriesId, Transform};
pub use layout::{draw_fmt, draw_text, Line, LineBreaker, LineEnd, Pen};
pub use raster::{draw_glyph, ColorPair, Raster};
pub use terminal::{Cursor, Terminal};
pub use textbox::Textbox;

pub use tessera_font::{Font, Glyph};
