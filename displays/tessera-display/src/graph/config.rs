//! Graph configuration types

use embedded_graphics::pixelcolor::{Rgb565, RgbColor, WebColors};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Plotted value range
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Domain {
    /// Value at the left edge
    pub x_min: f32,
    /// Value at the right edge
    pub x_max: f32,
    /// Value at the bottom edge
    pub y_min: f32,
    /// Value at the top edge
    pub y_max: f32,
}

impl Domain {
    /// Create a domain
    pub const fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Returns true if all bounds are finite and both ranges are non-empty
    pub fn is_valid(&self) -> bool {
        self.x_min.is_finite()
            && self.x_max.is_finite()
            && self.y_min.is_finite()
            && self.y_max.is_finite()
            && self.x_max > self.x_min
            && self.y_max > self.y_min
            && self.width().is_finite()
            && self.height().is_finite()
    }

    /// Horizontal extent
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Vertical extent
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }
}

/// Distance between gridlines, in domain units
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridStep {
    pub x: f32,
    pub y: f32,
}

impl GridStep {
    /// Create a grid step
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns true if both steps are finite and positive
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.x > 0.0 && self.y > 0.0
    }
}

/// Graph colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GraphPalette {
    /// Border around the plot area
    pub frame: Rgb565,
    /// Primary data series
    pub data: Rgb565,
    /// Gridlines
    pub grid: Rgb565,
    /// Tick labels, title and axis labels
    pub text: Rgb565,
    /// Plot area fill and label background
    pub background: Rgb565,
}

impl Default for GraphPalette {
    fn default() -> Self {
        Self {
            frame: Rgb565::CSS_DARK_BLUE,
            data: Rgb565::RED,
            grid: Rgb565::YELLOW,
            text: Rgb565::WHITE,
            background: Rgb565::BLACK,
        }
    }
}

/// Everything a graph needs besides its rectangle and font
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GraphConfig<'a> {
    pub domain: Domain,
    pub grid: GridStep,
    pub palette: GraphPalette,
    /// Centered above the frame
    pub title: &'a str,
    /// Centered below the x tick labels
    pub x_label: &'a str,
    /// Above the y tick labels, right-aligned to the frame
    pub y_label: &'a str,
}

impl<'a> GraphConfig<'a> {
    /// Create a configuration with the default palette and no labels
    pub fn new(domain: Domain, grid: GridStep) -> Self {
        Self {
            domain,
            grid,
            palette: GraphPalette::default(),
            title: "",
            x_label: "",
            y_label: "",
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// Set the axis labels
    pub fn with_labels(mut self, x_label: &'a str, y_label: &'a str) -> Self {
        self.x_label = x_label;
        self.y_label = y_label;
        self
    }

    /// Set the palette
    pub fn with_palette(mut self, palette: GraphPalette) -> Self {
        self.palette = palette;
        self
    }
}
