//! Domain to screen mapping
//!
//! ```text
//! screen_x = left   + (x - x_min) / (x_max - x_min) * (width  - 1)
//! screen_y = bottom - (y - y_min) / (y_max - y_min) * (height - 1)
//! ```
//!
//! `x_min`/`y_min` land on the left/bottom pixel and `x_max`/`y_max` on the
//! right/top pixel of the rectangle. Results are rounded half away from zero.

use core::ops::RangeInclusive;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::config::Domain;

/// Tolerance, in steps, for a bound that sits on a gridline
const TICK_EPSILON: f32 = 1e-4;

/// Most decimals shown in a tick label
const MAX_DECIMALS: usize = 6;

/// Affine map from domain space to screen space
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transform {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
    x_min: f32,
    y_min: f32,
    x_scale: f32,
    y_scale: f32,
}

impl Transform {
    /// Map `domain` onto `area`
    ///
    /// The domain must be valid (see [`Domain::is_valid`]).
    pub fn new(area: &Rectangle, domain: &Domain) -> Self {
        let plot_width = area.size.width.saturating_sub(1);
        let plot_height = area.size.height.saturating_sub(1);
        let left = area.top_left.x;
        let top = area.top_left.y;

        Self {
            left,
            top,
            right: left + plot_width as i32,
            bottom: top + plot_height as i32,
            x_min: domain.x_min,
            y_min: domain.y_min,
            x_scale: plot_width as f32 / domain.width(),
            y_scale: plot_height as f32 / domain.height(),
        }
    }

    /// Leftmost pixel column
    pub fn left(&self) -> i32 {
        self.left
    }

    /// Rightmost pixel column
    pub fn right(&self) -> i32 {
        self.right
    }

    /// Topmost pixel row
    pub fn top(&self) -> i32 {
        self.top
    }

    /// Bottom pixel row
    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    /// Unrounded screen x of a domain x
    pub fn screen_x(&self, x: f32) -> f32 {
        self.left as f32 + (x - self.x_min) * self.x_scale
    }

    /// Unrounded screen y of a domain y
    pub fn screen_y(&self, y: f32) -> f32 {
        self.bottom as f32 - (y - self.y_min) * self.y_scale
    }

    /// Screen pixel of a domain point
    ///
    /// Points outside the domain map outside the rectangle; nothing is
    /// clamped.
    pub fn to_screen(&self, x: f32, y: f32) -> Point {
        Point::new(round(self.screen_x(x)), round(self.screen_y(y)))
    }
}

/// Round half away from zero, saturating at the `i32` range
pub(crate) fn round(v: f32) -> i32 {
    libm::roundf(v) as i32
}

/// Multiples `k` such that `k * step` lies within `[min, max]`
///
/// Bounds within a small tolerance of a multiple count as on it, so a
/// domain of `[-1, 1]` with step `0.25` yields all nine ticks.
pub fn tick_range(min: f32, max: f32, step: f32) -> RangeInclusive<i32> {
    let first = libm::ceilf(min / step - TICK_EPSILON) as i32;
    let last = libm::floorf(max / step + TICK_EPSILON) as i32;
    first..=last
}

/// Number of gridlines `[min, max]` gets at `step`
pub fn tick_count(min: f32, max: f32, step: f32) -> u32 {
    let range = tick_range(min, max, step);
    (*range.end() as i64 - *range.start() as i64 + 1).max(0) as u32
}

/// Decimals needed to print multiples of `step` exactly (at most 6)
///
/// A step is exact at `d` decimals once `step * 10^d` is a whole number of
/// at least 1, within f32 precision.
pub fn label_precision(step: f32) -> usize {
    let mut scaled = step;
    for decimals in 0..MAX_DECIMALS {
        let tolerance = libm::fmaxf(1e-3, scaled * 1e-6);
        if libm::roundf(scaled) >= 1.0 && libm::fabsf(scaled - libm::roundf(scaled)) < tolerance {
            return decimals;
        }
        scaled *= 10.0;
    }
    MAX_DECIMALS
}
