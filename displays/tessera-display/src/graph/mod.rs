//! Framed plot of streamed samples
//!
//! A graph owns a rectangle for its plot area and maps a fixed [`Domain`]
//! onto it. [`Graph::draw_frame`] paints the background, gridlines, border
//! and labels; [`Graph::draw_data`] then extends a polyline one segment per
//! sample, so data can be plotted as it arrives.
//!
//! Labels sit around the rectangle:
//!
//! ```text
//!  y_label       title
//!   1.00 ┌───────────────────┐
//!        │                   │
//!  -1.00 └───────────────────┘
//!        0    1    2    3    4
//!                x_label
//! ```
//!
//! Samples are not clamped: a point outside the domain is drawn outside
//! the frame. Dropping a graph erases nothing.

mod config;
mod transform;

pub use config::{Domain, GraphConfig, GraphPalette, GridStep};
pub use transform::{label_precision, tick_count, tick_range, Transform};

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use heapless::{String, Vec};
use tessera_font::Font;

use crate::error::WidgetError;
use crate::layout::draw_text;
use crate::raster::{ColorPair, Raster};

/// Maximum data series per graph, including the primary one
pub const MAX_SERIES: usize = 4;

/// Maximum formatted length of a tick label
pub const MAX_TICK_LABEL_LEN: usize = 12;

/// Maximum gridlines per axis
pub const MAX_GRID_LINES: u32 = 100;

/// Pixels between the frame and its labels
const LABEL_GAP: i32 = 2;

/// Handle to one data series of a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SeriesId(u8);

impl SeriesId {
    /// Series drawn by [`Graph::draw_data`], in the palette's data color
    pub const PRIMARY: Self = Self(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy)]
struct Series {
    color: Rgb565,
    last: Option<Point>,
}

/// Graph widget
pub struct Graph<'a> {
    area: Rectangle,
    config: GraphConfig<'a>,
    font: &'a Font<'a>,
    transform: Transform,
    series: Vec<Series, MAX_SERIES>,
}

impl<'a> Graph<'a> {
    /// Create a graph with its plot area at `area`
    ///
    /// # Errors
    /// - [`WidgetError::TooSmall`] if `area` is under 2x2 pixels
    /// - [`WidgetError::InvalidDomain`] unless `x_max > x_min` and
    ///   `y_max > y_min`, all finite
    /// - [`WidgetError::InvalidGridStep`] if a step is not positive, or
    ///   yields more than [`MAX_GRID_LINES`] gridlines
    pub fn new(area: Rectangle, config: GraphConfig<'a>, font: &'a Font<'a>) -> Result<Self, WidgetError> {
        if area.size.width < 2 || area.size.height < 2 {
            return Err(WidgetError::TooSmall);
        }

        let domain = config.domain;
        if !domain.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::warn!("graph: invalid domain {}", domain);
            return Err(WidgetError::InvalidDomain);
        }

        let grid = config.grid;
        if !grid.is_valid()
            || domain.width() / grid.x > MAX_GRID_LINES as f32
            || domain.height() / grid.y > MAX_GRID_LINES as f32
        {
            #[cfg(feature = "defmt")]
            defmt::warn!("graph: invalid grid step {}", grid);
            return Err(WidgetError::InvalidGridStep);
        }

        let mut series = Vec::new();
        series
            .push(Series {
                color: config.palette.data,
                last: None,
            })
            .map_err(|_| WidgetError::TooManySeries)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("graph: {} at {}", domain, area);

        Ok(Self {
            area,
            config,
            font,
            transform: Transform::new(&area, &domain),
            series,
        })
    }

    /// Plot rectangle
    pub fn area(&self) -> Rectangle {
        self.area
    }

    /// Configuration the graph was created with
    pub fn config(&self) -> &GraphConfig<'a> {
        &self.config
    }

    /// Domain to screen mapping
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Add a series drawn in `color`
    pub fn add_series(&mut self, color: Rgb565) -> Result<SeriesId, WidgetError> {
        let id = SeriesId(self.series.len() as u8);
        self.series
            .push(Series { color, last: None })
            .map_err(|_| WidgetError::TooManySeries)?;
        Ok(id)
    }

    /// Last plotted point of a series, in screen coordinates
    pub fn last_point(&self, id: SeriesId) -> Option<Point> {
        self.series.get(id.index()).and_then(|s| s.last)
    }

    /// Forget the last point of every series
    ///
    /// The next sample of each series starts a new polyline.
    pub fn restart(&mut self) {
        for series in &mut self.series {
            series.last = None;
        }
    }

    /// Draw background, gridlines, border, tick labels, title and axis labels
    pub fn draw_frame<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: Raster,
    {
        let palette = self.config.palette;
        let domain = self.config.domain;
        let step = self.config.grid;
        let t = &self.transform;
        let grid_style = PrimitiveStyle::with_stroke(palette.grid, 1);

        target.fill_solid(&self.area, palette.background)?;

        for k in tick_range(domain.x_min, domain.x_max, step.x) {
            let x = t.to_screen(k as f32 * step.x, domain.y_min).x;
            Line::new(Point::new(x, t.top()), Point::new(x, t.bottom()))
                .into_styled(grid_style)
                .draw(target)?;
        }
        for k in tick_range(domain.y_min, domain.y_max, step.y) {
            let y = t.to_screen(domain.x_min, k as f32 * step.y).y;
            Line::new(Point::new(t.left(), y), Point::new(t.right(), y))
                .into_styled(grid_style)
                .draw(target)?;
        }

        self.area
            .into_styled(PrimitiveStyle::with_stroke(palette.frame, 1))
            .draw(target)?;

        self.draw_labels(target)
    }

    fn draw_labels<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: Raster,
    {
        let domain = self.config.domain;
        let step = self.config.grid;
        let t = &self.transform;
        let line_height = self.font.line_height() as i32;

        // X ticks: centered under each gridline
        let precision = label_precision(step.x);
        let x_ticks_top = t.bottom() + 1 + LABEL_GAP;
        for k in tick_range(domain.x_min, domain.x_max, step.x) {
            let value = k as f32 * step.x;
            let Some(label) = tick_label(value, precision) else {
                continue;
            };
            let x = t.to_screen(value, domain.y_min).x;
            let width = self.width_of(&label);
            self.draw_label(target, &label, Point::new(x - width / 2, x_ticks_top))?;
        }

        // Y ticks: right-aligned left of the frame, centered on each gridline
        let precision = label_precision(step.y);
        for k in tick_range(domain.y_min, domain.y_max, step.y) {
            let value = k as f32 * step.y;
            let Some(label) = tick_label(value, precision) else {
                continue;
            };
            let y = t.to_screen(domain.x_min, value).y;
            let width = self.width_of(&label);
            let origin = Point::new(t.left() - LABEL_GAP - width, y - line_height / 2);
            self.draw_label(target, &label, origin)?;
        }

        // Title and y label share a row clear of the top tick label
        let header_y = t.top() - line_height - line_height / 2 - LABEL_GAP;
        let center_x = self.area.center().x;

        let title = self.config.title;
        let width = self.width_of(title);
        self.draw_label(target, title, Point::new(center_x - width / 2, header_y))?;

        let y_label = self.config.y_label;
        let width = self.width_of(y_label);
        self.draw_label(target, y_label, Point::new(t.left() - width, header_y))?;

        let x_label = self.config.x_label;
        let width = self.width_of(x_label);
        let origin = Point::new(center_x - width / 2, x_ticks_top + line_height + LABEL_GAP);
        self.draw_label(target, x_label, origin)
    }

    fn draw_label<D>(&self, target: &mut D, text: &str, origin: Point) -> Result<(), D::Error>
    where
        D: Raster,
    {
        if text.is_empty() {
            return Ok(());
        }
        let palette = self.config.palette;
        let colors = ColorPair::new(palette.text, palette.background);
        draw_text(target, self.font, text, origin, colors, None)?;
        Ok(())
    }

    fn width_of(&self, text: &str) -> i32 {
        self.font.text_width(text.as_bytes()) as i32
    }

    /// Plot samples of the primary series
    ///
    /// See [`Graph::draw_series`].
    pub fn draw_data<D>(&mut self, target: &mut D, xs: &[f32], ys: &[f32]) -> Result<(), D::Error>
    where
        D: Raster,
    {
        self.draw_series(target, SeriesId::PRIMARY, xs, ys)
    }

    /// Plot samples of one series
    ///
    /// Samples are paired from `xs` and `ys`; extra elements of the longer
    /// slice are ignored. Each sample is joined to the series' previous
    /// point with a line in the series color; the very first point of a
    /// series is drawn as a single pixel. Non-finite samples are skipped.
    pub fn draw_series<D>(&mut self, target: &mut D, id: SeriesId, xs: &[f32], ys: &[f32]) -> Result<(), D::Error>
    where
        D: Raster,
    {
        let transform = self.transform;
        let Some(series) = self.series.get_mut(id.index()) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("graph: unknown series {}", id);
            return Ok(());
        };
        let style = PrimitiveStyle::with_stroke(series.color, 1);

        for (&x, &y) in xs.iter().zip(ys) {
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            let point = transform.to_screen(x, y);
            match series.last {
                Some(last) => Line::new(last, point).into_styled(style).draw(target)?,
                None => Pixel(point, series.color).draw(target)?,
            }
            series.last = Some(point);
        }

        Ok(())
    }
}

/// Format a tick value, `None` if it does not fit
fn tick_label(value: f32, precision: usize) -> Option<String<MAX_TICK_LABEL_LEN>> {
    let mut label = String::new();
    write!(label, "{:.*}", precision, value).ok()?;
    Some(label)
}
