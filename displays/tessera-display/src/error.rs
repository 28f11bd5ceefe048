//! Widget errors

/// Errors reported when a widget is created or configured
///
/// Drawing itself only fails with the display driver's own error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WidgetError {
    /// Rectangle cannot hold a single character cell (or plot pixel)
    TooSmall,
    /// Domain bounds are not finite or not strictly increasing
    InvalidDomain,
    /// Grid step is not positive, or yields too many gridlines
    InvalidGridStep,
    /// No room for another data series
    TooManySeries,
}
