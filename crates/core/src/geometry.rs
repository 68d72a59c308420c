use serde::{Deserialize, Serialize};

/// Side length of the square launcher, in viewport pixels.
pub const WIDGET_SIZE: f64 = 64.0;
/// Minimum gap kept between the launcher and every viewport edge.
pub const CLAMP_MARGIN: f64 = 8.0;
/// Inset of the default placement from the bottom-right corner.
pub const DEFAULT_CORNER_INSET: f64 = 16.0;

/// A point in viewport pixels; for the launcher, its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Cumulative Manhattan distance, `|dx| + |dy|`.
    pub fn manhattan_distance(self, other: Self) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Size of the visible content area the launcher lives in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Largest top-left x that keeps the launcher inside the margin.
    pub fn max_x(&self) -> f64 {
        self.width - WIDGET_SIZE - CLAMP_MARGIN
    }

    /// Largest top-left y that keeps the launcher inside the margin.
    pub fn max_y(&self) -> f64 {
        self.height - WIDGET_SIZE - CLAMP_MARGIN
    }

    pub fn clamp(&self, coordinate: Coordinate) -> Coordinate {
        Coordinate::new(
            clamp(coordinate.x, CLAMP_MARGIN, self.max_x()),
            clamp(coordinate.y, CLAMP_MARGIN, self.max_y()),
        )
    }

    /// Placement used when nothing valid has been persisted.
    pub fn default_anchor(&self) -> Coordinate {
        Coordinate::new(
            self.width - WIDGET_SIZE - DEFAULT_CORNER_INSET,
            self.height - WIDGET_SIZE - DEFAULT_CORNER_INSET,
        )
    }
}

/// Source of the current viewport size.
///
/// Resize notifications are delivered separately by the host calling
/// [`crate::Widget::handle_resize`]; this only answers "how big is it now".
pub trait ViewportProvider: Send + Sync {
    fn viewport(&self) -> Viewport;
}

/// Viewport that never changes size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedViewport(pub Viewport);

impl ViewportProvider for FixedViewport {
    fn viewport(&self) -> Viewport {
        self.0
    }
}

/// `min(max(value, low), high)`.
///
/// Unlike `f64::clamp` this never panics: when the viewport is too small for
/// the launcher, `low > high` and the result is `high`.
pub fn clamp(value: f64, low: f64, high: f64) -> f64 {
    value.max(low).min(high)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_is_idempotent_across_ranges() {
        let ranges = [(8.0, 100.0), (8.0, 8.0), (8.0, -20.0)];
        let samples = [-1e9, -5.0, 0.0, 7.9, 8.0, 50.0, 100.0, 100.1, 1e9];

        for (low, high) in ranges {
            for value in samples {
                let once = clamp(value, low, high);
                assert_eq!(clamp(once, low, high), once, "value={value} low={low} high={high}");
            }
        }
    }

    #[test]
    fn inverted_bounds_resolve_to_high() {
        assert_eq!(clamp(50.0, 8.0, -20.0), -20.0);
        assert_eq!(clamp(-100.0, 8.0, -20.0), -20.0);
    }

    #[test]
    fn viewport_clamp_keeps_margin_on_every_edge() {
        let viewport = Viewport::new(800.0, 600.0);

        assert_eq!(
            viewport.clamp(Coordinate::new(-30.0, -30.0)),
            Coordinate::new(8.0, 8.0)
        );
        assert_eq!(
            viewport.clamp(Coordinate::new(5_000.0, 5_000.0)),
            Coordinate::new(728.0, 528.0)
        );
        assert_eq!(
            viewport.clamp(Coordinate::new(300.0, 200.0)),
            Coordinate::new(300.0, 200.0)
        );
    }

    #[test]
    fn default_anchor_sits_in_bottom_right_corner() {
        let viewport = Viewport::new(1280.0, 720.0);
        assert_eq!(viewport.default_anchor(), Coordinate::new(1200.0, 640.0));
    }

    #[test]
    fn manhattan_distance_sums_both_axes() {
        let start = Coordinate::new(10.0, 10.0);
        assert_eq!(start.manhattan_distance(Coordinate::new(12.0, 7.0)), 5.0);
    }
}
