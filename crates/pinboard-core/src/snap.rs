//! Snap functionality for aligning a selection to a grid.

use crate::error::{GestureError, GestureResult};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Default snap cell size.
pub const DEFAULT_CELL_SIZE: f64 = 50.0;

/// Which reference point of a selection's bounding box is aligned to the
/// grid. If several items are selected, the smallest box containing all of
/// them is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SnapMode {
    /// No snapping.
    #[default]
    None,
    /// Align the top left corner.
    TopLeft,
    /// Align the top right corner.
    TopRight,
    /// Align the bottom left corner.
    BottomLeft,
    /// Align the bottom right corner.
    BottomRight,
    /// Align the centre.
    Center,
}

impl SnapMode {
    /// Cycle to the next snap mode.
    pub fn next(self) -> Self {
        match self {
            SnapMode::None => SnapMode::TopLeft,
            SnapMode::TopLeft => SnapMode::TopRight,
            SnapMode::TopRight => SnapMode::BottomLeft,
            SnapMode::BottomLeft => SnapMode::BottomRight,
            SnapMode::BottomRight => SnapMode::Center,
            SnapMode::Center => SnapMode::None,
        }
    }

    /// Check if any snapping is enabled.
    pub fn is_enabled(self) -> bool {
        self != SnapMode::None
    }
}

/// A rectangular snap lattice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapGrid {
    /// A point every lattice line passes through.
    pub origin: Point,
    /// Cell size; zero on an axis disables snapping on that axis.
    pub cell: Size,
}

impl Default for SnapGrid {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            cell: Size::new(DEFAULT_CELL_SIZE, DEFAULT_CELL_SIZE),
        }
    }
}

impl SnapGrid {
    /// Create a snap grid.
    pub fn new(origin: Point, cell: Size) -> Self {
        Self { origin, cell }
    }

    /// Create a snap grid from a rectangle whose origin is the grid origin and
    /// whose size is the cell size.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.origin(), rect.size())
    }
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

fn snap_axis(value: f64, origin: f64, cell: f64) -> Option<f64> {
    if cell == 0.0 {
        return None;
    }
    Some(((value - origin) / cell).round_ties_even() * cell + origin)
}

/// Snap a point to the nearest lattice intersection of `grid`.
pub fn snap_to_grid(point: Point, grid: &SnapGrid) -> SnapResult {
    let x = snap_axis(point.x, grid.origin.x, grid.cell.width);
    let y = snap_axis(point.y, grid.origin.y, grid.cell.height);

    SnapResult {
        point: Point::new(x.unwrap_or(point.x), y.unwrap_or(point.y)),
        snapped_x: x.is_some(),
        snapped_y: y.is_some(),
    }
}

/// Snap a point to `grid`, passing through axes with a zero cell size.
pub fn snap(point: Point, grid: &SnapGrid) -> Point {
    snap_to_grid(point, grid).point
}

/// The reference point of `bounds` selected by `mode`.
///
/// Asking for the anchor of [`SnapMode::None`] is a contract violation.
pub fn anchor_point(bounds: Rect, mode: SnapMode) -> GestureResult<Point> {
    match mode {
        SnapMode::TopLeft => Ok(Point::new(bounds.x0, bounds.y0)),
        SnapMode::TopRight => Ok(Point::new(bounds.x1, bounds.y0)),
        SnapMode::BottomLeft => Ok(Point::new(bounds.x0, bounds.y1)),
        SnapMode::BottomRight => Ok(Point::new(bounds.x1, bounds.y1)),
        SnapMode::Center => Ok(bounds.center()),
        SnapMode::None => Err(GestureError::InvalidArgument(
            "snap mode must not be None to find a snap anchor".to_string(),
        )),
    }
}

/// Snap an anchor to `grid` and round it to whole units.
///
/// Hosts round layout offsets when they place items; rounding here keeps a
/// snapped selection from wiggling between neighbouring pixels.
pub fn snap_anchor(anchor: Point, grid: &SnapGrid) -> Point {
    let result = snap_to_grid(anchor, grid);
    if !result.is_snapped() {
        log::debug!("Snap grid {grid:?} has no cells; anchor left on its own lattice");
    }
    Point::new(result.point.x.round_ties_even(), result.point.y.round_ties_even())
}
