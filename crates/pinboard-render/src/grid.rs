//! Logarithmic background grid.
//!
//! Line spacing follows the zoom level in powers of the minor line count, so
//! the number of visible lines stays bounded however far the view is zoomed.
//! Minor lines fade between subdivision levels instead of popping in.

use kurbo::{Affine, Line, Point, Rect, Size, Vec2};
use peniko::Color;
use pinboard_core::item::ItemId;
use pinboard_core::snap::SnapGrid;
use pinboard_core::surface::Surface;
use pinboard_core::transform::surface_to_local;
use serde::{Deserialize, Serialize};

/// Default distance between major lines.
pub const DEFAULT_MAJOR_SEPARATION: f64 = 200.0;
/// Default number of minor subdivisions per major cell.
pub const DEFAULT_MINOR_COUNT: u32 = 4;
/// Default major line thickness.
pub const DEFAULT_MAJOR_THICKNESS: f64 = 5.0;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn gray() -> Self {
        Self::new(128, 128, 128, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// One grid line along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLine {
    /// Coordinate along the axis, in grid-local units.
    pub position: f64,
    /// Whether the line falls on a major division.
    pub is_major: bool,
}

/// Upper bound on the lines produced by one [`GridLines`] sequence.
pub const MAX_GRID_LINES: u64 = 1 << 16;

/// Lazy sequence of grid lines over `[start, end)`.
#[derive(Debug, Clone)]
pub struct GridLines {
    /// Grid index of the first line.
    first: f64,
    index: u64,
    count: u64,
    spacing: f64,
    minor_count: u32,
}

impl GridLines {
    fn empty(minor_count: u32) -> Self {
        Self {
            first: 0.0,
            index: 0,
            count: 0,
            spacing: 1.0,
            minor_count,
        }
    }
}

impl Iterator for GridLines {
    type Item = GridLine;

    fn next(&mut self) -> Option<GridLine> {
        if self.index >= self.count {
            return None;
        }
        let grid_index = self.first + self.index as f64;
        self.index += 1;
        Some(GridLine {
            position: grid_index * self.spacing,
            is_major: grid_index.rem_euclid(f64::from(self.minor_count)) == 0.0,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.count - self.index).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridLines {}

/// Background grid settings and layout math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundGrid {
    /// Distance between major lines at scale 1.
    pub major_separation: f64,
    /// Minor subdivisions per major cell. Values below 2 behave as 2.
    pub minor_count: u32,
    /// Major line thickness as seen on the surface.
    pub major_thickness: f64,
    /// Line color.
    pub line_color: SerializableColor,
}

impl Default for BackgroundGrid {
    fn default() -> Self {
        Self {
            major_separation: DEFAULT_MAJOR_SEPARATION,
            minor_count: DEFAULT_MINOR_COUNT,
            major_thickness: DEFAULT_MAJOR_THICKNESS,
            line_color: SerializableColor::gray(),
        }
    }
}

impl BackgroundGrid {
    pub fn with_major_separation(mut self, separation: f64) -> Self {
        self.major_separation = separation;
        self
    }

    pub fn with_minor_count(mut self, count: u32) -> Self {
        self.minor_count = count;
        self
    }

    pub fn with_major_thickness(mut self, thickness: f64) -> Self {
        self.major_thickness = thickness;
        self
    }

    pub fn with_line_color(mut self, color: impl Into<SerializableColor>) -> Self {
        self.line_color = color.into();
        self
    }

    fn count(&self) -> u32 {
        self.minor_count.max(2)
    }

    fn log_scale(&self, scale: f64) -> f64 {
        scale.ln() / f64::from(self.count()).ln()
    }

    /// Distance between adjacent lines at `scale`.
    pub fn spacing(&self, scale: f64) -> f64 {
        let level = self.log_scale(scale).round_ties_even();
        self.major_separation * f64::from(self.count()).powf(level - 1.0)
    }

    /// Lines covering `[start, end)` at `scale`, beginning at the last grid
    /// position at or before `start`.
    pub fn lines(&self, start: f64, end: f64, scale: f64) -> GridLines {
        let spacing = self.spacing(scale);
        if !(spacing.is_finite() && spacing > 0.0) || !start.is_finite() || !end.is_finite() {
            log::debug!("Empty grid line range: start {start}, end {end}, spacing {spacing}");
            return GridLines::empty(self.count());
        }
        let first = (start / spacing).floor();
        let span = ((end - first * spacing) / spacing).ceil();
        if span > MAX_GRID_LINES as f64 {
            log::warn!("Grid line range [{start}, {end}) clamped to {MAX_GRID_LINES} lines");
        }
        GridLines {
            first,
            index: 0,
            count: span.clamp(0.0, MAX_GRID_LINES as f64) as u64,
            spacing,
            minor_count: self.count(),
        }
    }

    /// Minor line thickness relative to major lines, in `[0, 1]`.
    pub fn minor_line_thickness_scale(&self, scale: f64) -> f64 {
        let count = f64::from(self.count());
        let phase = (-self.log_scale(scale) - 0.5).rem_euclid(1.0);
        (count.powf(phase) - 1.0) / (count - 1.0)
    }

    /// Snap lattice matching the lines drawn at the given per-axis scales.
    pub fn snap_grid(&self, origin: Point, x_scale: f64, y_scale: f64) -> SnapGrid {
        SnapGrid::new(origin, Size::new(self.spacing(x_scale), self.spacing(y_scale)))
    }

    /// Lay out one frame for a grid item occupying `bounds` with render
    /// transform `transform` on a surface of `surface_size`.
    ///
    /// Returns `None` for an empty surface or a singular transform.
    pub fn frame(&self, surface_size: Size, bounds: Rect, transform: Affine) -> Option<GridFrame> {
        if !(surface_size.width > 0.0 && surface_size.height > 0.0) {
            return None;
        }
        let to_local = surface_to_local(bounds, transform)?;
        let visible = to_local.transform_rect_bbox(Rect::from_origin_size(Point::ZERO, surface_size));
        let render_scale = Vec2::new(
            visible.width() / surface_size.width,
            visible.height() / surface_size.height,
        );

        let major_x = self.major_thickness * render_scale.x;
        let minor_x = major_x * self.minor_line_thickness_scale(render_scale.x);
        let major_y = self.major_thickness * render_scale.y;
        let minor_y = major_y * self.minor_line_thickness_scale(render_scale.y);

        let vertical = self.lines(visible.x0, visible.x1, render_scale.x).map(|line| GridStroke {
            line: Line::new((line.position, visible.y0), (line.position, visible.y1)),
            width: if line.is_major { major_x } else { minor_x },
            is_major: line.is_major,
        });
        let horizontal = self.lines(visible.y0, visible.y1, render_scale.y).map(|line| GridStroke {
            line: Line::new((visible.x0, line.position), (visible.x1, line.position)),
            width: if line.is_major { major_y } else { minor_y },
            is_major: line.is_major,
        });

        Some(GridFrame {
            visible,
            render_scale,
            strokes: vertical.chain(horizontal).collect(),
            snap_grid: self.snap_grid(bounds.origin(), render_scale.x, render_scale.y),
            color: self.line_color.into(),
        })
    }
}

/// A stroke to draw in grid-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStroke {
    pub line: Line,
    pub width: f64,
    pub is_major: bool,
}

/// Everything a renderer needs to draw the grid for one frame.
#[derive(Debug, Clone)]
pub struct GridFrame {
    /// Surface box mapped into grid-local space.
    pub visible: Rect,
    /// Grid-local units per surface unit, per axis.
    pub render_scale: Vec2,
    /// Vertical strokes first, then horizontal.
    pub strokes: Vec<GridStroke>,
    /// Snap lattice matching this frame's lines.
    pub snap_grid: SnapGrid,
    pub color: Color,
}

/// Per-frame grid layout for a grid item living on a surface.
#[derive(Debug, Clone, Default)]
pub struct GridPass {
    pub grid: BackgroundGrid,
    /// Snap lattice published by the most recent frame.
    last_snap_grid: Option<SnapGrid>,
}

impl GridPass {
    pub fn new(grid: BackgroundGrid) -> Self {
        Self {
            grid,
            last_snap_grid: None,
        }
    }

    /// Lay out the grid for `grid_item` on `surface`.
    pub fn run(&mut self, surface: &Surface, grid_item: ItemId) -> Option<GridFrame> {
        let Some(item) = surface.item(grid_item) else {
            log::debug!("Grid item {grid_item} not on surface");
            return None;
        };
        let frame = self.grid.frame(surface.size(), item.bounds(), item.transform())?;
        log::debug!(
            "Grid frame: {} strokes at scale {:?}",
            frame.strokes.len(),
            frame.render_scale
        );
        self.last_snap_grid = Some(frame.snap_grid);
        Some(frame)
    }

    pub fn last_snap_grid(&self) -> Option<SnapGrid> {
        self.last_snap_grid
    }
}
