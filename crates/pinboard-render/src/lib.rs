//! Pinboard Render Library
//!
//! Renderer-neutral layout for the perspective-scaled background grid. The
//! output is a list of strokes in grid-local coordinates plus the snap lattice
//! that matches them; drawing them is left to the host.

pub mod grid;

pub use grid::{
    BackgroundGrid, GridFrame, GridLine, GridLines, GridPass, GridStroke, SerializableColor,
    DEFAULT_MAJOR_SEPARATION, DEFAULT_MAJOR_THICKNESS, DEFAULT_MINOR_COUNT, MAX_GRID_LINES,
};
