//! Gesture configuration.

use crate::input::{Modifiers, MouseButton};
use crate::snap::{SnapGrid, SnapMode};
use serde::{Deserialize, Serialize};

/// Default zoom speed.
pub const DEFAULT_ZOOM_SPEED: f64 = 1.0;

/// Settings shared by the gestures of one board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Modifier chord that makes select and box-select additive.
    pub select_many_modifiers: Modifiers,
    /// Button that starts a box selection.
    pub box_select_button: MouseButton,
    /// Button that starts panning.
    pub pan_button: MouseButton,
    /// Grid the move gesture snaps to.
    pub snap_grid: SnapGrid,
    /// Which anchor of the selection snaps to the grid.
    pub snap_mode: SnapMode,
    /// Wheel zoom sensitivity.
    pub zoom_speed: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            select_many_modifiers: Modifiers::SHIFT,
            box_select_button: MouseButton::Left,
            pan_button: MouseButton::Middle,
            snap_grid: SnapGrid::default(),
            snap_mode: SnapMode::None,
            zoom_speed: DEFAULT_ZOOM_SPEED,
        }
    }
}

impl BoardConfig {
    pub fn with_select_many_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.select_many_modifiers = modifiers;
        self
    }

    pub fn with_box_select_button(mut self, button: MouseButton) -> Self {
        self.box_select_button = button;
        self
    }

    pub fn with_pan_button(mut self, button: MouseButton) -> Self {
        self.pan_button = button;
        self
    }

    pub fn with_snap_grid(mut self, grid: SnapGrid) -> Self {
        self.snap_grid = grid;
        self
    }

    pub fn with_snap_mode(mut self, mode: SnapMode) -> Self {
        self.snap_mode = mode;
        self
    }

    pub fn with_zoom_speed(mut self, speed: f64) -> Self {
        self.zoom_speed = speed;
        self
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Size};

    #[test]
    fn test_defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.select_many_modifiers, Modifiers::SHIFT);
        assert_eq!(config.box_select_button, MouseButton::Left);
        assert_eq!(config.pan_button, MouseButton::Middle);
        assert_eq!(config.snap_mode, SnapMode::None);
        assert_eq!(config.snap_grid.cell, Size::new(50.0, 50.0));
        assert_eq!(config.zoom_speed, 1.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = BoardConfig::from_json(r#"{ "pan_button": "Right", "snap_mode": "Center" }"#).unwrap();
        assert_eq!(config.pan_button, MouseButton::Right);
        assert_eq!(config.snap_mode, SnapMode::Center);
        assert_eq!(config.box_select_button, MouseButton::Left);
    }

    #[test]
    fn test_builders_and_json() {
        let config = BoardConfig::default()
            .with_select_many_modifiers(Modifiers::CTRL)
            .with_snap_grid(SnapGrid::new(Point::new(5.0, 5.0), Size::new(10.0, 20.0)))
            .with_zoom_speed(0.5);
        let json = config.to_json().unwrap();
        assert_eq!(BoardConfig::from_json(&json).unwrap(), config);
    }
}
