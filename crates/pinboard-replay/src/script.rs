//! Script format.
//!
//! A script describes a board, the items on it, and a list of steps. Steps are
//! either raw pointer events (tagged like [`PointerEvent`]) or host commands.

use crate::error::{ReplayError, ReplayResult};
use kurbo::{Rect, Size};
use pinboard_core::{BoardConfig, PointerEvent, SnapMode};
use pinboard_render::BackgroundGrid;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A complete replay script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Board size.
    pub viewport: Size,
    #[serde(default)]
    pub config: BoardConfig,
    /// Optional background grid.
    #[serde(default)]
    pub grid: Option<GridSpec>,
    #[serde(default)]
    pub items: Vec<ItemSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    /// Parse a script from JSON.
    pub fn from_json(json: &str) -> ReplayResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a script file.
    pub fn load(path: &Path) -> ReplayResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// A named item placed on the board before the first step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub name: String,
    pub bounds: Rect,
    #[serde(default = "default_true")]
    pub selectable: bool,
    #[serde(default = "default_true")]
    pub movable: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub z_index: i64,
    /// SVG path data in item-local coordinates, used for hit testing.
    #[serde(default)]
    pub path: Option<String>,
}

fn default_true() -> bool {
    true
}

impl ItemSpec {
    /// Parse the optional path outline.
    pub fn outline(&self) -> ReplayResult<Option<kurbo::BezPath>> {
        self.path
            .as_deref()
            .map(|svg| {
                kurbo::BezPath::from_svg(svg)
                    .map_err(|err| ReplayError::Parse(format!("path of item {}: {err}", self.name)))
            })
            .transpose()
    }
}

/// Background grid placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Layout box of the grid item.
    pub bounds: Rect,
    #[serde(default)]
    pub settings: BackgroundGrid,
    /// Feed each frame's snap lattice into the move gesture.
    #[serde(default)]
    pub drive_snap_grid: bool,
}

/// One replay step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Pointer(PointerEvent),
    Command(Command),
}

/// Host-side operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    FitToChildren {
        #[serde(default)]
        margin: f64,
    },
    FitToRect {
        rect: Rect,
    },
    FitToRectWithViewport {
        rect: Rect,
        viewport: Rect,
    },
    ResetView,
    SetZoom {
        zoom: f64,
    },
    /// Host layout moved or resized a named item.
    Relayout {
        item: String,
        bounds: Rect,
    },
    Resize {
        size: Size,
    },
    SetSnapMode {
        mode: SnapMode,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinboard_core::MouseButton;

    #[test]
    fn test_parse_mixed_steps() {
        let script = Script::from_json(
            r#"{
                "viewport": { "width": 800.0, "height": 600.0 },
                "items": [
                    { "name": "a", "bounds": { "x0": 0.0, "y0": 0.0, "x1": 10.0, "y1": 10.0 } }
                ],
                "steps": [
                    { "type": "pressed", "position": { "x": 1.0, "y": 2.0 }, "button": "Left" },
                    { "type": "fit_to_children", "margin": 4.0 },
                    { "type": "reset_view" },
                    { "type": "set_snap_mode", "mode": "Center" }
                ]
            }"#,
        )
        .unwrap();

        assert!(script.items[0].selectable);
        assert!(script.items[0].movable);
        assert!(matches!(
            script.steps[0],
            Step::Pointer(PointerEvent::Pressed {
                button: MouseButton::Left,
                ..
            })
        ));
        assert_eq!(script.steps[1], Step::Command(Command::FitToChildren { margin: 4.0 }));
        assert_eq!(script.steps[2], Step::Command(Command::ResetView));
        assert_eq!(
            script.steps[3],
            Step::Command(Command::SetSnapMode { mode: SnapMode::Center })
        );
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Script::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ReplayError::Parse(_)));
    }

    #[test]
    fn test_outline() {
        let spec = ItemSpec {
            name: "tri".to_string(),
            bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
            selectable: true,
            movable: true,
            selected: false,
            z_index: 0,
            path: Some("M0 0 L10 0 L0 10 Z".to_string()),
        };
        assert!(spec.outline().unwrap().is_some());

        let broken = ItemSpec {
            path: Some("M0 0 Q".to_string()),
            ..spec
        };
        assert!(matches!(broken.outline(), Err(ReplayError::Parse(_))));
    }
}
