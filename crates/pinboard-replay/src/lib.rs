//! Pinboard Replay Library
//!
//! Replays a JSON script of host events against a [`Board`] and reports the
//! resulting item state. Used for regression scripts and for poking at
//! gesture behaviour without a UI.

mod error;
mod script;

pub use error::{ReplayError, ReplayResult};
pub use script::{Command, GridSpec, ItemSpec, Script, Step};

use kurbo::{Rect, Vec2};
use pinboard_core::{Board, Item, ItemId, SnapGrid};
use pinboard_render::GridPass;
use serde::Serialize;
use std::collections::HashMap;

/// Name given to the background grid item.
pub const GRID_ITEM_NAME: &str = "grid";

/// Final state of one named item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemReport {
    pub name: String,
    pub bounds: Rect,
    /// Render transform coefficients `[a, b, c, d, e, f]`.
    pub transform: [f64; 6],
    pub selected: bool,
    pub z_index: i64,
}

/// Summary of the last grid frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridReport {
    pub render_scale: Vec2,
    pub major_strokes: usize,
    pub minor_strokes: usize,
    pub snap_grid: SnapGrid,
}

/// Outcome of a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub zoom: f64,
    pub pan: Vec2,
    pub items: Vec<ItemReport>,
    pub grid: Option<GridReport>,
    /// Re-render requests raised over the whole run.
    pub invalidations: usize,
}

/// Background grid attached to a replay.
#[derive(Debug)]
struct GridState {
    pass: GridPass,
    item: ItemId,
    drive_snap_grid: bool,
    last: Option<GridReport>,
}

/// A board under replay.
#[derive(Debug)]
pub struct Replay {
    board: Board,
    names: Vec<(String, ItemId)>,
    grid: Option<GridState>,
    invalidations: usize,
}

impl Replay {
    /// Build the board described by `script` without running any step.
    pub fn new(script: &Script) -> ReplayResult<Self> {
        let mut board = Board::new(script.viewport, script.config.clone());
        let mut names: Vec<(String, ItemId)> = Vec::new();

        let grid = match &script.grid {
            Some(spec) => {
                let item = Item::new(spec.bounds)
                    .selectable(false)
                    .movable(false)
                    .with_z_index(i64::MIN);
                let id = board.add_item(item);
                names.push((GRID_ITEM_NAME.to_string(), id));
                Some(GridState {
                    pass: GridPass::new(spec.settings.clone()),
                    item: id,
                    drive_snap_grid: spec.drive_snap_grid,
                    last: None,
                })
            }
            None => None,
        };

        for spec in &script.items {
            if names.iter().any(|(name, _)| *name == spec.name) {
                return Err(ReplayError::Parse(format!("duplicate item name {}", spec.name)));
            }
            let mut item = Item::new(spec.bounds)
                .selectable(spec.selectable)
                .movable(spec.movable)
                .with_z_index(spec.z_index);
            if let Some(path) = spec.outline()? {
                item = item.with_path(path);
            }
            item.set_selected(spec.selected);
            names.push((spec.name.clone(), board.add_item(item)));
        }

        let mut replay = Self {
            board,
            names,
            grid,
            invalidations: 0,
        };
        replay.after_step();
        Ok(replay)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Look up a named item.
    pub fn item_id(&self, name: &str) -> ReplayResult<ItemId> {
        self.names
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|&(_, id)| id)
            .ok_or_else(|| ReplayError::UnknownItem(name.to_string()))
    }

    /// Apply one step.
    pub fn apply(&mut self, step: &Step) -> ReplayResult<()> {
        match step {
            Step::Pointer(event) => self.board.handle_event(event),
            Step::Command(command) => self.command(command)?,
        }
        self.after_step();
        Ok(())
    }

    fn command(&mut self, command: &Command) -> ReplayResult<()> {
        log::debug!("Command {command:?}");
        match command {
            Command::FitToChildren { margin } => {
                self.board.fit_view_to_children(*margin);
            }
            Command::FitToRect { rect } => {
                self.board.fit_view_to_rect(*rect);
            }
            Command::FitToRectWithViewport { rect, viewport } => {
                self.board.fit_to_rect_with_viewport(*rect, *viewport);
            }
            Command::ResetView => self.board.reset_view(),
            Command::SetZoom { zoom } => self.board.set_current_zoom(*zoom)?,
            Command::Relayout { item, bounds } => {
                let id = self.item_id(item)?;
                self.board.relayout(id, *bounds);
            }
            Command::Resize { size } => self.board.resize(*size),
            Command::SetSnapMode { mode } => {
                let config = self.board.config().clone().with_snap_mode(*mode);
                self.board.set_config(config);
            }
        }
        Ok(())
    }

    /// Drain invalidations and refresh the grid, as a host frame would.
    fn after_step(&mut self) {
        self.invalidations += self.board.take_invalidations().len();

        let Some(grid) = self.grid.as_mut() else {
            return;
        };
        let Some(frame) = grid.pass.run(self.board.surface(), grid.item) else {
            return;
        };
        let major_strokes = frame.strokes.iter().filter(|stroke| stroke.is_major).count();
        grid.last = Some(GridReport {
            render_scale: frame.render_scale,
            major_strokes,
            minor_strokes: frame.strokes.len() - major_strokes,
            snap_grid: frame.snap_grid,
        });
        if grid.drive_snap_grid && self.board.config().snap_grid != frame.snap_grid {
            let config = self.board.config().clone().with_snap_grid(frame.snap_grid);
            self.board.set_config(config);
        }
    }

    /// Snapshot of the current state.
    pub fn report(&self) -> Report {
        let surface = self.board.surface();
        let items = self
            .names
            .iter()
            .filter_map(|(name, id)| {
                surface.item(*id).map(|item| ItemReport {
                    name: name.clone(),
                    bounds: item.bounds(),
                    transform: item.transform().as_coeffs(),
                    selected: item.is_selected(),
                    z_index: item.z_index(),
                })
            })
            .collect();

        Report {
            zoom: self.board.current_zoom(),
            pan: self.board.current_pan(),
            items,
            grid: self.grid.as_ref().and_then(|grid| grid.last.clone()),
            invalidations: self.invalidations,
        }
    }
}

/// Run every step of `script` and report the final state.
pub fn run(script: &Script) -> ReplayResult<Report> {
    let mut replay = Replay::new(script)?;
    for (index, step) in script.steps.iter().enumerate() {
        replay.apply(step).inspect_err(|err| log::warn!("Step {index} failed: {err}"))?;
    }
    Ok(replay.report())
}

/// Parse and run a JSON script.
pub fn run_json(json: &str) -> ReplayResult<Report> {
    run(&Script::from_json(json)?)
}

impl Report {
    /// Find a named item.
    pub fn item(&self, name: &str) -> Option<&ItemReport> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Serialize the report to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
