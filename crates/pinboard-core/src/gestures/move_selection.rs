use super::{Gesture, GestureContext, PointerSession, SELECT_BUTTON};
use crate::input::{MouseButton, PointerArgs, PointerId};
use crate::item::ItemId;
use crate::snap::{SnapMode, anchor_point, snap_anchor};
use crate::transform::{union_rects, vector_to_local};
use kurbo::{Point, Rect};

/// Press-time snapshot of a drag.
#[derive(Debug, Clone, PartialEq)]
struct MoveState {
    /// Selected, movable items and their offsets at press time.
    origins: Vec<(ItemId, Point)>,
    /// Union of those items' bounds at press time.
    union: Rect,
}

/// Drags every selected, movable item, optionally snapping the selection.
#[derive(Debug, Default)]
pub struct MoveSelectionGesture {
    session: Option<PointerSession<MoveState>>,
}

impl MoveSelectionGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    fn stop(&mut self, pointer: PointerId) {
        if self.session.as_ref().is_some_and(|session| session.pointer == pointer) {
            self.session = None;
            log::debug!("Move finished");
        }
    }
}

impl Gesture for MoveSelectionGesture {
    fn name(&self) -> &'static str {
        "move_selection"
    }

    fn pointer_pressed(&mut self, ctx: &mut GestureContext<'_>, args: PointerArgs, button: MouseButton) {
        if button != SELECT_BUTTON {
            return;
        }

        // Items are direct children of the surface, so the hit target is the
        // only candidate on its ancestor chain.
        let grabbed = ctx
            .surface
            .hit_target(args.position)
            .and_then(|id| ctx.surface.item(id))
            .is_some_and(|item| item.is_selected() && item.is_movable());
        if !grabbed {
            return;
        }
        if !ctx.capture() {
            log::debug!("Move denied: pointer already captured");
            return;
        }

        let dragged: Vec<_> = ctx
            .surface
            .items()
            .iter()
            .filter(|item| item.is_selected() && item.is_movable())
            .collect();
        let origins = dragged.iter().map(|item| (item.id(), item.offset())).collect();
        let Some(union) = union_rects(dragged.iter().map(|item| item.bounds())) else {
            return;
        };

        log::debug!("Move started with {} item(s)", dragged.len());
        self.session = Some(PointerSession::new(
            args.pointer,
            args.position,
            MoveState { origins, union },
        ));
    }

    fn pointer_moved(&mut self, ctx: &mut GestureContext<'_>, args: PointerArgs) {
        let Some(session) = self.session.as_ref().filter(|session| session.pointer == args.pointer) else {
            return;
        };

        let delta = args.position - session.start;
        let mode = ctx.config.snap_mode;
        let anchor = match mode {
            SnapMode::None => None,
            mode => match anchor_point(session.data.union, mode) {
                Ok(anchor) => Some(anchor),
                Err(err) => {
                    log::warn!("{err}");
                    return;
                }
            },
        };

        for &(id, origin) in &session.data.origins {
            let Some(item) = ctx.surface.item(id) else {
                continue;
            };
            let Some(local_delta) = vector_to_local(item.transform(), delta) else {
                log::debug!("Skipping item {id} with singular transform");
                continue;
            };
            let offset = match anchor {
                None => origin + local_delta,
                Some(anchor) => {
                    let snapped = snap_anchor(anchor + local_delta, &ctx.config.snap_grid);
                    snapped + (origin - anchor)
                }
            };
            ctx.surface.set_item_offset(id, offset);
        }
    }

    fn pointer_released(&mut self, _ctx: &mut GestureContext<'_>, args: PointerArgs, _button: MouseButton) {
        self.stop(args.pointer);
    }

    fn capture_lost(&mut self, _ctx: &mut GestureContext<'_>, pointer: PointerId) {
        self.stop(pointer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use crate::input::Modifiers;
    use crate::item::Item;
    use crate::snap::SnapGrid;
    use crate::surface::Surface;
    use kurbo::{Affine, Size};
    use std::collections::HashMap;

    fn args(x: f64, y: f64) -> PointerArgs {
        PointerArgs {
            pointer: PointerId::MOUSE,
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    fn drag(surface: &mut Surface, config: &BoardConfig, from: (f64, f64), to: &[(f64, f64)]) -> MoveSelectionGesture {
        let mut gesture = MoveSelectionGesture::new();
        let mut captures = HashMap::new();
        let mut ctx = GestureContext::new(surface, config, &mut captures, 0, Some(PointerId::MOUSE));
        gesture.pointer_pressed(&mut ctx, args(from.0, from.1), MouseButton::Left);
        for &(x, y) in to {
            gesture.pointer_moved(&mut ctx, args(x, y));
        }
        gesture
    }

    fn selected(bounds: Rect) -> Item {
        let mut item = Item::new(bounds);
        item.set_selected(true);
        item
    }

    fn assert_offset(surface: &Surface, id: ItemId, x: f64, y: f64) {
        let offset = surface.item(id).unwrap().offset();
        assert!((offset.x - x).abs() < 1e-9, "{offset:?}");
        assert!((offset.y - y).abs() < 1e-9, "{offset:?}");
    }

    #[test]
    fn test_drag_moves_all_selected_movable() {
        let mut surface = Surface::default();
        let a = surface.add_item(selected(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let b = surface.add_item(selected(Rect::new(50.0, 0.0, 60.0, 10.0)));
        let pinned = surface.add_item(selected(Rect::new(100.0, 0.0, 110.0, 10.0)).movable(false));
        let idle = surface.add_item(Item::new(Rect::new(200.0, 0.0, 210.0, 10.0)));

        let gesture = drag(&mut surface, &BoardConfig::default(), (5.0, 5.0), &[(10.0, 8.0), (25.0, 15.0)]);
        assert!(gesture.is_dragging());
        assert_offset(&surface, a, 20.0, 10.0);
        assert_offset(&surface, b, 70.0, 10.0);
        assert_offset(&surface, pinned, 100.0, 0.0);
        assert_offset(&surface, idle, 200.0, 0.0);
    }

    #[test]
    fn test_press_on_unselected_is_noop() {
        let mut surface = Surface::default();
        let id = surface.add_item(Item::new(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let gesture = drag(&mut surface, &BoardConfig::default(), (5.0, 5.0), &[(20.0, 20.0)]);
        assert!(!gesture.is_dragging());
        assert_offset(&surface, id, 0.0, 0.0);
    }

    #[test]
    fn test_press_on_unselectable_cover_is_noop() {
        let mut surface = Surface::default();
        surface.add_item(selected(Rect::new(0.0, 0.0, 10.0, 10.0)));
        surface.add_item(Item::new(Rect::new(0.0, 0.0, 10.0, 10.0)).selectable(false));
        let gesture = drag(&mut surface, &BoardConfig::default(), (5.0, 5.0), &[]);
        assert!(!gesture.is_dragging());
    }

    #[test]
    fn test_scaled_item_moves_in_local_units() {
        let mut surface = Surface::default();
        let id = surface.add_item(selected(Rect::new(0.0, 0.0, 100.0, 100.0)).with_transform(Affine::scale(2.0)));
        drag(&mut surface, &BoardConfig::default(), (50.0, 50.0), &[(70.0, 90.0)]);
        assert_offset(&surface, id, 10.0, 20.0);
    }

    #[test]
    fn test_snap_top_left() {
        let mut surface = Surface::default();
        let a = surface.add_item(selected(Rect::new(3.0, 4.0, 13.0, 14.0)));
        let b = surface.add_item(selected(Rect::new(23.0, 24.0, 33.0, 34.0)));
        let config = BoardConfig::default()
            .with_snap_mode(SnapMode::TopLeft)
            .with_snap_grid(SnapGrid::new(Point::ZERO, Size::new(10.0, 10.0)));

        drag(&mut surface, &config, (5.0, 5.0), &[(13.0, 12.0)]);
        // Anchor (3, 4) + (8, 7) = (11, 11) snaps to (10, 10).
        assert_offset(&surface, a, 10.0, 10.0);
        assert_offset(&surface, b, 30.0, 30.0);
    }

    #[test]
    fn test_snap_center_with_zero_cell_axis() {
        let mut surface = Surface::default();
        let id = surface.add_item(selected(Rect::new(0.0, 0.0, 20.0, 20.0)));
        let config = BoardConfig::default()
            .with_snap_mode(SnapMode::Center)
            .with_snap_grid(SnapGrid::new(Point::new(5.0, 0.0), Size::new(50.0, 0.0)));

        drag(&mut surface, &config, (10.0, 10.0), &[(41.0, 13.4)]);
        // Centre (10, 10) + (31, 3.4) = (41, 13.4) -> (55, 13) after snapping and rounding.
        assert_offset(&surface, id, 45.0, 3.0);
    }

    #[test]
    fn test_release_stops_tracking() {
        let mut surface = Surface::default();
        let id = surface.add_item(selected(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let config = BoardConfig::default();
        let mut gesture = drag(&mut surface, &config, (5.0, 5.0), &[(6.0, 5.0)]);
        let mut captures = HashMap::new();
        let mut ctx = GestureContext::new(&mut surface, &config, &mut captures, 0, Some(PointerId::MOUSE));
        gesture.pointer_released(&mut ctx, args(6.0, 5.0), MouseButton::Left);
        gesture.pointer_moved(&mut ctx, args(50.0, 50.0));
        assert!(!gesture.is_dragging());
        assert_offset(&surface, id, 1.0, 0.0);
    }
}
