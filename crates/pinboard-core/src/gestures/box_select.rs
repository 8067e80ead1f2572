use super::{Gesture, GestureContext, PointerSession};
use crate::input::{MouseButton, PointerArgs, PointerId};
use crate::item::{Item, ItemId};
use crate::surface::{Invalidation, Surface};
use kurbo::Rect;
use uuid::Uuid;

/// ID of the rubber-band rectangle item shown while box-selecting.
pub const OVERLAY_ID: ItemId = Uuid::from_u128(0x6a1f_52c0_3b7e_4d1a_9c55_0e2b_b0c5_e1ec);

/// Rubber-band selection.
#[derive(Debug, Default)]
pub struct BoxSelectGesture {
    /// Active drag; `data` records whether the overlay was added.
    session: Option<PointerSession<bool>>,
}

impl BoxSelectGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a box selection is in progress.
    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    /// Drop the session for `pointer`, removing the overlay once.
    fn finish(&mut self, surface: &mut Surface, pointer: PointerId) {
        if self.session.as_ref().is_none_or(|session| session.pointer != pointer) {
            return;
        }
        if let Some(session) = self.session.take() {
            if session.data {
                surface.remove_item(OVERLAY_ID);
            }
            log::debug!("Box select finished");
        }
    }
}

impl Gesture for BoxSelectGesture {
    fn name(&self) -> &'static str {
        "box_select"
    }

    fn pointer_pressed(&mut self, ctx: &mut GestureContext<'_>, args: PointerArgs, button: MouseButton) {
        if button != ctx.config.box_select_button || ctx.is_captured() {
            return;
        }
        if ctx.capture() {
            self.session = Some(PointerSession::new(args.pointer, args.position, false));
            log::debug!("Box select started at {:?}", args.position);
        }
    }

    fn pointer_moved(&mut self, ctx: &mut GestureContext<'_>, args: PointerArgs) {
        let Some(session) = self.session.as_mut().filter(|session| session.pointer == args.pointer) else {
            return;
        };

        let rect = Rect::from_points(session.start, args.position);
        let surface = &mut *ctx.surface;
        if session.data {
            surface.set_item_bounds(OVERLAY_ID, rect);
        } else {
            surface.add_item(Item::with_id(OVERLAY_ID, rect).selectable(false).movable(false));
            session.data = true;
        }

        let additive = args.modifiers == ctx.config.select_many_modifiers;
        let mut changed = Vec::new();
        for item in surface.items_mut().filter(|item| item.is_selectable()) {
            let selected = (additive && item.is_selected()) || item.intersects_surface_rect(rect);
            if selected != item.is_selected() {
                item.set_selected(selected);
                changed.push(item.id());
            }
        }
        for id in changed {
            surface.invalidate(Invalidation::Item(id));
        }
    }

    fn pointer_released(&mut self, ctx: &mut GestureContext<'_>, args: PointerArgs, _button: MouseButton) {
        self.finish(ctx.surface, args.pointer);
    }

    fn capture_lost(&mut self, ctx: &mut GestureContext<'_>, pointer: PointerId) {
        self.finish(ctx.surface, pointer);
    }
}
