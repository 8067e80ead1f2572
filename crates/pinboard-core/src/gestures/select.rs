use super::{Gesture, GestureContext, SELECT_BUTTON};
use crate::input::{MouseButton, PointerArgs};
use crate::surface::Invalidation;

/// Click-to-select.
///
/// Picks the topmost selectable item under the pointer and raises it above
/// everything it raised before. Never captures, so the move gesture can pick
/// up a drag on the same press.
#[derive(Debug)]
pub struct SelectGesture {
    /// Z-index handed to the next selected item.
    next_z_index: i64,
}

impl Default for SelectGesture {
    fn default() -> Self {
        Self { next_z_index: 1 }
    }
}

impl SelectGesture {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Gesture for SelectGesture {
    fn name(&self) -> &'static str {
        "select"
    }

    fn pointer_pressed(&mut self, ctx: &mut GestureContext<'_>, args: PointerArgs, button: MouseButton) {
        if button != SELECT_BUTTON {
            return;
        }

        let surface = &mut *ctx.surface;
        let hit = surface.topmost_selectable_at(args.position);
        if let Some(id) = hit {
            if surface.item(id).is_some_and(|item| item.is_selected()) {
                log::debug!("Item {id} already selected");
                return;
            }
        }

        if args.modifiers != ctx.config.select_many_modifiers {
            let mut cleared = Vec::new();
            for item in surface.items_mut() {
                if item.is_selected() {
                    item.set_selected(false);
                    cleared.push(item.id());
                }
            }
            for id in cleared {
                surface.invalidate(Invalidation::Item(id));
            }
        }

        let Some(id) = hit else {
            return;
        };
        if let Some(item) = surface.item_mut(id) {
            item.set_z_index(self.next_z_index);
            item.set_selected(true);
            self.next_z_index += 1;
            surface.invalidate(Invalidation::Item(id));
            log::debug!("Selected item {id}");
        }
    }
}
