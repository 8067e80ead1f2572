use super::{Gesture, GestureContext, PointerSession};
use crate::input::{MouseButton, PointerArgs, PointerId};
use crate::surface::Invalidation;
use crate::transform::vector_to_local;
use kurbo::{Affine, Point, Vec2};

/// Translates every item together.
///
/// Each move composes the incremental delta onto the item transforms, so
/// panning and zooming can interleave freely.
#[derive(Debug, Default)]
pub struct PanGesture {
    /// Active pan; `data` is the position seen by the previous move.
    session: Option<PointerSession<Point>>,
    /// Pan accumulated by the current or most recent session.
    total: Vec2,
}

impl PanGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface-space pan accumulated by the current or most recent session.
    pub fn current_pan(&self) -> Vec2 {
        self.total
    }

    /// Check if a pan is in progress.
    pub fn is_panning(&self) -> bool {
        self.session.is_some()
    }

    fn stop(&mut self, pointer: PointerId) {
        if self.session.as_ref().is_some_and(|session| session.pointer == pointer) {
            self.session = None;
            log::debug!("Pan finished at {:?}", self.total);
        }
    }
}

impl Gesture for PanGesture {
    fn name(&self) -> &'static str {
        "pan"
    }

    fn pointer_pressed(&mut self, ctx: &mut GestureContext<'_>, args: PointerArgs, button: MouseButton) {
        if button != ctx.config.pan_button || ctx.surface.is_empty() {
            return;
        }
        if ctx.capture() {
            self.session = Some(PointerSession::new(args.pointer, args.position, args.position));
            self.total = Vec2::ZERO;
            log::debug!("Pan started at {:?}", args.position);
        }
    }

    fn pointer_moved(&mut self, ctx: &mut GestureContext<'_>, args: PointerArgs) {
        let Some(session) = self.session.as_mut().filter(|session| session.pointer == args.pointer) else {
            return;
        };

        let delta = args.position - session.data;
        session.data = args.position;
        self.total += delta;

        let mut changed = Vec::new();
        for item in ctx.surface.items_mut() {
            match vector_to_local(item.transform(), delta) {
                Some(local) => {
                    item.set_transform(item.transform() * Affine::translate(local));
                    changed.push(item.id());
                }
                None => log::debug!("Skipping item {} with singular transform", item.id()),
            }
        }
        for id in changed {
            ctx.surface.invalidate(Invalidation::Item(id));
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
    use crate::surface::Surface;
    use kurbo::Rect;
    use std::collections::HashMap;

    fn args(x: f64, y: f64) -> PointerArgs {
        PointerArgs {
            pointer: PointerId::MOUSE,
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    fn assert_affine_eq(a: Affine, b: Affine) {
        for (x, y) in a.as_coeffs().iter().zip(b.as_coeffs().iter()) {
            assert!((x - y).abs() < 1e-9, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_pan_translates_visually() {
        let mut surface = Surface::default();
        let plain = surface.add_item(Item::new(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let zoomed = surface.add_item(Item::new(Rect::new(0.0, 0.0, 10.0, 10.0)).with_transform(Affine::scale(3.0)));
        let config = BoardConfig::default();
        let mut captures = HashMap::new();
        let mut gesture = PanGesture::new();
        let local = Point::new(1.0, 1.0);
        let before: Vec<Point> = [plain, zoomed]
            .iter()
            .map(|&id| surface.item(id).unwrap().local_to_surface() * local)
            .collect();
        let mut ctx = GestureContext::new(&mut surface, &config, &mut captures, 0, Some(PointerId::MOUSE));

        gesture.pointer_pressed(&mut ctx, args(0.0, 0.0), MouseButton::Middle);
        assert!(gesture.is_panning());
        gesture.pointer_moved(&mut ctx, args(4.0, 1.0));
        gesture.pointer_moved(&mut ctx, args(12.0, 6.0));
        assert_eq!(gesture.current_pan(), Vec2::new(12.0, 6.0));

        for (id, before) in [plain, zoomed].into_iter().zip(before) {
            let moved = surface.item(id).unwrap().local_to_surface() * local - before;
            assert!((moved.x - 12.0).abs() < 1e-9, "{moved:?}");
            assert!((moved.y - 6.0).abs() < 1e-9, "{moved:?}");
        }
    }

    #[test]
    fn test_pan_there_and_back_restores_transforms() {
        let mut surface = Surface::default();
        let original = Affine::rotate(0.3) * Affine::scale(1.5);
        let id = surface.add_item(Item::new(Rect::new(0.0, 0.0, 10.0, 10.0)).with_transform(original));
        let config = BoardConfig::default();
        let mut captures = HashMap::new();
        let mut gesture = PanGesture::new();
        let mut ctx = GestureContext::new(&mut surface, &config, &mut captures, 0, Some(PointerId::MOUSE));

        gesture.pointer_pressed(&mut ctx, args(100.0, 100.0), MouseButton::Middle);
        gesture.pointer_moved(&mut ctx, args(130.0, 80.0));
        gesture.pointer_moved(&mut ctx, args(100.0, 100.0));
        gesture.pointer_released(&mut ctx, args(100.0, 100.0), MouseButton::Middle);

        assert!(!gesture.is_panning());
        assert_affine_eq(surface.item(id).unwrap().transform(), original);
    }

    #[test]
    fn test_pan_requires_items_and_button() {
        let mut surface = Surface::default();
        let config = BoardConfig::default();
        let mut captures = HashMap::new();
        let mut gesture = PanGesture::new();
        let mut ctx = GestureContext::new(&mut surface, &config, &mut captures, 0, Some(PointerId::MOUSE));
        gesture.pointer_pressed(&mut ctx, args(0.0, 0.0), MouseButton::Middle);
        assert!(!gesture.is_panning());

        ctx.surface.add_item(Item::new(Rect::new(0.0, 0.0, 1.0, 1.0)));
        gesture.pointer_pressed(&mut ctx, args(0.0, 0.0), MouseButton::Left);
        assert!(!gesture.is_panning());
        assert!(captures.is_empty());
    }
}
