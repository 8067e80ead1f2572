use super::{Gesture, GestureContext};
use crate::error::{GestureError, GestureResult};
use crate::input::WheelArgs;
use crate::item::Item;
use crate::surface::{BoundsObserver, Invalidation, Surface};
use crate::transform::{scale_about, to_transform_origin_space, vector_to_local};
use kurbo::{Affine, Point, Rect};

/// Zoom factor for one wheel event.
pub fn wheel_zoom_factor(zoom_speed: f64, delta_y: f64) -> f64 {
    (zoom_speed * delta_y / 5.0).exp()
}

/// Scale one item by `factor` so the surface point `center` stays put.
///
/// Returns `false` if the item transform is singular.
pub fn zoom_item_about(item: &mut Item, factor: f64, center: Point) -> bool {
    let transform = item.transform();
    match to_transform_origin_space(item.bounds(), transform, center) {
        Some(anchor) => {
            item.set_transform(transform * scale_about(factor, anchor));
            true
        }
        None => false,
    }
}

/// Set the surface zoom, scaling every item by the change ratio about
/// `center` (the surface centre when `None`).
pub fn set_zoom(surface: &mut Surface, zoom: f64, center: Option<Point>) -> GestureResult<()> {
    if !zoom.is_finite() || zoom <= 0.0 {
        log::warn!("Rejected zoom {zoom}");
        return Err(GestureError::InvalidArgument(format!(
            "zoom must be finite and positive, got {zoom}"
        )));
    }

    let ratio = zoom / surface.zoom();
    let center = center.unwrap_or_else(|| surface.center());
    surface.store_zoom(zoom);

    let ids: Vec<_> = surface.items().iter().map(Item::id).collect();
    for id in ids {
        surface.observe_once(id, Box::new(ScaleCompensation));
        let scaled = surface
            .item_mut(id)
            .is_some_and(|item| zoom_item_about(item, ratio, center));
        if scaled {
            surface.invalidate(Invalidation::Item(id));
        } else {
            log::debug!("Skipping item {id} with singular transform");
        }
    }
    Ok(())
}

/// Keeps a scaled item from jumping when its layout box moves.
///
/// A layout shift of `d` would otherwise be seen at the item's scale; the
/// observer adds the translation that leaves the visual shift at `L * d`,
/// where `L` is the linear part of the item transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleCompensation;

impl BoundsObserver for ScaleCompensation {
    fn bounds_changed(&mut self, item: &mut Item, old: Rect, new: Rect) {
        let delta = new.origin() - old.origin();
        let transform = item.transform();
        if let Some(local) = vector_to_local(transform, delta) {
            item.set_transform(transform * Affine::translate(delta - local));
        }
    }
}

/// Scroll-wheel zoom about the pointer.
#[derive(Debug, Default)]
pub struct ZoomGesture;

impl ZoomGesture {
    pub fn new() -> Self {
        Self
    }
}

impl Gesture for ZoomGesture {
    fn name(&self) -> &'static str {
        "zoom"
    }

    fn wheel(&mut self, ctx: &mut GestureContext<'_>, args: WheelArgs) {
        if args.delta.y == 0.0 {
            return;
        }
        let factor = wheel_zoom_factor(ctx.config.zoom_speed, args.delta.y);
        let zoom = ctx.surface.zoom() * factor;
        if let Err(err) = set_zoom(ctx.surface, zoom, Some(args.position)) {
            log::warn!("Wheel zoom ignored: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use crate::input::{Modifiers, PointerId};
    use kurbo::{Size, Vec2};
    use std::collections::HashMap;

    fn assert_point_eq(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9, "{a:?} != {b:?}");
        assert!((a.y - b.y).abs() < 1e-9, "{a:?} != {b:?}");
    }

    fn surface_with_items() -> Surface {
        let mut surface = Surface::new(Size::new(400.0, 300.0));
        surface.add_item(Item::new(Rect::new(0.0, 0.0, 100.0, 50.0)));
        surface.add_item(Item::new(Rect::new(150.0, 80.0, 170.0, 260.0)).with_transform(Affine::rotate(0.4)));
        surface
    }

    /// For each item, the local point currently under `center`.
    fn locals_under(surface: &Surface, center: Point) -> Vec<Point> {
        surface
            .items()
            .iter()
            .map(|item| item.surface_to_local().unwrap() * center)
            .collect()
    }

    #[test]
    fn test_wheel_factor() {
        assert!((wheel_zoom_factor(1.0, 0.0) - 1.0).abs() < 1e-12);
        assert!((wheel_zoom_factor(1.0, 5.0) - std::f64::consts::E).abs() < 1e-12);
        assert!(wheel_zoom_factor(2.0, -1.0) < 1.0);
    }

    #[test]
    fn test_zoom_keeps_center_fixed() {
        let mut surface = surface_with_items();
        let center = Point::new(123.0, 77.0);
        let locals = locals_under(&surface, center);

        set_zoom(&mut surface, 2.5, Some(center)).unwrap();
        assert_eq!(surface.zoom(), 2.5);
        for (item, local) in surface.items().iter().zip(locals) {
            assert_point_eq(item.local_to_surface() * local, center);
        }
    }

    #[test]
    fn test_default_center_is_surface_center() {
        let mut surface = surface_with_items();
        let locals = locals_under(&surface, Point::new(200.0, 150.0));
        set_zoom(&mut surface, 0.5, None).unwrap();
        for (item, local) in surface.items().iter().zip(locals) {
            assert_point_eq(item.local_to_surface() * local, Point::new(200.0, 150.0));
        }
    }

    #[test]
    fn test_zoom_is_relative() {
        let mut surface = surface_with_items();
        set_zoom(&mut surface, 2.0, None).unwrap();
        set_zoom(&mut surface, 4.0, None).unwrap();
        let first = surface.items()[0].transform().as_coeffs();
        assert!((first[0] - 4.0).abs() < 1e-9);
        assert!((first[3] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_zoom_rejected() {
        let mut surface = surface_with_items();
        let before: Vec<Affine> = surface.items().iter().map(Item::transform).collect();
        for zoom in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = set_zoom(&mut surface, zoom, None).unwrap_err();
            assert!(matches!(err, GestureError::InvalidArgument(_)));
        }
        assert_eq!(surface.zoom(), 1.0);
        let after: Vec<Affine> = surface.items().iter().map(Item::transform).collect();
        assert_eq!(after, before);
    }

    #[test]
    fn test_compensation_registered_once_and_applied() {
        let mut surface = Surface::new(Size::new(400.0, 300.0));
        let id = surface.add_item(Item::new(Rect::new(0.0, 0.0, 100.0, 100.0)));
        set_zoom(&mut surface, 2.0, Some(Point::new(50.0, 50.0))).unwrap();
        set_zoom(&mut surface, 4.0, Some(Point::new(50.0, 50.0))).unwrap();
        assert!(surface.is_observed(id));

        let local = Point::new(10.0, 10.0);
        let before = surface.item(id).unwrap().local_to_surface() * local;
        surface.set_item_offset(id, Point::new(10.0, 0.0));
        let after = surface.item(id).unwrap().local_to_surface() * local;
        // Layout moved by 10; the content moves by 10 at scale 4.
        assert_point_eq(after, before + Vec2::new(40.0, 0.0));
    }

    #[test]
    fn test_wheel_gesture() {
        let mut surface = surface_with_items();
        let config = BoardConfig::default();
        let mut captures = HashMap::new();
        let mut gesture = ZoomGesture::new();
        let at = Point::new(50.0, 25.0);
        let locals = locals_under(&surface, at);
        {
            let mut ctx = GestureContext::new(&mut surface, &config, &mut captures, 0, None);
            gesture.wheel(
                &mut ctx,
                WheelArgs {
                    position: at,
                    delta: Vec2::new(0.0, 5.0),
                    modifiers: Modifiers::NONE,
                },
            );
        }
        assert!((surface.zoom() - std::f64::consts::E).abs() < 1e-9);
        for (item, local) in surface.items().iter().zip(locals) {
            assert_point_eq(item.local_to_surface() * local, at);
        }
        assert!(captures.get(&PointerId::MOUSE).is_none());
    }
}
