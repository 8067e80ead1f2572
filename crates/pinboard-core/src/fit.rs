//! Fit-to-view and view reset.

use crate::gestures::{ScaleCompensation, zoom_item_about};
use crate::item::Item;
use crate::surface::{Invalidation, Surface};
use kurbo::{Affine, Point, Rect, Vec2};

/// Fit `target` (surface coordinates) inside a viewport of `viewport`'s size,
/// preserving aspect ratio and centring the result.
///
/// Every item transform is replaced by a translation to the viewport's
/// top-left followed by a scale about the viewport centre. The viewport's
/// position is ignored. Returns `false` and leaves the surface untouched if
/// either rectangle has a zero, negative or NaN width or height, since the
/// zoom must stay positive.
pub fn fit_to_rect(surface: &mut Surface, target: Rect, viewport: Rect) -> bool {
    let target_size = target.size();
    let viewport_size = viewport.size();
    let degenerate = |w: f64, h: f64| !(w > 0.0 && h > 0.0);
    if degenerate(target_size.width, target_size.height) || degenerate(viewport_size.width, viewport_size.height) {
        log::debug!("Fit skipped: target {target:?}, viewport {viewport:?}");
        return false;
    }

    let zoom = (viewport_size.width / target_size.width).min(viewport_size.height / target_size.height);
    let slack = Vec2::new(
        viewport_size.width - target_size.width,
        viewport_size.height - target_size.height,
    );
    let top_left = target.origin() - slack / 2.0;
    let center = Point::new(viewport_size.width / 2.0, viewport_size.height / 2.0);

    let ids: Vec<_> = surface.items().iter().map(Item::id).collect();
    for id in ids {
        surface.observe_once(id, Box::new(ScaleCompensation));
        if let Some(item) = surface.item_mut(id) {
            item.set_transform(Affine::translate(-top_left.to_vec2()));
            if !zoom_item_about(item, zoom, center) {
                log::debug!("Skipping scale of item {id}");
            }
        }
    }
    surface.store_zoom(zoom);
    surface.invalidate(Invalidation::Surface);
    log::debug!("Fit {target:?} at zoom {zoom}");
    true
}

/// Fit the union of all items' bounds, grown by `margin` on every side, into
/// the surface's own box. No-op on an empty surface.
pub fn fit_to_children(surface: &mut Surface, margin: f64) -> bool {
    let Some(union) = surface.children_bounds() else {
        log::debug!("Fit skipped: no items");
        return false;
    };
    let viewport = surface.bounds();
    fit_to_rect(surface, union.inflate(margin, margin), viewport)
}

/// Reset zoom to 1 and every item transform to identity.
pub fn reset_view(surface: &mut Surface) {
    surface.store_zoom(1.0);
    for item in surface.items_mut() {
        item.set_transform(Affine::IDENTITY);
    }
    surface.invalidate(Invalidation::Surface);
}
