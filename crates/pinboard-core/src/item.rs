//! Items placed on a surface.

use crate::transform::{local_rect, local_to_surface, rects_overlap, surface_to_local};
use kurbo::{Affine, BezPath, Line, ParamCurve, Point, Rect, Shape as _, Size};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for items.
pub type ItemId = Uuid;

/// Custom hit geometry supplied by the host.
///
/// Both methods receive coordinates in the item's local space.
pub trait HitResolver: fmt::Debug {
    /// Check whether a local point lies on the item.
    fn contains_point(&self, point: Point) -> bool;

    /// Check whether a local rectangle overlaps the item.
    fn intersects_rect(&self, rect: Rect) -> bool;
}

/// How an item answers hit and overlap queries.
///
/// Checked in a fixed order: a custom resolver wins over path geometry, and
/// the local bounding box is the fallback.
#[derive(Debug, Default)]
pub enum HitShape {
    /// The item's local bounding box.
    #[default]
    Bounds,
    /// A vector outline in local coordinates.
    Path(BezPath),
    /// Host-provided geometry.
    Custom(Box<dyn HitResolver>),
}

/// An item on a surface.
#[derive(Debug)]
pub struct Item {
    id: ItemId,
    bounds: Rect,
    transform: Affine,
    z_index: i64,
    selected: bool,
    selectable: bool,
    movable: bool,
    hit_shape: HitShape,
}

impl Item {
    /// Create a selectable, movable item occupying `bounds` on the surface.
    pub fn new(bounds: Rect) -> Self {
        Self::with_id(Uuid::new_v4(), bounds)
    }

    /// Create an item with a specific ID.
    pub fn with_id(id: ItemId, bounds: Rect) -> Self {
        Self {
            id,
            bounds,
            transform: Affine::IDENTITY,
            z_index: 0,
            selected: false,
            selectable: true,
            movable: true,
            hit_shape: HitShape::Bounds,
        }
    }

    /// Set whether the item can be selected.
    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    /// Set whether the item can be dragged.
    pub fn movable(mut self, movable: bool) -> Self {
        self.movable = movable;
        self
    }

    /// Set the z-index.
    pub fn with_z_index(mut self, z_index: i64) -> Self {
        self.z_index = z_index;
        self
    }

    /// Use a vector outline for hit and overlap tests.
    pub fn with_path(mut self, path: BezPath) -> Self {
        self.hit_shape = HitShape::Path(path);
        self
    }

    /// Use host geometry for hit and overlap tests.
    pub fn with_hit_resolver(mut self, resolver: impl HitResolver + 'static) -> Self {
        self.hit_shape = HitShape::Custom(Box::new(resolver));
        self
    }

    /// Set the initial render transform.
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Layout box in surface coordinates.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Layout offset (top-left of the layout box).
    pub fn offset(&self) -> Point {
        self.bounds.origin()
    }

    pub fn size(&self) -> Size {
        self.bounds.size()
    }

    /// Render transform, applied about the centre of the layout box.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    pub fn z_index(&self) -> i64 {
        self.z_index
    }

    pub fn set_z_index(&mut self, z_index: i64) {
        self.z_index = z_index;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn set_selectable(&mut self, selectable: bool) {
        self.selectable = selectable;
    }

    pub fn is_movable(&self) -> bool {
        self.movable
    }

    pub fn set_movable(&mut self, movable: bool) {
        self.movable = movable;
    }

    pub fn hit_shape(&self) -> &HitShape {
        &self.hit_shape
    }

    /// Layout changes go through the surface so bounds observers fire.
    pub(crate) fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Map from local space to surface space.
    pub fn local_to_surface(&self) -> Affine {
        local_to_surface(self.bounds, self.transform)
    }

    /// Map from surface space to local space, or `None` if the transform is
    /// singular.
    pub fn surface_to_local(&self) -> Option<Affine> {
        surface_to_local(self.bounds, self.transform)
    }

    /// Hit-test a point given in local coordinates.
    pub fn contains_local(&self, point: Point) -> bool {
        match &self.hit_shape {
            HitShape::Custom(resolver) => resolver.contains_point(point),
            HitShape::Path(path) => path.contains(point),
            HitShape::Bounds => local_rect(self.size()).contains(point),
        }
    }

    /// Hit-test a point given in surface coordinates.
    pub fn hit_test(&self, point: Point) -> bool {
        self.surface_to_local()
            .is_some_and(|to_local| self.contains_local(to_local * point))
    }

    /// Overlap test against a rectangle given in local coordinates.
    pub fn intersects_local_rect(&self, rect: Rect) -> bool {
        match &self.hit_shape {
            HitShape::Custom(resolver) => resolver.intersects_rect(rect),
            HitShape::Path(path) => path_intersects_rect(path, rect),
            HitShape::Bounds => rects_overlap(local_rect(self.size()), rect),
        }
    }

    /// Overlap test against a rectangle given in surface coordinates.
    ///
    /// The rectangle is mapped into local space and replaced by its
    /// axis-aligned bounding box there.
    pub fn intersects_surface_rect(&self, rect: Rect) -> bool {
        match self.surface_to_local() {
            Some(to_local) => self.intersects_local_rect(to_local.transform_rect_bbox(rect)),
            None => false,
        }
    }

    /// Shift the layout box to `offset`, keeping its size.
    pub(crate) fn moved_bounds(&self, offset: Point) -> Rect {
        self.bounds + (offset - self.offset())
    }
}

/// Check whether a path and a rectangle share any area or outline.
///
/// The interior follows kurbo's non-zero winding, which closes every
/// subpath implicitly, so open paths count the area their closing chord
/// would enclose.
pub fn path_intersects_rect(path: &BezPath, rect: Rect) -> bool {
    let rect = rect.abs();
    if path.elements().is_empty() || !rects_overlap(path.bounding_box(), rect) {
        return false;
    }

    // Rectangle swallowed by the path interior.
    if path.contains(rect.center()) {
        return true;
    }

    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    let edges = [
        Line::new(corners[0], corners[1]),
        Line::new(corners[1], corners[2]),
        Line::new(corners[2], corners[3]),
        Line::new(corners[3], corners[0]),
    ];

    path.segments().any(|segment| {
        let start = segment.start();
        let inside = start.x >= rect.x0 && start.x <= rect.x1 && start.y >= rect.y0 && start.y <= rect.y1;
        inside
            || edges
                .iter()
                .any(|edge| !segment.intersect_line(*edge).is_empty())
    })
}
