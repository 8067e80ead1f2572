//! The surface: an ordered item collection plus the host-facing hooks the
//! gestures drive (bounds observers and invalidation requests).

use crate::item::{Item, ItemId};
use crate::transform::union_rects;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::collections::hash_map::Entry;
use std::fmt;

/// Reacts to an item's layout box changing.
pub trait BoundsObserver: fmt::Debug {
    /// Called after `item`'s bounds changed from `old` to `new`.
    fn bounds_changed(&mut self, item: &mut Item, old: Rect, new: Rect);
}

/// A re-render request for the host to drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Invalidation {
    /// One item's transform, bounds or flags changed.
    Item(ItemId),
    /// The item collection or the whole view changed.
    Surface,
}

/// A 2D surface holding items in collection order.
#[derive(Debug)]
pub struct Surface {
    /// Items in collection (insertion) order.
    items: Vec<Item>,
    /// Size of the surface's own box.
    size: Size,
    /// Current zoom factor shared by the zoom and fit operations.
    zoom: f64,
    /// Bounds observers, at most one per item.
    observers: HashMap<ItemId, Box<dyn BoundsObserver>>,
    /// Pending re-render requests in arrival order.
    invalidations: Vec<Invalidation>,
    /// Members of `invalidations`.
    pending: HashSet<Invalidation>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(Size::ZERO)
    }
}

impl Surface {
    /// Create an empty surface of the given size.
    pub fn new(size: Size) -> Self {
        Self {
            items: Vec::new(),
            size,
            zoom: 1.0,
            observers: HashMap::new(),
            invalidations: Vec::new(),
            pending: HashSet::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Resize the surface (host layout pass).
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.invalidate(Invalidation::Surface);
    }

    /// The surface's own box, `[0, w] x [0, h]`.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size)
    }

    /// Centre of the surface's own box.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Store the zoom factor without touching item transforms.
    pub(crate) fn store_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Append an item at the end of the collection.
    pub fn add_item(&mut self, item: Item) -> ItemId {
        let id = item.id();
        self.items.push(item);
        self.invalidate(Invalidation::Surface);
        id
    }

    /// Remove an item along with its bounds observer.
    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        let index = self.index_of(id)?;
        self.observers.remove(&id);
        self.invalidate(Invalidation::Surface);
        Some(self.items.remove(index))
    }

    /// Get an item by ID.
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Get a mutable reference to an item by ID.
    ///
    /// Changes made through this reference are not observed; use
    /// [`Surface::set_item_bounds`] for layout changes and call
    /// [`Surface::invalidate`] after visual changes.
    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Items in collection order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Move an item's layout box so its top-left is `offset`.
    ///
    /// Returns `false` if the item does not exist.
    pub fn set_item_offset(&mut self, id: ItemId, offset: Point) -> bool {
        match self.item(id) {
            Some(item) => {
                let bounds = item.moved_bounds(offset);
                self.set_item_bounds(id, bounds)
            }
            None => false,
        }
    }

    /// Replace an item's layout box and notify its bounds observer.
    ///
    /// Returns `false` if the item does not exist.
    pub fn set_item_bounds(&mut self, id: ItemId, bounds: Rect) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let item = &mut self.items[index];
        let old = item.bounds();
        if old == bounds {
            return true;
        }
        item.set_bounds(bounds);
        if let Some(observer) = self.observers.get_mut(&id) {
            observer.bounds_changed(item, old, bounds);
        }
        self.invalidate(Invalidation::Item(id));
        true
    }

    /// Register `observer` for `id` unless one is already registered.
    ///
    /// Returns `true` if the observer was added.
    pub fn observe_once(&mut self, id: ItemId, observer: Box<dyn BoundsObserver>) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        match self.observers.entry(id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(observer);
                log::debug!("Registered bounds observer for item {id}");
                true
            }
        }
    }

    /// Check whether an item has a bounds observer.
    pub fn is_observed(&self, id: ItemId) -> bool {
        self.observers.contains_key(&id)
    }

    /// Topmost item under `point` matching `filter`.
    ///
    /// Higher z-index wins; among equal z-index the later item in collection
    /// order wins.
    fn topmost_where(&self, point: Point, filter: impl Fn(&Item) -> bool) -> Option<ItemId> {
        let mut best: Option<&Item> = None;
        for item in self.items.iter().filter(|item| filter(item)) {
            if !item.hit_test(point) {
                continue;
            }
            if best.is_none_or(|best| best.z_index() <= item.z_index()) {
                best = Some(item);
            }
        }
        best.map(Item::id)
    }

    /// The topmost item under `point`, regardless of selectability.
    pub fn hit_target(&self, point: Point) -> Option<ItemId> {
        self.topmost_where(point, |_| true)
    }

    /// The topmost selectable item under `point`.
    pub fn topmost_selectable_at(&self, point: Point) -> Option<ItemId> {
        self.topmost_where(point, Item::is_selectable)
    }

    /// IDs of all selected items in collection order.
    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|item| item.is_selected())
            .map(Item::id)
            .collect()
    }

    /// Union of all items' layout boxes, or `None` for an empty surface.
    pub fn children_bounds(&self) -> Option<Rect> {
        union_rects(self.items.iter().map(Item::bounds))
    }

    /// Queue a re-render request.
    pub fn invalidate(&mut self, invalidation: Invalidation) {
        if self.pending.insert(invalidation) {
            self.invalidations.push(invalidation);
        }
    }

    /// Drain pending re-render requests.
    pub fn take_invalidations(&mut self) -> Vec<Invalidation> {
        self.pending.clear();
        std::mem::take(&mut self.invalidations)
    }
}
