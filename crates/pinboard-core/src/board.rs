//! A surface bundled with its gestures and settings.

use crate::config::BoardConfig;
use crate::dispatcher::GestureDispatcher;
use crate::error::GestureResult;
use crate::fit;
use crate::gestures::{PanGesture, set_zoom};
use crate::input::{PointerEvent, PointerId};
use crate::item::{Item, ItemId};
use crate::surface::{Invalidation, Surface};
use kurbo::{Rect, Size, Vec2};

/// An interactive board: items plus the standard gesture set.
#[derive(Debug)]
pub struct Board {
    surface: Surface,
    dispatcher: GestureDispatcher,
    config: BoardConfig,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Size::ZERO, BoardConfig::default())
    }
}

impl Board {
    /// Create a board of the given size with the default gestures.
    pub fn new(size: Size, config: BoardConfig) -> Self {
        Self::with_dispatcher(size, config, GestureDispatcher::with_default_gestures())
    }

    /// Create a board driven by a custom gesture set.
    pub fn with_dispatcher(size: Size, config: BoardConfig, dispatcher: GestureDispatcher) -> Self {
        Self {
            surface: Surface::new(size),
            dispatcher,
            config,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Replace the settings; takes effect from the next event.
    pub fn set_config(&mut self, config: BoardConfig) {
        self.config = config;
    }

    pub fn dispatcher(&self) -> &GestureDispatcher {
        &self.dispatcher
    }

    /// Add an item to the surface.
    pub fn add_item(&mut self, item: Item) -> ItemId {
        self.surface.add_item(item)
    }

    /// Feed one host event through the gestures.
    pub fn handle_event(&mut self, event: &PointerEvent) {
        self.dispatcher.dispatch(&mut self.surface, &self.config, event);
    }

    /// Host layout moved or resized an item.
    pub fn relayout(&mut self, id: ItemId, bounds: Rect) -> bool {
        self.surface.set_item_bounds(id, bounds)
    }

    /// Host layout resized the board.
    pub fn resize(&mut self, size: Size) {
        self.surface.set_size(size);
    }

    /// Fit all items, plus `margin` on every side, into the board.
    pub fn fit_view_to_children(&mut self, margin: f64) -> bool {
        fit::fit_to_children(&mut self.surface, margin)
    }

    /// Fit `rect` into the board.
    pub fn fit_view_to_rect(&mut self, rect: Rect) -> bool {
        let viewport = self.surface.bounds();
        fit::fit_to_rect(&mut self.surface, rect, viewport)
    }

    /// Fit `rect` into a viewport of `viewport`'s size.
    pub fn fit_to_rect_with_viewport(&mut self, rect: Rect, viewport: Rect) -> bool {
        fit::fit_to_rect(&mut self.surface, rect, viewport)
    }

    /// Zoom 1 and identity transforms for every item.
    pub fn reset_view(&mut self) {
        fit::reset_view(&mut self.surface);
    }

    pub fn current_zoom(&self) -> f64 {
        self.surface.zoom()
    }

    /// Zoom about the board centre.
    pub fn set_current_zoom(&mut self, zoom: f64) -> GestureResult<()> {
        set_zoom(&mut self.surface, zoom, None)
    }

    /// Pan accumulated by the current or most recent pan.
    pub fn current_pan(&self) -> Vec2 {
        self.dispatcher
            .gesture::<PanGesture>()
            .map_or(Vec2::ZERO, PanGesture::current_pan)
    }

    /// Name of the gesture holding `pointer`.
    pub fn captured_by(&self, pointer: PointerId) -> Option<&'static str> {
        self.dispatcher.captured_by(pointer)
    }

    /// Drain pending re-render requests.
    pub fn take_invalidations(&mut self) -> Vec<Invalidation> {
        self.surface.take_invalidations()
    }
}
