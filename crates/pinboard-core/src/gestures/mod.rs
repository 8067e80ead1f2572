//! Pointer gestures sharing one event stream.
//!
//! Each gesture is a small state machine driven by the
//! [`GestureDispatcher`](crate::dispatcher::GestureDispatcher). A gesture that
//! wants the rest of an interaction calls [`GestureContext::capture`] from its
//! press handler; the first gesture to do so for a pointer wins.

mod box_select;
mod move_selection;
mod pan;
mod select;
mod zoom;

pub use box_select::{BoxSelectGesture, OVERLAY_ID};
pub use move_selection::MoveSelectionGesture;
pub use pan::PanGesture;
pub use select::SelectGesture;
pub use zoom::{ScaleCompensation, ZoomGesture, set_zoom, wheel_zoom_factor, zoom_item_about};

use crate::config::BoardConfig;
use crate::input::{MouseButton, PointerArgs, PointerId, WheelArgs};
use crate::surface::Surface;
use kurbo::Point;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// Button used for click-selection and dragging.
pub const SELECT_BUTTON: MouseButton = MouseButton::Left;

/// What a gesture can see and do while handling one event.
pub struct GestureContext<'a> {
    /// The surface the event targets.
    pub surface: &'a mut Surface,
    /// Board-wide gesture settings.
    pub config: &'a BoardConfig,
    captures: &'a mut HashMap<PointerId, usize>,
    gesture: usize,
    pointer: Option<PointerId>,
}

impl<'a> GestureContext<'a> {
    pub(crate) fn new(
        surface: &'a mut Surface,
        config: &'a BoardConfig,
        captures: &'a mut HashMap<PointerId, usize>,
        gesture: usize,
        pointer: Option<PointerId>,
    ) -> Self {
        Self {
            surface,
            config,
            captures,
            gesture,
            pointer,
        }
    }

    /// Claim the current pointer for this gesture.
    ///
    /// Returns `true` if this gesture now holds the pointer, `false` if another
    /// gesture got there first or the event has no pointer.
    pub fn capture(&mut self) -> bool {
        let Some(pointer) = self.pointer else {
            return false;
        };
        let holder = *self.captures.entry(pointer).or_insert(self.gesture);
        holder == self.gesture
    }

    /// Check whether any gesture holds the current pointer.
    pub fn is_captured(&self) -> bool {
        self.pointer
            .is_some_and(|pointer| self.captures.contains_key(&pointer))
    }
}

/// Transient state of one tracked interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerSession<T> {
    /// The captured pointer.
    pub pointer: PointerId,
    /// Surface position of the press.
    pub start: Point,
    /// Gesture-specific data.
    pub data: T,
}

impl<T> PointerSession<T> {
    pub fn new(pointer: PointerId, start: Point, data: T) -> Self {
        Self { pointer, start, data }
    }
}

/// A pointer interaction mode.
///
/// All handlers default to doing nothing.
pub trait Gesture: Any + fmt::Debug {
    /// Name used in logs and capture queries.
    fn name(&self) -> &'static str;

    fn pointer_pressed(&mut self, _ctx: &mut GestureContext<'_>, _args: PointerArgs, _button: MouseButton) {}

    fn pointer_moved(&mut self, _ctx: &mut GestureContext<'_>, _args: PointerArgs) {}

    fn pointer_released(&mut self, _ctx: &mut GestureContext<'_>, _args: PointerArgs, _button: MouseButton) {}

    /// The gesture no longer holds `pointer`. Treated like a release.
    fn capture_lost(&mut self, _ctx: &mut GestureContext<'_>, _pointer: PointerId) {}

    fn wheel(&mut self, _ctx: &mut GestureContext<'_>, _args: WheelArgs) {}
}

impl fmt::Debug for GestureContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureContext")
            .field("gesture", &self.gesture)
            .field("pointer", &self.pointer)
            .finish_non_exhaustive()
    }
}
