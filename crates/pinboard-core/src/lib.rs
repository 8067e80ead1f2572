//! Pinboard Core Library
//!
//! Gesture recognition and transform composition for items on a 2D surface:
//! select, box-select, drag with grid snapping, pan and zoom, sharing one
//! pointer stream.

pub mod board;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod fit;
pub mod gestures;
pub mod input;
pub mod item;
pub mod snap;
pub mod surface;
pub mod transform;

pub use board::Board;
pub use config::BoardConfig;
pub use dispatcher::GestureDispatcher;
pub use error::{GestureError, GestureResult};
pub use gestures::{
    BoxSelectGesture, Gesture, GestureContext, MoveSelectionGesture, OVERLAY_ID, PanGesture, PointerSession,
    SELECT_BUTTON, ScaleCompensation, SelectGesture, ZoomGesture,
};
pub use input::{Modifiers, MouseButton, PointerArgs, PointerEvent, PointerId, WheelArgs};
pub use item::{HitResolver, HitShape, Item, ItemId};
pub use snap::{SnapGrid, SnapMode, SnapResult, anchor_point, snap, snap_anchor, snap_to_grid};
pub use surface::{BoundsObserver, Invalidation, Surface};
