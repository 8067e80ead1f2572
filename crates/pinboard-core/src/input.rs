//! Pointer and wheel events delivered by the host.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    X1,
    X2,
}

/// Modifier keys state.
///
/// Gestures compare modifier sets for exact equality, so `shift` alone and
/// `shift + ctrl` are different chords.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// No modifier held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl only.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Check if no modifier is held.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Identifies one pointer (mouse, pen, or a single touch contact).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointerId(pub u64);

impl PointerId {
    /// The system mouse.
    pub const MOUSE: Self = Self(0);
}

/// Data common to press, move and release events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerArgs {
    /// Pointer that produced the event.
    pub pointer: PointerId,
    /// Position in surface coordinates.
    pub position: Point,
    /// Modifier keys held when the event fired.
    pub modifiers: Modifiers,
}

/// A scroll wheel event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelArgs {
    /// Position in surface coordinates.
    pub position: Point,
    /// Wheel delta; positive `y` zooms in.
    pub delta: Vec2,
    /// Modifier keys held when the event fired.
    pub modifiers: Modifiers,
}

/// One event of the host's pointer stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Pressed {
        #[serde(default)]
        pointer: PointerId,
        position: Point,
        button: MouseButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Moved {
        #[serde(default)]
        pointer: PointerId,
        position: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Released {
        #[serde(default)]
        pointer: PointerId,
        position: Point,
        button: MouseButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// The platform revoked tracking of the pointer.
    CaptureLost {
        #[serde(default)]
        pointer: PointerId,
    },
    Wheel {
        position: Point,
        delta: Vec2,
        #[serde(default)]
        modifiers: Modifiers,
    },
}

impl PointerEvent {
    /// Left-button press of the system mouse.
    pub fn press(position: Point, button: MouseButton) -> Self {
        Self::Pressed {
            pointer: PointerId::MOUSE,
            position,
            button,
            modifiers: Modifiers::NONE,
        }
    }

    /// Move of the system mouse.
    pub fn moved(position: Point) -> Self {
        Self::Moved {
            pointer: PointerId::MOUSE,
            position,
            modifiers: Modifiers::NONE,
        }
    }

    /// Release of the system mouse.
    pub fn release(position: Point, button: MouseButton) -> Self {
        Self::Released {
            pointer: PointerId::MOUSE,
            position,
            button,
            modifiers: Modifiers::NONE,
        }
    }

    /// Wheel tick of the system mouse.
    pub fn wheel(position: Point, delta_y: f64) -> Self {
        Self::Wheel {
            position,
            delta: Vec2::new(0.0, delta_y),
            modifiers: Modifiers::NONE,
        }
    }

    /// Replace the modifier state of this event.
    pub fn with_modifiers(mut self, held: Modifiers) -> Self {
        match &mut self {
            Self::Pressed { modifiers, .. }
            | Self::Moved { modifiers, .. }
            | Self::Released { modifiers, .. }
            | Self::Wheel { modifiers, .. } => *modifiers = held,
            Self::CaptureLost { .. } => {}
        }
        self
    }

    /// Common press/move/release payload.
    pub fn args(&self) -> Option<PointerArgs> {
        match *self {
            Self::Pressed {
                pointer,
                position,
                modifiers,
                ..
            }
            | Self::Moved {
                pointer,
                position,
                modifiers,
            }
            | Self::Released {
                pointer,
                position,
                modifiers,
                ..
            } => Some(PointerArgs {
                pointer,
                position,
                modifiers,
            }),
            Self::CaptureLost { .. } | Self::Wheel { .. } => None,
        }
    }
}
