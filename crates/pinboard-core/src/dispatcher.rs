//! Routes the pointer stream of one surface to its gestures.

use crate::config::BoardConfig;
use crate::gestures::{
    BoxSelectGesture, Gesture, GestureContext, MoveSelectionGesture, PanGesture, SelectGesture, ZoomGesture,
};
use crate::input::{MouseButton, PointerArgs, PointerEvent, PointerId, WheelArgs};
use crate::surface::Surface;
use std::any::Any;
use std::collections::HashMap;

/// Delivers events to gestures in registration order and arbitrates
/// pointer capture between them.
#[derive(Debug, Default)]
pub struct GestureDispatcher {
    gestures: Vec<Box<dyn Gesture>>,
    /// Pointer -> index of the gesture holding it.
    captures: HashMap<PointerId, usize>,
}

impl GestureDispatcher {
    /// Create a dispatcher with no gestures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher with the standard gestures in priority order:
    /// select, move-selection, pan, box-select, zoom.
    pub fn with_default_gestures() -> Self {
        let mut dispatcher = Self::new();
        dispatcher.register(SelectGesture::new());
        dispatcher.register(MoveSelectionGesture::new());
        dispatcher.register(PanGesture::new());
        dispatcher.register(BoxSelectGesture::new());
        dispatcher.register(ZoomGesture::new());
        dispatcher
    }

    /// Append a gesture; it sees events after every gesture registered
    /// before it.
    pub fn register(&mut self, gesture: impl Gesture) {
        self.gestures.push(Box::new(gesture));
    }

    /// Names of the registered gestures in delivery order.
    pub fn gesture_names(&self) -> Vec<&'static str> {
        self.gestures.iter().map(|gesture| gesture.name()).collect()
    }

    /// First registered gesture of type `T`.
    pub fn gesture<T: Gesture>(&self) -> Option<&T> {
        self.gestures.iter().find_map(|gesture| {
            let any: &dyn Any = &**gesture;
            any.downcast_ref::<T>()
        })
    }

    /// Name of the gesture holding `pointer`, if any.
    pub fn captured_by(&self, pointer: PointerId) -> Option<&'static str> {
        self.captures
            .get(&pointer)
            .and_then(|&index| self.gestures.get(index))
            .map(|gesture| gesture.name())
    }

    /// Deliver one event.
    pub fn dispatch(&mut self, surface: &mut Surface, config: &BoardConfig, event: &PointerEvent) {
        let Some(args) = event.args() else {
            match *event {
                PointerEvent::CaptureLost { pointer } => self.capture_lost(surface, config, pointer),
                PointerEvent::Wheel {
                    position,
                    delta,
                    modifiers,
                } => self.wheel(
                    surface,
                    config,
                    WheelArgs {
                        position,
                        delta,
                        modifiers,
                    },
                ),
                _ => {}
            }
            return;
        };
        match *event {
            PointerEvent::Pressed { button, .. } => self.pressed(surface, config, args, button),
            PointerEvent::Released { button, .. } => self.released(surface, config, args, button),
            _ => self.moved(surface, config, args),
        }
    }

    /// Gesture indices that should see an event for `pointer`.
    fn targets(&self, pointer: PointerId) -> Vec<usize> {
        match self.captures.get(&pointer) {
            Some(&holder) => vec![holder],
            None => (0..self.gestures.len()).collect(),
        }
    }

    fn pressed(&mut self, surface: &mut Surface, config: &BoardConfig, args: PointerArgs, button: MouseButton) {
        let was_captured = self.captures.contains_key(&args.pointer);
        for index in self.targets(args.pointer) {
            let mut ctx = GestureContext::new(surface, config, &mut self.captures, index, Some(args.pointer));
            self.gestures[index].pointer_pressed(&mut ctx, args, button);
        }
        if !was_captured {
            if let Some(name) = self.captured_by(args.pointer) {
                log::debug!("Pointer {:?} captured by {name}", args.pointer);
            }
        }
    }

    fn moved(&mut self, surface: &mut Surface, config: &BoardConfig, args: PointerArgs) {
        for index in self.targets(args.pointer) {
            let mut ctx = GestureContext::new(surface, config, &mut self.captures, index, Some(args.pointer));
            self.gestures[index].pointer_moved(&mut ctx, args);
        }
    }

    fn released(&mut self, surface: &mut Surface, config: &BoardConfig, args: PointerArgs, button: MouseButton) {
        let Some(&holder) = self.captures.get(&args.pointer) else {
            for index in 0..self.gestures.len() {
                let mut ctx = GestureContext::new(surface, config, &mut self.captures, index, Some(args.pointer));
                self.gestures[index].pointer_released(&mut ctx, args, button);
            }
            return;
        };

        {
            let mut ctx = GestureContext::new(surface, config, &mut self.captures, holder, Some(args.pointer));
            self.gestures[holder].pointer_released(&mut ctx, args, button);
        }
        self.captures.remove(&args.pointer);
        log::debug!("Pointer {:?} released by {}", args.pointer, self.gestures[holder].name());

        let mut ctx = GestureContext::new(surface, config, &mut self.captures, holder, Some(args.pointer));
        self.gestures[holder].capture_lost(&mut ctx, args.pointer);
    }

    fn capture_lost(&mut self, surface: &mut Surface, config: &BoardConfig, pointer: PointerId) {
        let Some(holder) = self.captures.remove(&pointer) else {
            log::debug!("Capture loss for uncaptured pointer {pointer:?}");
            return;
        };
        log::debug!("Pointer {pointer:?} lost by {}", self.gestures[holder].name());
        let mut ctx = GestureContext::new(surface, config, &mut self.captures, holder, Some(pointer));
        self.gestures[holder].capture_lost(&mut ctx, pointer);
    }

    fn wheel(&mut self, surface: &mut Surface, config: &BoardConfig, args: WheelArgs) {
        for index in 0..self.gestures.len() {
            let mut ctx = GestureContext::new(surface, config, &mut self.captures, index, None);
            self.gestures[index].wheel(&mut ctx, args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use kurbo::{Point, Size};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every callback and captures on press when `greedy`.
    #[derive(Debug)]
    struct Recorder {
        name: &'static str,
        greedy: bool,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Recorder {
        fn record(&self, what: &str) {
            self.log.borrow_mut().push(format!("{}:{what}", self.name));
        }
    }

    impl Gesture for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn pointer_pressed(&mut self, ctx: &mut GestureContext<'_>, _args: PointerArgs, _button: MouseButton) {
            let granted = self.greedy && ctx.capture();
            self.record(if granted { "press+capture" } else { "press" });
        }

        fn pointer_moved(&mut self, _ctx: &mut GestureContext<'_>, _args: PointerArgs) {
            self.record("move");
        }

        fn pointer_released(&mut self, _ctx: &mut GestureContext<'_>, _args: PointerArgs, _button: MouseButton) {
            self.record("release");
        }

        fn capture_lost(&mut self, _ctx: &mut GestureContext<'_>, _pointer: PointerId) {
            self.record("lost");
        }

        fn wheel(&mut self, _ctx: &mut GestureContext<'_>, _args: WheelArgs) {
            self.record("wheel");
        }
    }

    fn recorders(greedy: [bool; 3]) -> (GestureDispatcher, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = GestureDispatcher::new();
        for (name, greedy) in ["a", "b", "c"].into_iter().zip(greedy) {
            dispatcher.register(Recorder {
                name,
                greedy,
                log: log.clone(),
            });
        }
        (dispatcher, log)
    }

    fn take(log: &Rc<RefCell<Vec<String>>>) -> Vec<String> {
        std::mem::take(&mut *log.borrow_mut())
    }

    #[test]
    fn test_first_capture_wins_and_routes() {
        let (mut dispatcher, log) = recorders([false, true, true]);
        let mut surface = Surface::new(Size::new(100.0, 100.0));
        let config = BoardConfig::default();
        let at = Point::new(1.0, 1.0);

        dispatcher.dispatch(&mut surface, &config, &PointerEvent::press(at, MouseButton::Left));
        assert_eq!(take(&log), ["a:press", "b:press+capture", "c:press"]);
        assert_eq!(dispatcher.captured_by(PointerId::MOUSE), Some("b"));

        dispatcher.dispatch(&mut surface, &config, &PointerEvent::moved(at));
        assert_eq!(take(&log), ["b:move"]);

        dispatcher.dispatch(&mut surface, &config, &PointerEvent::wheel(at, 1.0));
        assert_eq!(take(&log), ["a:wheel", "b:wheel", "c:wheel"]);

        dispatcher.dispatch(&mut surface, &config, &PointerEvent::release(at, MouseButton::Left));
        assert_eq!(take(&log), ["b:release", "b:lost"]);
        assert_eq!(dispatcher.captured_by(PointerId::MOUSE), None);

        dispatcher.dispatch(&mut surface, &config, &PointerEvent::moved(at));
        assert_eq!(take(&log), ["a:move", "b:move", "c:move"]);
    }

    #[test]
    fn test_uncaptured_release_goes_to_everyone() {
        let (mut dispatcher, log) = recorders([false, false, false]);
        let mut surface = Surface::default();
        let config = BoardConfig::default();
        dispatcher.dispatch(&mut surface, &config, &PointerEvent::release(Point::ZERO, MouseButton::Left));
        assert_eq!(take(&log), ["a:release", "b:release", "c:release"]);
    }

    #[test]
    fn test_platform_capture_loss() {
        let (mut dispatcher, log) = recorders([true, false, false]);
        let mut surface = Surface::default();
        let config = BoardConfig::default();
        dispatcher.dispatch(&mut surface, &config, &PointerEvent::press(Point::ZERO, MouseButton::Left));
        take(&log);

        let lost = PointerEvent::CaptureLost {
            pointer: PointerId::MOUSE,
        };
        dispatcher.dispatch(&mut surface, &config, &lost);
        assert_eq!(take(&log), ["a:lost"]);
        dispatcher.dispatch(&mut surface, &config, &lost);
        assert!(take(&log).is_empty());
    }

    #[test]
    fn test_second_press_goes_to_holder_only() {
        let (mut dispatcher, log) = recorders([false, false, true]);
        let mut surface = Surface::default();
        let config = BoardConfig::default();
        dispatcher.dispatch(&mut surface, &config, &PointerEvent::press(Point::ZERO, MouseButton::Left));
        take(&log);
        dispatcher.dispatch(&mut surface, &config, &PointerEvent::press(Point::ZERO, MouseButton::Right));
        assert_eq!(take(&log), ["c:press+capture"]);
    }

    #[test]
    fn test_pointers_are_independent() {
        let (mut dispatcher, log) = recorders([true, false, false]);
        let mut surface = Surface::default();
        let config = BoardConfig::default();
        dispatcher.dispatch(&mut surface, &config, &PointerEvent::press(Point::ZERO, MouseButton::Left));
        take(&log);
        let pen = PointerEvent::Moved {
            pointer: PointerId(7),
            position: Point::ZERO,
            modifiers: Modifiers::NONE,
        };
        dispatcher.dispatch(&mut surface, &config, &pen);
        assert_eq!(take(&log), ["a:move", "b:move", "c:move"]);
    }

    #[test]
    fn test_default_order_and_lookup() {
        let dispatcher = GestureDispatcher::with_default_gestures();
        assert_eq!(
            dispatcher.gesture_names(),
            ["select", "move_selection", "pan", "box_select", "zoom"]
        );
        assert!(dispatcher.gesture::<PanGesture>().is_some());
        assert!(dispatcher.gesture::<BoxSelectGesture>().is_some());
    }
}
