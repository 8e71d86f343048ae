//! Host inputs: color mode, pointer and viewport.
//!
//! Event handlers write into a per-renderer [`InputCell`] through the
//! [`EventHub`]; the frame loop reads the cell once at the top of every frame.
//! Everything runs on one thread, so a `Cell` of a `Copy` snapshot is enough:
//! there is a single writer and no preemption between write and read.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use glam::{UVec2, Vec2};

/// Page color scheme polled by renderers every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

impl ColorMode {
    pub fn is_dark(self) -> bool {
        self == ColorMode::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            ColorMode::Light => ColorMode::Dark,
            ColorMode::Dark => ColorMode::Light,
        }
    }

    /// Pick the light or dark variant of a value
    pub fn pick<T>(self, light: T, dark: T) -> T {
        match self {
            ColorMode::Light => light,
            ColorMode::Dark => dark,
        }
    }
}

/// Snapshot of everything a renderer reads from the host
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    /// Pointer position in surface pixels, if the pointer is over the surface
    pub pointer: Option<Vec2>,
    /// Current viewport size in pixels
    pub viewport: UVec2,
    pub color_mode: ColorMode,
}

impl InputState {
    /// Pointer mapped to [-1, 1] on both axes, +y up; neutral when absent
    pub fn normalized_pointer(&self) -> Vec2 {
        let Some(pointer) = self.pointer else {
            return Vec2::ZERO;
        };
        if self.viewport.x == 0 || self.viewport.y == 0 {
            return Vec2::ZERO;
        }
        let size = self.viewport.as_vec2();
        let x = pointer.x / size.x * 2.0 - 1.0;
        let y = -(pointer.y / size.y * 2.0 - 1.0);
        Vec2::new(x, y).clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
    }
}

/// Single-writer holder read by one render loop
pub type InputCell = Cell<InputState>;

/// Asynchronous input delivered by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Resize { width: u32, height: u32 },
    PointerMove { x: f32, y: f32 },
    PointerLeave,
    ColorMode(ColorMode),
}

impl HostEvent {
    /// Apply this event to an input snapshot
    pub fn apply(self, state: &mut InputState) {
        match self {
            HostEvent::Resize { width, height } => state.viewport = UVec2::new(width, height),
            HostEvent::PointerMove { x, y } => state.pointer = Some(Vec2::new(x, y)),
            HostEvent::PointerLeave => state.pointer = None,
            HostEvent::ColorMode(mode) => state.color_mode = mode,
        }
    }
}

/// Handle returned by [`EventHub::subscribe`]
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription(u64);

/// Fans host events out to subscribed input cells
///
/// The hub remembers the latest state so late subscribers start from it.
#[derive(Debug, Default)]
pub struct EventHub {
    state: InputState,
    subscribers: Vec<(u64, Weak<InputCell>)>,
    next_id: u64,
}

impl EventHub {
    pub fn new(initial: InputState) -> Self {
        Self {
            state: initial,
            ..Default::default()
        }
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    /// Register a cell; it is immediately brought up to date
    pub fn subscribe(&mut self, cell: &Rc<InputCell>) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        cell.set(self.state);
        self.subscribers.push((id, Rc::downgrade(cell)));
        Subscription(id)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.subscribers.retain(|(id, _)| *id != subscription.0);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Record the event and write it into every live subscriber
    pub fn dispatch(&mut self, event: HostEvent) {
        event.apply(&mut self.state);
        self.subscribers.retain(|(_, weak)| match weak.upgrade() {
            Some(cell) => {
                let mut state = cell.get();
                event.apply(&mut state);
                cell.set(state);
                true
            }
            None => false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_pointer() {
        let mut state = InputState {
            pointer: Some(Vec2::new(0.0, 0.0)),
            viewport: UVec2::new(800, 600),
            color_mode: ColorMode::Light,
        };
        assert_eq!(state.normalized_pointer(), Vec2::new(-1.0, 1.0));

        state.pointer = Some(Vec2::new(400.0, 300.0));
        assert_eq!(state.normalized_pointer(), Vec2::ZERO);

        state.pointer = None;
        assert_eq!(state.normalized_pointer(), Vec2::ZERO);
    }

    #[test]
    fn test_normalized_pointer_zero_viewport_is_neutral() {
        let state = InputState {
            pointer: Some(Vec2::new(10.0, 10.0)),
            ..Default::default()
        };
        assert_eq!(state.normalized_pointer(), Vec2::ZERO);
    }

    #[test]
    fn test_dispatch_reaches_subscribers() {
        let mut hub = EventHub::new(InputState::default());
        hub.dispatch(HostEvent::Resize {
            width: 640,
            height: 480,
        });

        let cell = Rc::new(InputCell::default());
        let _sub = hub.subscribe(&cell);
        assert_eq!(cell.get().viewport, UVec2::new(640, 480)); // caught up on subscribe

        hub.dispatch(HostEvent::PointerMove { x: 3.0, y: 4.0 });
        hub.dispatch(HostEvent::ColorMode(ColorMode::Dark));
        let state = cell.get();
        assert_eq!(state.pointer, Some(Vec2::new(3.0, 4.0)));
        assert!(state.color_mode.is_dark());

        hub.dispatch(HostEvent::PointerLeave);
        assert_eq!(cell.get().pointer, None);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut hub = EventHub::default();
        let cell = Rc::new(InputCell::default());
        let sub = hub.subscribe(&cell);
        hub.unsubscribe(sub);
        assert_eq!(hub.subscriber_count(), 0);

        hub.dispatch(HostEvent::PointerMove { x: 1.0, y: 1.0 });
        assert_eq!(cell.get().pointer, None);
    }

    #[test]
    fn test_dropped_cells_are_pruned() {
        let mut hub = EventHub::default();
        let cell = Rc::new(InputCell::default());
        let _sub = hub.subscribe(&cell);
        drop(cell);

        hub.dispatch(HostEvent::PointerLeave);
        assert_eq!(hub.subscriber_count(), 0);
    }
}
