//! Binds one renderer to its own surface, scheduler and input subscription.

use std::rc::Rc;
use std::time::Instant;

use glam::UVec2;
use log::{debug, info};

use crate::input::{EventHub, InputCell, InputState, Subscription};
use crate::scheduler::{FrameScheduler, FrameTime};
use crate::surface::Surface;

/// A continuously animated drawing
///
/// Implementations own all of their animation state. They never see a missing
/// or degenerate surface: the render loop skips those frames.
pub trait Renderer {
    fn name(&self) -> &'static str;

    /// Called once when the loop starts, with the viewport known at that time
    fn start(&mut self, _input: &InputState) {}

    /// Opacity used when this renderer's surface is composited
    fn layer_opacity(&self, _input: &InputState) -> f32 {
        1.0
    }

    /// Advance the animation and redraw the (already cleared) surface
    fn draw(&mut self, surface: &mut Surface, frame: &FrameTime, input: &InputState);
}

/// Lifecycle owner for one mounted renderer
pub struct RenderLoop {
    renderer: Box<dyn Renderer>,
    surface: Option<Surface>,
    scheduler: FrameScheduler,
    input: Rc<InputCell>,
    subscription: Option<Subscription>,
    frames_drawn: u64,
}

impl RenderLoop {
    pub fn new(renderer: Box<dyn Renderer>, max_frame_delta: f32) -> Self {
        Self {
            renderer,
            surface: None,
            scheduler: FrameScheduler::new(max_frame_delta),
            input: Rc::new(InputCell::default()),
            subscription: None,
            frames_drawn: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.renderer.name()
    }

    /// Subscribe to host events, mount the surface and arm the first frame
    pub fn start(&mut self, hub: &mut EventHub, now: Instant) {
        if self.scheduler.is_running() {
            return;
        }
        self.subscription = Some(hub.subscribe(&self.input));

        let input = self.input.get();
        let mut surface = Surface::new(0, 0);
        surface.resize(input.viewport.x, input.viewport.y);
        self.surface = Some(surface);

        self.renderer.start(&input);
        self.scheduler.start(now);
        info!(
            "{}: started at {}x{}",
            self.renderer.name(),
            input.viewport.x,
            input.viewport.y
        );
    }

    /// Cancel the pending frame, then drop the event subscription
    ///
    /// The surface is unmounted last; nothing can draw into it afterwards.
    pub fn stop(&mut self, hub: &mut EventHub) {
        self.scheduler.stop();
        if let Some(subscription) = self.subscription.take() {
            hub.unsubscribe(subscription);
        }
        if self.surface.take().is_some() {
            info!(
                "{}: stopped after {} frames",
                self.renderer.name(),
                self.frames_drawn
            );
        }
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Run this loop's pending frame, if any
    ///
    /// Returns true only when the renderer actually drew.
    pub fn on_display_refresh(&mut self, now: Instant) -> bool {
        let Self {
            renderer,
            surface,
            scheduler,
            input,
            frames_drawn,
            ..
        } = self;

        let mut drew = false;
        scheduler.run_frame(now, |frame| {
            // Read inputs fresh; handlers may have changed them since last frame
            let input = input.get();

            let Some(surface) = surface.as_mut() else {
                return;
            };
            if surface.size() != input.viewport {
                surface.resize(input.viewport.x, input.viewport.y);
                debug!(
                    "{}: surface resized to {}x{}",
                    renderer.name(),
                    input.viewport.x,
                    input.viewport.y
                );
            }
            if surface.is_degenerate() {
                return;
            }

            surface.clear();
            renderer.draw(surface, frame, &input);
            surface.render();
            *frames_drawn += 1;
            drew = true;
        });
        drew
    }

    /// The mounted surface, if the loop is running
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn layer_opacity(&self) -> f32 {
        self.renderer.layer_opacity(&self.input.get())
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn viewport(&self) -> UVec2 {
        self.input.get().viewport
    }

    pub fn fps(&self) -> f32 {
        self.scheduler.fps()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::HostEvent;
    use std::cell::Cell;
    use std::time::Duration;

    /// Records what it was asked to draw
    struct Recorder {
        draws: Rc<Cell<u32>>,
        last_size: Rc<Cell<UVec2>>,
    }

    impl Renderer for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn draw(&mut self, surface: &mut Surface, _frame: &FrameTime, _input: &InputState) {
            self.draws.set(self.draws.get() + 1);
            self.last_size.set(surface.size());
        }
    }

    fn recorder_loop() -> (RenderLoop, Rc<Cell<u32>>, Rc<Cell<UVec2>>) {
        let draws = Rc::new(Cell::new(0));
        let last_size = Rc::new(Cell::new(UVec2::ZERO));
        let recorder = Recorder {
            draws: Rc::clone(&draws),
            last_size: Rc::clone(&last_size),
        };
        (RenderLoop::new(Box::new(recorder), 0.1), draws, last_size)
    }

    fn hub_with_viewport(width: u32, height: u32) -> EventHub {
        let mut hub = EventHub::default();
        hub.dispatch(HostEvent::Resize { width, height });
        hub
    }

    #[test]
    fn test_draws_once_per_refresh() {
        let t0 = Instant::now();
        let mut hub = hub_with_viewport(320, 200);
        let (mut render_loop, draws, size) = recorder_loop();
        render_loop.start(&mut hub, t0);

        for i in 1..=3 {
            assert!(render_loop.on_display_refresh(t0 + Duration::from_millis(16 * i)));
        }
        assert_eq!(draws.get(), 3);
        assert_eq!(size.get(), UVec2::new(320, 200));
    }

    #[test]
    fn test_resize_applies_before_next_draw() {
        let t0 = Instant::now();
        let mut hub = hub_with_viewport(320, 200);
        let (mut render_loop, _draws, size) = recorder_loop();
        render_loop.start(&mut hub, t0);
        render_loop.on_display_refresh(t0 + Duration::from_millis(16));

        hub.dispatch(HostEvent::Resize {
            width: 100,
            height: 50,
        });
        render_loop.on_display_refresh(t0 + Duration::from_millis(32));
        assert_eq!(size.get(), UVec2::new(100, 50));
        assert_eq!(render_loop.surface().unwrap().size(), UVec2::new(100, 50));
    }

    #[test]
    fn test_degenerate_viewport_skips_draw_but_keeps_running() {
        let t0 = Instant::now();
        let mut hub = hub_with_viewport(0, 200);
        let (mut render_loop, draws, _) = recorder_loop();
        render_loop.start(&mut hub, t0);

        assert!(!render_loop.on_display_refresh(t0 + Duration::from_millis(16)));
        assert_eq!(draws.get(), 0);
        assert!(render_loop.is_running());

        hub.dispatch(HostEvent::Resize {
            width: 10,
            height: 10,
        });
        assert!(render_loop.on_display_refresh(t0 + Duration::from_millis(32)));
        assert_eq!(draws.get(), 1);
    }

    #[test]
    fn test_not_started_has_no_surface() {
        let (mut render_loop, draws, _) = recorder_loop();
        assert!(render_loop.surface().is_none());
        assert!(!render_loop.on_display_refresh(Instant::now()));
        assert_eq!(draws.get(), 0);
    }

    #[test]
    fn test_events_after_stop_cause_no_draws() {
        let t0 = Instant::now();
        let mut hub = hub_with_viewport(320, 200);
        let (mut render_loop, draws, _) = recorder_loop();
        render_loop.start(&mut hub, t0);
        render_loop.on_display_refresh(t0 + Duration::from_millis(16));

        render_loop.stop(&mut hub);
        assert_eq!(hub.subscriber_count(), 0);
        assert!(render_loop.surface().is_none());

        hub.dispatch(HostEvent::PointerMove { x: 5.0, y: 5.0 });
        hub.dispatch(HostEvent::Resize {
            width: 1024,
            height: 768,
        });
        assert!(!render_loop.on_display_refresh(t0 + Duration::from_millis(32)));
        assert_eq!(draws.get(), 1);
        assert_eq!(render_loop.viewport(), UVec2::new(320, 200));
    }
}
