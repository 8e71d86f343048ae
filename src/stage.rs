//! Stage: mounts the selected scenes and composites their surfaces.
//!
//! Each scene keeps its own render loop and surface; the stage only fans host
//! events out and stacks the finished surfaces over the page background.

use std::time::Instant;

use log::{debug, info, trace};

use crate::backdrop::BackdropRenderer;
use crate::bubbles::BubbleTrailRenderer;
use crate::color::Rgba;
use crate::error::ConfigError;
use crate::input::{ColorMode, EventHub, HostEvent, InputState};
use crate::ocean::OceanRenderer;
use crate::params::{
    BackdropParams, CursorParams, FishParams, ParticleParams, RenderConfig, SphereParams,
    WaveFieldParams,
};
use crate::render_loop::{RenderLoop, Renderer};
use crate::sphere::SphereRenderer;
use crate::surface::Surface;

/// Renderable scene, listed back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SceneKind {
    Backdrop,
    Sphere,
    Ocean,
    Bubbles,
}

impl SceneKind {
    pub const ALL: [SceneKind; 4] = [
        SceneKind::Backdrop,
        SceneKind::Sphere,
        SceneKind::Ocean,
        SceneKind::Bubbles,
    ];

    /// Build the scene's renderer with default parameters
    pub fn build(self) -> Result<Box<dyn Renderer>, ConfigError> {
        Ok(match self {
            SceneKind::Backdrop => Box::new(BackdropRenderer::new(
                &BackdropParams::default(),
                ParticleParams::marine_snow(),
            )?),
            SceneKind::Sphere => Box::new(SphereRenderer::new(SphereParams::default())?),
            SceneKind::Ocean => Box::new(OceanRenderer::new(
                &WaveFieldParams::default(),
                FishParams::default(),
            )?),
            SceneKind::Bubbles => Box::new(BubbleTrailRenderer::new(
                ParticleParams::bubbles(),
                CursorParams::default(),
            )?),
        })
    }

    /// Deduplicate and sort into stacking order
    pub fn stack(scenes: &[SceneKind]) -> Vec<SceneKind> {
        let mut stacked = scenes.to_vec();
        stacked.sort();
        stacked.dedup();
        stacked
    }
}

pub struct Stage {
    hub: EventHub,
    loops: Vec<RenderLoop>,
    frame: Surface,
    background: (u32, u32),
}

impl Stage {
    /// Stage for the given scenes, sized to the configured window
    pub fn new(scenes: &[SceneKind], config: &RenderConfig) -> Result<Self, ConfigError> {
        if scenes.is_empty() {
            return Err(ConfigError::Empty { field: "scenes" });
        }
        let renderers = SceneKind::stack(scenes)
            .into_iter()
            .map(SceneKind::build)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_renderers(renderers, config))
    }

    /// Stage over arbitrary renderers, first one at the back
    pub fn from_renderers(renderers: Vec<Box<dyn Renderer>>, config: &RenderConfig) -> Self {
        let loops = renderers
            .into_iter()
            .map(|renderer| RenderLoop::new(renderer, config.max_frame_delta_s))
            .collect();
        let mut hub = EventHub::new(InputState::default());
        hub.dispatch(HostEvent::Resize {
            width: config.window_width,
            height: config.window_height,
        });

        Self {
            hub,
            loops,
            frame: Surface::new(0, 0),
            background: config.background,
        }
    }

    pub fn start(&mut self, now: Instant) {
        for render_loop in &mut self.loops {
            render_loop.start(&mut self.hub, now);
        }
        info!("Stage started with {} layer(s)", self.loops.len());
    }

    /// Stop every loop; later events and ticks draw nothing
    pub fn stop(&mut self) {
        for render_loop in &mut self.loops {
            render_loop.stop(&mut self.hub);
        }
    }

    pub fn is_running(&self) -> bool {
        self.loops.iter().any(RenderLoop::is_running)
    }

    pub fn dispatch(&mut self, event: HostEvent) {
        if let HostEvent::ColorMode(mode) = event {
            debug!("Color mode: {:?}", mode);
        }
        self.hub.dispatch(event);
    }

    pub fn input(&self) -> InputState {
        self.hub.state()
    }

    pub fn color_mode(&self) -> ColorMode {
        self.hub.state().color_mode
    }

    pub fn loops(&self) -> &[RenderLoop] {
        &self.loops
    }

    /// Run every loop's pending frame and composite the result
    ///
    /// # Returns
    /// The composited frame, or None when nothing is running or the viewport
    /// is degenerate
    pub fn tick(&mut self, now: Instant) -> Option<&Surface> {
        if !self.is_running() {
            return None;
        }
        // Release last frame's hold on the layer pixmaps before they redraw
        self.frame.clear();
        let mut drawn = 0;
        for render_loop in &mut self.loops {
            if render_loop.on_display_refresh(now) {
                drawn += 1;
            }
        }

        let input = self.hub.state();
        self.frame.resize(input.viewport.x, input.viewport.y);
        if self.frame.is_degenerate() {
            return None;
        }

        let background = input.color_mode.pick(self.background.0, self.background.1);
        self.frame.fill(Rgba::hex(background, 1.0));
        for render_loop in &self.loops {
            if let Some(layer) = render_loop.surface() {
                self.frame.composite_over(layer, render_loop.layer_opacity());
            }
        }

        self.frame.render();

        if let Some(first) = self.loops.first() {
            trace!("{} layer(s) drawn, {:.1} fps", drawn, first.fps());
        }
        Some(&self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::FrameTime;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    /// Paints the whole surface one flat color and counts draws
    struct Flat {
        color: Rgba,
        opacity: f32,
        draws: Rc<Cell<u32>>,
    }

    impl Renderer for Flat {
        fn name(&self) -> &'static str {
            "flat"
        }

        fn layer_opacity(&self, _input: &InputState) -> f32 {
            self.opacity
        }

        fn draw(&mut self, surface: &mut Surface, _frame: &FrameTime, _input: &InputState) {
            self.draws.set(self.draws.get() + 1);
            surface.fill(self.color);
        }
    }

    fn small_config() -> RenderConfig {
        RenderConfig {
            window_width: 64,
            window_height: 48,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_stack_order_and_dedup() {
        let stacked = SceneKind::stack(&[
            SceneKind::Bubbles,
            SceneKind::Ocean,
            SceneKind::Backdrop,
            SceneKind::Ocean,
        ]);
        assert_eq!(
            stacked,
            vec![SceneKind::Backdrop, SceneKind::Ocean, SceneKind::Bubbles]
        );
    }

    #[test]
    fn test_every_scene_builds() {
        for scene in SceneKind::ALL {
            assert!(scene.build().is_ok());
        }
        assert!(Stage::new(&[], &small_config()).is_err());
    }

    #[test]
    fn test_composite_respects_layer_opacity() {
        let draws = Rc::new(Cell::new(0));
        let flat = Flat {
            color: Rgba::hex(0x0000ff, 1.0),
            opacity: 0.5,
            draws: Rc::clone(&draws),
        };
        let mut stage = Stage::from_renderers(vec![Box::new(flat)], &small_config());
        stage.dispatch(HostEvent::ColorMode(ColorMode::Dark));

        let t0 = Instant::now();
        stage.start(t0);
        let frame = stage.tick(t0 + Duration::from_millis(16)).unwrap();
        assert_eq!(frame.size(), glam::UVec2::new(64, 48));

        // Half blue over the dark page background (0x0a0a0a)
        let px = frame.pixel(10, 10).unwrap();
        assert!((px.b - 0.5 * (1.0 + 10.0 / 255.0)).abs() < 0.01);
        assert!((px.r - 0.5 * 10.0 / 255.0).abs() < 0.01);
        assert_eq!(px.a, 1.0);
        assert_eq!(draws.get(), 1);
    }

    #[test]
    fn test_events_after_stop_are_ignored() {
        let draws = Rc::new(Cell::new(0));
        let flat = Flat {
            color: Rgba::WHITE,
            opacity: 1.0,
            draws: Rc::clone(&draws),
        };
        let mut stage = Stage::from_renderers(vec![Box::new(flat)], &small_config());
        let t0 = Instant::now();
        stage.start(t0);
        assert!(stage.tick(t0 + Duration::from_millis(16)).is_some());

        stage.stop();
        stage.dispatch(HostEvent::PointerMove { x: 3.0, y: 3.0 });
        stage.dispatch(HostEvent::Resize {
            width: 800,
            height: 600,
        });
        assert!(stage.tick(t0 + Duration::from_millis(32)).is_none());
        assert_eq!(draws.get(), 1);
        assert!(!stage.is_running());
    }

    #[test]
    fn test_full_stage_runs_all_scenes() {
        let mut stage = Stage::new(&SceneKind::ALL, &small_config()).unwrap();
        let t0 = Instant::now();
        stage.start(t0);
        stage.dispatch(HostEvent::PointerMove { x: 32.0, y: 24.0 });
        for i in 1..=20 {
            assert!(stage.tick(t0 + Duration::from_millis(16 * i)).is_some());
        }
        assert!(stage.loops().iter().all(|l| l.frames_drawn() == 20));

        stage.dispatch(HostEvent::Resize {
            width: 0,
            height: 48,
        });
        assert!(stage.tick(t0 + Duration::from_millis(400)).is_none());
        stage.stop();
    }
}
