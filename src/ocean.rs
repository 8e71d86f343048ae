//! Ocean scene: layered surface waves with a school of jumping fish.

pub mod fish;
pub mod waves;

use glam::Vec2;
use log::debug;

use crate::error::ConfigError;
use crate::input::{ColorMode, InputState};
use crate::params::{FishParams, WaveFieldParams};
use crate::render_loop::Renderer;
use crate::scheduler::FrameTime;
use crate::surface::Surface;

pub use fish::{Fish, FishMotion, FishSchool};
pub use waves::{sample_columns, WaveField, WaveLayer, WaveProfile, WaveShading};

/// Wave field drawn back to front, fish on top
pub struct OceanRenderer {
    waves: WaveField,
    school: FishSchool,
    clock_rate: f32,
    layer_opacity: f32,
}

impl OceanRenderer {
    pub fn new(waves: &WaveFieldParams, fish: FishParams) -> Result<Self, ConfigError> {
        Ok(Self {
            waves: WaveField::ocean(waves, ColorMode::default())?,
            school: FishSchool::new(fish)?,
            clock_rate: waves.clock_rate,
            layer_opacity: waves.layer_opacity,
        })
    }

    /// Replace the fish school (seeded schools in tests)
    pub fn with_school(mut self, school: FishSchool) -> Self {
        self.school = school;
        self
    }

    pub fn waves(&self) -> &WaveField {
        &self.waves
    }

    pub fn school(&self) -> &FishSchool {
        &self.school
    }
}

impl Renderer for OceanRenderer {
    fn name(&self) -> &'static str {
        "ocean"
    }

    fn start(&mut self, input: &InputState) {
        self.waves.set_color_mode(input.color_mode);
        self.school
            .populate(input.viewport.as_vec2(), input.color_mode);
    }

    fn layer_opacity(&self, _input: &InputState) -> f32 {
        self.layer_opacity
    }

    fn draw(&mut self, surface: &mut Surface, frame: &FrameTime, input: &InputState) {
        if input.color_mode != self.waves.color_mode() {
            debug!("ocean: color mode -> {:?}", input.color_mode);
            self.waves.set_color_mode(input.color_mode);
            self.school.set_color_mode(input.color_mode);
        }

        let bounds = Vec2::new(surface.width() as f32, surface.height() as f32);
        self.waves.draw(surface, frame.elapsed * self.clock_rate);

        self.school.update(frame, bounds);
        self.school.draw(surface);
    }
}
