//! Depth backdrop: full-page span waves with falling marine snow.

use glam::Vec2;
use log::debug;

use crate::error::ConfigError;
use crate::input::{ColorMode, InputState};
use crate::ocean::WaveField;
use crate::params::{BackdropParams, ParticleParams};
use crate::particles::ParticleSystem;
use crate::render_loop::Renderer;
use crate::scheduler::FrameTime;
use crate::surface::Surface;

pub struct BackdropRenderer {
    waves: WaveField,
    snow: ParticleSystem,
    clock_rate: f32,
    layer_opacity: (f32, f32),
}

impl BackdropRenderer {
    pub fn new(params: &BackdropParams, snow: ParticleParams) -> Result<Self, ConfigError> {
        Ok(Self::from_parts(
            WaveField::backdrop(params, ColorMode::default())?,
            ParticleSystem::new(snow)?,
            params,
        ))
    }

    pub fn from_parts(waves: WaveField, snow: ParticleSystem, params: &BackdropParams) -> Self {
        Self {
            waves,
            snow,
            clock_rate: params.clock_rate,
            layer_opacity: params.layer_opacity,
        }
    }

    pub fn snow(&self) -> &ParticleSystem {
        &self.snow
    }
}

impl Renderer for BackdropRenderer {
    fn name(&self) -> &'static str {
        "backdrop"
    }

    fn start(&mut self, input: &InputState) {
        self.waves.set_color_mode(input.color_mode);
        self.snow.clear();
        self.snow.scatter(input.viewport.as_vec2());
    }

    fn layer_opacity(&self, input: &InputState) -> f32 {
        input
            .color_mode
            .pick(self.layer_opacity.0, self.layer_opacity.1)
    }

    fn draw(&mut self, surface: &mut Surface, frame: &FrameTime, input: &InputState) {
        if input.color_mode != self.waves.color_mode() {
            debug!("backdrop: color mode -> {:?}", input.color_mode);
            self.waves.set_color_mode(input.color_mode);
        }

        let bounds = Vec2::new(surface.width() as f32, surface.height() as f32);
        self.waves.draw(surface, frame.elapsed * self.clock_rate);

        // Snow ignores the pointer
        self.snow.update(frame, bounds, None);
        self.snow.draw(surface, input.color_mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::UVec2;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn backdrop() -> BackdropRenderer {
        let params = BackdropParams::default();
        BackdropRenderer::from_parts(
            WaveField::backdrop(&params, ColorMode::Light).unwrap(),
            ParticleSystem::with_rng(ParticleParams::marine_snow(), SmallRng::seed_from_u64(8))
                .unwrap(),
            &params,
        )
    }

    fn input(mode: ColorMode) -> InputState {
        InputState {
            pointer: None,
            viewport: UVec2::new(320, 240),
            color_mode: mode,
        }
    }

    #[test]
    fn test_layer_opacity_depends_on_mode() {
        let backdrop = backdrop();
        assert_eq!(backdrop.layer_opacity(&input(ColorMode::Light)), 0.8);
        assert_eq!(backdrop.layer_opacity(&input(ColorMode::Dark)), 0.7);
    }

    #[test]
    fn test_draw_tints_the_depths() {
        let mut backdrop = backdrop();
        backdrop.start(&input(ColorMode::Light));
        assert_eq!(backdrop.snow().len(), 30);

        let mut surface = Surface::new(320, 240);
        let frame = FrameTime {
            elapsed: 1.0,
            delta: 1.0 / 60.0,
            frame: 60,
        };
        backdrop.draw(&mut surface, &frame, &input(ColorMode::Dark));
        surface.render();

        // Depth tint keeps some opacity at the very bottom
        let bottom = surface.pixel(160, 239).unwrap();
        assert!(bottom.a > 0.0);
        assert!(bottom.b > bottom.r);
        assert!(backdrop.snow().len() <= 30);
    }
}
