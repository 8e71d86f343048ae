//! Cursor bubble: a spring-damped bubble chasing the pointer, trailed by
//! small glowing bubbles that rise from it.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::color::Rgba;
use crate::error::ConfigError;
use crate::input::{ColorMode, InputState};
use crate::params::{CursorParams, ParticleParams};
use crate::particles::ParticleSystem;
use crate::render_loop::Renderer;
use crate::scheduler::FrameTime;
use crate::surface::Surface;

/// Damped spring pulling a point toward a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringFollower {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl SpringFollower {
    /// At rest on `position`
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
        }
    }

    /// Advance `delta` seconds toward `target`
    ///
    /// Semi-implicit Euler, split into substeps no longer than
    /// `params.max_substep_s` so a stiff spring stays stable on slow frames.
    pub fn update(&mut self, target: Vec2, delta: f32, params: &CursorParams) {
        if delta <= 0.0 {
            return;
        }
        let steps = (delta / params.max_substep_s).ceil().max(1.0);
        let h = delta / steps;
        for _ in 0..steps as u32 {
            let force = (target - self.position) * params.stiffness - self.velocity * params.damping;
            self.velocity += force / params.mass * h;
            self.position += self.velocity * h;
        }
    }
}

pub struct BubbleTrailRenderer {
    bubbles: ParticleSystem,
    cursor: CursorParams,
    /// None while the pointer is away; snaps onto it when it comes back
    follower: Option<SpringFollower>,
}

impl BubbleTrailRenderer {
    pub fn new(params: ParticleParams, cursor: CursorParams) -> Result<Self, ConfigError> {
        cursor.validate()?;
        Ok(Self::from_parts(ParticleSystem::new(params)?, cursor))
    }

    pub fn from_parts(bubbles: ParticleSystem, cursor: CursorParams) -> Self {
        Self {
            bubbles,
            cursor,
            follower: None,
        }
    }

    pub fn bubbles(&self) -> &ParticleSystem {
        &self.bubbles
    }

    pub fn follower(&self) -> Option<&SpringFollower> {
        self.follower.as_ref()
    }

    fn draw_cursor(&self, surface: &mut Surface, elapsed: f32, mode: ColorMode) {
        let Some(follower) = self.follower else {
            return;
        };
        let p = &self.cursor;
        let center = follower.position;
        let color = |hex: (u32, u32), alpha: f32| Rgba::hex(mode.pick(hex.0, hex.1), alpha);

        surface.fill_circle(center, p.glow_radius, color(p.glow_color, p.glow_alpha));
        surface.fill_circle(
            center,
            p.bubble_radius,
            color(p.fill_color, mode.pick(p.fill_alpha.0, p.fill_alpha.1)),
        );

        let (low, high) = p.shimmer_alpha;
        let swing = 0.5 - 0.5 * (TAU * elapsed / p.shimmer_period_s).cos();
        surface.fill_circle(
            center,
            p.bubble_radius * 0.8,
            Rgba::WHITE.with_alpha((low + (high - low) * swing) * 0.3),
        );

        surface.stroke_circle(
            center,
            p.bubble_radius - p.ring_width * 0.5,
            p.ring_width,
            color(p.ring_color, mode.pick(p.ring_alpha.0, p.ring_alpha.1)),
        );
        surface.fill_circle(
            center - Vec2::splat(p.highlight_offset),
            p.highlight_radius,
            Rgba::WHITE.with_alpha(mode.pick(p.highlight_alpha.0, p.highlight_alpha.1)),
        );
        surface.fill_circle(center, p.dot_radius, color(p.dot_color, 1.0));
    }
}

impl Renderer for BubbleTrailRenderer {
    fn name(&self) -> &'static str {
        "bubbles"
    }

    fn start(&mut self, input: &InputState) {
        self.bubbles.clear();
        self.follower = input.pointer.map(SpringFollower::at);
    }

    fn draw(&mut self, surface: &mut Surface, frame: &FrameTime, input: &InputState) {
        let bounds = Vec2::new(surface.width() as f32, surface.height() as f32);
        self.bubbles.update(frame, bounds, input.pointer);

        self.follower = match (self.follower, input.pointer) {
            (Some(mut follower), Some(pointer)) => {
                follower.update(pointer, frame.delta, &self.cursor);
                Some(follower)
            }
            (None, Some(pointer)) => Some(SpringFollower::at(pointer)),
            (_, None) => None,
        };

        self.bubbles.draw(surface, input.color_mode);
        self.draw_cursor(surface, frame.elapsed, input.color_mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::UVec2;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn eager_trail() -> BubbleTrailRenderer {
        let params = ParticleParams {
            spawn_chance: 1.0,
            ..ParticleParams::bubbles()
        };
        BubbleTrailRenderer::from_parts(
            ParticleSystem::with_rng(params, SmallRng::seed_from_u64(5)).unwrap(),
            CursorParams::default(),
        )
    }

    fn frame(i: u64) -> FrameTime {
        FrameTime {
            elapsed: i as f32 / 60.0,
            delta: 1.0 / 60.0,
            frame: i,
        }
    }

    #[test]
    fn test_trail_follows_pointer_and_stays_capped() {
        let mut trail = eager_trail();
        let mut surface = Surface::new(200, 200);
        let mut input = InputState {
            pointer: Some(Vec2::new(100.0, 150.0)),
            viewport: UVec2::new(200, 200),
            color_mode: ColorMode::Dark,
        };
        trail.start(&input);

        for i in 1..=30 {
            surface.clear();
            trail.draw(&mut surface, &frame(i), &input);
            assert!(trail.bubbles().len() <= 8);
        }
        assert_eq!(trail.bubbles().len(), 8);

        // Pointer gone: no new bubbles, the trail drains
        input.pointer = None;
        for i in 31..=150 {
            trail.draw(&mut surface, &frame(i), &input);
        }
        assert!(trail.bubbles().is_empty());
        assert!(trail.follower().is_none());
    }

    #[test]
    fn test_follower_settles_without_growing_overshoot() {
        let params = CursorParams::default();
        let target = Vec2::new(100.0, 0.0);
        let mut follower = SpringFollower::at(Vec2::ZERO);

        let mut errors = Vec::new();
        let mut first_peak = None;
        for _ in 0..120 {
            follower.update(target, 1.0 / 60.0, &params);
            let error = follower.position.x - target.x;
            errors.push(error.abs());
            if first_peak.is_none() && error > 0.0 && follower.velocity.x <= 0.0 {
                first_peak = Some(errors.len() - 1);
            }
        }

        // Underdamped: it overshoots once, then every swing stays inside it
        let peak = first_peak.expect("spring never overshot");
        let overshoot = errors[peak];
        assert!(overshoot > 0.0 && overshoot < 100.0);
        assert!(errors[peak..].iter().all(|e| *e <= overshoot));

        assert!((follower.position - target).length() < 0.01);
        assert!(follower.velocity.length() < 0.1);
        assert_eq!(follower.position.y, 0.0);
    }

    #[test]
    fn test_long_frame_is_subdivided() {
        let params = CursorParams::default();
        let target = Vec2::new(50.0, 50.0);
        let mut follower = SpringFollower::at(Vec2::ZERO);
        // A single 0.1 s step of a 500/s² spring would blow up without substeps
        for _ in 0..20 {
            follower.update(target, 0.1, &params);
        }
        assert!((follower.position - target).length() < 0.01);

        let before = follower;
        follower.update(Vec2::ZERO, 0.0, &params);
        assert_eq!(follower, before);
    }

    #[test]
    fn test_cursor_snaps_to_returning_pointer_and_draws_dot() {
        let mut trail = eager_trail();
        let mut surface = Surface::new(200, 200);
        let mut input = InputState {
            pointer: None,
            viewport: UVec2::new(200, 200),
            color_mode: ColorMode::Light,
        };
        trail.start(&input);
        trail.draw(&mut surface, &frame(1), &input);
        assert!(trail.follower().is_none());

        input.pointer = Some(Vec2::new(60.0, 140.0));
        surface.clear();
        trail.draw(&mut surface, &frame(2), &input);
        assert_eq!(trail.follower().unwrap().position, Vec2::new(60.0, 140.0));

        surface.render();
        // Opaque center dot, nothing far from the cursor
        assert_eq!(surface.pixel(60, 140).unwrap().a, 1.0);
        assert_eq!(surface.pixel(180, 20).unwrap().a, 0.0);
    }
}
