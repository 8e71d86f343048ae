//! Jumping fish: horizontal drift with wraparound and a kinematic jump arc.

use glam::{Affine2, Vec2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::color::Rgba;
use crate::error::ConfigError;
use crate::input::ColorMode;
use crate::params::{sample_range, FishParams};
use crate::scheduler::FrameTime;
use crate::surface::{Shape, Surface};

/// Body ellipse, tail and dorsal fin in local fish space (facing +x)
const BODY: Shape = Shape::Ellipse {
    center: Vec2::ZERO,
    radii: Vec2::new(30.0, 12.0),
};
const TAIL: Shape = Shape::Triangle([
    Vec2::new(-25.0, 0.0),
    Vec2::new(-40.0, -15.0),
    Vec2::new(-40.0, 15.0),
]);
const FIN: Shape = Shape::Triangle([
    Vec2::new(5.0, -12.0),
    Vec2::new(10.0, -25.0),
    Vec2::new(15.0, -12.0),
]);
const HIGHLIGHT: Shape = Shape::Ellipse {
    center: Vec2::new(8.0, -3.0),
    radii: Vec2::new(8.0, 4.0),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FishMotion {
    Swimming,
    Jumping,
}

#[derive(Debug, Clone)]
pub struct Fish {
    /// Surface position (pixels)
    pub position: Vec2,
    /// Apex the jump aims for (pixels); informational
    pub target_y: f32,
    /// x: horizontal drift, y: vertical speed (pixels per reference frame)
    pub velocity: Vec2,
    /// Pitch (radians); zero while swimming
    pub rotation: f32,
    pub scale: f32,
    pub color: Rgba,
    pub motion: FishMotion,
    /// Animation-clock time of the next jump (seconds)
    pub next_jump_at: f32,
}

impl Fish {
    pub fn is_jumping(&self) -> bool {
        self.motion == FishMotion::Jumping
    }

    /// Horizontal mirror derived from the drift direction
    pub fn facing(&self) -> f32 {
        if self.velocity.x < 0.0 {
            -1.0
        } else {
            1.0
        }
    }

    /// Advance one frame
    ///
    /// # Arguments
    /// * `frame` - Frame timing; velocities are scaled by its reference-frame delta
    /// * `bounds` - Surface size in pixels, read fresh each frame
    /// * `params` - Kinematic constants
    /// * `rng` - Source for the next jump delay
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        frame: &FrameTime,
        bounds: Vec2,
        params: &FishParams,
        rng: &mut R,
    ) {
        let k = frame.reference_frames();
        let water_line = bounds.y * params.water_line;
        let margin = params.wrap_margin_px;

        self.position.x += self.velocity.x * k;
        if self.position.x > bounds.x + margin {
            self.position.x = -margin;
        } else if self.position.x < -margin {
            self.position.x = bounds.x + margin;
        }

        match self.motion {
            FishMotion::Swimming => {
                self.position.y = water_line;
                self.rotation = 0.0;

                if frame.elapsed >= self.next_jump_at {
                    self.motion = FishMotion::Jumping;
                    self.velocity.y = params.launch_velocity;
                    self.target_y = bounds.y * params.jump_target;
                    self.next_jump_at = frame.elapsed + sample_range(rng, &params.jump_interval_s);
                }
            }
            FishMotion::Jumping => {
                self.velocity.y += params.gravity * k;
                let next_y = self.position.y + self.velocity.y * k;

                // Only a descending fish can land; a stalled frame keeps the jump
                if next_y >= water_line && self.velocity.y > 0.0 {
                    self.position.y = water_line;
                    self.velocity.y = 0.0;
                    self.rotation = 0.0;
                    self.motion = FishMotion::Swimming;
                } else {
                    self.position.y = next_y;
                    self.rotation = self
                        .velocity
                        .y
                        .atan2(self.velocity.x * params.pitch_velocity_scale);
                }
            }
        }
    }

    /// Local-to-surface transform: translate, rotate, scale, then mirror
    pub fn transform(&self) -> Affine2 {
        Affine2::from_translation(self.position)
            * Affine2::from_angle(self.rotation)
            * Affine2::from_scale(Vec2::splat(self.scale))
            * Affine2::from_scale(Vec2::new(self.facing(), 1.0))
    }

    pub fn draw(&self, surface: &mut Surface, highlight: Rgba) {
        let transform = self.transform();
        surface.fill_shape(transform, &BODY, self.color);
        surface.fill_shape(transform, &TAIL, self.color);
        surface.fill_shape(transform, &FIN, self.color);
        surface.fill_shape(transform, &HIGHLIGHT, highlight);
    }
}

/// Fixed-size fish population
#[derive(Debug)]
pub struct FishSchool {
    fish: Vec<Fish>,
    params: FishParams,
    rng: SmallRng,
    mode: ColorMode,
}

impl FishSchool {
    pub fn new(params: FishParams) -> Result<Self, ConfigError> {
        Self::with_rng(params, SmallRng::from_entropy())
    }

    pub fn with_rng(params: FishParams, rng: SmallRng) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            fish: Vec::new(),
            params,
            rng,
            mode: ColorMode::default(),
        })
    }

    /// Create the population with randomized phase across `bounds`
    pub fn populate(&mut self, bounds: Vec2, mode: ColorMode) {
        self.mode = mode;
        let color = self.color();
        let water_line = bounds.y * self.params.water_line;
        let width = bounds.x.max(1.0);

        self.fish = (0..self.params.count)
            .map(|_| Fish {
                position: Vec2::new(self.rng.gen_range(0.0..width), water_line),
                target_y: water_line,
                velocity: Vec2::new(sample_range(&mut self.rng, &self.params.swim_speed), 0.0),
                rotation: 0.0,
                scale: sample_range(&mut self.rng, &self.params.scale),
                color,
                motion: FishMotion::Swimming,
                next_jump_at: sample_range(&mut self.rng, &self.params.first_jump_delay_s),
            })
            .collect();
    }

    pub fn fish(&self) -> &[Fish] {
        &self.fish
    }

    fn color(&self) -> Rgba {
        Rgba::hex(self.mode.pick(self.params.color.0, self.params.color.1), 1.0)
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        let color = self.color();
        for fish in &mut self.fish {
            fish.color = color;
        }
    }

    pub fn update(&mut self, frame: &FrameTime, bounds: Vec2) {
        for fish in &mut self.fish {
            fish.update(frame, bounds, &self.params, &mut self.rng);
        }
    }

    pub fn draw(&self, surface: &mut Surface) {
        let alpha = self
            .mode
            .pick(self.params.highlight_alpha.0, self.params.highlight_alpha.1);
        let highlight = Rgba::WHITE.with_alpha(alpha);
        for fish in &self.fish {
            fish.draw(surface, highlight);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    fn frame(elapsed: f32, delta: f32) -> FrameTime {
        FrameTime {
            elapsed,
            delta,
            frame: 0,
        }
    }

    fn resting_fish(next_jump_at: f32) -> Fish {
        Fish {
            position: Vec2::new(400.0, 450.0),
            target_y: 450.0,
            velocity: Vec2::new(2.0, 0.0),
            rotation: 0.0,
            scale: 1.0,
            color: Rgba::WHITE,
            motion: FishMotion::Swimming,
            next_jump_at,
        }
    }

    #[test]
    fn test_due_jump_launches_next_frame() {
        let params = FishParams::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut fish = resting_fish(1.0);

        fish.update(&frame(2.0, 1.0 / 60.0), BOUNDS, &params, &mut rng);

        assert!(fish.is_jumping());
        assert_eq!(fish.velocity.y, -15.0);
        assert_eq!(fish.target_y, 600.0 * 0.4);
        assert!(fish.next_jump_at >= 2.0 + 3.0 && fish.next_jump_at < 2.0 + 7.0);
    }

    #[test]
    fn test_jump_arc_lands_on_water_line() {
        let params = FishParams::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut fish = resting_fish(0.0);
        let water_line = BOUNDS.y * params.water_line;

        let dt = 1.0 / 60.0;
        let mut t = 0.0;
        fish.update(&frame(t, dt), BOUNDS, &params, &mut rng);
        assert!(fish.is_jumping());

        let mut apex = water_line;
        let mut saw_nose_up = false;
        let mut saw_nose_down = false;
        for _ in 0..200 {
            t += dt;
            fish.update(&frame(t, dt), BOUNDS, &params, &mut rng);
            if !fish.is_jumping() {
                break;
            }
            assert!(fish.position.y < water_line);
            apex = apex.min(fish.position.y);
            saw_nose_up |= fish.rotation < 0.0;
            saw_nose_down |= fish.rotation > 0.0;
        }

        assert!(!fish.is_jumping());
        assert_eq!(fish.position.y, water_line);
        assert_eq!(fish.velocity.y, 0.0);
        assert_eq!(fish.rotation, 0.0);
        assert!(saw_nose_up && saw_nose_down);
        // v² / 2g ≈ 225 px rise for the default constants
        assert!(water_line - apex > 150.0);
    }

    #[test]
    fn test_stalled_frame_after_launch_keeps_the_jump() {
        let params = FishParams::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut fish = resting_fish(0.0);
        let water_line = BOUNDS.y * params.water_line;

        fish.update(&frame(0.0, 1.0 / 60.0), BOUNDS, &params, &mut rng);
        assert!(fish.is_jumping());

        // Hidden tab or clock hiccup: zero elapsed time
        fish.update(&frame(0.0, 0.0), BOUNDS, &params, &mut rng);
        assert!(fish.is_jumping());
        assert_eq!(fish.velocity.y, params.launch_velocity);
        assert_eq!(fish.position.y, water_line);

        fish.update(&frame(1.0 / 60.0, 1.0 / 60.0), BOUNDS, &params, &mut rng);
        assert!(fish.is_jumping());
        assert!(fish.position.y < water_line);
    }

    #[test]
    fn test_swimming_invariants_hold_under_variable_frames() {
        let params = FishParams::default();
        let mut rng = SmallRng::seed_from_u64(99);
        let mut school = FishSchool::with_rng(params.clone(), SmallRng::seed_from_u64(5)).unwrap();
        school.populate(BOUNDS, ColorMode::Light);
        let water_line = BOUNDS.y * params.water_line;

        let mut t = 0.0;
        for _ in 0..5000 {
            let dt = rng.gen_range(0.004..0.05);
            t += dt;
            let was_jumping: Vec<bool> = school.fish().iter().map(Fish::is_jumping).collect();
            school.update(&frame(t, dt), BOUNDS);

            for (fish, was) in school.fish().iter().zip(was_jumping) {
                if !fish.is_jumping() {
                    assert_eq!(fish.position.y, water_line);
                    assert_eq!(fish.rotation, 0.0);
                } else if was {
                    // Only the launch frame sits on the water line while jumping
                    assert!(fish.position.y < water_line);
                }
                assert!(fish.position.x >= -params.wrap_margin_px);
                assert!(fish.position.x <= BOUNDS.x + params.wrap_margin_px);
            }
        }
    }

    #[test]
    fn test_wraps_both_edges() {
        let params = FishParams::default();
        let mut rng = SmallRng::seed_from_u64(1);

        let mut right = resting_fish(f32::MAX);
        right.position.x = BOUNDS.x + params.wrap_margin_px - 1.0;
        right.update(&frame(0.1, 1.0 / 60.0), BOUNDS, &params, &mut rng);
        assert_eq!(right.position.x, -params.wrap_margin_px);

        let mut left = resting_fish(f32::MAX);
        left.velocity.x = -2.0;
        left.position.x = -params.wrap_margin_px + 1.0;
        left.update(&frame(0.1, 1.0 / 60.0), BOUNDS, &params, &mut rng);
        assert_eq!(left.position.x, BOUNDS.x + params.wrap_margin_px);
        assert_eq!(left.facing(), -1.0);
    }

    #[test]
    fn test_populate_and_color_mode() {
        let params = FishParams::default();
        let mut school = FishSchool::with_rng(params.clone(), SmallRng::seed_from_u64(8)).unwrap();
        school.populate(BOUNDS, ColorMode::Light);
        assert_eq!(school.fish().len(), params.count);
        for fish in school.fish() {
            assert!(!fish.is_jumping());
            assert!(fish.next_jump_at >= 2.0 && fish.next_jump_at < 5.0);
            assert_eq!(fish.color, Rgba::hex(0x1a5f7a, 1.0));
        }

        school.set_color_mode(ColorMode::Dark);
        assert!(school.fish().iter().all(|f| f.color == Rgba::WHITE));
    }

    #[test]
    fn test_draw_paints_body_at_position() {
        let mut surface = Surface::new(200, 200);
        let mut fish = resting_fish(f32::MAX);
        fish.position = Vec2::new(100.0, 100.0);
        fish.color = Rgba::hex(0x1a5f7a, 1.0);
        fish.draw(&mut surface, Rgba::WHITE.with_alpha(0.6));
        surface.render();

        assert_eq!(surface.pixel(80, 100).unwrap().a, 1.0); // rear body
        assert_eq!(surface.pixel(100, 20).unwrap().a, 0.0);
    }
}
