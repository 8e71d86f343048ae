//! Fish population and jump kinematics.
//!
//! The jump constants are design values tuned by eye, not physical
//! measurements. Per-frame quantities are expressed against a 60 Hz reference
//! frame and scaled by the real frame delta.

use std::ops::Range;

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct FishParams {
    /// Fixed population size
    pub count: usize,

    /// Resting height as a fraction of surface height
    pub water_line: f32,

    /// Apex target height as a fraction of surface height (informational)
    pub jump_target: f32,

    /// Vertical velocity at launch (pixels per reference frame, negative = up)
    pub launch_velocity: f32,

    /// Added to vertical velocity every reference frame (pixels per frame²)
    pub gravity: f32,

    /// Horizontal velocity multiplier used for pitch: atan2(vy, vx * this)
    pub pitch_velocity_scale: f32,

    /// Off-screen distance before a fish wraps to the other edge (pixels)
    pub wrap_margin_px: f32,

    /// Initial horizontal velocity range (pixels per reference frame)
    pub swim_speed: Range<f32>,

    /// Scale range for the silhouette
    pub scale: Range<f32>,

    /// Delay before each fish's first jump (seconds)
    pub first_jump_delay_s: Range<f32>,

    /// Delay between jumps (seconds)
    pub jump_interval_s: Range<f32>,

    /// Silhouette color (light, dark) as 0xRRGGBB
    pub color: (u32, u32),

    /// Highlight alpha over the body (light, dark)
    pub highlight_alpha: (f32, f32),
}

impl Default for FishParams {
    fn default() -> Self {
        Self {
            count: 5,
            water_line: 0.75,
            jump_target: 0.4,
            launch_velocity: -15.0,
            gravity: 0.5,
            pitch_velocity_scale: 3.0,
            wrap_margin_px: 100.0,
            swim_speed: 0.5..3.5,
            scale: 0.5..1.0,
            first_jump_delay_s: 2.0..5.0,
            jump_interval_s: 3.0..7.0,
            color: (0x1a5f7a, 0xffffff),
            highlight_alpha: (0.6, 0.3),
        }
    }
}

impl FishParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_range("water_line", self.water_line, 0.0, 1.0)?;
        ConfigError::check_range("jump_target", self.jump_target, 0.0, 1.0)?;
        ConfigError::check_positive("gravity", self.gravity)?;
        ConfigError::check_positive("launch_velocity (upward magnitude)", -self.launch_velocity)?;
        ConfigError::check_positive("wrap_margin_px", self.wrap_margin_px)?;
        for (field, range) in [
            ("swim_speed", &self.swim_speed),
            ("scale", &self.scale),
            ("first_jump_delay_s", &self.first_jump_delay_s),
            ("jump_interval_s", &self.jump_interval_s),
        ] {
            if range.is_empty() {
                return Err(ConfigError::Empty { field });
            }
        }
        Ok(())
    }
}
