//! Spring-following cursor bubble drawn over the bubble trail.

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct CursorParams {
    /// Spring stiffness toward the pointer (1/s² per unit mass)
    pub stiffness: f32,

    /// Velocity damping (1/s per unit mass)
    pub damping: f32,

    pub mass: f32,

    /// Longest integration step (seconds); longer frames are subdivided
    pub max_substep_s: f32,

    /// Bubble body radius and ring stroke width (pixels)
    pub bubble_radius: f32,
    pub ring_width: f32,

    /// Outer glow radius (pixels) and alpha
    pub glow_radius: f32,
    pub glow_alpha: f32,

    /// Highlight radius and offset from the bubble center (pixels)
    pub highlight_radius: f32,
    pub highlight_offset: f32,

    /// Shimmer alpha swings between these over one period (seconds)
    pub shimmer_alpha: (f32, f32),
    pub shimmer_period_s: f32,

    /// Center dot radius (pixels)
    pub dot_radius: f32,

    /// Colors (light, dark) as 0xRRGGBB, with fill/ring/highlight alphas
    pub glow_color: (u32, u32),
    pub fill_color: (u32, u32),
    pub fill_alpha: (f32, f32),
    pub ring_color: (u32, u32),
    pub ring_alpha: (f32, f32),
    pub highlight_alpha: (f32, f32),
    pub dot_color: (u32, u32),
}

impl Default for CursorParams {
    fn default() -> Self {
        Self {
            stiffness: 500.0,
            damping: 28.0,
            mass: 1.0,
            max_substep_s: 1.0 / 240.0,
            bubble_radius: 12.0,
            ring_width: 2.0,
            glow_radius: 28.8,
            glow_alpha: 0.2,
            highlight_radius: 4.0,
            highlight_offset: 4.0,
            shimmer_alpha: (0.3, 0.6),
            shimmer_period_s: 2.0,
            dot_radius: 3.0,
            glow_color: (0x22d3ee, 0x60a5fa),
            fill_color: (0x67e8f9, 0x60a5fa),
            fill_alpha: (0.3, 0.2),
            ring_color: (0x22d3ee, 0x93c5fd),
            ring_alpha: (0.5, 0.4),
            highlight_alpha: (0.6, 0.4),
            dot_color: (0x06b6d4, 0x60a5fa),
        }
    }
}

impl CursorParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_positive("stiffness", self.stiffness)?;
        ConfigError::check_positive("mass", self.mass)?;
        ConfigError::check_positive("max_substep_s", self.max_substep_s)?;
        ConfigError::check_positive("shimmer_period_s", self.shimmer_period_s)?;
        if self.damping < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "damping",
                value: self.damping,
                min: 0.0,
                max: f32::INFINITY,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(CursorParams::default().validate().is_ok());
    }

    #[test]
    fn test_spring_needs_mass() {
        let params = CursorParams {
            mass: 0.0,
            ..CursorParams::default()
        };
        assert!(params.validate().is_err());
    }
}
