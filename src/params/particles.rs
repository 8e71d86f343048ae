//! Particle system parameters: cursor bubble trail and ambient marine snow.

use std::ops::Range;

use crate::error::ConfigError;

/// Where particles come from and where they go when they die
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Spawned at the pointer, rise and vanish
    Bubble,
    /// Spawned along the top edge, fall and respawn
    Snow,
}

#[derive(Debug, Clone)]
pub struct ParticleParams {
    pub kind: ParticleKind,

    /// Maximum live particles; oldest are evicted first
    pub max_count: usize,

    /// Spawn probability per reference frame (60 Hz)
    pub spawn_chance: f32,

    /// Random offset applied to the spawn position (± pixels per axis)
    pub spawn_jitter_px: f32,

    /// Lifetime range (seconds)
    pub lifetime_s: Range<f32>,

    /// Size range (radius, pixels)
    pub size_px: Range<f32>,

    /// Vertical travel: bubbles rise this far over their life (pixels);
    /// snow falls at this speed (pixels per second)
    pub vertical_drift: f32,

    /// Maximum horizontal drift target (± pixels over the whole life)
    pub horizontal_drift_px: f32,

    /// Noise wobble amplitude (pixels) and rate (noise units per second)
    pub wobble_px: f32,
    pub wobble_rate: f32,

    /// Fade-in and fade-out spans as fractions of lifetime
    pub fade_in: f32,
    pub fade_out: f32,

    /// Peak opacity of the envelope
    pub peak_opacity: f32,

    /// Size multiplier at birth and at death (linear in between)
    pub size_curve: (f32, f32),

    /// Particle color (light, dark) as 0xRRGGBB
    pub color: (u32, u32),

    /// Extra alpha multiplier per mode (light, dark)
    pub mode_alpha: (f32, f32),

    /// Perlin seed for wobble
    pub noise_seed: u32,
}

impl ParticleParams {
    /// Cursor bubble trail
    pub fn bubbles() -> Self {
        Self {
            kind: ParticleKind::Bubble,
            max_count: 8,
            spawn_chance: 0.08,
            spawn_jitter_px: 10.0,
            lifetime_s: 1.5..1.5,
            size_px: 4.0..4.0,
            vertical_drift: 100.0,
            horizontal_drift_px: 6.0,
            wobble_px: 3.0,
            wobble_rate: 1.5,
            fade_in: 0.1,
            fade_out: 0.6,
            peak_opacity: 0.6,
            size_curve: (0.5, 0.2),
            color: (0x22d3ee, 0x67e8f9),
            mode_alpha: (1.0, 1.0),
            noise_seed: 7,
        }
    }

    /// Ambient falling marine snow
    pub fn marine_snow() -> Self {
        Self {
            kind: ParticleKind::Snow,
            max_count: 30,
            spawn_chance: 0.05,
            spawn_jitter_px: 20.0,
            lifetime_s: 8.0..16.0,
            size_px: 1.0..4.0,
            vertical_drift: 20.0,
            horizontal_drift_px: 30.0,
            wobble_px: 50.0,
            wobble_rate: 0.15,
            fade_in: 0.15,
            fade_out: 0.25,
            peak_opacity: 1.0,
            size_curve: (1.0, 1.0),
            color: (0xffffff, 0xffffff),
            mode_alpha: (0.3, 0.1),
            noise_seed: 11,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_count == 0 {
            return Err(ConfigError::Empty { field: "max_count" });
        }
        ConfigError::check_range("spawn_chance", self.spawn_chance, 0.0, 1.0)?;
        ConfigError::check_positive("lifetime_s.start", self.lifetime_s.start)?;
        if self.lifetime_s.end < self.lifetime_s.start {
            return Err(ConfigError::Empty { field: "lifetime_s" });
        }
        ConfigError::check_range("fade_in", self.fade_in, 0.0, 1.0)?;
        ConfigError::check_range("fade_out", self.fade_out, 0.0, 1.0)?;
        ConfigError::check_range("fade_in + fade_out", self.fade_in + self.fade_out, 0.0, 1.0)?;
        ConfigError::check_range("peak_opacity", self.peak_opacity, 0.0, 1.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(ParticleParams::bubbles().validate().is_ok());
        assert!(ParticleParams::marine_snow().validate().is_ok());
    }

    #[test]
    fn test_envelope_spans_must_fit_lifetime() {
        let mut params = ParticleParams::bubbles();
        params.fade_in = 0.6;
        params.fade_out = 0.6;
        assert!(params.validate().is_err());
    }
}
