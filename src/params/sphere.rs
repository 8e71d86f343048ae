//! Point-cloud sphere lattice, wave displacement, rotation and projection.

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct SphereParams {
    /// Sphere radius (pixels, before projection)
    pub radius: f32,

    /// Latitude and longitude subdivisions; (segments + 1)² vertices
    pub segments: usize,

    /// Perspective focal distance (pixels): scale = focal / (focal + z)
    pub focal_distance: f32,

    /// Displacement amplitude of each wave term (pixels)
    pub wave_amplitude: f32,

    /// Spatial frequency of the wave terms (radians per pixel)
    pub wave_frequency: f32,

    /// Time multiplier of the second (y-driven) wave term
    pub wave_secondary_rate: f32,

    /// Pointer-to-angle gain (radians at the viewport edge)
    pub pointer_gain: f32,

    /// Damping fraction per reference frame, in (0, 1)
    pub damping: f32,

    /// Spin about the drawing axis (radians per second)
    pub spin_rate: f32,

    /// Base hue (degrees), saturation and lightness range of points
    pub hue_deg: f32,
    pub saturation: f32,
    pub lightness_base: f32,
    pub lightness_gain: f32,

    /// Point radius = max(min, scale * gain)
    pub point_radius_min: f32,
    pub point_radius_gain: f32,

    /// Alpha multipliers for points and edges
    pub point_alpha: f32,
    pub edge_alpha: f32,

    /// Edge stroke width (pixels)
    pub edge_width: f32,

    /// Whole-layer opacity when composited
    pub layer_opacity: f32,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius: 150.0,
            segments: 20,
            focal_distance: 300.0,
            wave_amplitude: 5.0,
            wave_frequency: 0.02,
            wave_secondary_rate: 0.8,
            pointer_gain: 0.5,
            damping: 0.05,
            spin_rate: 0.12, // 0.002 rad per reference frame
            hue_deg: 190.0,
            saturation: 0.6,
            lightness_base: 0.4,
            lightness_gain: 0.2,
            point_radius_min: 1.0,
            point_radius_gain: 3.0,
            point_alpha: 0.6,
            edge_alpha: 0.15,
            edge_width: 0.5,
            layer_opacity: 0.3,
        }
    }
}

impl SphereParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_positive("radius", self.radius)?;
        ConfigError::check_positive("focal_distance", self.focal_distance)?;
        if self.segments == 0 {
            return Err(ConfigError::Empty { field: "segments" });
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "damping",
                value: self.damping,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(())
    }
}
