//! Wave field parameters: the ocean layer stack and the depth backdrop.

use std::f32::consts::PI;

use crate::error::ConfigError;

/// One wave layer's shape and palette
#[derive(Debug, Clone)]
pub struct WaveLayerParams {
    /// Peak displacement of the primary sinusoid (pixels)
    pub amplitude_px: f32,

    /// Spatial frequency. Pixel profile: radians per pixel.
    /// Span profile: half-cycles across the surface width.
    pub frequency: f32,

    /// Constant phase offset (radians)
    pub phase_rad: f32,

    /// Phase advance per unit of wave clock (dimensionless multiplier)
    pub speed: f32,

    /// Resting height as a fraction of surface height (0 = top, 1 = bottom)
    pub baseline: f32,

    /// Fill opacity at the crest, in [0, 1]
    pub opacity: f32,

    /// Crest color in light mode (0xRRGGBB)
    pub light_color: u32,

    /// Crest color in dark mode (0xRRGGBB)
    pub dark_color: u32,
}

impl WaveLayerParams {
    /// Check amplitude, frequency and speed are positive and baseline/opacity are fractions
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_positive("amplitude_px", self.amplitude_px)?;
        ConfigError::check_positive("frequency", self.frequency)?;
        ConfigError::check_positive("speed", self.speed)?;
        ConfigError::check_range("baseline", self.baseline, 0.0, 1.0)?;
        ConfigError::check_range("opacity", self.opacity, 0.0, 1.0)?;
        Ok(())
    }
}

/// Ocean surface wave stack (back layer first)
#[derive(Debug, Clone)]
pub struct WaveFieldParams {
    /// Layers in draw order; larger, slower, higher-baseline layers first
    pub layers: Vec<WaveLayerParams>,

    /// Horizontal sampling stride (pixels)
    pub stride_px: f32,

    /// Wave clock rate (phase units per second)
    /// 0.015 per frame at the 60 Hz reference rate
    pub clock_rate: f32,

    /// Crest highlight stroke width (pixels)
    pub highlight_width_px: f32,

    /// Highlight opacity = min(layer opacity + this, 1)
    pub highlight_boost: f32,

    /// Page background the fill fades toward, light mode (0xRRGGBB)
    pub fade_light: u32,

    /// Page background the fill fades toward, dark mode (0xRRGGBB)
    pub fade_dark: u32,

    /// Whole-layer opacity when composited
    pub layer_opacity: f32,
}

impl Default for WaveFieldParams {
    fn default() -> Self {
        let layer = |amplitude_px, frequency, phase_rad, speed, baseline, opacity, light, dark| {
            WaveLayerParams {
                amplitude_px,
                frequency,
                phase_rad,
                speed,
                baseline,
                opacity,
                light_color: light,
                dark_color: dark,
            }
        };

        Self {
            layers: vec![
                // Back waves (slower, larger)
                layer(60.0, 0.0015, 0.0, 0.025, 0.55, 0.4, 0x0284c7, 0x0ea5e9),
                layer(55.0, 0.002, PI / 2.0, 0.03, 0.6, 0.5, 0x0891b2, 0x06b6d4),
                // Middle waves
                layer(50.0, 0.0025, PI, 0.035, 0.65, 0.6, 0x0d9488, 0x14b8a6),
                layer(45.0, 0.003, PI * 1.5, 0.04, 0.68, 0.7, 0x06b6d4, 0x22d3ee),
                // Front waves (faster, smaller)
                layer(40.0, 0.004, 0.0, 0.045, 0.72, 0.8, 0x0ea5e9, 0x38bdf8),
                layer(35.0, 0.005, PI / 3.0, 0.05, 0.75, 0.9, 0x38bdf8, 0x7dd3fc),
            ],
            stride_px: 2.0,
            clock_rate: 0.9,
            highlight_width_px: 2.5,
            highlight_boost: 0.2,
            fade_light: 0xf8f9fa,
            fade_dark: 0x0a0a0a,
            layer_opacity: 0.85,
        }
    }
}

impl WaveFieldParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layers.is_empty() {
            return Err(ConfigError::Empty { field: "layers" });
        }
        for layer in &self.layers {
            layer.validate()?;
        }
        ConfigError::check_positive("stride_px", self.stride_px)?;
        ConfigError::check_positive("clock_rate", self.clock_rate)?;
        ConfigError::check_range("layer_opacity", self.layer_opacity, 0.0, 1.0)?;
        Ok(())
    }
}

/// Depth tint for one color mode (three-stop gradient that never fully fades)
#[derive(Debug, Clone, Copy)]
pub struct DepthTint {
    /// Layer opacity multiplier for this mode
    pub opacity_gain: f32,

    /// Mid-depth stop color (0xRRGGBB)
    pub mid_color: u32,

    /// Bottom stop color (0xRRGGBB)
    pub deep_color: u32,

    /// Alpha multipliers at crest, midpoint and bottom
    pub stop_scales: [f32; 3],
}

/// Full-page depth backdrop: span-profile waves plus marine snow
#[derive(Debug, Clone)]
pub struct BackdropParams {
    /// Layers, deepest first. `frequency` counts half-cycles across the width,
    /// `speed` scales the backdrop clock into each layer's phase.
    pub layers: Vec<WaveLayerParams>,

    /// Horizontal sampling stride (pixels)
    pub stride_px: f32,

    /// Backdrop clock rate (units per second); 0.008 per reference frame
    pub clock_rate: f32,

    /// Gradient start above the baseline, in multiples of amplitude
    pub crest_lift: f32,

    pub light: DepthTint,
    pub dark: DepthTint,

    /// Whole-layer opacity when composited (light, dark)
    pub layer_opacity: (f32, f32),
}

impl Default for BackdropParams {
    fn default() -> Self {
        let layer = |baseline, amplitude_px, frequency, speed, opacity| WaveLayerParams {
            amplitude_px,
            frequency,
            phase_rad: 0.0,
            speed,
            baseline,
            opacity,
            light_color: 0x7dd3fc,
            dark_color: 0x3b82f6,
        };

        Self {
            layers: vec![
                layer(0.8, 60.0, 1.5, 0.5, 0.03),  // Deepest
                layer(0.7, 50.0, 2.0, 0.7, 0.05),  // Deep
                layer(0.55, 45.0, 2.5, 0.9, 0.06), // Middle
                layer(0.4, 40.0, 3.0, 1.1, 0.07),  // Shallow
                layer(0.25, 30.0, 4.0, 1.5, 0.08), // Surface ripples
            ],
            stride_px: 2.0,
            clock_rate: 0.48,
            crest_lift: 2.0,
            light: DepthTint {
                opacity_gain: 2.5,
                mid_color: 0x38bdf8,
                deep_color: 0x0ea5e9,
                stop_scales: [2.0, 1.5, 1.0],
            },
            dark: DepthTint {
                opacity_gain: 1.5,
                mid_color: 0x0ea5e9,
                deep_color: 0x06b6d4,
                stop_scales: [1.0, 0.7, 0.4],
            },
            layer_opacity: (0.8, 0.7),
        }
    }
}

impl BackdropParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layers.is_empty() {
            return Err(ConfigError::Empty { field: "layers" });
        }
        for layer in &self.layers {
            layer.validate()?;
        }
        ConfigError::check_positive("stride_px", self.stride_px)?;
        ConfigError::check_positive("clock_rate", self.clock_rate)?;
        Ok(())
    }
}
