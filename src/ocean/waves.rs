//! Layered sinusoidal wave field, composited back to front.

use std::f32::consts::PI;

use glam::Vec2;

use vello_cpu::peniko::Gradient;

use crate::color::{vertical_gradient, Rgba};
use crate::error::ConfigError;
use crate::input::ColorMode;
use crate::params::{BackdropParams, DepthTint, WaveFieldParams, WaveLayerParams};
use crate::surface::Surface;

/// How a layer's frequency maps onto the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveProfile {
    /// Frequency in radians per pixel; a half-frequency secondary term
    Pixel,
    /// Frequency in half-cycles across the width; a double-frequency secondary term
    Span,
}

/// One animated filled curve
#[derive(Debug, Clone)]
pub struct WaveLayer {
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
    pub speed: f32,
    pub baseline: f32,
    pub opacity: f32,
    /// Current crest color; swapped on color-mode change
    pub color: Rgba,
    palette: (u32, u32),
    profile: WaveProfile,
}

impl WaveLayer {
    pub fn new(
        params: &WaveLayerParams,
        profile: WaveProfile,
        mode: ColorMode,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        let palette = (params.light_color, params.dark_color);
        Ok(Self {
            amplitude: params.amplitude_px,
            frequency: params.frequency,
            phase: params.phase_rad,
            speed: params.speed,
            baseline: params.baseline,
            opacity: params.opacity,
            color: Rgba::hex(mode.pick(palette.0, palette.1), 1.0),
            palette,
            profile,
        })
    }

    pub fn profile(&self) -> WaveProfile {
        self.profile
    }

    pub fn apply_color_mode(&mut self, mode: ColorMode) {
        self.color = Rgba::hex(mode.pick(self.palette.0, self.palette.1), 1.0);
    }

    /// Surface y of the curve at column `x`
    ///
    /// # Arguments
    /// * `x` - Column in pixels
    /// * `t` - Wave clock (phase units)
    /// * `width`, `height` - Surface size in pixels
    pub fn height_at(&self, x: f32, t: f32, width: f32, height: f32) -> f32 {
        let base = self.baseline * height;
        let a = self.amplitude;
        match self.profile {
            WaveProfile::Pixel => {
                let f = self.frequency;
                let s = t * self.speed;
                base + a * (x * f + self.phase + s).sin()
                    + a * 0.5 * (x * f * 0.5 + s * 0.7).sin()
            }
            WaveProfile::Span => {
                let u = if width > 0.0 { x / width } else { 0.0 };
                let p = t * self.speed + self.phase;
                let k = u * PI * self.frequency;
                base + a * (k + p).sin() + a * 0.5 * (k * 2.0 + p * 1.3).sin()
            }
        }
    }

    /// Sample the curve at the given columns
    pub fn curve(&self, columns: &[f32], t: f32, width: f32, height: f32) -> Vec<Vec2> {
        columns
            .iter()
            .map(|&x| Vec2::new(x, self.height_at(x, t, width, height)))
            .collect()
    }
}

/// Columns from 0 to `width` at `stride`, always ending exactly at `width`
pub fn sample_columns(width: f32, stride: f32) -> Vec<f32> {
    if width <= 0.0 || stride <= 0.0 {
        return vec![0.0];
    }
    let steps = (width / stride).floor() as usize;
    let mut columns: Vec<f32> = (0..=steps).map(|i| i as f32 * stride).collect();
    match columns.last_mut() {
        Some(last) if (width - *last).abs() <= 1e-3 => *last = width,
        _ => columns.push(width),
    }
    columns
}

/// How layers are filled
#[derive(Debug, Clone, Copy)]
pub enum WaveShading {
    /// Crest color fading to the page background, with a highlight stroke
    Crest {
        highlight_width: f32,
        highlight_boost: f32,
        fade: (u32, u32),
    },
    /// Three-stop depth tint that keeps some opacity at the bottom
    Depth {
        light: DepthTint,
        dark: DepthTint,
        crest_lift: f32,
    },
}

/// Ordered wave layer stack
#[derive(Debug, Clone)]
pub struct WaveField {
    layers: Vec<WaveLayer>,
    shading: WaveShading,
    stride: f32,
    mode: ColorMode,
}

impl WaveField {
    /// Ocean surface stack (pixel profile, crest shading)
    pub fn ocean(params: &WaveFieldParams, mode: ColorMode) -> Result<Self, ConfigError> {
        params.validate()?;
        let layers = params
            .layers
            .iter()
            .map(|layer| WaveLayer::new(layer, WaveProfile::Pixel, mode))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            layers,
            shading: WaveShading::Crest {
                highlight_width: params.highlight_width_px,
                highlight_boost: params.highlight_boost,
                fade: (params.fade_light, params.fade_dark),
            },
            stride: params.stride_px,
            mode,
        })
    }

    /// Depth backdrop stack (span profile, depth shading)
    pub fn backdrop(params: &BackdropParams, mode: ColorMode) -> Result<Self, ConfigError> {
        params.validate()?;
        let layers = params
            .layers
            .iter()
            .map(|layer| WaveLayer::new(layer, WaveProfile::Span, mode))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            layers,
            shading: WaveShading::Depth {
                light: params.light,
                dark: params.dark,
                crest_lift: params.crest_lift,
            },
            stride: params.stride_px,
            mode,
        })
    }

    pub fn layers(&self) -> &[WaveLayer] {
        &self.layers
    }

    pub fn color_mode(&self) -> ColorMode {
        self.mode
    }

    /// Swap every layer's color immediately (no transition)
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        for layer in &mut self.layers {
            layer.apply_color_mode(mode);
        }
    }

    fn gradient(&self, layer: &WaveLayer, height: f32) -> Gradient {
        let base = layer.baseline * height;
        match self.shading {
            WaveShading::Crest { fade, .. } => {
                let fade = Rgba::hex(self.mode.pick(fade.0, fade.1), 0.0);
                vertical_gradient(
                    base - layer.amplitude,
                    height,
                    &[
                        (0.0, layer.color.with_alpha(layer.opacity)),
                        (0.5, layer.color.with_alpha(layer.opacity * 0.7)),
                        (1.0, fade),
                    ],
                )
            }
            WaveShading::Depth {
                light,
                dark,
                crest_lift,
            } => {
                let tint = self.mode.pick(light, dark);
                let opacity = layer.opacity * tint.opacity_gain;
                let [crest, mid, deep] = tint.stop_scales;
                vertical_gradient(
                    base - layer.amplitude * crest_lift,
                    height,
                    &[
                        (0.0, layer.color.with_alpha(opacity * crest)),
                        (0.5, Rgba::hex(tint.mid_color, opacity * mid)),
                        (1.0, Rgba::hex(tint.deep_color, opacity * deep)),
                    ],
                )
            }
        }
    }

    /// Draw every layer, back first
    ///
    /// # Arguments
    /// * `surface` - Target; must not be degenerate
    /// * `t` - Wave clock (phase units)
    pub fn draw(&self, surface: &mut Surface, t: f32) {
        let width = surface.width() as f32;
        let height = surface.height() as f32;
        let columns = sample_columns(width, self.stride);

        for layer in &self.layers {
            let points = layer.curve(&columns, t, width, height);
            surface.fill_below_curve(&points, &self.gradient(layer, height));

            if let WaveShading::Crest {
                highlight_width,
                highlight_boost,
                ..
            } = self.shading
            {
                let alpha = (layer.opacity + highlight_boost).min(1.0);
                surface.stroke_polyline(&points, highlight_width, layer.color.with_alpha(alpha));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    fn scenario_layer() -> WaveLayer {
        let params = WaveLayerParams {
            amplitude_px: 60.0,
            frequency: 0.0015,
            phase_rad: 0.0,
            speed: 0.025,
            baseline: 0.55,
            opacity: 0.4,
            light_color: 0x0284c7,
            dark_color: 0x0ea5e9,
        };
        WaveLayer::new(&params, WaveProfile::Pixel, ColorMode::Light).unwrap()
    }

    #[test]
    fn test_height_at_origin_is_baseline() {
        let layer = scenario_layer();
        let y = layer.height_at(0.0, 0.0, 800.0, 600.0);
        assert!((y - 330.0).abs() < 1e-4);
    }

    #[test]
    fn test_height_is_periodic_in_x() {
        // Secondary term has half the frequency, so the full curve repeats every 2 * 2π/f
        let layer = scenario_layer();
        let period = 2.0 * TAU / layer.frequency;
        for &t in &[0.0f32, 3.0, 17.5] {
            for &x in &[0.0f32, 120.0, 777.0] {
                let a = layer.height_at(x, t, 800.0, 600.0);
                let b = layer.height_at(x + period, t, 800.0, 600.0);
                assert!((a - b).abs() < 0.05, "x={} t={} {} vs {}", x, t, a, b);
            }
        }

        // The primary term alone repeats every 2π/f
        let primary = |x: f32| layer.amplitude * (x * layer.frequency + layer.phase).sin();
        let period = TAU / layer.frequency;
        assert!((primary(50.0) - primary(50.0 + period)).abs() < 0.05);
    }

    #[test]
    fn test_height_is_continuous() {
        let layer = scenario_layer();
        // Slope is bounded by A·f + (A/2)·(f/2), so 0.1 px steps move < 0.02 px
        let mut prev = layer.height_at(0.0, 2.0, 800.0, 600.0);
        for i in 1..8000 {
            let y = layer.height_at(i as f32 * 0.1, 2.0, 800.0, 600.0);
            assert!((y - prev).abs() < 0.02);
            prev = y;
        }
    }

    #[test]
    fn test_sample_columns_reach_width() {
        let columns = sample_columns(801.0, 2.0);
        assert_eq!(columns.first().copied(), Some(0.0));
        assert_eq!(columns.last().copied(), Some(801.0));
        assert!(columns.windows(2).all(|w| w[1] > w[0] && w[1] - w[0] <= 2.0));

        let even = sample_columns(800.0, 2.0);
        assert_eq!(even.len(), 401);
        assert_eq!(even.last().copied(), Some(800.0));
    }

    #[test]
    fn test_span_profile_at_origin() {
        let params = BackdropParams::default();
        let field = WaveField::backdrop(&params, ColorMode::Dark).unwrap();
        let layer = &field.layers()[0];
        let y = layer.height_at(0.0, 0.0, 1000.0, 500.0);
        assert!((y - 0.8 * 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_color_mode_swaps_every_layer() {
        let params = WaveFieldParams::default();
        let mut field = WaveField::ocean(&params, ColorMode::Light).unwrap();
        field.set_color_mode(ColorMode::Dark);
        for (layer, layer_params) in field.layers().iter().zip(&params.layers) {
            assert_eq!(layer.color, Rgba::hex(layer_params.dark_color, 1.0));
        }
    }

    #[test]
    fn test_invalid_layer_rejected() {
        let mut params = WaveFieldParams::default();
        params.layers[2].amplitude_px = -1.0;
        assert!(WaveField::ocean(&params, ColorMode::Light).is_err());
    }

    #[test]
    fn test_front_layer_occludes_back_layer() {
        let layer = |color| WaveLayerParams {
            amplitude_px: 5.0,
            frequency: 0.01,
            phase_rad: 0.0,
            speed: 1.0,
            baseline: 0.5,
            opacity: 1.0,
            light_color: color,
            dark_color: color,
        };
        let params = WaveFieldParams {
            layers: vec![layer(0xff0000), layer(0x0000ff)],
            ..WaveFieldParams::default()
        };
        let field = WaveField::ocean(&params, ColorMode::Light).unwrap();

        let mut surface = Surface::new(100, 100);
        field.draw(&mut surface, 0.0);
        surface.render();
        let pixel = surface.pixel(50, 60).unwrap();
        assert!(pixel.b > pixel.r);
    }

    #[test]
    fn test_draw_leaves_sky_clear() {
        let field = WaveField::ocean(&WaveFieldParams::default(), ColorMode::Light).unwrap();
        let mut surface = Surface::new(200, 400);
        field.draw(&mut surface, 1.0);
        surface.render();
        // Highest crest is at 0.55·H − 1.5·A = 220 − 90 = 130
        assert_eq!(surface.pixel(100, 20).unwrap().a, 0.0);
        assert!(surface.pixel(100, 300).unwrap().a > 0.0);
    }
}
