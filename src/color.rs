//! Straight-alpha colors, palette helpers and vertical gradients.

use vello_cpu::peniko::color::DynamicColor;
use vello_cpu::peniko::{Color, ColorStop, Gradient};

/// RGBA color with straight (non-premultiplied) alpha, all channels in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from a packed `0xRRGGBB` value (as written in CSS hex colors)
    pub fn hex(rgb: u32, alpha: f32) -> Self {
        let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
        let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
        let b = (rgb & 0xff) as f32 / 255.0;
        Self::new(r, g, b, alpha.clamp(0.0, 1.0))
    }

    /// Convert from HSLA
    ///
    /// # Arguments
    /// * `hue_deg` - Hue in degrees (any value, wrapped into [0, 360))
    /// * `saturation` - Saturation in [0, 1]
    /// * `lightness` - Lightness in [0, 1]
    /// * `alpha` - Opacity in [0, 1]
    pub fn hsla(hue_deg: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        let h = hue_deg.rem_euclid(360.0) / 360.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        if s == 0.0 {
            return Self::new(l, l, l, alpha.clamp(0.0, 1.0));
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self::new(
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
            alpha.clamp(0.0, 1.0),
        )
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Build from a premultiplied RGBA8 pixel (the rasterizer's layout)
    pub fn from_premultiplied(px: [u8; 4]) -> Self {
        let a = px[3] as f32 / 255.0;
        if px[3] == 0 {
            return Rgba::TRANSPARENT;
        }
        let channel = |c: u8| (c as f32 / 255.0 / a).min(1.0);
        Self::new(channel(px[0]), channel(px[1]), channel(px[2]), a)
    }

    /// Rasterizer paint color
    pub fn to_color(self) -> Color {
        Color::new([
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        ])
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Linear gradient from surface row `y_start` (offset 0) to `y_end` (offset 1)
///
/// `stops` are (offset, color) pairs in increasing offset order; rows outside
/// the span take the nearest end color.
pub fn vertical_gradient(y_start: f32, y_end: f32, stops: &[(f32, Rgba)]) -> Gradient {
    let stops: Vec<ColorStop> = stops
        .iter()
        .map(|&(offset, color)| ColorStop {
            offset: offset.clamp(0.0, 1.0),
            color: DynamicColor::from_alpha_color(color.to_color()),
        })
        .collect();
    Gradient::new_linear((0.0, y_start as f64), (0.0, y_end as f64)).with_stops(stops.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_hex_unpacks_channels() {
        let c = Rgba::hex(0x0ea5e9, 0.5);
        assert!(close(c.r, 14.0 / 255.0));
        assert!(close(c.g, 165.0 / 255.0));
        assert!(close(c.b, 233.0 / 255.0));
        assert!(close(c.a, 0.5));
    }

    #[test]
    fn test_hsla_primaries() {
        let red = Rgba::hsla(0.0, 1.0, 0.5, 1.0);
        assert!(close(red.r, 1.0) && close(red.g, 0.0) && close(red.b, 0.0));

        let cyan = Rgba::hsla(180.0, 1.0, 0.5, 1.0);
        assert!(close(cyan.r, 0.0) && close(cyan.g, 1.0) && close(cyan.b, 1.0));

        // Hue wraps
        let wrapped = Rgba::hsla(360.0 + 180.0, 1.0, 0.5, 1.0);
        assert_eq!(wrapped.to_rgba8(), cyan.to_rgba8());
    }

    #[test]
    fn test_premultiplied_round_trip_keeps_hue() {
        let c = Rgba::from_premultiplied([64, 32, 0, 128]);
        assert!(close(c.a, 128.0 / 255.0));
        assert!(close(c.r, 0.5) && close(c.g, 0.25) && close(c.b, 0.0));
        assert_eq!(Rgba::from_premultiplied([10, 20, 30, 0]), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_paint_color_is_clamped() {
        let color = Rgba::new(1.5, 0.25, -0.5, 0.75).to_color();
        assert_eq!(color.components, [1.0, 0.25, 0.0, 0.75]);
    }
}
