//! CPU drawing surface backed by a `vello_cpu` render context and pixmap.
//!
//! Every renderer owns one `Surface`. It is resized to the viewport before a
//! frame draws and cleared at the top of every frame (full repaint, no double
//! buffering). Draw calls are recorded as kurbo paths and rasterized into the
//! pixmap by `render`; reads see what was drawn up to the last `render`.
//! Pixmap bytes are premultiplied RGBA8.

use std::sync::Arc;

use glam::{Affine2, UVec2, Vec2};
use vello_cpu::kurbo::{self, Affine, BezPath, Circle, Ellipse, Point, Rect, Shape as _, Stroke};
use vello_cpu::peniko::{Gradient, ImageSampler};
use vello_cpu::{Image, ImageSource, Pixmap, RenderContext};

use crate::color::Rgba;

/// Flattening tolerance for curved kurbo shapes (pixels)
const TOLERANCE: f64 = 0.1;

/// Closed 2D shape in local (pre-transform) coordinates
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Ellipse { center: Vec2, radii: Vec2 },
    Triangle([Vec2; 3]),
}

impl Shape {
    fn to_path(self) -> BezPath {
        match self {
            Shape::Ellipse { center, radii } => {
                Ellipse::new(point(center), kurbo::Vec2::new(radii.x as f64, radii.y as f64), 0.0)
                    .to_path(TOLERANCE)
            }
            Shape::Triangle([a, b, c]) => {
                let mut path = BezPath::new();
                path.move_to(point(a));
                path.line_to(point(b));
                path.line_to(point(c));
                path.close_path();
                path
            }
        }
    }
}

fn point(p: Vec2) -> Point {
    Point::new(p.x as f64, p.y as f64)
}

fn affine(transform: Affine2) -> Affine {
    let m = transform.matrix2;
    let t = transform.translation;
    Affine::new([
        m.x_axis.x as f64,
        m.x_axis.y as f64,
        m.y_axis.x as f64,
        m.y_axis.y as f64,
        t.x as f64,
        t.y as f64,
    ])
}

/// Open polyline through `points`, or None when there is no segment
fn polyline(points: &[Vec2]) -> Option<BezPath> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() || !points.iter().all(|p| p.is_finite()) {
        return None;
    }
    let mut path = BezPath::new();
    path.move_to(point(*first));
    for p in rest {
        path.line_to(point(*p));
    }
    Some(path)
}

/// Render context and the pixmap it rasterizes into
struct Canvas {
    ctx: RenderContext,
    pixmap: Arc<Pixmap>,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Option<Self> {
        let w = u16::try_from(width).ok().filter(|w| *w > 0)?;
        let h = u16::try_from(height).ok().filter(|h| *h > 0)?;
        Some(Self {
            ctx: RenderContext::new(w, h),
            pixmap: Arc::new(Pixmap::new(w, h)),
        })
    }
}

/// Pixel-addressable drawing surface
pub struct Surface {
    width: u32,
    height: u32,
    canvas: Option<Canvas>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            canvas: Canvas::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// True when there is nothing to draw into: zero width or height, or a
    /// side past the rasterizer's 16-bit limit
    pub fn is_degenerate(&self) -> bool {
        self.canvas.is_none()
    }

    /// Match the surface to the viewport size
    ///
    /// Contents are discarded when the size changes. Returns whether it did.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.canvas = Canvas::new(width, height);
        true
    }

    /// Drop everything drawn so far; the next `render` starts transparent
    pub fn clear(&mut self) {
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.ctx.reset();
        }
    }

    /// Rasterize everything drawn since the last `clear` into the pixmap
    pub fn render(&mut self) {
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };
        // A compositor may still hold the previous frame; rasterize into a
        // fresh pixmap rather than wait for it.
        if Arc::get_mut(&mut canvas.pixmap).is_none() {
            canvas.pixmap = Arc::new(Pixmap::new(canvas.ctx.width(), canvas.ctx.height()));
        }
        if let Some(pixmap) = Arc::get_mut(&mut canvas.pixmap) {
            pixmap.data_as_u8_slice_mut().fill(0);
            canvas.ctx.flush();
            canvas.ctx.render_to_pixmap(pixmap);
        }
    }

    fn ctx(&mut self, transform: Affine) -> Option<&mut RenderContext> {
        let canvas = self.canvas.as_mut()?;
        canvas.ctx.set_transform(transform);
        Some(&mut canvas.ctx)
    }

    fn full_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f64, self.height as f64)
    }

    /// Paint every pixel with a flat color
    pub fn fill(&mut self, color: Rgba) {
        let rect = self.full_rect();
        if let Some(ctx) = self.ctx(Affine::IDENTITY) {
            ctx.set_paint(color.to_color());
            ctx.fill_rect(&rect);
        }
    }

    /// Straight-alpha color of pixel (x, y) as of the last `render`
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.as_bytes().get(index..index + 4)?;
        Some(Rgba::from_premultiplied([px[0], px[1], px[2], px[3]]))
    }

    /// Premultiplied RGBA8 bytes, row-major, no padding
    pub fn as_bytes(&self) -> &[u8] {
        match &self.canvas {
            Some(canvas) => canvas.pixmap.data_as_u8_slice(),
            None => &[],
        }
    }

    /// Straight-alpha RGBA8 copy of the pixels, for image encoders
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.as_bytes()
            .chunks_exact(4)
            .flat_map(|px| Rgba::from_premultiplied([px[0], px[1], px[2], px[3]]).to_rgba8())
            .collect()
    }

    /// Fill the region between an x-sorted polyline and the bottom edge
    pub fn fill_below_curve(&mut self, points: &[Vec2], gradient: &Gradient) {
        let bottom = self.height as f64;
        let Some(mut path) = polyline(points) else {
            return;
        };
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            path.line_to(Point::new(last.x as f64, bottom));
            path.line_to(Point::new(first.x as f64, bottom));
            path.close_path();
        }
        if let Some(ctx) = self.ctx(Affine::IDENTITY) {
            ctx.set_paint(gradient.clone());
            ctx.fill_path(&path);
        }
    }

    /// Stroke a connected polyline with round joins
    pub fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Rgba) {
        if width <= 0.0 {
            return;
        }
        let Some(path) = polyline(points) else {
            return;
        };
        if let Some(ctx) = self.ctx(Affine::IDENTITY) {
            ctx.set_stroke(Stroke::new(width as f64));
            ctx.set_paint(color.to_color());
            ctx.stroke_path(&path);
        }
    }

    pub fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.stroke_polyline(&[from, to], width, color);
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 || !center.is_finite() {
            return;
        }
        let path = Circle::new(point(center), radius as f64).to_path(TOLERANCE);
        if let Some(ctx) = self.ctx(Affine::IDENTITY) {
            ctx.set_paint(color.to_color());
            ctx.fill_path(&path);
        }
    }

    /// Stroke a circle outline centered on `center`
    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        if radius <= 0.0 || width <= 0.0 || !center.is_finite() {
            return;
        }
        let path = Circle::new(point(center), radius as f64).to_path(TOLERANCE);
        if let Some(ctx) = self.ctx(Affine::IDENTITY) {
            ctx.set_stroke(Stroke::new(width as f64));
            ctx.set_paint(color.to_color());
            ctx.stroke_path(&path);
        }
    }

    /// Fill a local-space shape placed on the surface by `transform`
    pub fn fill_shape(&mut self, transform: Affine2, shape: &Shape, color: Rgba) {
        if !transform.is_finite() || transform.matrix2.determinant().abs() <= f32::EPSILON {
            return;
        }
        let path = shape.to_path();
        if let Some(ctx) = self.ctx(affine(transform)) {
            ctx.set_paint(color.to_color());
            ctx.fill_path(&path);
        }
    }

    /// Composite another surface's last render on top of this one
    ///
    /// Only the overlapping top-left region is touched when sizes differ.
    pub fn composite_over(&mut self, layer: &Surface, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        let Some(source) = layer.canvas.as_ref() else {
            return;
        };
        if opacity <= 0.0 {
            return;
        }
        let overlap = Rect::new(
            0.0,
            0.0,
            self.width.min(layer.width) as f64,
            self.height.min(layer.height) as f64,
        );
        let paint = Image {
            image: ImageSource::Pixmap(Arc::clone(&source.pixmap)),
            sampler: ImageSampler::default(),
        };
        if let Some(ctx) = self.ctx(Affine::IDENTITY) {
            ctx.set_paint_transform(Affine::IDENTITY);
            ctx.push_opacity_layer(opacity);
            ctx.set_paint(paint);
            ctx.fill_rect(&overlap);
            ctx.pop_layer();
        }
    }
}
