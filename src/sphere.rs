//! Rotating point-cloud sphere with a traveling surface wave.
//!
//! The lattice is generated once and never mutated; every frame derives a
//! transient displaced, rotated and projected copy from it.

use glam::{Vec2, Vec3};

use crate::color::Rgba;
use crate::error::ConfigError;
use crate::input::InputState;
use crate::params::SphereParams;
use crate::render_loop::Renderer;
use crate::scheduler::FrameTime;
use crate::surface::Surface;

const EDGE_LIGHTNESS: f32 = 0.5;

/// Latitude/longitude vertex grid in generation order
#[derive(Debug, Clone)]
pub struct SphereLattice {
    vertices: Vec<Vec3>,
    segments: usize,
}

impl SphereLattice {
    /// Build (segments + 1)² vertices, latitude-major
    pub fn new(radius: f32, segments: usize) -> Self {
        let segments = segments.max(1);
        let mut vertices = Vec::with_capacity((segments + 1) * (segments + 1));

        for lat in 0..=segments {
            let theta = lat as f32 * std::f32::consts::PI / segments as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();

            for lon in 0..=segments {
                let phi = lon as f32 * std::f32::consts::TAU / segments as f32;
                let (sin_phi, cos_phi) = phi.sin_cos();

                vertices.push(Vec3::new(
                    radius * sin_theta * cos_phi,
                    radius * cos_theta,
                    radius * sin_theta * sin_phi,
                ));
            }
        }

        Self { vertices, segments }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Whether vertex `i` is joined to vertex `i - 1`
    ///
    /// The first vertex of every latitude row has no edge.
    pub fn has_predecessor_edge(&self, i: usize) -> bool {
        i % (self.segments + 1) != 0
    }
}

/// Running rotation angles (radians) about x, y and z
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub angles: Vec3,
}

impl RotationState {
    /// Damp x/y toward the pointer targets and advance the z spin
    ///
    /// # Arguments
    /// * `frame` - Frame timing; damping is compounded per reference frame
    /// * `pointer` - Pointer normalized to [-1, 1]; zero when absent
    /// * `params` - Gain, damping and spin rate
    pub fn update(&mut self, frame: &FrameTime, pointer: Vec2, params: &SphereParams) {
        let target = Vec2::new(pointer.y, pointer.x) * params.pointer_gain;
        let k = 1.0 - (1.0 - params.damping).powf(frame.reference_frames().max(0.0));

        self.angles.x += (target.x - self.angles.x) * k;
        self.angles.y += (target.y - self.angles.y) * k;
        self.angles.z += params.spin_rate * frame.delta;
    }
}

/// One lattice vertex on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedVertex {
    /// Screen position (pixels)
    pub screen: Vec2,
    /// Perspective scale, focal / (focal + z)
    pub scale: f32,
    /// Rotated z (pixels, +z away from the viewer)
    pub depth: f32,
}

/// Add the traveling wave to a lattice vertex's z
pub fn displace(vertex: Vec3, t: f32, params: &SphereParams) -> Vec3 {
    let a = params.wave_amplitude;
    let f = params.wave_frequency;
    let wave = a * (vertex.x * f + t).sin() + a * (vertex.y * f + t * params.wave_secondary_rate).sin();
    Vec3::new(vertex.x, vertex.y, vertex.z + wave)
}

/// Rotate about x, then y, then z
pub fn rotate(v: Vec3, angles: Vec3) -> Vec3 {
    let (sin, cos) = angles.x.sin_cos();
    let v = Vec3::new(v.x, v.y * cos - v.z * sin, v.y * sin + v.z * cos);

    let (sin, cos) = angles.y.sin_cos();
    let v = Vec3::new(v.x * cos + v.z * sin, v.y, -v.x * sin + v.z * cos);

    let (sin, cos) = angles.z.sin_cos();
    Vec3::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos, v.z)
}

/// Perspective projection about `center`
///
/// # Returns
/// None when the vertex is at or behind the focal plane
pub fn project(v: Vec3, focal: f32, center: Vec2) -> Option<ProjectedVertex> {
    let denom = focal + v.z;
    if denom <= 0.0 {
        return None;
    }
    let scale = focal / denom;
    Some(ProjectedVertex {
        screen: Vec2::new(v.x, v.y) * scale + center,
        scale,
        depth: v.z,
    })
}

/// Displace, rotate and project the whole lattice
///
/// Pure in its inputs: the same `t` and `angles` always give the same result.
pub fn project_lattice(
    lattice: &SphereLattice,
    params: &SphereParams,
    t: f32,
    angles: Vec3,
    center: Vec2,
) -> Vec<Option<ProjectedVertex>> {
    lattice
        .vertices()
        .iter()
        .map(|&v| project(rotate(displace(v, t, params), angles), params.focal_distance, center))
        .collect()
}

pub struct SphereRenderer {
    lattice: SphereLattice,
    rotation: RotationState,
    params: SphereParams,
}

impl SphereRenderer {
    pub fn new(params: SphereParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            lattice: SphereLattice::new(params.radius, params.segments),
            rotation: RotationState::default(),
            params,
        })
    }

    pub fn lattice(&self) -> &SphereLattice {
        &self.lattice
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    fn point_color(&self, p: &ProjectedVertex) -> Rgba {
        let params = &self.params;
        Rgba::hsla(
            params.hue_deg + p.depth / 10.0,
            params.saturation,
            params.lightness_base + params.lightness_gain * p.scale,
            params.point_alpha * p.scale.clamp(0.1, 1.0),
        )
    }
}

impl Renderer for SphereRenderer {
    fn name(&self) -> &'static str {
        "sphere"
    }

    fn start(&mut self, _input: &InputState) {
        self.rotation = RotationState::default();
    }

    fn layer_opacity(&self, _input: &InputState) -> f32 {
        self.params.layer_opacity
    }

    fn draw(&mut self, surface: &mut Surface, frame: &FrameTime, input: &InputState) {
        self.rotation
            .update(frame, input.normalized_pointer(), &self.params);

        let center = Vec2::new(surface.width() as f32, surface.height() as f32) * 0.5;
        let projected = project_lattice(
            &self.lattice,
            &self.params,
            frame.elapsed,
            self.rotation.angles,
            center,
        );

        for (i, vertex) in projected.iter().enumerate() {
            let Some(p) = vertex else {
                continue;
            };
            let opacity = p.scale.clamp(0.1, 1.0);
            let radius = (p.scale * self.params.point_radius_gain).max(self.params.point_radius_min);
            surface.fill_circle(p.screen, radius, self.point_color(p));

            if i > 0 && self.lattice.has_predecessor_edge(i) {
                if let Some(prev) = &projected[i - 1] {
                    let color = Rgba::hsla(
                        self.params.hue_deg,
                        self.params.saturation,
                        EDGE_LIGHTNESS,
                        self.params.edge_alpha * opacity,
                    );
                    surface.draw_line(p.screen, prev.screen, self.params.edge_width, color);
                }
            }
        }
    }
}
