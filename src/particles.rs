//! Floating particles: cursor bubble trails and ambient marine snow.
//!
//! Particles are independent and unordered for drawing purposes; the live set
//! is kept in spawn order only so the oldest can be evicted when the cap is
//! hit. Position and opacity are pure functions of a particle's age, so they
//! stay bounded no matter how frames are paced.

use std::collections::VecDeque;

use glam::Vec2;
use noise::{NoiseFn, Perlin};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::color::Rgba;
use crate::error::ConfigError;
use crate::input::ColorMode;
use crate::params::{sample_range, ParticleKind, ParticleParams};
use crate::scheduler::FrameTime;
use crate::surface::Surface;

#[derive(Debug, Clone)]
pub struct Particle {
    /// Spawn position (pixels)
    pub origin: Vec2,
    /// Current position (pixels)
    pub position: Vec2,
    /// Horizontal drift reached at end of life (pixels)
    pub drift: f32,
    /// Base radius (pixels)
    pub size: f32,
    /// Seconds since spawn
    pub age: f32,
    /// Seconds until recycling
    pub lifetime: f32,
    /// Noise lane for wobble; integral so wobble is zero at spawn
    lane: f64,
}

impl Particle {
    /// Fraction of life used, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.lifetime <= 0.0 {
            1.0
        } else {
            (self.age / self.lifetime).clamp(0.0, 1.0)
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }
}

/// Fade-in / hold / fade-out envelope in [0, 1]
///
/// Zero at spawn and at (and after) end of life.
pub fn fade_envelope(age: f32, lifetime: f32, fade_in: f32, fade_out: f32) -> f32 {
    if lifetime <= 0.0 || age <= 0.0 || age >= lifetime {
        return 0.0;
    }
    let u = age / lifetime;
    let rise = if fade_in > 0.0 { u / fade_in } else { 1.0 };
    let fall = if fade_out > 0.0 { (1.0 - u) / fade_out } else { 1.0 };
    rise.min(fall).clamp(0.0, 1.0)
}

#[derive(Debug)]
pub struct ParticleSystem {
    params: ParticleParams,
    particles: VecDeque<Particle>,
    rng: SmallRng,
    noise: Perlin,
    next_lane: u32,
}

impl ParticleSystem {
    pub fn new(params: ParticleParams) -> Result<Self, ConfigError> {
        Self::with_rng(params, SmallRng::from_entropy())
    }

    pub fn with_rng(params: ParticleParams, rng: SmallRng) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            noise: Perlin::new(params.noise_seed),
            particles: VecDeque::with_capacity(params.max_count + 1),
            params,
            rng,
            next_lane: 0,
        })
    }

    pub fn params(&self) -> &ParticleParams {
        &self.params
    }

    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    fn fresh_particle(&mut self, origin: Vec2) -> Particle {
        let jitter = self.params.spawn_jitter_px;
        let origin = if jitter > 0.0 {
            origin
                + Vec2::new(
                    self.rng.gen_range(-jitter..=jitter),
                    self.rng.gen_range(-jitter..=jitter),
                )
        } else {
            origin
        };
        let drift = if self.params.horizontal_drift_px > 0.0 {
            let d = self.params.horizontal_drift_px;
            self.rng.gen_range(-d..=d)
        } else {
            0.0
        };
        let lane = self.next_lane as f64;
        self.next_lane = self.next_lane.wrapping_add(1);

        Particle {
            origin,
            position: origin,
            drift,
            size: sample_range(&mut self.rng, &self.params.size_px),
            age: 0.0,
            lifetime: sample_range(&mut self.rng, &self.params.lifetime_s),
            lane,
        }
    }

    /// Add a particle near `origin`, evicting the oldest beyond the cap
    pub fn spawn_at(&mut self, origin: Vec2) {
        let particle = self.fresh_particle(origin);
        self.particles.push_back(particle);
        while self.particles.len() > self.params.max_count {
            self.particles.pop_front();
        }
    }

    /// Fill up to the cap with particles spread over the whole surface
    pub fn scatter(&mut self, bounds: Vec2) {
        let bounds = bounds.max(Vec2::ONE);
        while self.particles.len() < self.params.max_count {
            let origin = Vec2::new(
                self.rng.gen_range(0.0..bounds.x),
                self.rng.gen_range(0.0..bounds.y),
            );
            self.spawn_at(origin);
        }
    }

    /// Chance of a spawn this frame, given the per-reference-frame chance
    pub fn spawn_chance(&self, frame: &FrameTime) -> f32 {
        let p = self.params.spawn_chance.clamp(0.0, 1.0);
        1.0 - (1.0 - p).powf(frame.reference_frames().max(0.0))
    }

    fn edge_origin(&mut self, bounds: Vec2) -> Vec2 {
        let x = if bounds.x > 0.0 {
            self.rng.gen_range(0.0..bounds.x)
        } else {
            0.0
        };
        Vec2::new(x, 0.0)
    }

    /// Where a particle is at its current age
    fn position_of(&self, particle: &Particle) -> Vec2 {
        let progress = particle.progress();
        let wobble = self.params.wobble_px
            * self.noise.get([
                particle.lane,
                (particle.age * self.params.wobble_rate) as f64,
            ]) as f32;
        let x = particle.origin.x + particle.drift * progress + wobble;

        let y = match self.params.kind {
            ParticleKind::Bubble => {
                let eased = 1.0 - (1.0 - progress) * (1.0 - progress);
                particle.origin.y - self.params.vertical_drift * eased
            }
            ParticleKind::Snow => particle.origin.y + self.params.vertical_drift * particle.age,
        };
        Vec2::new(x, y)
    }

    /// Opacity of a particle from the fade envelope, never negative
    pub fn opacity(&self, particle: &Particle) -> f32 {
        self.params.peak_opacity
            * fade_envelope(
                particle.age,
                particle.lifetime,
                self.params.fade_in,
                self.params.fade_out,
            )
    }

    /// Drawn radius, interpolated along the size curve
    pub fn radius(&self, particle: &Particle) -> f32 {
        let (birth, death) = self.params.size_curve;
        particle.size * (birth + (death - birth) * particle.progress())
    }

    fn is_visible(&self, particle: &Particle, bounds: Vec2) -> bool {
        let r = self.radius(particle);
        let p = particle.position;
        match self.params.kind {
            ParticleKind::Bubble => {
                p.y + r >= 0.0 && p.y - r <= bounds.y && p.x + r >= 0.0 && p.x - r <= bounds.x
            }
            // Snow starts just above the top edge, so only falling out counts
            ParticleKind::Snow => p.y - r <= bounds.y,
        }
    }

    /// Spawn, age, move and recycle
    ///
    /// # Arguments
    /// * `frame` - Frame timing
    /// * `bounds` - Surface size (pixels)
    /// * `pointer` - Pointer position; bubble trails only spawn while present
    pub fn update(&mut self, frame: &FrameTime, bounds: Vec2, pointer: Option<Vec2>) {
        let roll = self.rng.gen::<f32>();
        if roll < self.spawn_chance(frame) {
            match (self.params.kind, pointer) {
                (ParticleKind::Bubble, Some(pointer)) => self.spawn_at(pointer),
                (ParticleKind::Bubble, None) => {}
                (ParticleKind::Snow, _) => {
                    let origin = self.edge_origin(bounds);
                    self.spawn_at(origin);
                }
            }
        }

        let mut particles = std::mem::take(&mut self.particles);
        for particle in particles.iter_mut() {
            particle.age += frame.delta;
            particle.position = self.position_of(particle);
        }

        match self.params.kind {
            ParticleKind::Bubble => {
                particles.retain(|p| !p.is_expired() && self.is_visible(p, bounds));
            }
            ParticleKind::Snow => {
                let before = particles.len();
                particles.retain(|p| !p.is_expired() && self.is_visible(p, bounds));
                // Recycled flakes rejoin at the back so the queue stays in spawn order
                for _ in particles.len()..before {
                    let origin = self.edge_origin(bounds);
                    particles.push_back(self.fresh_particle(origin));
                }
            }
        }
        self.particles = particles;
    }

    pub fn draw(&self, surface: &mut Surface, mode: ColorMode) {
        let color = Rgba::hex(mode.pick(self.params.color.0, self.params.color.1), 1.0);
        let mode_alpha = mode.pick(self.params.mode_alpha.0, self.params.mode_alpha.1);

        for particle in &self.particles {
            let alpha = self.opacity(particle) * mode_alpha;
            if alpha <= 0.0 {
                continue;
            }
            let radius = self.radius(particle);
            if self.params.kind == ParticleKind::Bubble {
                // Soft glow behind the bubble
                surface.fill_circle(particle.position, radius * 2.0, color.with_alpha(alpha * 0.25));
            }
            surface.fill_circle(particle.position, radius, color.with_alpha(alpha));
        }
    }
}
