//! Parameter definitions with units and documented semantics.
//!
//! Every tunable number of the animation core lives here:
//! - Units (pixels, seconds, radians, per-reference-frame quantities)
//! - Documented ranges and meanings
//! - `validate()` where a bad value would break an invariant

mod cursor;
mod fish;
mod particles;
mod render;
mod sphere;
mod waves;

use std::ops::Range;

use rand::Rng;

// Re-export all types
pub use cursor::CursorParams;
pub use fish::FishParams;
pub use particles::{ParticleKind, ParticleParams};
pub use render::{RecordingConfig, RenderConfig};
pub use sphere::SphereParams;
pub use waves::{BackdropParams, DepthTint, WaveFieldParams, WaveLayerParams};

/// Reference frame rate that per-frame constants are expressed against (Hz)
pub const REFERENCE_FPS: f32 = 60.0;

/// Draw from a parameter range; an empty range yields its start
pub(crate) fn sample_range<R: Rng + ?Sized>(rng: &mut R, range: &Range<f32>) -> f32 {
    if range.is_empty() {
        range.start
    } else {
        rng.gen_range(range.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_sample_range_handles_empty() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(sample_range(&mut rng, &(1.5..1.5)), 1.5);
        for _ in 0..100 {
            let v = sample_range(&mut rng, &(2.0..3.0));
            assert!((2.0..3.0).contains(&v));
        }
    }
}
