//! Headless recording: drive a stage on a fixed clock and save PNG frames.

use std::time::{Duration, Instant};

use glam::{UVec2, Vec2};
use log::info;

use crate::error::PresentError;
use crate::input::HostEvent;
use crate::params::RecordingConfig;
use crate::stage::Stage;

/// Pointer position on a slow circular orbit around the viewport center
///
/// # Arguments
/// * `config` - Orbit radius (fraction of the smaller side) and period
/// * `viewport` - Viewport size (pixels)
/// * `time_s` - Recording time (seconds)
pub fn synthetic_pointer(config: &RecordingConfig, viewport: UVec2, time_s: f32) -> Vec2 {
    let size = viewport.as_vec2();
    let radius = size.min_element() * config.pointer_orbit;
    let angle = std::f32::consts::TAU * time_s / config.pointer_period_s.max(f32::EPSILON);
    size * 0.5 + Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Render `config.total_frames()` frames to `config.frames_dir()`
///
/// Frame `n` is rendered at exactly `n / fps` seconds, so recordings are
/// reproducible apart from renderer randomness.
///
/// # Returns
/// Number of frames written
pub fn record(stage: &mut Stage, config: &RecordingConfig) -> Result<usize, PresentError> {
    std::fs::create_dir_all(config.frames_dir())?;

    let total = config.total_frames();
    let frame_step = Duration::from_secs_f64(1.0 / config.fps.max(1) as f64);
    let t0 = Instant::now();
    info!(
        "Recording {} frames at {} fps to {}",
        total,
        config.fps,
        config.frames_dir().display()
    );

    stage.start(t0);
    let mut written = 0;
    for n in 0..total {
        let now = t0 + frame_step * (n as u32 + 1);
        let time_s = (n + 1) as f32 / config.fps.max(1) as f32;
        let viewport = stage.input().viewport;
        let pointer = synthetic_pointer(config, viewport, time_s);
        stage.dispatch(HostEvent::PointerMove {
            x: pointer.x,
            y: pointer.y,
        });

        let Some(frame) = stage.tick(now) else {
            continue;
        };
        image::save_buffer(
            config.frame_path(n),
            &frame.to_rgba8(),
            frame.width(),
            frame.height(),
            image::ColorType::Rgba8,
        )?;
        written += 1;

        if (n + 1) % config.fps.max(1) as usize == 0 {
            info!("Recorded {}/{} frames", n + 1, total);
        }
    }
    stage.stop();

    info!("Recording complete: {} frames", written);
    Ok(written)
}
