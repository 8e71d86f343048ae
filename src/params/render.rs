//! Window, frame timing and recording configuration.

use std::path::PathBuf;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Largest frame delta fed to the animation (seconds)
    /// Keeps a stalled or hidden window from teleporting everything on resume.
    pub max_frame_delta_s: f32,

    /// Page background behind the layers (light, dark) as 0xRRGGBB
    pub background: (u32, u32),
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            max_frame_delta_s: 0.1,
            background: (0xf8f9fa, 0x0a0a0a),
        }
    }
}

/// Headless recording configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames
    pub output_dir: PathBuf,

    /// Frame rate (FPS)
    pub fps: u32,

    /// Synthetic pointer orbit radius as a fraction of the smaller viewport side
    pub pointer_orbit: f32,

    /// Synthetic pointer orbit period (seconds)
    pub pointer_period_s: f32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: PathBuf::from("recording"),
            fps: 60,
            pointer_orbit: 0.3,
            pointer_period_s: 6.0,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs.max(0.0) * self.fps as f32).ceil() as usize
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> PathBuf {
        self.output_dir.join("frames")
    }

    /// Path of one captured frame
    pub fn frame_path(&self, frame_num: usize) -> PathBuf {
        self.frames_dir().join(format!("frame_{:05}.png", frame_num))
    }
}
