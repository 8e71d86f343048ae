//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use tidewave::input::ColorMode;
use tidewave::params::{RecordingConfig, RenderConfig};
use tidewave::stage::SceneKind;

/// Scene selectable on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneArg {
    Ocean,
    Backdrop,
    Bubbles,
    Sphere,
    All,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Light,
    Dark,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "tidewave")]
#[command(about = "Procedural ocean animations: waves, fish, particles and a point-cloud sphere", long_about = None)]
pub struct Args {
    /// Scene to show; repeat to stack several (default: all)
    #[arg(long = "scene", value_enum, value_name = "SCENE")]
    pub scenes: Vec<SceneArg>,

    /// Color mode; follows the OS theme when omitted
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Window width (pixels)
    #[arg(long, value_name = "PX", default_value_t = 1280)]
    pub width: u32,

    /// Window height (pixels)
    #[arg(long, value_name = "PX", default_value_t = 720)]
    pub height: u32,

    /// Record frames headlessly instead of opening a window (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Recording frame rate
    #[arg(long, value_name = "N", default_value_t = 60)]
    pub fps: u32,

    /// Recording output directory
    #[arg(long, value_name = "DIR", default_value = "recording")]
    pub output: PathBuf,
}

impl Args {
    /// Selected scenes; `all` (or nothing) selects every scene
    pub fn scene_kinds(&self) -> Vec<SceneKind> {
        if self.scenes.is_empty() || self.scenes.contains(&SceneArg::All) {
            return SceneKind::ALL.to_vec();
        }
        let kinds: Vec<SceneKind> = self
            .scenes
            .iter()
            .filter_map(|scene| match scene {
                SceneArg::Ocean => Some(SceneKind::Ocean),
                SceneArg::Backdrop => Some(SceneKind::Backdrop),
                SceneArg::Bubbles => Some(SceneKind::Bubbles),
                SceneArg::Sphere => Some(SceneKind::Sphere),
                SceneArg::All => None,
            })
            .collect();
        SceneKind::stack(&kinds)
    }

    pub fn color_mode(&self) -> Option<ColorMode> {
        self.mode.map(|mode| match mode {
            ModeArg::Light => ColorMode::Light,
            ModeArg::Dark => ColorMode::Dark,
        })
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
            ..RenderConfig::default()
        }
    }

    /// Recording configuration if recording mode is enabled
    pub fn recording_config(&self) -> Option<RecordingConfig> {
        self.record.map(|duration| RecordingConfig {
            output_dir: self.output.clone(),
            fps: self.fps,
            ..RecordingConfig::new(duration)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["tidewave"]).unwrap();
        assert_eq!(args.scene_kinds(), SceneKind::ALL.to_vec());
        assert_eq!(args.color_mode(), None);
        assert!(args.recording_config().is_none());
        assert_eq!(args.render_config().window_width, 1280);
    }

    #[test]
    fn test_repeated_scenes_are_stacked() {
        let args = Args::try_parse_from([
            "tidewave", "--scene", "bubbles", "--scene", "ocean", "--mode", "dark",
        ])
        .unwrap();
        assert_eq!(
            args.scene_kinds(),
            vec![SceneKind::Ocean, SceneKind::Bubbles]
        );
        assert_eq!(args.color_mode(), Some(ColorMode::Dark));
    }

    #[test]
    fn test_record_options() {
        let args = Args::try_parse_from([
            "tidewave", "--record", "2.5", "--fps", "30", "--output", "out",
        ])
        .unwrap();
        let config = args.recording_config().unwrap();
        assert_eq!(config.fps, 30);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.total_frames(), 75);
    }

    #[test]
    fn test_unknown_scene_rejected() {
        assert!(Args::try_parse_from(["tidewave", "--scene", "kraken"]).is_err());
    }
}
