//! Error types for parameter validation and frame presentation.
//!
//! The animation core itself never fails: a missing or degenerate surface just
//! skips the frame. These errors cover the edges around it: rejecting bad
//! tunables up front, and the GPU/disk plumbing that shows or saves frames.

use std::fmt;

/// A tunable parameter is outside its valid range.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A value that must be strictly positive was not.
    NotPositive { field: &'static str, value: f32 },
    /// A value fell outside its inclusive range.
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    /// A count that must be non-zero was zero.
    Empty { field: &'static str },
}

impl ConfigError {
    pub(crate) fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
        if value > 0.0 && value.is_finite() {
            Ok(())
        } else {
            Err(ConfigError::NotPositive { field, value })
        }
    }

    pub(crate) fn check_range(
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    ) -> Result<(), ConfigError> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            })
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotPositive { field, value } => {
                write!(f, "{} must be > 0, got {}", field, value)
            }
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{} must be in [{}, {}], got {}", field, min, max, value),
            ConfigError::Empty { field } => write!(f, "{} must not be empty", field),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while showing or saving frames.
#[derive(Debug)]
pub enum PresentError {
    /// Failed to create a surface for the window.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// Failed to acquire the next swapchain texture.
    Frame(wgpu::SurfaceError),
    /// Failed to write a captured frame to disk.
    Capture(image::ImageError),
    /// Failed to prepare the recording directories.
    Io(std::io::Error),
}

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            PresentError::NoAdapter => write!(f, "No compatible GPU adapter found"),
            PresentError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            PresentError::Frame(e) => write!(f, "Failed to acquire frame: {}", e),
            PresentError::Capture(e) => write!(f, "Failed to save frame: {}", e),
            PresentError::Io(e) => write!(f, "Recording I/O error: {}", e),
        }
    }
}

impl std::error::Error for PresentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PresentError::SurfaceCreation(e) => Some(e),
            PresentError::DeviceCreation(e) => Some(e),
            PresentError::Frame(e) => Some(e),
            PresentError::Capture(e) => Some(e),
            PresentError::Io(e) => Some(e),
            PresentError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for PresentError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        PresentError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for PresentError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        PresentError::DeviceCreation(e)
    }
}

impl From<wgpu::SurfaceError> for PresentError {
    fn from(e: wgpu::SurfaceError) -> Self {
        PresentError::Frame(e)
    }
}

impl From<image::ImageError> for PresentError {
    fn from(e: image::ImageError) -> Self {
        PresentError::Capture(e)
    }
}

impl From<std::io::Error> for PresentError {
    fn from(e: std::io::Error) -> Self {
        PresentError::Io(e)
    }
}
