// THEORY:
// Errors only exist at the edges of the engine: frames arriving from a device,
// devices being opened, and configuration being loaded. Nothing inside the
// geometry or the stability filter can fail. A degenerate hand shape is a
// legitimate observation ("no hand this tick"), not an error.

use thiserror::Error;

use crate::core_modules::frame::RegionOfInterest;

/// Reasons a captured frame cannot be analyzed. The caller skips the tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("camera produced an empty frame")]
    Empty,

    #[error("frame buffer holds {actual} bytes, expected {expected} for a {width}x{height} BGR frame")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("region of interest {roi} does not fit inside a {width}x{height} frame")]
    RoiOutOfBounds {
        roi: RegionOfInterest,
        width: u32,
        height: u32,
    },
}

/// Failures reported by a camera backend.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("camera device {0} could not be opened")]
    DeviceUnavailable(i32),

    #[error("camera backend error: {0}")]
    Backend(String),
}

/// Failures while loading or validating a `PipelineConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
