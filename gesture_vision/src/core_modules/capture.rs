// THEORY:
// Capture devices are the outermost collaborator of the engine. The library never
// talks to a camera driver directly; it only knows these two traits, so the whole
// pipeline and tracker can be driven by scripted sources in tests and by a real
// OpenCV backend in the tester binary.
//
// - `CameraDevice` opens a source by device index.
// - `FrameSource` hands out one frame per call and can be released. Releasing twice
//   must be harmless.

use serde::{Deserialize, Serialize};

use crate::core_modules::frame::CameraFrame;
use crate::error::CaptureError;

/// Which device indices to try when gesture input is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Tried first.
    pub primary_device: i32,
    /// Tried when the primary device cannot be opened.
    pub secondary_device: i32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            primary_device: 0,
            secondary_device: 1,
        }
    }
}

impl CaptureConfig {
    /// Device indices in the order they should be tried, without repeats.
    pub fn device_order(&self) -> Vec<i32> {
        if self.primary_device == self.secondary_device {
            vec![self.primary_device]
        } else {
            vec![self.primary_device, self.secondary_device]
        }
    }
}

/// An open stream of camera frames.
pub trait FrameSource {
    /// Blocks until the next frame is available. `Ok(None)` means the device produced
    /// nothing usable this time.
    fn read_frame(&mut self) -> Result<Option<CameraFrame>, CaptureError>;

    /// Gives the device back to the system. Calling it again is a no-op.
    fn release(&mut self);
}

/// Something that can open frame sources by device index.
pub trait CameraDevice {
    type Source: FrameSource;

    fn open(&mut self, index: i32) -> Result<Self::Source, CaptureError>;
}
