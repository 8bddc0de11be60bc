// THEORY:
// The `frame` module is the bridge between raw device bytes and the image types
// the rest of the engine works on. A `CameraFrame` is a "dumb" container for a
// single captured picture; it lives for one tick and is replaced by the next
// capture. It never remembers previous frames.
//
// Devices hand us BGR byte buffers (the OpenCV layout). We validate the buffer
// once, at construction, and store it as an RGB `image` buffer so every later
// stage can use the `image`/`imageproc` ecosystem directly. A buffer that is
// empty or has the wrong length is rejected here, which is how "no data" is
// signalled to the caller before any analysis runs.

use std::fmt;

use image::{RgbImage, imageops};
use serde::{Deserialize, Serialize};

use crate::error::FrameError;

const BGR_CHANNELS: usize = 3;

/// A fixed, axis-aligned rectangle of the camera frame in which the user
/// presents their hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    /// Left edge in frame pixels.
    pub x: u32,
    /// Top edge in frame pixels.
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for RegionOfInterest {
    fn default() -> Self {
        Self {
            x: 50,
            y: 50,
            width: 300,
            height: 300,
        }
    }
}

impl RegionOfInterest {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the region lies entirely inside a `width` x `height` frame.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        !self.is_empty() && self.right() <= width && self.bottom() <= height
    }
}

impl fmt::Display for RegionOfInterest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.x,
            self.y,
            self.right(),
            self.bottom()
        )
    }
}

/// One captured camera picture, valid for a single tick.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    image: RgbImage,
}

impl CameraFrame {
    /// Builds a frame from a tightly packed BGR buffer as delivered by capture
    /// devices.
    pub fn from_bgr(width: u32, height: u32, bgr: &[u8]) -> Result<Self, FrameError> {
        if width == 0 || height == 0 || bgr.is_empty() {
            return Err(FrameError::Empty);
        }

        let expected = width as usize * height as usize * BGR_CHANNELS;
        if bgr.len() != expected {
            return Err(FrameError::SizeMismatch {
                width,
                height,
                expected,
                actual: bgr.len(),
            });
        }

        let mut rgb = Vec::with_capacity(expected);
        for pixel in bgr.chunks_exact(BGR_CHANNELS) {
            rgb.extend_from_slice(&[pixel[2], pixel[1], pixel[0]]);
        }

        // The length was checked above, so the buffer always matches.
        RgbImage::from_raw(width, height, rgb)
            .map(|image| Self { image })
            .ok_or(FrameError::Empty)
    }

    /// Wraps an already decoded RGB image.
    pub fn from_rgb_image(image: RgbImage) -> Result<Self, FrameError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(FrameError::Empty);
        }
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }

    /// Returns the frame flipped left to right, so the preview behaves like a
    /// mirror for the person in front of the camera.
    pub fn mirrored(&self) -> Self {
        Self {
            image: imageops::flip_horizontal(&self.image),
        }
    }

    /// Copies the region of interest out of the frame.
    pub fn crop(&self, roi: &RegionOfInterest) -> Result<RgbImage, FrameError> {
        if !roi.fits_within(self.width(), self.height()) {
            return Err(FrameError::RoiOutOfBounds {
                roi: *roi,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(imageops::crop_imm(&self.image, roi.x, roi.y, roi.width, roi.height).to_image())
    }
}
