// THEORY:
// The `FrameSegmenter` is the first analysis stage. It turns a colour crop of the
// region of interest into a binary silhouette of the hand, the only input the
// contour stage ever sees.
//
// Key architectural principles:
// 1.  **Pure Function**: `mask_region` depends on nothing but its input and the
//     calibration constants it was built with. It keeps no state between frames,
//     so it can be tested on synthetic images without a camera.
// 2.  **Fixed Stage Order**: colour space conversion, skin band threshold, opening
//     (erode then dilate) to drop speckle, then a Gaussian pass to soften the
//     jagged edges left by the threshold. The Gaussian is an explicit
//     `blur_kernel_size` tap kernel, so a silhouette grows by exactly half the
//     kernel width once re-thresholded.
// 3.  **Strictly Binary Output**: the smoothed mask is re-thresholded so that any
//     non-zero pixel is foreground. Contour extraction treats every non-zero
//     pixel as foreground anyway; doing it here keeps the `SkinMask` 0/255.
// 4.  **"No Data" Is Not Garbage**: a frame that is empty or too small to hold the
//     ROI yields a `FrameError` instead of a mask, and the caller skips the tick.

use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::filter::separable_filter_equal;
use imageproc::morphology::{dilate, erode};
use serde::{Deserialize, Serialize};

use crate::core_modules::frame::{CameraFrame, RegionOfInterest};
use crate::core_modules::hsv_pixel::hsv_pixel::{HsvBand, HsvPixel};
use crate::error::FrameError;

pub const MASK_ON: u8 = 255;
pub const MASK_OFF: u8 = 0;

/// Calibration for the skin segmentation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Inclusive lower (hue, saturation, value) bound of the skin band.
    pub skin_lower: [u8; 3],
    /// Inclusive upper (hue, saturation, value) bound of the skin band.
    pub skin_upper: [u8; 3],
    /// Passes of a 3x3 erosion.
    pub erode_iterations: u8,
    /// Passes of a 3x3 dilation, applied after erosion.
    pub dilate_iterations: u8,
    /// Side length of the square Gaussian kernel. Must be odd and at least 3.
    pub blur_kernel_size: u32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            skin_lower: [0, 20, 70],
            skin_upper: [20, 255, 255],
            erode_iterations: 2,
            dilate_iterations: 2,
            blur_kernel_size: 5,
        }
    }
}

impl SegmenterConfig {
    pub fn skin_band(&self) -> HsvBand {
        HsvBand::new(self.skin_lower, self.skin_upper)
    }

    /// Gaussian sigma for a given kernel size, using the rule OpenCV applies when
    /// it is asked to pick sigma itself.
    pub fn blur_sigma(&self) -> f32 {
        let k = self.blur_kernel_size as f32;
        0.3 * ((k - 1.0) * 0.5 - 1.0) + 0.8
    }

    /// Normalized 1-D Gaussian taps of length `blur_kernel_size`.
    pub fn blur_kernel(&self) -> Vec<f32> {
        let sigma = self.blur_sigma();
        let radius = (self.blur_kernel_size / 2) as i32;
        let taps: Vec<f32> = (-radius..=radius)
            .map(|x| (-((x * x) as f32) / (2.0 * sigma * sigma)).exp())
            .collect();
        let sum: f32 = taps.iter().sum();
        taps.into_iter().map(|t| t / sum).collect()
    }
}

/// A binary (0/255) silhouette of the ROI.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinMask {
    image: GrayImage,
}

impl SkinMask {
    /// Wraps a grayscale image, forcing every non-zero pixel to `MASK_ON`.
    pub fn from_gray(mut image: GrayImage) -> Self {
        binarize(&mut image);
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.image
    }

    pub fn is_set(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel(x, y).0[0] == MASK_ON
    }

    /// Number of foreground pixels.
    pub fn coverage(&self) -> usize {
        self.image.pixels().filter(|p| p.0[0] == MASK_ON).count()
    }
}

/// Converts a region of interest into a clean skin mask.
#[derive(Debug, Clone)]
pub struct FrameSegmenter {
    config: SegmenterConfig,
    band: HsvBand,
}

impl FrameSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        let band = config.skin_band();
        Self { config, band }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Crops `roi` out of `frame` and segments it.
    pub fn segment(
        &self,
        frame: &CameraFrame,
        roi: &RegionOfInterest,
    ) -> Result<SkinMask, FrameError> {
        let crop = frame.crop(roi)?;
        Ok(self.mask_region(&crop))
    }

    /// Segments an already cropped region.
    pub fn mask_region(&self, region: &RgbImage) -> SkinMask {
        // --- 1. Colour threshold ---
        let mut mask = self.threshold(region);

        // --- 2. Opening ---
        // k passes of a 3x3 square element equal one pass at chessboard radius k.
        if self.config.erode_iterations > 0 {
            mask = erode(&mask, Norm::LInf, self.config.erode_iterations);
        }
        if self.config.dilate_iterations > 0 {
            mask = dilate(&mask, Norm::LInf, self.config.dilate_iterations);
        }

        // --- 3. Edge smoothing ---
        if self.config.blur_kernel_size >= 3 {
            mask = separable_filter_equal(&mask, &self.config.blur_kernel());
        }

        SkinMask::from_gray(mask)
    }

    fn threshold(&self, region: &RgbImage) -> GrayImage {
        let mut mask = GrayImage::new(region.width(), region.height());
        for (x, y, pixel) in region.enumerate_pixels() {
            if self.band.contains(&HsvPixel::from_rgb(pixel)) {
                mask.put_pixel(x, y, Luma([MASK_ON]));
            }
        }
        mask
    }
}

impl Default for FrameSegmenter {
    fn default() -> Self {
        Self::new(SegmenterConfig::default())
    }
}

fn binarize(image: &mut GrayImage) {
    for pixel in image.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > MASK_OFF { MASK_ON } else { MASK_OFF };
    }
}
