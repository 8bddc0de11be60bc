// THEORY (HSV Pixel):
// Skin detection is done in hue/saturation/value space because skin tones of very
// different brightness share a narrow band of hue. This module holds the single-pixel
// transform and the band test. It never looks at neighbouring pixels; anything spatial
// (noise removal, smoothing) belongs to the segmenter.
//
// The transform follows the 8-bit convention every webcam tutorial and calibration
// table uses, so published skin bands can be pasted straight into the config:
// - V: max(R, G, B)                          0..=255
// - S: 255 * (max - min) / max               0..=255 (0 for black)
// - H: hue angle in degrees, halved          0..180
// Ties for the maximum channel resolve red first, then green, then blue. All three
// components are rounded to the nearest integer.

pub mod hsv_pixel {
    use image::Rgb;
    use serde::{Deserialize, Serialize};

    pub type Hue = u8;
    pub type Saturation = u8;
    pub type Value = u8;

    /// Exclusive upper bound of the 8-bit hue scale.
    pub const HUE_RANGE: i32 = 180;

    /// A single pixel in 8-bit HSV space.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct HsvPixel {
        /// Hue, 0..180 (degrees / 2).
        pub hue: Hue,
        /// Saturation, 0..=255.
        pub saturation: Saturation,
        /// Value, 0..=255.
        pub value: Value,
    }

    impl HsvPixel {
        pub fn new(hue: Hue, saturation: Saturation, value: Value) -> Self {
            Self {
                hue,
                saturation,
                value,
            }
        }

        /// Converts an RGB pixel.
        pub fn from_rgb(pixel: &Rgb<u8>) -> Self {
            let [red, green, blue] = pixel.0;
            let (r, g, b) = (red as i32, green as i32, blue as i32);

            let maximum_channel = r.max(g).max(b);
            let minimum_channel = r.min(g).min(b);
            let chroma = maximum_channel - minimum_channel;

            let saturation = if maximum_channel == 0 {
                0
            } else {
                round_to_u8(255.0 * chroma as f32 / maximum_channel as f32)
            };

            if chroma == 0 {
                return Self::new(0, saturation, maximum_channel as u8);
            }

            // Sector numerator in units of "chroma", pre-shifted by 2 or 4 sixths.
            let sector_numerator = if maximum_channel == r {
                g - b
            } else if maximum_channel == g {
                b - r + 2 * chroma
            } else {
                r - g + 4 * chroma
            };

            // 360 degrees / 2 / 6 sectors = 30 units per sector.
            let scaled = sector_numerator as f32 * 30.0 / chroma as f32;
            let mut hue = (scaled + 0.5).floor() as i32;
            if hue < 0 {
                hue += HUE_RANGE;
            }

            Self::new(hue.clamp(0, HUE_RANGE - 1) as u8, saturation, maximum_channel as u8)
        }
    }

    /// An inclusive box in HSV space. A pixel inside the box is a candidate skin pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct HsvBand {
        pub lower: [u8; 3],
        pub upper: [u8; 3],
    }

    impl HsvBand {
        pub fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
            Self { lower, upper }
        }

        /// Whether every lower bound is <= its upper bound.
        pub fn is_ordered(&self) -> bool {
            self.lower.iter().zip(self.upper.iter()).all(|(lo, hi)| lo <= hi)
        }

        pub fn contains(&self, pixel: &HsvPixel) -> bool {
            let components = [pixel.hue, pixel.saturation, pixel.value];
            components
                .iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(c, (lo, hi))| c >= lo && c <= hi)
        }
    }

    #[inline]
    fn round_to_u8(value: f32) -> u8 {
        (value + 0.5).floor().clamp(0.0, 255.0) as u8
    }
}
