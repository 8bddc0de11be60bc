#![allow(dead_code)]

use gesture_vision::{CameraFrame, RegionOfInterest};
use image::{Rgb, RgbImage, imageops};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

pub const FRAME_SIZE: u32 = 400;
pub const SKIN: Rgb<u8> = Rgb([200, 150, 120]);
pub const BACKDROP: Rgb<u8> = Rgb([20, 40, 90]);

/// A closed fist: a plain block.
pub const FIST: &[(i32, i32)] = &[(0, 0), (140, 0), (140, 160), (0, 160)];

/// Two fingers with one valley between them.
pub const TWO_FINGERS: &[(i32, i32)] = &[
    (0, 60),
    (30, 10),
    (60, 110),
    (90, 10),
    (120, 60),
    (120, 200),
    (0, 200),
];

/// Four fingers with three valleys between them.
pub const FOUR_FINGERS: &[(i32, i32)] = &[
    (0, 60),
    (10, 40),
    (30, 90),
    (50, 10),
    (70, 90),
    (90, 10),
    (110, 90),
    (130, 40),
    (140, 60),
    (140, 200),
    (0, 200),
];

/// A camera frame with `shape` painted in skin colour inside the default ROI.
///
/// The picture is stored pre-mirrored, so after the pipeline flips it the hand sits
/// where `shape` places it relative to the ROI origin.
pub fn frame_with(shape: Option<&[(i32, i32)]>) -> CameraFrame {
    let roi = RegionOfInterest::default();
    let mut image = RgbImage::from_pixel(FRAME_SIZE, FRAME_SIZE, BACKDROP);

    if let Some(shape) = shape {
        let polygon: Vec<Point<i32>> = shape
            .iter()
            .map(|&(x, y)| Point::new(roi.x as i32 + 60 + x * 6 / 5, roi.y as i32 + 20 + y * 6 / 5))
            .collect();
        draw_polygon_mut(&mut image, &polygon, SKIN);
    }

    CameraFrame::from_rgb_image(imageops::flip_horizontal(&image)).unwrap()
}

/// The same picture as a BGR byte buffer, as a capture device would deliver it.
pub fn bgr_bytes(frame: &CameraFrame) -> Vec<u8> {
    frame
        .as_rgb()
        .pixels()
        .flat_map(|p| [p.0[2], p.0[1], p.0[0]])
        .collect()
}
