// THEORY:
// The preview is a purely observational view of the engine: the frame the user sees
// (mirrored, as processed), the ROI box they should hold their hand in, and a bar that
// fills while a gesture is being held. Nothing in the engine ever reads it back.
//
// Rendering text is left to the sink: a HighGUI window, a web page or a log line all
// want different fonts, so the preview carries the `HoldStatus` and lets the sink
// print its `Display` text ("Detecting...", "Hold: N", "LOCKED: N").

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::core_modules::frame::{CameraFrame, RegionOfInterest};
use crate::core_modules::stability::HoldStatus;

const ROI_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const DETECTING_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const HOLDING_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const LOCKED_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

const PROGRESS_ORIGIN: (i32, i32) = (50, 78);
const PROGRESS_MAX_LEN: u32 = 200;
const PROGRESS_THICKNESS: u32 = 5;

/// One annotated diagnostic frame.
#[derive(Debug, Clone)]
pub struct Preview {
    pub image: RgbImage,
    pub status: HoldStatus,
}

impl Preview {
    /// Annotates a copy of `frame` with the ROI and hold progress.
    pub fn render(frame: &CameraFrame, roi: &RegionOfInterest, status: HoldStatus) -> Self {
        let mut image = frame.as_rgb().clone();

        // --- ROI box (2 px) ---
        for inset in 0..2u32 {
            if roi.width <= inset * 2 || roi.height <= inset * 2 {
                break;
            }
            let rect = Rect::at((roi.x + inset) as i32, (roi.y + inset) as i32)
                .of_size(roi.width - inset * 2, roi.height - inset * 2);
            draw_hollow_rect_mut(&mut image, rect, ROI_COLOR);
        }

        // --- Hold progress bar ---
        if let HoldStatus::Holding { progress, .. } = status {
            let length = (progress.clamp(0.0, 1.0) * PROGRESS_MAX_LEN as f32) as u32;
            if length > 0 {
                let rect = Rect::at(PROGRESS_ORIGIN.0, PROGRESS_ORIGIN.1)
                    .of_size(length, PROGRESS_THICKNESS);
                draw_filled_rect_mut(&mut image, rect, HOLDING_COLOR);
            }
        }

        Self { image, status }
    }

    /// RGB colour a sink should use for the status text.
    pub fn status_color(&self) -> Rgb<u8> {
        match self.status {
            HoldStatus::Detecting => DETECTING_COLOR,
            HoldStatus::Holding { .. } => HOLDING_COLOR,
            HoldStatus::Locked { .. } => LOCKED_COLOR,
        }
    }

    pub fn status_text(&self) -> String {
        self.status.to_string()
    }
}

/// Where previews are shown.
pub trait PreviewSink {
    fn show(&mut self, preview: &Preview);

    /// Hides the preview. Calling it while nothing is shown is a no-op.
    fn close(&mut self);
}
