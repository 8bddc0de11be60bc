use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use gesture_vision::{
    CameraDevice, CameraFrame, CaptureError, FrameSource, GestureCommand, GestureTracker,
    PipelineConfig, Preview, PreviewSink,
};
use opencv::{
    core::{self, Mat, Point, Scalar},
    highgui, imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const WINDOW_NAME: &str = "Gesture Detection";

/// Live webcam harness for the gesture engine.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON pipeline config; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Camera index tried first.
    #[arg(long)]
    device: Option<i32>,

    /// Camera index tried when the first one cannot be opened.
    #[arg(long)]
    fallback_device: Option<i32>,

    /// Ticks per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Run without the HighGUI preview window.
    #[arg(long)]
    no_preview: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // --- 1. Argument Parsing & Setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(device) = args.device {
        config.capture.primary_device = device;
    }
    if let Some(device) = args.fallback_device {
        config.capture.secondary_device = device;
    }
    config.validate().context("invalid pipeline config")?;

    // --- 2. Tracker Initialization ---
    let mut tracker = GestureTracker::new(OpenCvCamera, config);
    if !args.no_preview {
        tracker = tracker.with_preview(Box::new(HighGuiPreview::default()));
    }
    if !tracker.set_enabled(true) {
        anyhow::bail!("no camera could be opened");
    }

    // --- 3. Main Tick Loop ---
    let period = Duration::from_secs_f64(1.0 / f64::from(args.fps.max(1)));
    let mut ticker = tokio::time::interval(period);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut last_tick = Instant::now();
    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("listening for ctrl-c")?;
                info!("shutting down");
                break;
            }
            _ = ticker.tick() => {
                let now = Instant::now();
                let elapsed = now.duration_since(last_tick).as_secs_f32();
                last_tick = now;

                tracker.update(elapsed, true);
                if let Some(event) = tracker.consume_trigger() {
                    match GestureCommand::from_event(event) {
                        Some(GestureCommand::SelectOption(index)) => {
                            let label = GestureCommand::SelectOption(index).option_label();
                            info!(fingers = event.finger_count, option = ?label, "select option");
                        }
                        Some(GestureCommand::TogglePause) => {
                            info!(fingers = event.finger_count, "toggle pause");
                        }
                        None => info!(fingers = event.finger_count, "gesture with no command"),
                    }
                }
            }
        }
    }

    tracker.set_enabled(false);
    Ok(())
}

/// Opens webcams through OpenCV's videoio.
struct OpenCvCamera;

impl CameraDevice for OpenCvCamera {
    type Source = OpenCvSource;

    fn open(&mut self, index: i32) -> Result<OpenCvSource, CaptureError> {
        let capture = VideoCapture::new(index, videoio::CAP_ANY).map_err(backend)?;
        if !capture.is_opened().map_err(backend)? {
            return Err(CaptureError::DeviceUnavailable(index));
        }
        Ok(OpenCvSource {
            capture,
            frame: Mat::default(),
        })
    }
}

struct OpenCvSource {
    capture: VideoCapture,
    frame: Mat,
}

impl FrameSource for OpenCvSource {
    fn read_frame(&mut self) -> Result<Option<CameraFrame>, CaptureError> {
        if !self.capture.read(&mut self.frame).map_err(backend)? || self.frame.empty() {
            return Ok(None);
        }
        if self.frame.typ() != core::CV_8UC3 {
            return Err(CaptureError::Backend(format!(
                "unsupported frame type {}",
                self.frame.typ()
            )));
        }

        let width = self.frame.cols() as u32;
        let height = self.frame.rows() as u32;
        let bytes = self.frame.data_bytes().map_err(backend)?;
        CameraFrame::from_bgr(width, height, bytes)
            .map(Some)
            .map_err(|err| CaptureError::Backend(err.to_string()))
    }

    fn release(&mut self) {
        if let Err(err) = self.capture.release() {
            warn!(error = %err, "camera release failed");
        }
    }
}

/// Shows previews in a HighGUI window with the status text drawn on top.
#[derive(Default)]
struct HighGuiPreview {
    window_open: bool,
}

impl HighGuiPreview {
    fn draw(&mut self, preview: &Preview) -> opencv::Result<()> {
        let (width, height) = preview.image.dimensions();
        let mut bgr = Mat::new_rows_cols_with_default(
            height as i32,
            width as i32,
            core::CV_8UC3,
            Scalar::all(0.0),
        )?;
        for (dst, src) in bgr.data_bytes_mut()?.chunks_exact_mut(3).zip(preview.image.pixels()) {
            dst.copy_from_slice(&[src.0[2], src.0[1], src.0[0]]);
        }

        let [r, g, b] = preview.status_color().0;
        imgproc::put_text(
            &mut bgr,
            &preview.status_text(),
            Point::new(50, 70),
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.8,
            Scalar::new(f64::from(b), f64::from(g), f64::from(r), 0.0),
            2,
            imgproc::LINE_8,
            false,
        )?;

        highgui::imshow(WINDOW_NAME, &bgr)?;
        highgui::wait_key(1)?;
        self.window_open = true;
        Ok(())
    }
}

impl PreviewSink for HighGuiPreview {
    fn show(&mut self, preview: &Preview) {
        if let Err(err) = self.draw(preview) {
            warn!(error = %err, "preview window update failed");
        }
    }

    fn close(&mut self) {
        if !self.window_open {
            return;
        }
        if let Err(err) = highgui::destroy_window(WINDOW_NAME) {
            warn!(error = %err, "closing preview window failed");
        }
        self.window_open = false;
    }
}

fn backend(err: opencv::Error) -> CaptureError {
    CaptureError::Backend(err.to_string())
}
