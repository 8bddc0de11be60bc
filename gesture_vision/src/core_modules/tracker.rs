// THEORY:
// The `tracker` module is the device shell around the pure pipeline. The application
// talks only to a `GestureTracker`: it switches gesture input on and off, ticks it
// once per rendered frame, and polls for a confirmed gesture.
//
// Key architectural principles:
// 1.  **Scoped Device**: the camera source exists only while gesture input is enabled.
//     It is opened on enable (primary index, then secondary), released on disable and
//     on drop. Releasing an already released device does nothing.
// 2.  **Failure Is Silence**: a camera that cannot be opened leaves gesture input off
//     and the rest of the application untouched. A frame that cannot be read skips the
//     tick without touching the gesture state.
// 3.  **Inactive Ticks Are Free**: when the consumer is not accepting gestures (menus,
//     pause screens) no frame is grabbed and no vision work runs; the preview, if one
//     is open, is closed.
// 4.  **Disable Is Cancel**: switching input off drops any hold in progress and any
//     armed trigger, so a stale gesture never fires after re-enabling.

use tracing::{debug, info, warn};

use crate::core_modules::capture::{CameraDevice, FrameSource};
use crate::core_modules::preview::{Preview, PreviewSink};
use crate::pipeline::{GestureEvent, GesturePipeline, PipelineConfig, Report};

/// Owns the camera, the pipeline and the optional preview for one session.
pub struct GestureTracker<D: CameraDevice> {
    device: D,
    /// The open camera, present only while gesture input is enabled.
    source: Option<D::Source>,
    pipeline: GesturePipeline,
    preview: Option<Box<dyn PreviewSink>>,
    preview_open: bool,
    /// The most recent pipeline report, kept for diagnostics.
    last_report: Option<Report>,
}

impl<D: CameraDevice> GestureTracker<D> {
    /// Creates a tracker with gesture input disabled.
    pub fn new(device: D, config: PipelineConfig) -> Self {
        Self {
            device,
            source: None,
            pipeline: GesturePipeline::new(config),
            preview: None,
            preview_open: false,
            last_report: None,
        }
    }

    /// Attaches a sink that receives an annotated preview on every active tick.
    pub fn with_preview(mut self, sink: Box<dyn PreviewSink>) -> Self {
        self.preview = Some(sink);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.source.is_some()
    }

    pub fn is_preview_open(&self) -> bool {
        self.preview_open
    }

    pub fn pipeline(&self) -> &GesturePipeline {
        &self.pipeline
    }

    pub fn last_report(&self) -> Option<&Report> {
        self.last_report.as_ref()
    }

    /// Opens or releases the camera. Returns whether gesture input is now live.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if enabled {
            self.open_camera();
        } else {
            self.stop_camera();
        }
        self.is_enabled()
    }

    /// Advances the tracker by one rendering tick.
    ///
    /// `active` is false whenever the consumer is not accepting gesture input; the
    /// vision pipeline does not run on those ticks.
    pub fn update(&mut self, elapsed_secs: f32, active: bool) {
        if self.source.is_none() {
            return;
        }

        if !active {
            self.close_preview();
            return;
        }

        // --- 1. Capture ---
        let Some(source) = self.source.as_mut() else {
            return;
        };
        let frame = match source.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                debug!("camera returned no frame");
                return;
            }
            Err(err) => {
                debug!(error = %err, "camera read failed");
                return;
            }
        };

        // --- 2. Analysis ---
        // Oriented once; the preview shows exactly what the pipeline measured.
        let frame = self.pipeline.orient_frame(frame);
        let report = self.pipeline.process_oriented_frame(&frame, elapsed_secs);

        // --- 3. Diagnostics ---
        if let (Some(sink), Report::Observed(observation)) = (self.preview.as_mut(), &report) {
            let roi = &self.pipeline.config().roi;
            sink.show(&Preview::render(&frame, roi, observation.status));
            self.preview_open = true;
        }

        self.last_report = Some(report);
    }

    /// Takes the confirmed gesture, if one is armed. Poll once per tick.
    pub fn consume_trigger(&mut self) -> Option<GestureEvent> {
        self.pipeline.consume_trigger()
    }

    fn open_camera(&mut self) {
        if self.source.is_some() {
            return;
        }

        for index in self.pipeline.config().capture.device_order() {
            match self.device.open(index) {
                Ok(source) => {
                    info!(device = index, "camera opened");
                    self.source = Some(source);
                    return;
                }
                Err(err) => debug!(device = index, error = %err, "camera open failed"),
            }
        }
        warn!("no camera could be opened; gesture input stays disabled");
    }

    fn stop_camera(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
            info!("camera released");
        }
        self.close_preview();
        self.pipeline.reset();
        self.last_report = None;
    }

    fn close_preview(&mut self) {
        if !self.preview_open {
            return;
        }
        if let Some(sink) = self.preview.as_mut() {
            sink.close();
        }
        self.preview_open = false;
    }
}

impl<D: CameraDevice> Drop for GestureTracker<D> {
    fn drop(&mut self) {
        self.stop_camera();
    }
}
