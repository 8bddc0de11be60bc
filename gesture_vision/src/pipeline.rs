// THEORY:
// The `pipeline` module is the top-level API of the gesture engine. It strings the
// stages together for one tick:
//
//   CameraFrame -> (mirror) -> ROI crop -> FrameSegmenter -> FingerCounter
//               -> StabilityFilter -> armed trigger -> consume_trigger()
//
// The pipeline owns the only piece of cross-tick state, the `StabilityFilter`. Every
// other value (crop, mask, contour, defects) is rebuilt from scratch each tick. It has
// no knowledge of devices or windows; those live in the `tracker` shell, which feeds
// frames in and pulls events out.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core_modules::capture::CaptureConfig;
use crate::core_modules::finger_counter::{ClassifierConfig, FingerCounter, MAX_FINGERS};
use crate::core_modules::frame::{CameraFrame, RegionOfInterest};
use crate::core_modules::segmenter::{FrameSegmenter, SegmenterConfig, SkinMask};
use crate::core_modules::stability::{StabilityConfig, StabilityFilter};
use crate::error::{ConfigError, FrameError};

// Re-export key data structures for the public API.
pub use crate::core_modules::finger_counter::HandReading;
pub use crate::core_modules::stability::{GestureEvent, GestureState, HoldStatus, RetriggerPolicy};

/// Configuration for the GesturePipeline. Every field has a calibrated default, so a
/// config file only needs to name the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Where in the camera frame the hand is expected.
    pub roi: RegionOfInterest,
    /// Flip frames left to right before cropping.
    pub mirror: bool,
    pub segmenter: SegmenterConfig,
    pub classifier: ClassifierConfig,
    pub stability: StabilityConfig,
    pub capture: CaptureConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            roi: RegionOfInterest::default(),
            mirror: true,
            segmenter: SegmenterConfig::default(),
            classifier: ClassifierConfig::default(),
            stability: StabilityConfig::default(),
            capture: CaptureConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rejects calibration values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.roi.is_empty() {
            return invalid(format!("roi {} has no area", self.roi));
        }
        if !self.segmenter.skin_band().is_ordered() {
            return invalid(format!(
                "skin band lower bound {:?} exceeds upper bound {:?}",
                self.segmenter.skin_lower, self.segmenter.skin_upper
            ));
        }
        let kernel = self.segmenter.blur_kernel_size;
        if kernel < 3 || kernel % 2 == 0 {
            return invalid(format!("blur kernel size must be odd and at least 3, got {kernel}"));
        }

        let classifier = &self.classifier;
        if !classifier.min_hand_area.is_finite() || classifier.min_hand_area < 0.0 {
            return invalid(format!("min hand area {} is not a usable area", classifier.min_hand_area));
        }
        if !classifier.min_defect_depth.is_finite() || classifier.min_defect_depth < 0.0 {
            return invalid(format!("min defect depth {} is not a usable depth", classifier.min_defect_depth));
        }
        if !(classifier.max_gap_angle_deg > 0.0 && classifier.max_gap_angle_deg <= 180.0) {
            return invalid(format!(
                "max gap angle must be within (0, 180] degrees, got {}",
                classifier.max_gap_angle_deg
            ));
        }
        if classifier.max_fingers == 0 || classifier.max_fingers > MAX_FINGERS {
            return invalid(format!(
                "max fingers must be within 1..={MAX_FINGERS}, got {}",
                classifier.max_fingers
            ));
        }

        let hold = self.stability.required_hold_secs;
        if !hold.is_finite() || hold <= 0.0 {
            return invalid(format!("required hold must be a positive number of seconds, got {hold}"));
        }
        Ok(())
    }
}

/// The analysis of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub reading: HandReading,
    pub status: HoldStatus,
}

impl Observation {
    pub fn finger_count(&self) -> u8 {
        self.reading.finger_count()
    }
}

/// The primary output of the pipeline for a single tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// The frame could not be analyzed; the gesture state was left untouched.
    NoData(FrameError),
    Observed(Observation),
}

/// The main, top-level struct for the gesture engine.
#[derive(Debug, Clone)]
pub struct GesturePipeline {
    segmenter: FrameSegmenter,
    counter: FingerCounter,
    filter: StabilityFilter,
    config: PipelineConfig,
}

impl GesturePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            segmenter: FrameSegmenter::new(config.segmenter.clone()),
            counter: FingerCounter::new(config.classifier.clone()),
            filter: StabilityFilter::new(config.stability.clone()),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn state(&self) -> GestureState {
        self.filter.state()
    }

    pub fn status(&self) -> HoldStatus {
        self.filter.status()
    }

    /// Runs a full tick on a freshly captured frame.
    pub fn process_frame(&mut self, frame: &CameraFrame, elapsed_secs: f32) -> Report {
        if self.config.mirror {
            self.process_oriented_frame(&frame.mirrored(), elapsed_secs)
        } else {
            self.process_oriented_frame(frame, elapsed_secs)
        }
    }

    /// Flips `frame` if the config asks for mirroring. The result is what the ROI is
    /// measured against and what a preview should show.
    pub fn orient_frame(&self, frame: CameraFrame) -> CameraFrame {
        if self.config.mirror { frame.mirrored() } else { frame }
    }

    /// Runs a full tick on a frame that has already been through `orient_frame`.
    pub fn process_oriented_frame(&mut self, frame: &CameraFrame, elapsed_secs: f32) -> Report {
        match self.segmenter.segment(frame, &self.config.roi) {
            Ok(mask) => Report::Observed(self.process_mask(&mask, elapsed_secs)),
            Err(err) => {
                debug!(error = %err, "skipping frame");
                Report::NoData(err)
            }
        }
    }

    /// Runs the classifier and stability stages on an existing mask.
    pub fn process_mask(&mut self, mask: &SkinMask, elapsed_secs: f32) -> Observation {
        let reading = self.counter.read_mask(mask);
        let status = self.filter.observe(reading.finger_count(), elapsed_secs);
        Observation { reading, status }
    }

    /// Takes the armed gesture, if any.
    pub fn consume_trigger(&mut self) -> Option<GestureEvent> {
        self.filter.consume_trigger()
    }

    /// Forgets any hold in progress and any pending trigger.
    pub fn reset(&mut self) {
        self.filter.reset();
    }
}

impl Default for GesturePipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
