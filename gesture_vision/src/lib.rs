// THEORY:
// This file is the main entry point for the `gesture_vision` library crate. It
// exposes the gesture engine as a small, high-level API: a `GestureTracker` that
// owns the camera and is ticked once per rendered frame, the `GesturePipeline` it
// drives, and the `GestureEvent`s it emits.
//
// The vision stages (`core_modules`) are public so they can be tested and tuned on
// their own, but an application only ever needs the tracker, the pipeline config,
// and the capture/preview traits it implements for its platform.

pub mod command;
pub mod core_modules;
pub mod error;
pub mod pipeline;

pub use command::GestureCommand;
pub use core_modules::capture::{CameraDevice, CaptureConfig, FrameSource};
pub use core_modules::frame::{CameraFrame, RegionOfInterest};
pub use core_modules::preview::{Preview, PreviewSink};
pub use core_modules::tracker::GestureTracker;
pub use error::{CaptureError, ConfigError, FrameError};
pub use pipeline::{
    GestureEvent, GesturePipeline, GestureState, HoldStatus, Observation, PipelineConfig, Report,
    RetriggerPolicy,
};
