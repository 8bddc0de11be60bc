mod common;

use common::{FIST, FOUR_FINGERS, TWO_FINGERS, bgr_bytes, frame_with};
use gesture_vision::pipeline::HandReading;
use gesture_vision::{
    CameraFrame, GestureCommand, GestureEvent, GesturePipeline, HoldStatus, PipelineConfig, Report,
};

const TICK: f32 = 1.0 / 30.0;

fn observe(pipeline: &mut GesturePipeline, frame: &CameraFrame, elapsed: f32) -> u8 {
    match pipeline.process_frame(frame, elapsed) {
        Report::Observed(observation) => observation.finger_count(),
        Report::NoData(err) => panic!("frame rejected: {err}"),
    }
}

#[test]
fn four_raised_fingers_become_one_select_command() {
    let mut pipeline = GesturePipeline::default();
    let frame = frame_with(Some(FOUR_FINGERS));

    let mut events = Vec::new();
    for _ in 0..15 {
        assert_eq!(observe(&mut pipeline, &frame, TICK), 4);
        events.extend(pipeline.consume_trigger());
    }

    assert_eq!(events, vec![GestureEvent { finger_count: 4 }]);
    assert_eq!(
        GestureCommand::from_event(events[0]),
        Some(GestureCommand::SelectOption(3))
    );
}

#[test]
fn a_fist_counts_as_one_finger() {
    let mut pipeline = GesturePipeline::default();
    let frame = frame_with(Some(FIST));

    observe(&mut pipeline, &frame, 0.1);
    observe(&mut pipeline, &frame, 0.1);
    assert_eq!(observe(&mut pipeline, &frame, 0.1), 1);
    assert_eq!(pipeline.consume_trigger(), Some(GestureEvent { finger_count: 1 }));
}

#[test]
fn two_fingers_from_a_bgr_device_buffer() {
    let mut pipeline = GesturePipeline::default();
    let reference = frame_with(Some(TWO_FINGERS));
    let frame = CameraFrame::from_bgr(reference.width(), reference.height(), &bgr_bytes(&reference))
        .unwrap();

    assert_eq!(observe(&mut pipeline, &frame, 0.1), 2);
}

#[test]
fn an_empty_scene_never_triggers() {
    let mut pipeline = GesturePipeline::default();
    let frame = frame_with(None);

    for _ in 0..20 {
        match pipeline.process_frame(&frame, 0.1) {
            Report::Observed(observation) => {
                assert_eq!(observation.reading, HandReading::NoContour);
                assert_eq!(observation.status, HoldStatus::Detecting);
            }
            Report::NoData(err) => panic!("frame rejected: {err}"),
        }
        assert_eq!(pipeline.consume_trigger(), None);
    }
}

#[test]
fn changing_the_gesture_mid_hold_restarts_the_hold() {
    let mut pipeline = GesturePipeline::default();
    let two = frame_with(Some(TWO_FINGERS));
    let four = frame_with(Some(FOUR_FINGERS));

    observe(&mut pipeline, &two, 0.1);
    observe(&mut pipeline, &two, 0.05);
    assert!(pipeline.state().hold_time() > 0.0);

    observe(&mut pipeline, &four, 0.05);
    assert_eq!(pipeline.state().hold_time(), 0.0);
    assert_eq!(pipeline.state().last_stable_count(), 4);
    assert!(!pipeline.state().is_armed());

    observe(&mut pipeline, &four, 0.1);
    observe(&mut pipeline, &four, 0.1);
    assert_eq!(pipeline.consume_trigger(), Some(GestureEvent { finger_count: 4 }));
}

#[test]
fn the_hand_is_only_seen_inside_the_roi() {
    let config = PipelineConfig {
        roi: gesture_vision::RegionOfInterest::new(0, 0, 40, 40),
        ..PipelineConfig::default()
    };
    let mut pipeline = GesturePipeline::new(config);
    let frame = frame_with(Some(FOUR_FINGERS));

    assert_eq!(observe(&mut pipeline, &frame, 0.1), 0);
}

#[test]
fn empty_device_buffers_are_no_data() {
    assert!(CameraFrame::from_bgr(640, 480, &[]).is_err());
}
