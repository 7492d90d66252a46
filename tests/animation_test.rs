use std::f32::consts::{FRAC_PI_2, TAU};

use approx::assert_abs_diff_eq;
use pose_ngin::{
    animation::{
        sequence::{Sequence, SequenceEvent, SequenceState},
        timed::{TickOutcome, TimedAnimation},
        tween::{TrackSpec, TweenTrack, Wave, load_tracks, tween},
    },
    data_structures::pose::{Axis, PoseTable, TransformKind},
    error::RigError,
};

use crate::common::test_utils::ArmPart;
mod common;

#[test]
fn should_repeat_tween_after_one_period() {
    let track = TweenTrack::rotation(ArmPart::Elbow, Axis::X, -50.0, 40.0, Wave::sin(10.0));
    let period = track.wave.period().unwrap();
    assert_abs_diff_eq!(period, TAU / 10.0, epsilon = 1e-6);
    assert_abs_diff_eq!(track.value_at(0.0), track.value_at(period), epsilon = 1e-3);
    assert_abs_diff_eq!(track.value_at(0.37), track.value_at(0.37 + period), epsilon = 1e-3);
}

#[test]
fn should_swing_around_range_midpoint() {
    let track = TweenTrack::rotation(ArmPart::Elbow, Axis::X, -50.0, 40.0, Wave::sin(10.0));
    assert_abs_diff_eq!(track.value_at(0.0), -5.0, epsilon = 1e-4);
    // sin(10 t) peaks at t = pi / 20
    assert_abs_diff_eq!(track.value_at(FRAC_PI_2 / 10.0), 40.0, epsilon = 1e-3);
    assert_abs_diff_eq!(track.value_at(3.0 * FRAC_PI_2 / 10.0), -50.0, epsilon = 1e-3);

    let pinned = TweenTrack::translation(ArmPart::Hand, Axis::Z, 0.1, -0.1, Wave::Zero);
    assert_eq!(pinned.value_at(123.0), 0.0);
    assert_eq!(pinned.wave.period(), None);
}

#[test]
fn should_write_tracks_into_pose() {
    let mut pose = PoseTable::<ArmPart>::new();
    let tracks = [
        TweenTrack::rotation(ArmPart::Shoulder, Axis::Y, 0.0, 90.0, Wave::cos(1.0, 0.0)),
        TweenTrack::translation(ArmPart::Hand, Axis::X, -1.0, 1.0, Wave::sin(1.0)),
    ];
    tween(&mut pose, &tracks, 0.0);
    assert_abs_diff_eq!(pose.get(ArmPart::Shoulder).rotation.y, 90.0, epsilon = 1e-4);
    assert!(pose.get(ArmPart::Shoulder).is_active(TransformKind::Rotation));
    // sin(0) lands on the midpoint 0, which is the identity
    assert!(!pose.get(ArmPart::Hand).is_active(TransformKind::Translation));
}

#[test]
fn should_load_tracks_from_json() {
    let json = r#"[
        {"part": "elbow", "kind": "Rotation", "axis": "X", "min": -30.0, "max": 30.0,
         "wave": {"kind": "sin", "speed": 2.0, "phase": 0.0}},
        {"part": "hand", "kind": "Translation", "axis": "Y", "min": 0.0, "max": 1.0,
         "wave": {"kind": "zero"}}
    ]"#;
    let tracks = load_tracks::<ArmPart>(json).unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].part, ArmPart::Elbow);
    assert_eq!(tracks[0].wave, Wave::sin(2.0));
    assert_eq!(tracks[1].wave, Wave::Zero);
}

#[test]
fn should_fail_to_resolve_unknown_part() {
    let spec = TrackSpec {
        part: "tail".to_string(),
        kind: TransformKind::Rotation,
        axis: Axis::Z,
        min: 0.0,
        max: 1.0,
        wave: Wave::Zero,
    };
    assert_eq!(
        spec.resolve::<ArmPart>(),
        Err(RigError::UnknownPart("tail".to_string()))
    );

    let json = r#"[{"part": "tail", "kind": "Scale", "axis": "X", "min": 1.0, "max": 2.0,
                    "wave": {"kind": "zero"}}]"#;
    assert!(load_tracks::<ArmPart>(json).is_err());
}

#[test]
fn should_run_one_shot_to_its_end() {
    let mut anim = TimedAnimation::one_shot(0.0, 180.0, 2.0);
    assert!(anim.is_finished());
    assert_eq!(anim.tick(0.5), TickOutcome::Idle);

    anim.start();
    assert_eq!(anim.tick(0.5), TickOutcome::Running);
    assert_abs_diff_eq!(anim.progress(), 45.0, epsilon = 1e-4);
    assert_abs_diff_eq!(anim.progress_diff(), 45.0, epsilon = 1e-4);

    assert_eq!(anim.tick(5.0), TickOutcome::Finished);
    assert_eq!(anim.progress(), 180.0);
    assert!(anim.is_finished());
}

#[test]
fn should_ping_pong_when_looping() {
    let mut anim = TimedAnimation::looping(-20.0, 20.0, 1.0);
    anim.start();
    assert_eq!(anim.tick(0.5), TickOutcome::Running);
    assert_abs_diff_eq!(anim.progress(), 0.0, epsilon = 1e-4);

    assert_eq!(anim.tick(0.75), TickOutcome::Bounced);
    assert_eq!(anim.progress(), 20.0);
    assert!(anim.is_at_end());

    anim.tick(0.25);
    assert_abs_diff_eq!(anim.progress(), 10.0, epsilon = 1e-4);
    assert!(anim.progress_diff() < 0.0);

    assert_eq!(anim.tick(1.0), TickOutcome::Bounced);
    assert_eq!(anim.progress(), -20.0);
    assert!(!anim.is_at_end());
    assert!(!anim.is_finished());
}

#[test]
fn should_scale_time_by_speed() {
    let mut anim = TimedAnimation::looping(0.0, 100.0, 1.0);
    anim.set_speed(3.0);
    anim.start();
    anim.tick(0.1);
    assert_abs_diff_eq!(anim.progress(), 30.0, epsilon = 1e-3);

    anim.set_speed(-1.0);
    assert_eq!(anim.speed(), 0.0);
}

fn three_steps() -> Sequence {
    Sequence::new(vec![
        TimedAnimation::one_shot(0.0, 10.0, 1.0),
        TimedAnimation::one_shot(0.0, 20.0, 1.0),
        TimedAnimation::one_shot(0.0, 30.0, 1.0),
    ])
}

#[test]
fn should_play_sequence_steps_in_order() {
    let mut seq = three_steps();
    assert_eq!(seq.advance(), SequenceEvent::None);
    assert!(seq.start());
    assert!(!seq.start());

    let mut started = Vec::new();
    let mut totals = [0.0f32; 3];
    let mut completed = false;
    for _ in 0..20 {
        match seq.advance() {
            SequenceEvent::StepStarted(i) => started.push(i),
            SequenceEvent::Completed => {
                completed = true;
                break;
            }
            _ => {}
        }
        if let Some((i, diff)) = seq.tick(0.5) {
            totals[i] += diff;
        }
    }

    assert!(completed);
    assert_eq!(started, vec![0, 1, 2]);
    assert_abs_diff_eq!(totals[0], 10.0, epsilon = 1e-4);
    assert_abs_diff_eq!(totals[1], 20.0, epsilon = 1e-4);
    assert_abs_diff_eq!(totals[2], 30.0, epsilon = 1e-4);
    assert_eq!(seq.state(), SequenceState::Idle);
}

#[test]
fn should_wait_for_step_to_finish_before_moving_on() {
    let mut seq = three_steps();
    seq.start();
    assert_eq!(seq.advance(), SequenceEvent::StepStarted(0));
    assert_eq!(seq.state(), SequenceState::Playing(0));

    seq.tick(0.5);
    assert_eq!(seq.advance(), SequenceEvent::None);

    seq.tick(0.5);
    assert_eq!(seq.advance(), SequenceEvent::StepFinished(0));
    assert_eq!(seq.state(), SequenceState::Entering(1));
    assert_eq!(seq.tick(0.5), None);
}

#[test]
fn should_abort_sequence_on_reset() {
    let mut seq = three_steps();
    seq.start();
    seq.advance();
    seq.tick(0.2);
    seq.reset();
    assert!(!seq.is_active());
    assert!(seq.step(0).unwrap().is_finished());
    assert_eq!(seq.len(), 3);

    let mut empty = Sequence::new(Vec::new());
    assert!(empty.is_empty());
    assert!(!empty.start());
}
