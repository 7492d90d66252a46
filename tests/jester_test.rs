use std::collections::HashSet;

use approx::assert_abs_diff_eq;
use pose_ngin::{
    animation::explode::{
        EXPLODE_JITTER, ExplodeState, explode_step, remap,
    },
    characters::jester::{Jester, JesterPart, RUN_SPEED, RunCycle, run_tracks},
    data_structures::{
        pose::{Axis, TransformKind},
        rig::PartId,
    },
    render::{DrawList, Pass, Shape},
};

use crate::common::test_utils::{assert_matrix_eq, assert_point_eq};
mod common;

#[test]
fn should_build_every_jester_part_once() {
    let jester = Jester::new().unwrap();
    let draws = jester.rig().draws();
    assert_eq!(draws.len(), 34);
    assert_eq!(draws.len(), JesterPart::ALL.len());
    let labels: HashSet<_> = draws.iter().map(|d| d.label).collect();
    assert_eq!(labels.len(), 34);
    assert_eq!(draws[0].label, "abdomen");

    let head = draws.iter().find(|d| d.label == "head").unwrap();
    assert_eq!(head.shape, Shape::ClownHead);
    let lpelvis = draws.iter().find(|d| d.label == "lpelvis").unwrap();
    assert_eq!(lpelvis.shape, Shape::Pyramid { sides: 10 });
}

#[test]
fn should_mirror_left_and_right_limbs() {
    let jester = Jester::new().unwrap();
    let pairs = [
        (JesterPart::RightThigh, JesterPart::LeftThigh),
        (JesterPart::RightFoot, JesterPart::LeftFoot),
        (JesterPart::RightShoulder, JesterPart::LeftShoulder),
        (JesterPart::RightHand, JesterPart::LeftHand),
    ];
    for (right, left) in pairs {
        let r = jester.rig().position(right);
        let l = jester.rig().position(left);
        assert_abs_diff_eq!(r.x, -l.x, epsilon = 1e-5);
        assert_abs_diff_eq!(r.y, l.y, epsilon = 1e-5);
        assert_abs_diff_eq!(r.z, l.z, epsilon = 1e-5);
    }
    assert!(jester.rig().position(JesterPart::RightThighJoint).x < 0.0);
}

#[test]
fn should_bend_only_the_rotated_limb() {
    let mut jester = Jester::new().unwrap();
    let right_knee = jester.rig().position(JesterPart::RightKnee);
    let left_knee = jester.rig().position(JesterPart::LeftKnee);

    jester.rotate_appendage(JesterPart::RightThigh, 90.0, Axis::X);

    assert_point_eq(jester.rig().position(JesterPart::LeftKnee), left_knee);
    let moved = jester.rig().position(JesterPart::RightKnee);
    assert!((moved.z - right_knee.z).abs() > 0.1);
}

#[test]
fn should_raise_arms_when_starting_to_run() {
    let mut jester = Jester::new().unwrap();
    assert_eq!(jester.run_state(), RunCycle::Idle);

    jester.start_run();
    assert_eq!(jester.run_state(), RunCycle::Running);
    let pose = jester.rig().pose();
    assert_eq!(pose.get(JesterPart::RightUpperUpperArm).rotation.z, 60.0);
    assert_eq!(pose.get(JesterPart::LeftUpperUpperArm).rotation.z, -60.0);
}

#[test]
fn should_loop_run_cycle_every_period() {
    let mut jester = Jester::new().unwrap();
    jester.start_run();
    let period = std::f32::consts::TAU / RUN_SPEED;

    jester.update(0.3);
    let first = jester.rig().draws();
    jester.update(0.3 + period);
    let second = jester.rig().draws();

    for (a, b) in first.iter().zip(second.iter()) {
        assert_matrix_eq(a.matrix, b.matrix, 1e-3);
    }
}

#[test]
fn should_bob_abdomen_while_running() {
    let mut jester = Jester::new().unwrap();
    jester.start_run();
    jester.update(0.0);
    // cos(0) puts the abdomen at the -0.1 end of its range
    let offset = jester.rig().pose().get(JesterPart::Abdomen).translation;
    assert_abs_diff_eq!(offset.y, -0.1, epsilon = 1e-5);
    assert_eq!(offset.x, 0.0);
    assert_eq!(offset.z, 0.0);
}

#[test]
fn should_return_to_rest_pose_when_stopping() {
    let mut jester = Jester::new().unwrap();
    let rest = jester.rig().draws();

    jester.start_run();
    jester.update(1.234);
    assert_ne!(jester.rig().draws(), rest);

    jester.stop_run();
    assert_eq!(jester.run_state(), RunCycle::Idle);
    assert_eq!(jester.rig().pose().posed_parts().count(), 0);
    assert_eq!(jester.rig().draws(), rest);

    // idle jesters ignore the clock
    jester.update(5.0);
    assert_eq!(jester.rig().draws(), rest);
}

#[test]
fn should_cover_every_run_track_part() {
    let tracks = run_tracks(RUN_SPEED);
    assert_eq!(tracks.len(), 13);
    assert!(tracks.iter().all(|t| t.kind == TransformKind::Rotation
        || t.part == JesterPart::Abdomen));
}

#[test]
fn should_grow_head_while_exploding() {
    let mut jester = Jester::with_settings(RUN_SPEED, 7).unwrap();
    jester.start_explode();
    assert!(jester.is_exploding());

    for _ in 0..500 {
        jester.update(0.0);
    }
    let head = jester.rig().pose().get(JesterPart::Head);
    assert_abs_diff_eq!(head.scale.x, 2.5, epsilon = 1e-2);
    assert!(head.translation.x.abs() <= EXPLODE_JITTER);
}

#[test]
fn should_restore_head_after_explosion() {
    let mut jester = Jester::with_settings(RUN_SPEED, 7).unwrap();
    let rest = jester.rig().world_matrix(JesterPart::Head);
    jester.start_explode();
    for _ in 0..1500 {
        jester.update(0.0);
    }
    assert!(!jester.is_exploding());
    let head = jester.rig().pose().get(JesterPart::Head);
    assert!(!head.is_active(TransformKind::Scale));
    assert!(!head.is_active(TransformKind::Translation));
    assert_eq!(jester.rig().world_matrix(JesterPart::Head), rest);
}

#[test]
fn should_replay_explosion_from_same_seed() {
    let mut a = Jester::with_settings(RUN_SPEED, 42).unwrap();
    let mut b = Jester::with_settings(RUN_SPEED, 42).unwrap();
    a.start_explode();
    b.start_explode();
    for _ in 0..50 {
        a.update(0.0);
        b.update(0.0);
    }
    assert_eq!(
        a.rig().world_matrix(JesterPart::Head),
        b.rig().world_matrix(JesterPart::Head)
    );
}

#[test]
fn should_step_explode_state_deterministically() {
    let (s1, f1) = explode_step(ExplodeState::new(3));
    let (s2, f2) = explode_step(ExplodeState::new(3));
    assert_eq!(s1, s2);
    assert_eq!(f1, f2);
    assert_abs_diff_eq!(f1.head_scale, 1.003, epsilon = 1e-5);
    assert!(!f1.finished);

    let (_, other) = explode_step(ExplodeState::new(4));
    assert_ne!(f1.head_offset, other.head_offset);
}

#[test]
fn should_hide_head_after_countdown_and_finish_later() {
    let mut state = ExplodeState::new(1);
    let mut frame = None;
    for _ in 0..1100 {
        let (next, f) = explode_step(state);
        state = next;
        frame = Some(f);
    }
    let frame = frame.unwrap();
    assert_eq!(frame.head_scale, 0.0);
    assert!(!frame.finished);

    let mut steps = 0;
    loop {
        let (next, f) = explode_step(state);
        state = next;
        steps += 1;
        if f.finished {
            break;
        }
        assert!(steps < 1000);
    }
    assert!(state.timer > 14.0);
}

#[test]
fn should_remap_linearly() {
    assert_eq!(remap(5.0, 0.0, 10.0, 1.0, 4.0), 2.5);
    assert_eq!(remap(0.0, 0.0, 10.0, 1.0, 4.0), 1.0);
}

#[test]
fn should_render_jester_in_opaque_pass() {
    let jester = Jester::new().unwrap();
    let mut list = DrawList::new();
    jester.render().submit(pose_ngin::Point3::new(0.0, 0.0, 5.0), &mut list);
    assert_eq!(list.labels(Pass::Opaque).len(), 34);
    assert!(list.labels(Pass::Transparent).is_empty());
}
