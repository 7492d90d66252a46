//! The Jester: a jointed humanoid built from prisms and icosahedra.
//!
//! The rig hangs off the abdomen. Legs branch from the pelvis, the torso and
//! arms from the lower chest, the head from the neck. Every limb segment
//! carries a pose-rotation slot so sliders and the run cycle can bend it.

use std::f32::consts::FRAC_PI_2;

use cgmath::{Matrix4, SquareMatrix};
use instant::Duration;
use log::{debug, info};

use crate::{
    animation::{
        explode::{ExplodeState, explode_step},
        tween::{TweenTrack, Wave},
    },
    context::Context,
    data_structures::{
        pose::Axis,
        rig::{NodeDef, Rig, RotationMode, Step},
    },
    error::RigError,
    flow::Flow,
    render::{Render, Shape},
    rig_parts,
};

rig_parts! {
    pub enum JesterPart {
        Abdomen => "abdomen",
        Pelvis => "pelvis",
        LowerPelvis => "lpelvis",
        Dress => "dress",
        RightThighJoint => "rtjoint",
        RightThigh => "rthigh",
        RightKnee => "rknee",
        RightCalf => "rcalf",
        RightFootJoint => "rfjoint",
        RightFoot => "rfoot",
        LeftThighJoint => "ltjoint",
        LeftThigh => "lthigh",
        LeftKnee => "lknee",
        LeftCalf => "lcalf",
        LeftFootJoint => "lfjoint",
        LeftFoot => "lfoot",
        LowerChest => "lchest",
        UpperChest => "uchest",
        RightShoulder => "rshoulder",
        RightUpperUpperArm => "ruuparm",
        RightUpperArm => "ruparm",
        RightElbow => "relbow",
        RightForearm => "rfoarm",
        RightWrist => "rwrist",
        RightHand => "rhand",
        LeftShoulder => "lshoulder",
        LeftUpperUpperArm => "luuparm",
        LeftUpperArm => "luparm",
        LeftElbow => "lelbow",
        LeftForearm => "lfoarm",
        LeftWrist => "lwrist",
        LeftHand => "lhand",
        Neck => "neck",
        Head => "head",
    }
}

use JesterPart::*;

const PINK: [f32; 4] = [1.0, 0.5, 0.8, 1.0];
const HOT_PINK: [f32; 4] = [1.0, 0.2, 0.75, 1.0];
const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const MAGENTA: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
const SKIN: [f32; 4] = [1.0, 0.8, 0.7, 1.0];
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const SLEEVE: [f32; 4] = [1.0, 0.5, 0.7, 1.0];
const MAROON: [f32; 4] = [0.5, 0.0, 0.0, 1.0];

const POSE_ROTATION: Step = Step::PoseRotation(RotationMode::EulerXyz);

/// Angular speed of the run cycle in radians per second.
pub const RUN_SPEED: f32 = 10.0;

fn prism() -> Shape {
    Shape::Prism { sides: 10 }
}

fn jester_nodes() -> Vec<NodeDef<JesterPart>> {
    let mut nodes = vec![
        NodeDef::root(Abdomen)
            .then(POSE_ROTATION)
            .then(Step::PoseTranslation)
            .then(Step::translate(0.0, -0.1, 0.0))
            .local(Step::uniform_scale(0.3))
            .shape(Shape::Icosahedron)
            .color(PINK),
        NodeDef::child(Pelvis, Abdomen)
            .then(POSE_ROTATION)
            .then(Step::translate(0.0, -0.2, 0.0))
            .local(Step::scale(0.4, 0.4, 0.3))
            .shape(prism())
            .color(PINK),
        NodeDef::child(LowerPelvis, Pelvis)
            .then(Step::translate(0.0, -0.22, 0.0))
            .local(Step::scale(0.5, -0.5, 0.37))
            .shape(Shape::Pyramid { sides: 10 })
            .color(PINK),
        NodeDef::child(Dress, LowerPelvis)
            .then(Step::translate(0.0, 0.1, 0.0))
            .local(Step::scale(0.7, 0.5, 0.7))
            .shape(prism())
            .color(HOT_PINK),
    ];
    nodes.extend(leg_nodes(Side::Right));
    nodes.extend(leg_nodes(Side::Left));
    nodes.extend([
        NodeDef::child(LowerChest, Abdomen)
            .then(POSE_ROTATION)
            .then(Step::translate(0.0, 0.1, 0.0))
            .local(Step::uniform_scale(0.5))
            .shape(prism())
            .color(PINK),
        NodeDef::child(UpperChest, LowerChest)
            .then(Step::translate(0.0, 0.23, 0.0))
            .local(Step::uniform_scale(0.5))
            .shape(prism())
            .color(PINK),
    ]);
    nodes.extend(arm_nodes(Side::Right));
    nodes.extend(arm_nodes(Side::Left));
    nodes.extend([
        // zero scale: the neck only positions the head
        NodeDef::child(Neck, UpperChest)
            .then(Step::translate(0.0, 0.4, 0.0))
            .local(Step::uniform_scale(0.0))
            .shape(Shape::Cube)
            .color(PINK),
        NodeDef::child(Head, Neck)
            .then(POSE_ROTATION)
            .then(Step::PoseTranslation)
            .then(Step::translate(0.0, 0.03, 0.0))
            .local(Step::PoseScale)
            .local(Step::uniform_scale(0.4))
            .shape(Shape::ClownHead)
            .color(WHITE),
    ]);
    nodes
}

#[derive(Clone, Copy)]
enum Side {
    Right,
    Left,
}

impl Side {
    /// Mirrors an x offset or a z-rotation angle; right is the authored side.
    fn mirror(self, v: f32) -> f32 {
        match self {
            Side::Right => v,
            Side::Left => -v,
        }
    }
}

fn leg_nodes(side: Side) -> [NodeDef<JesterPart>; 6] {
    let (joint, thigh, knee, calf, foot_joint, foot) = match side {
        Side::Right => (
            RightThighJoint,
            RightThigh,
            RightKnee,
            RightCalf,
            RightFootJoint,
            RightFoot,
        ),
        Side::Left => (
            LeftThighJoint,
            LeftThigh,
            LeftKnee,
            LeftCalf,
            LeftFootJoint,
            LeftFoot,
        ),
    };
    [
        NodeDef::child(joint, Pelvis)
            .then(Step::translate(side.mirror(-0.13), -0.13, 0.0))
            .local(Step::uniform_scale(0.15))
            .shape(Shape::Icosahedron)
            .color(MAGENTA),
        NodeDef::child(thigh, joint)
            .then(POSE_ROTATION)
            .then(Step::translate(0.0, -0.2, 0.0))
            .local(Step::scale(0.5, 0.7, 0.5))
            .shape(prism())
            .color(SKIN),
        NodeDef::child(knee, thigh)
            .then(POSE_ROTATION)
            .then(Step::translate(0.0, -0.29, 0.0))
            .local(Step::uniform_scale(0.12))
            .shape(Shape::Icosahedron)
            .color(WHITE),
        NodeDef::child(calf, knee)
            .then(POSE_ROTATION)
            .then(Step::translate(0.0, -0.23, 0.0))
            .local(Step::scale(0.3, 0.45, 0.3))
            .shape(prism())
            .color(WHITE),
        NodeDef::child(foot_joint, calf)
            .then(POSE_ROTATION)
            .then(Step::translate(0.0, -0.2, 0.0))
            .then(Step::rotate(side.mirror(-90.0), 0.0, 0.0, 1.0))
            .local(Step::uniform_scale(0.4))
            .shape(prism())
            .color(WHITE),
        NodeDef::child(foot, foot_joint)
            .then(POSE_ROTATION)
            .then(Step::rotate(side.mirror(90.0), 0.0, 0.0, 1.0))
            .then(Step::translate(0.0, -0.02, -0.1))
            .local(Step::scale(0.2, 0.3, 0.25))
            .shape(Shape::Prism { sides: 4 })
            .color(MAROON),
    ]
}

fn arm_nodes(side: Side) -> [NodeDef<JesterPart>; 7] {
    let (shoulder, upper_upper, upper, elbow, forearm, wrist, hand) = match side {
        Side::Right => (
            RightShoulder,
            RightUpperUpperArm,
            RightUpperArm,
            RightElbow,
            RightForearm,
            RightWrist,
            RightHand,
        ),
        Side::Left => (
            LeftShoulder,
            LeftUpperUpperArm,
            LeftUpperArm,
            LeftElbow,
            LeftForearm,
            LeftWrist,
            LeftHand,
        ),
    };
    [
        NodeDef::child(shoulder, UpperChest)
            .then(POSE_ROTATION)
            .then(Step::translate(side.mirror(-0.18), 0.07, 0.0))
            .local(Step::uniform_scale(0.1))
            .shape(Shape::Icosahedron)
            .color(PINK),
        NodeDef::child(upper_upper, shoulder)
            .then(POSE_ROTATION)
            .then(Step::rotate(side.mirror(-90.0), 0.0, 0.0, 1.0))
            .then(Step::translate(0.0, -0.05, 0.0))
            .local(Step::uniform_scale(0.3))
            .shape(prism())
            .color(RED),
        NodeDef::child(upper, upper_upper)
            .then(POSE_ROTATION)
            .then(Step::translate(0.0, -0.2, 0.0))
            .local(Step::scale(0.5, 0.8, 0.5))
            .shape(prism())
            .color(SKIN),
        NodeDef::child(elbow, upper)
            .then(POSE_ROTATION)
            .then(Step::translate(0.0, -0.23, 0.0))
            .local(Step::uniform_scale(0.08))
            .shape(Shape::Icosahedron)
            .color(WHITE),
        NodeDef::child(forearm, elbow)
            .then(POSE_ROTATION)
            .then(Step::translate(0.0, -0.15, 0.0))
            .local(Step::scale(0.4, 0.5, 0.4))
            .shape(prism())
            .color(SLEEVE),
        NodeDef::child(wrist, forearm)
            .then(POSE_ROTATION)
            .then(Step::translate(0.0, -0.15, 0.0))
            .then(Step::rotate(side.mirror(90.0), 0.0, 0.0, 1.0))
            .local(Step::uniform_scale(0.3))
            .shape(prism())
            .color(WHITE),
        NodeDef::child(hand, wrist)
            .then(POSE_ROTATION)
            .then(Step::rotate(side.mirror(-90.0), 0.0, 0.0, 1.0))
            .then(Step::translate(0.0, -0.1, 0.0))
            .local(Step::scale(0.03, 0.7, 0.16))
            .shape(Shape::Prism { sides: 4 })
            .color(RED),
    ]
}

/// Tracks of the looping run cycle.
pub fn run_tracks(speed: f32) -> Vec<TweenTrack<JesterPart>> {
    let lead = Wave::sin(speed);
    let trail = Wave::cos(speed, FRAC_PI_2);
    let bob = Wave::cos(2.0 * speed, 0.0);
    vec![
        TweenTrack::rotation(RightThigh, Axis::X, -50.0, 40.0, lead),
        TweenTrack::rotation(LeftThigh, Axis::X, -50.0, 40.0, trail),
        TweenTrack::rotation(LeftCalf, Axis::X, -60.0, 0.0, trail),
        TweenTrack::rotation(RightCalf, Axis::X, -90.0, 0.0, lead),
        TweenTrack::translation(Abdomen, Axis::X, 0.1, -0.1, Wave::Zero),
        TweenTrack::translation(Abdomen, Axis::Y, 0.1, -0.1, bob),
        TweenTrack::translation(Abdomen, Axis::Z, 0.1, -0.1, Wave::Zero),
        TweenTrack::rotation(RightUpperUpperArm, Axis::X, -35.0, 55.0, trail),
        TweenTrack::rotation(LeftUpperUpperArm, Axis::X, -35.0, 55.0, lead),
        TweenTrack::rotation(RightForearm, Axis::X, 30.0, 90.0, trail),
        TweenTrack::rotation(LeftForearm, Axis::X, 30.0, 90.0, lead),
        TweenTrack::rotation(RightFoot, Axis::Y, -50.0, 0.0, lead),
        TweenTrack::rotation(LeftFoot, Axis::Y, 0.0, 50.0, lead),
    ]
}

/// Run-cycle state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunCycle {
    Idle,
    Running,
}

pub struct Jester {
    rig: Rig<JesterPart>,
    run_tracks: Vec<TweenTrack<JesterPart>>,
    run: RunCycle,
    explode: Option<ExplodeState>,
    explode_seed: u64,
}

impl Jester {
    pub fn new() -> Result<Self, RigError> {
        Self::with_settings(RUN_SPEED, 0)
    }

    pub fn with_settings(run_speed: f32, explode_seed: u64) -> Result<Self, RigError> {
        Ok(Self {
            rig: Rig::new(jester_nodes())?,
            run_tracks: run_tracks(run_speed),
            run: RunCycle::Idle,
            explode: None,
            explode_seed,
        })
    }

    pub fn rig(&self) -> &Rig<JesterPart> {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut Rig<JesterPart> {
        &mut self.rig
    }

    pub fn run_state(&self) -> RunCycle {
        self.run
    }

    pub fn is_exploding(&self) -> bool {
        self.explode.is_some()
    }

    /// Slider entry point: sets one rotation axis of one part and recomposes.
    pub fn rotate_appendage(&mut self, part: JesterPart, degrees: f32, axis: Axis) {
        self.rig.pose_mut().set_rotation(part, degrees, axis);
        self.rig.recompose();
    }

    /// Enters the run cycle with the arms raised away from the body.
    pub fn start_run(&mut self) {
        if self.run == RunCycle::Running {
            return;
        }
        info!("jester starts running");
        let pose = self.rig.pose_mut();
        pose.set_rotation(RightUpperUpperArm, 60.0, Axis::Z);
        pose.set_rotation(LeftUpperUpperArm, -60.0, Axis::Z);
        self.run = RunCycle::Running;
        self.rig.recompose();
    }

    /// Leaves the run cycle and returns every part to its rest pose.
    pub fn stop_run(&mut self) {
        if self.run == RunCycle::Idle {
            return;
        }
        info!("jester stops running");
        self.run = RunCycle::Idle;
        self.rig.pose_mut().reset();
        self.rig.recompose();
    }

    pub fn start_explode(&mut self) {
        if self.explode.is_none() {
            debug!("jester explodes with seed {}", self.explode_seed);
            self.explode = Some(ExplodeState::new(self.explode_seed));
        }
    }

    /// Advances the active animations to global time `seconds` and recomposes.
    pub fn update(&mut self, seconds: f32) {
        if self.run == RunCycle::Running {
            self.rig.animate(&self.run_tracks, seconds);
        }
        if let Some(state) = self.explode.take() {
            let (state, frame) = explode_step(state);
            let pose = self.rig.pose_mut();
            if frame.finished {
                pose.set_uniform_scale(Head, 1.0);
                pose.set_translation_xyz(Head, 0.0, 0.0, 0.0);
                debug!("jester explosion finished");
            } else {
                pose.set_uniform_scale(Head, frame.head_scale);
                let o = frame.head_offset;
                pose.set_translation_xyz(Head, o.x, o.y, o.z);
                self.explode = Some(state);
            }
            self.rig.recompose();
        }
    }

    pub fn render(&self) -> Render {
        self.rig.render()
    }
}

impl<S> Flow<S> for Jester {
    fn on_init(&mut self, ctx: &mut Context, _: &mut S) {
        self.explode_seed = ctx.config.explode_seed;
        self.run_tracks = run_tracks(ctx.config.run_speed);
        self.rig.compose(Matrix4::identity());
    }

    fn on_update(&mut self, ctx: &Context, _: &mut S, _: Duration) {
        self.update(ctx.elapsed);
    }

    fn on_render(&self) -> Render {
        self.render()
    }
}
