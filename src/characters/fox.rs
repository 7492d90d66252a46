//! The cubic fox: a keyboard-driven character made of fourteen cubes.
//!
//! The fox's placement (position on the ground plane, heading, jump height
//! and breakdance angles) is folded into a single root matrix; all parts hang
//! off that root. Feet swing while moving, the tail wags on demand.

use std::f32::consts::TAU;

use cgmath::{Deg, InnerSpace, Matrix4, Vector2, Vector3};
use instant::Duration;
use log::{debug, info};

use crate::{
    animation::{
        sequence::{Sequence, SequenceEvent},
        timed::TimedAnimation,
    },
    context::Context,
    data_structures::{
        pose::{Axis, TransformKind},
        rig::{NodeDef, Rig, RotationMode, Step},
    },
    error::RigError,
    flow::Flow,
    render::Render,
    rig_parts,
};

rig_parts! {
    pub enum FoxPart {
        Body => "body",
        FrontRightFoot => "fr_foot",
        FrontLeftFoot => "fl_foot",
        BackRightFoot => "br_foot",
        BackLeftFoot => "bl_foot",
        Tail1 => "tail_1",
        Tail2 => "tail_2",
        RightEar => "r_ear",
        LeftEar => "l_ear",
        Nose => "nose",
        RightEye => "r_eye",
        RightEyeBall => "r_eye_ball",
        LeftEye => "l_eye",
        LeftEyeBall => "l_eye_ball",
    }
}

use FoxPart::*;

const FUR: [f32; 4] = [1.0, 0.5, 0.0, 1.0];
const PAW: [f32; 4] = [1.0, 0.4, 0.0, 1.0];
const DARK: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
const BLACK: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Distance covered per move call while walking.
pub const WALK_STEP: f32 = 0.1;
pub const RUN_COEFFICIENT: f32 = 3.0;
pub const JUMP_HEIGHT: f32 = 0.5;
/// Length of one jump in seconds.
pub const JUMP_TIME: f32 = 0.5;

const FEET_SWING: f32 = 20.0;
const FEET_PERIOD: f32 = 0.4;
const TAIL_SWING: [f32; 2] = [40.0, 20.0];
const TAIL_PERIOD: [f32; 2] = [0.8, 1.2];
const DANCE_ROLL: f32 = 180.0;
const DANCE_SPIN: f32 = 1800.0;
const DANCE_STEP_TIME: f32 = 2.0;
/// Distance from the body origin to the pivot the fox turns around.
const PIVOT: f32 = 2.0;

fn fox_nodes() -> Vec<NodeDef<FoxPart>> {
    let mut nodes = vec![
        NodeDef::root(Body)
            .local(Step::scale(1.0, 1.0, 2.0))
            .local(Step::translate(0.0, 0.0, 1.0))
            .color(FUR),
    ];
    for (part, x, z) in [
        (FrontRightFoot, 0.5, 0.6),
        (FrontLeftFoot, -0.5, 0.6),
        (BackLeftFoot, 0.5, 3.4),
        (BackRightFoot, -0.5, 3.4),
    ] {
        nodes.push(
            NodeDef::root(part)
                .then(Step::translate(x, -1.2, z))
                .then(Step::PoseRotation(RotationMode::AxisAngle))
                .local(Step::uniform_scale(0.4))
                .color(PAW),
        );
    }
    nodes.extend([
        NodeDef::root(Tail1)
            .then(Step::translate(0.0, 0.0, 4.5))
            .then(Step::translate(0.0, 0.0, -0.6))
            .then(Step::PoseRotation(RotationMode::EulerXyz))
            .then(Step::translate(0.0, 0.0, 0.6))
            .local(Step::scale(0.3, 0.3, 0.6))
            .color(PAW),
        NodeDef::child(Tail2, Tail1)
            .then(Step::translate(0.0, 0.0, 0.8))
            .then(Step::PoseRotation(RotationMode::EulerXyz))
            .local(Step::scale(0.3, 0.3, 0.2))
            .color(BLACK),
        NodeDef::root(RightEar)
            .then(Step::translate(0.5, 1.0, 0.5))
            .local(Step::scale(0.3, 0.5, 0.2))
            .color(DARK),
        NodeDef::root(LeftEar)
            .then(Step::translate(-0.5, 1.0, 0.5))
            .local(Step::scale(0.3, 0.5, 0.2))
            .color(DARK),
        NodeDef::root(Nose)
            .then(Step::translate(0.0, -0.3, 0.0))
            .local(Step::scale(0.25, 0.25, 0.6))
            .color(DARK),
    ]);
    for (eye, ball, x) in [(RightEye, RightEyeBall, 0.4), (LeftEye, LeftEyeBall, -0.4)] {
        nodes.push(
            NodeDef::root(eye)
                .then(Step::translate(x, 0.25, 0.0))
                .local(Step::scale(0.2, 0.2, 0.1))
                .color(WHITE),
        );
        nodes.push(
            NodeDef::child(ball, eye)
                .then(Step::translate(0.0, 0.0, -0.01))
                .local(Step::uniform_scale(0.1))
                .color(BLACK),
        );
    }
    nodes
}

/// Where the fox stands before any placement: lifted, moved into the
/// world, turned around and shrunk.
pub fn default_matrix() -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(0.0, 1.6, 0.0))
        * Matrix4::from_translation(Vector3::new(-3.0, 0.0, 7.0))
        * Matrix4::from_angle_y(Deg(180.0))
        * Matrix4::from_scale(0.3)
}

/// Keys held down this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub up: bool,
    pub down: bool,
    pub right: bool,
    pub left: bool,
}

impl MoveKeys {
    pub fn is_empty(&self) -> bool {
        !(self.up || self.down || self.right || self.left)
    }
}

/// Movement direction relative to the fox's heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compass {
    E,
    NE,
    N,
    NW,
    W,
    SW,
    S,
    SE,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stride {
    Forward,
    Backward,
    Left,
    Right,
}

impl Compass {
    /// Up wins over down, and a vertical key combines with one horizontal key.
    pub fn from_keys(keys: MoveKeys) -> Option<Self> {
        let direction = if keys.up {
            if keys.right {
                Compass::NE
            } else if keys.left {
                Compass::NW
            } else {
                Compass::N
            }
        } else if keys.down {
            if keys.right {
                Compass::SE
            } else if keys.left {
                Compass::SW
            } else {
                Compass::S
            }
        } else if keys.right {
            Compass::E
        } else if keys.left {
            Compass::W
        } else {
            return None;
        };
        Some(direction)
    }

    fn strides(self) -> &'static [Stride] {
        match self {
            Compass::N => &[Stride::Forward],
            Compass::NE => &[Stride::Forward, Stride::Right],
            Compass::NW => &[Stride::Forward, Stride::Left],
            Compass::S => &[Stride::Backward],
            Compass::SE => &[Stride::Backward, Stride::Right],
            Compass::SW => &[Stride::Backward, Stride::Left],
            Compass::E => &[Stride::Right],
            Compass::W => &[Stride::Left],
        }
    }

    /// Axis the feet swing around when walking this way.
    pub fn feet_axis(self) -> Vector3<f32> {
        match self {
            Compass::E | Compass::W => Vector3::new(0.0, 0.0, -1.0),
            Compass::NE | Compass::SE => Vector3::new(-1.0, 0.0, -1.0),
            Compass::NW | Compass::SW => Vector3::new(1.0, 0.0, -1.0),
            Compass::N | Compass::S => Vector3::new(-1.0, 0.0, 0.0),
        }
    }
}

/// Position on the ground plane and heading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub z: f32,
    /// Yaw in degrees; -90 faces the default direction.
    pub yaw: f32,
    /// Unit forward vector on the ground plane, kept in step with `yaw`.
    pub forward: Vector2<f32>,
}

impl Default for Placement {
    fn default() -> Self {
        let mut placement = Self {
            x: 0.0,
            z: 0.0,
            yaw: -90.0,
            forward: Vector2::new(0.0, 0.0),
        };
        placement.settle();
        placement
    }
}

impl Placement {
    fn stride(&mut self, step: f32, stride: Stride) {
        match stride {
            Stride::Forward => self.advance(-step),
            Stride::Backward => self.advance(step),
            Stride::Left => self.strafe(-step),
            Stride::Right => self.strafe(step),
        }
    }

    fn advance(&mut self, step: f32) {
        self.x += step * self.forward.x;
        self.z += step * self.forward.y;
    }

    fn strafe(&mut self, step: f32) {
        let side = Vector2::new(-self.forward.y, self.forward.x);
        if side.magnitude2() == 0.0 {
            return;
        }
        let side = side.normalize();
        self.x += side.x * step;
        self.z += side.y * step;
    }

    /// Refreshes the forward vector from the yaw.
    fn settle(&mut self) {
        let (sin, cos) = self.yaw.to_radians().sin_cos();
        self.forward = Vector2::new(cos, sin);
    }

    fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(Vector3::new(self.x, 0.0, -self.z))
            * about_pivot(Matrix4::from_angle_y(Deg(self.yaw + 90.0)))
    }
}

fn about_pivot(m: Matrix4<f32>) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(0.0, 0.0, PIVOT))
        * m
        * Matrix4::from_translation(Vector3::new(0.0, 0.0, -PIVOT))
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Jump {
    elapsed: f32,
}

/// Accumulated breakdance angles in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DanceAngles {
    pub roll_in: f32,
    pub spin: f32,
    pub roll_out: f32,
}

impl DanceAngles {
    fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_z(Deg(self.roll_in))
            * about_pivot(Matrix4::from_angle_y(Deg(self.spin)))
            * Matrix4::from_angle_z(Deg(self.roll_out))
    }
}

pub struct Fox {
    rig: Rig<FoxPart>,
    default_matrix: Matrix4<f32>,
    placement: Placement,
    moving: bool,
    direction: Compass,
    running: bool,
    run_coefficient: f32,
    feet: TimedAnimation,
    tail: [TimedAnimation; 2],
    jump: Option<Jump>,
    jump_offset: f32,
    breakdance: Sequence,
    dance: DanceAngles,
}

impl Fox {
    pub fn new() -> Result<Self, RigError> {
        Self::with_matrix(default_matrix())
    }

    pub fn with_matrix(default_matrix: Matrix4<f32>) -> Result<Self, RigError> {
        let mut rig = Rig::new(fox_nodes())?;
        rig.compose(default_matrix);
        Ok(Self {
            rig,
            default_matrix,
            placement: Placement::default(),
            moving: false,
            direction: Compass::N,
            running: false,
            run_coefficient: RUN_COEFFICIENT,
            feet: TimedAnimation::looping(-FEET_SWING, FEET_SWING, FEET_PERIOD),
            tail: [
                TimedAnimation::looping(-TAIL_SWING[0], TAIL_SWING[0], TAIL_PERIOD[0]),
                TimedAnimation::looping(-TAIL_SWING[1], TAIL_SWING[1], TAIL_PERIOD[1]),
            ],
            jump: None,
            jump_offset: 0.0,
            breakdance: Sequence::new(vec![
                TimedAnimation::one_shot(0.0, DANCE_ROLL, DANCE_STEP_TIME),
                TimedAnimation::one_shot(0.0, DANCE_SPIN, DANCE_STEP_TIME),
                TimedAnimation::one_shot(0.0, DANCE_ROLL, DANCE_STEP_TIME),
            ]),
            dance: DanceAngles::default(),
        })
    }

    pub fn rig(&self) -> &Rig<FoxPart> {
        &self.rig
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_jumping(&self) -> bool {
        self.jump.is_some()
    }

    pub fn is_breakdancing(&self) -> bool {
        self.breakdance.is_active()
    }

    pub fn jump_offset(&self) -> f32 {
        self.jump_offset
    }

    pub fn dance_angles(&self) -> DanceAngles {
        self.dance
    }

    pub fn feet_speed(&self) -> f32 {
        self.feet.speed()
    }

    pub fn is_tail_wagging(&self) -> bool {
        !self.tail[0].is_finished()
    }

    /// Heading used by the camera: the yaw turned to face forward.
    pub fn rotation(&self) -> f32 {
        self.placement.yaw + 90.0
    }

    /// Moves along the held keys; no keys means stop.
    pub fn move_by(&mut self, keys: MoveKeys) {
        let Some(direction) = Compass::from_keys(keys) else {
            self.stop_moving();
            return;
        };
        let step = if self.running {
            WALK_STEP * self.run_coefficient
        } else {
            WALK_STEP
        };
        for stride in direction.strides() {
            self.placement.stride(step, *stride);
        }
        self.placement.settle();
        if self.feet.is_finished() {
            self.feet.start();
        }
        self.direction = direction;
        self.moving = true;
    }

    pub fn stop_moving(&mut self) {
        if !self.moving {
            return;
        }
        self.feet.stop();
        self.moving = false;
        self.pose_feet(0.0);
        self.compose();
    }

    /// Turns around the vertical axis by `degrees`.
    pub fn rotate(&mut self, degrees: f32) {
        self.placement.yaw += degrees % 360.0;
        self.placement.settle();
        self.compose();
    }

    /// Switches between walking and running; the feet swing faster while running.
    pub fn run(&mut self, should_run: bool) {
        if self.running == should_run {
            return;
        }
        let speed = self.feet.speed();
        if should_run {
            self.feet.set_speed(speed * self.run_coefficient);
        } else {
            self.feet.set_speed(speed / self.run_coefficient);
        }
        self.running = should_run;
        debug!("fox running: {}", should_run);
    }

    pub fn jump(&mut self, should_jump: bool) {
        if should_jump && self.jump.is_none() {
            self.jump = Some(Jump { elapsed: 0.0 });
            self.jump_offset = 0.0;
        }
    }

    pub fn breakdance(&mut self, should_dance: bool) {
        if should_dance && self.breakdance.start() {
            info!("fox starts breakdancing");
            self.dance = DanceAngles::default();
            self.moving = true;
        }
    }

    pub fn toggle_tail_animation(&mut self) {
        for anim in &mut self.tail {
            if anim.is_finished() {
                anim.start();
            } else {
                anim.stop();
            }
        }
    }

    /// Advances every running animation by `dt` seconds and recomposes.
    pub fn update(&mut self, dt: f32) {
        self.advance_breakdance();
        if let Some(jump) = self.jump.as_mut() {
            jump.elapsed += dt;
            let phase = TAU * jump.elapsed / JUMP_TIME;
            self.jump_offset = (1.0 - phase.cos()) * JUMP_HEIGHT;
            if jump.elapsed >= JUMP_TIME {
                self.jump = None;
                self.jump_offset = 0.0;
            }
        }
        if let Some((step, diff)) = self.breakdance.tick(dt) {
            match step {
                0 => self.dance.roll_in += diff,
                1 => self.dance.spin += diff,
                _ => self.dance.roll_out += diff,
            }
        }

        self.feet.tick(dt);
        let alpha = if self.feet.is_finished() {
            0.0
        } else {
            self.feet.progress()
        };
        self.pose_feet(alpha);

        let mut wag = [0.0; 2];
        for (angle, anim) in wag.iter_mut().zip(self.tail.iter_mut()) {
            anim.tick(dt);
            if !anim.is_finished() {
                *angle = anim.progress();
            }
        }
        let pose = self.rig.pose_mut();
        pose.set_rotation(Tail1, wag[0], Axis::Y);
        pose.set_rotation(Tail2, wag[1], Axis::Y);

        self.compose();
    }

    fn advance_breakdance(&mut self) {
        if let SequenceEvent::Completed = self.breakdance.advance() {
            info!("fox finished breakdancing");
            self.dance = DanceAngles::default();
            self.moving = false;
        }
    }

    fn pose_feet(&mut self, alpha: f32) {
        let axis = self.direction.feet_axis().normalize();
        let pose = self.rig.pose_mut();
        for (part, sign) in [
            (FrontRightFoot, 1.0),
            (FrontLeftFoot, -1.0),
            (BackLeftFoot, -1.0),
            (BackRightFoot, 1.0),
        ] {
            pose.get_mut(part)
                .set_all(TransformKind::Rotation, axis * (sign * alpha));
        }
    }

    /// The matrix every part hangs off.
    pub fn root_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(Vector3::new(0.0, self.jump_offset, 0.0))
            * self.default_matrix
            * self.placement.matrix()
            * self.dance.matrix()
    }

    fn compose(&mut self) {
        let root = self.root_matrix();
        self.rig.compose(root);
    }

    pub fn render(&self) -> Render {
        self.rig.render()
    }
}

impl<S> Flow<S> for Fox {
    fn on_init(&mut self, ctx: &mut Context, _: &mut S) {
        self.run_coefficient = ctx.config.fox_run_coefficient.max(f32::EPSILON);
        self.compose();
    }

    fn on_update(&mut self, _: &Context, _: &mut S, dt: Duration) {
        self.update(dt.as_secs_f32());
    }

    fn on_render(&self) -> Render {
        self.render()
    }
}
