//! Scene camera.
//!
//! A first-person camera looks along a direction derived from its pitch and
//! yaw; a third-person camera looks at a fixed target point. Both can be
//! eased towards a position or heading over a few seconds, which is how the
//! world trails the fox.

use cgmath::{Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3};
use log::warn;

/// Seconds an eased move or turn takes by default.
pub const EASE_TIME: f32 = 4.0;
const PITCH_LIMIT: f32 = 89.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMode {
    FirstPerson,
    ThirdPerson,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Motion {
    Forward,
    Backward,
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    position: Point3<f32>,
    /// Degrees.
    pitch: f32,
    yaw: f32,
    roll: f32,
    /// Look direction in first person, look-at point in third person.
    direction: Vector3<f32>,
    up: Vector3<f32>,
    mode: CameraMode,
    smooth_translation: f32,
    smooth_rotation: f32,
    moved: bool,
}

impl Default for Camera {
    /// First person at (-2, 5, 20) looking down negative z.
    fn default() -> Self {
        let mut camera = Self::new(Point3::new(-2.0, 5.0, 20.0), CameraMode::FirstPerson);
        camera.rotate_y(-90.0);
        camera
    }
}

impl Camera {
    pub fn new(position: Point3<f32>, mode: CameraMode) -> Self {
        let mut camera = Self {
            position,
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
            direction: Vector3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
            mode,
            smooth_translation: 0.0,
            smooth_rotation: 0.0,
            moved: false,
        };
        camera.refresh();
        camera
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn roll(&self) -> f32 {
        self.roll
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vector3<f32> {
        let look = match self.mode {
            CameraMode::FirstPerson => self.direction,
            CameraMode::ThirdPerson => self.direction - self.position.to_vec(),
        };
        if look.magnitude2() == 0.0 {
            return Vector3::new(0.0, 0.0, -1.0);
        }
        look.normalize()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            CameraMode::FirstPerson => {
                Matrix4::look_at_rh(self.position, self.position + self.direction, self.up)
            }
            CameraMode::ThirdPerson => {
                Matrix4::look_at_rh(self.position, Point3::from_vec(self.direction), self.up)
                    * Matrix4::from_angle_x(Deg(self.pitch))
                    * Matrix4::from_angle_y(Deg(self.yaw))
                    * Matrix4::from_angle_z(Deg(self.roll))
            }
        }
    }

    /// Returns whether the camera moved or turned since the last call, and clears the flag.
    pub fn take_moved(&mut self) -> bool {
        std::mem::take(&mut self.moved)
    }

    pub fn move_forward(&mut self, step: f32) {
        self.step(step, Motion::Forward);
    }

    pub fn move_backward(&mut self, step: f32) {
        self.step(step, Motion::Backward);
    }

    pub fn move_left(&mut self, step: f32) {
        self.step(step, Motion::Left);
    }

    pub fn move_right(&mut self, step: f32) {
        self.step(step, Motion::Right);
    }

    fn step(&mut self, step: f32, motion: Motion) {
        let step = match motion {
            Motion::Backward | Motion::Left => -step,
            Motion::Forward | Motion::Right => step,
        };
        let forward = self.forward();
        match motion {
            Motion::Forward | Motion::Backward => self.position += forward * step,
            Motion::Left | Motion::Right => {
                let side = forward.cross(self.up);
                if side.magnitude2() == 0.0 {
                    return;
                }
                self.position += side.normalize() * step;
            }
        }
        self.refresh();
    }

    /// Pitch is kept within +-89 degrees.
    pub fn rotate_x(&mut self, degrees: f32) {
        self.pitch = (self.pitch + degrees).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.refresh();
    }

    pub fn rotate_y(&mut self, degrees: f32) {
        self.yaw += degrees;
        self.refresh();
    }

    pub fn rotate_z(&mut self, degrees: f32) {
        self.roll += degrees;
        self.refresh();
    }

    pub fn move_to(&mut self, position: Point3<f32>) {
        self.position = position;
        self.refresh();
    }

    /// Eases towards `target`; after `time` seconds of calls the camera snaps onto it.
    pub fn move_to_smooth(&mut self, target: Point3<f32>, dt: f32, time: f32) {
        if self.smooth_translation < time {
            self.smooth_translation += dt;
            let t = (self.smooth_translation / time).min(1.0);
            self.position += (target - self.position) * t;
            self.refresh();
        } else {
            self.move_to(target);
        }
    }

    pub fn head_to(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.pitch = pitch;
        self.yaw = yaw;
        self.roll = roll;
        self.refresh();
    }

    /// Eases the angles towards the given heading, like [`Camera::move_to_smooth`].
    pub fn head_to_smooth(&mut self, pitch: f32, yaw: f32, roll: f32, dt: f32, time: f32) {
        if self.smooth_rotation < time {
            self.smooth_rotation += dt;
            let t = (self.smooth_rotation / time).min(1.0);
            self.pitch += (pitch - self.pitch) * t;
            self.yaw += (yaw - self.yaw) * t;
            self.roll += (roll - self.roll) * t;
            self.refresh();
        } else {
            self.head_to(pitch, yaw, roll);
        }
    }

    pub fn reset_moving_animation(&mut self) {
        self.smooth_translation = 0.0;
    }

    pub fn reset_heading_animation(&mut self) {
        self.smooth_rotation = 0.0;
    }

    /// Sets the look-at point. Only meaningful in third person.
    pub fn target(&mut self, point: Point3<f32>) {
        if self.mode != CameraMode::ThirdPerson {
            warn!("ignoring camera target {:?} in first person", point);
            return;
        }
        self.direction = point.to_vec();
        self.refresh();
    }

    /// Switches to first person at `position`, looking along `look`.
    pub fn set_first_person(&mut self, position: Point3<f32>, look: Vector3<f32>) {
        self.position = position;
        self.mode = CameraMode::FirstPerson;
        self.roll = 0.0;
        if look.magnitude2() == 0.0 {
            self.pitch = 0.0;
            self.yaw = 0.0;
        } else {
            let look = look.normalize();
            self.pitch = look.y.asin().to_degrees().clamp(-PITCH_LIMIT, PITCH_LIMIT);
            self.yaw = look.z.atan2(look.x).to_degrees();
        }
        self.refresh();
    }

    /// Switches to third person at `position`, looking at `target`.
    pub fn set_third_person(&mut self, position: Point3<f32>, target: Point3<f32>) {
        self.position = position;
        self.mode = CameraMode::ThirdPerson;
        self.pitch = 0.0;
        self.yaw = 0.0;
        self.roll = 0.0;
        self.direction = target.to_vec();
        self.refresh();
    }

    fn refresh(&mut self) {
        let roll = self.roll.to_radians();
        self.up = Vector3::new(-roll.sin(), roll.cos(), 0.0);
        if self.mode == CameraMode::FirstPerson {
            let (pitch, yaw) = (self.pitch.to_radians(), self.yaw.to_radians());
            self.direction = Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
        }
        self.moved = true;
    }
}
