#![allow(dead_code)]

use std::time::Duration;

use approx::assert_abs_diff_eq;
use pose_ngin::{
    Matrix4, Point3, Vector3,
    context::Context,
    flow::Flow,
    render::{Draw, Render, Shape},
    rig_parts,
};

rig_parts! {
    pub enum ArmPart {
        Shoulder => "shoulder",
        Elbow => "elbow",
        Hand => "hand",
    }
}

pub(crate) struct State {
    init_invocations: u32,
    update_invocations: u32,
}

impl State {
    pub fn new() -> Self {
        Self {
            init_invocations: 0,
            update_invocations: 0,
        }
    }

    pub fn init(&mut self) {
        self.init_invocations += 1;
    }

    pub fn update(&mut self) {
        self.update_invocations += 1;
    }

    pub fn init_invocations(&self) -> u32 {
        self.init_invocations
    }

    pub fn update_invocations(&self) -> u32 {
        self.update_invocations
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// Flow that counts its lifecycle calls and renders one opaque cube.
pub(crate) struct CountingFlow {
    pub updates: u32,
    pub last_dt: Duration,
}

impl CountingFlow {
    pub fn new() -> Self {
        Self {
            updates: 0,
            last_dt: Duration::from_secs(0),
        }
    }
}

impl Flow<State> for CountingFlow {
    fn on_init(&mut self, _: &mut Context, state: &mut State) {
        state.init();
    }

    fn on_update(&mut self, _: &Context, state: &mut State, dt: Duration) {
        self.updates += 1;
        self.last_dt = dt;
        state.update();
    }

    fn on_render(&self) -> Render {
        Render::Default(cube_at("counter", 0.0, 0.0, 0.0))
    }
}

pub fn cube_at(label: &'static str, x: f32, y: f32, z: f32) -> Draw {
    Draw {
        id: 0,
        label,
        shape: Shape::Cube,
        matrix: Matrix4::from_translation(Vector3::new(x, y, z)),
        color: [1.0, 1.0, 1.0, 1.0],
    }
}

pub fn assert_point_eq(actual: Point3<f32>, expected: Point3<f32>) {
    assert_abs_diff_eq!(actual.x, expected.x, epsilon = 1e-4);
    assert_abs_diff_eq!(actual.y, expected.y, epsilon = 1e-4);
    assert_abs_diff_eq!(actual.z, expected.z, epsilon = 1e-4);
}

pub fn assert_matrix_eq(actual: Matrix4<f32>, expected: Matrix4<f32>, epsilon: f32) {
    let a: [[f32; 4]; 4] = actual.into();
    let e: [[f32; 4]; 4] = expected.into();
    for (col_a, col_e) in a.iter().zip(e.iter()) {
        for (x, y) in col_a.iter().zip(col_e.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = epsilon);
        }
    }
}
