//! World building blocks.
//!
//! A `Block` is a one-by-one voxel named after its texture. Its cube sits a
//! hair inside the grid cell so neighbouring faces never z-fight.

use cgmath::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::render::{Draw, Positioned, Render, Shape, position_of};

const CELL_OFFSET: f32 = 0.501;
const HALF_SIZE: f32 = 0.499;
const DOOR_SHIFT: f32 = 0.399;
const DOOR_DEPTH: f32 = 0.1;

const LEAVES_COLOR: [f32; 4] = [0.0, 0.3, 0.0, 0.0];
const TEXTURED: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Texture name; prefixes such as `door`, `leaves` and `glass` select the block's behaviour.
    pub block: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Block {
    pub fn new(block: impl Into<String>, x: i32, y: i32, z: i32) -> Self {
        Self {
            block: block.into(),
            x,
            y,
            z,
        }
    }

    pub fn is_door(&self) -> bool {
        self.block.starts_with("door")
    }

    pub fn is_leaves(&self) -> bool {
        self.block.starts_with("leaves")
    }

    /// Leaves and glass are drawn in the transparent pass.
    pub fn is_transparent(&self) -> bool {
        self.is_leaves() || self.block.starts_with("glass")
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        let cell = Matrix4::from_translation(Vector3::new(
            self.x as f32 + CELL_OFFSET,
            self.y as f32 + CELL_OFFSET,
            self.z as f32 + CELL_OFFSET,
        ));
        if self.is_door() {
            cell * Matrix4::from_translation(Vector3::new(0.0, 0.0, DOOR_SHIFT))
                * Matrix4::from_nonuniform_scale(HALF_SIZE, HALF_SIZE, DOOR_DEPTH)
        } else {
            cell * Matrix4::from_scale(HALF_SIZE)
        }
    }

    pub fn color(&self) -> [f32; 4] {
        if self.is_leaves() { LEAVES_COLOR } else { TEXTURED }
    }

    pub fn position(&self) -> Point3<f32> {
        position_of(&self.matrix())
    }

    pub fn draw(&self, id: u32) -> Draw {
        Draw {
            id,
            label: "block",
            shape: Shape::Cube,
            matrix: self.matrix(),
            color: self.color(),
        }
    }

    pub fn render(&self, id: u32) -> Render {
        if self.is_transparent() {
            Render::Transparent(self.draw(id))
        } else {
            Render::Default(self.draw(id))
        }
    }
}

impl Positioned for Block {
    fn world_position(&self) -> Point3<f32> {
        self.position()
    }
}
