//! The fox's world: blocks, the day/night cycle and a camera.
//!
//! While the fox moves or jumps the camera eases into place behind it.
//! Transparent blocks are re-sorted whenever the camera has moved.

use cgmath::{MetricSpace, Point3};
use instant::Duration;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    camera::{Camera, EASE_TIME},
    characters::fox::{Fox, FoxPart},
    context::Context,
    data_structures::block::Block,
    error::RigError,
    flow::Flow,
    lighting::{DayNightCycle, Light},
    data_structures::rig::PartId,
    render::{Render, position_of, sort_back_to_front},
};

/// Horizontal distance of the follow camera behind the fox.
const FOLLOW_DISTANCE: f32 = 3.0;
const FOLLOW_HEIGHT: f32 = 1.0;

/// Block layout as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub opaque: Vec<Block>,
    #[serde(default)]
    pub transparent: Vec<Block>,
}

impl Layout {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub struct World {
    pub fox: Fox,
    opaque: Vec<Block>,
    /// Kept sorted back to front for the current camera.
    transparent: Vec<Block>,
    pub light: Light,
    pub cycle: DayNightCycle,
    camera: Camera,
    /// Rebuild the cycle from the config on init.
    cycle_from_config: bool,
}

impl World {
    /// A world that keeps `cycle` as given, whatever the config says.
    pub fn new(fox: Fox, cycle: DayNightCycle) -> Self {
        Self {
            fox,
            opaque: Vec::new(),
            transparent: Vec::new(),
            light: Light::default(),
            cycle,
            camera: Camera::default(),
            cycle_from_config: false,
        }
    }

    /// A world whose cycle follows `day_length` and `orbit_radius` of the config it is initialised with.
    pub fn with_defaults() -> Result<Self, RigError> {
        let config = Context::default().config;
        let mut world = Self::new(
            Fox::new()?,
            DayNightCycle::new(config.day_length, config.orbit_radius),
        );
        world.cycle_from_config = true;
        Ok(world)
    }

    /// Adds a block to the pass its material needs.
    pub fn add_block(&mut self, block: Block) {
        if block.is_transparent() {
            self.transparent.push(block);
            sort_back_to_front(self.camera.position(), &mut self.transparent);
        } else {
            self.opaque.push(block);
        }
    }

    /// Adds every block of `layout`; each block's own material decides its pass.
    pub fn load_layout(&mut self, layout: Layout) {
        let count = layout.opaque.len() + layout.transparent.len();
        for block in layout.opaque.into_iter().chain(layout.transparent) {
            if block.is_transparent() {
                self.transparent.push(block);
            } else {
                self.opaque.push(block);
            }
        }
        sort_back_to_front(self.camera.position(), &mut self.transparent);
        info!("loaded {} blocks", count);
    }

    pub fn opaque_blocks(&self) -> &[Block] {
        &self.opaque
    }

    pub fn transparent_blocks(&self) -> &[Block] {
        &self.transparent
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Direct camera control; transparent blocks follow on the next update.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Moves the camera and re-sorts the transparent blocks if it actually moved.
    pub fn set_camera(&mut self, position: Point3<f32>) {
        if position == self.camera.position() {
            return;
        }
        self.camera.move_to(position);
        self.resort_if_camera_moved();
    }

    fn resort_if_camera_moved(&mut self) {
        if self.camera.take_moved() {
            sort_back_to_front(self.camera.position(), &mut self.transparent);
            debug!("camera at {:?}", self.camera.position());
        }
    }

    /// Where a camera trailing the fox should be: behind it and slightly above.
    pub fn follow_fox(&self) -> Point3<f32> {
        let alpha = (-(self.fox.rotation() + 90.0)).to_radians();
        let fox = position_of(&self.fox.root_matrix());
        Point3::new(
            fox.x + alpha.cos() * FOLLOW_DISTANCE,
            fox.y + FOLLOW_HEIGHT,
            fox.z + alpha.sin() * FOLLOW_DISTANCE,
        )
    }

    /// Eases the camera behind the fox and turns it to face the fox's heading.
    pub fn follow(&mut self, dt: f32) {
        let target = self.follow_fox();
        self.camera.move_to_smooth(target, dt, EASE_TIME);
        self.camera
            .head_to_smooth(0.0, 90.0 - self.fox.rotation(), 0.0, dt, EASE_TIME);
    }

    /// Distance from the camera to the fox.
    pub fn fox_distance(&self) -> f32 {
        self.camera.position().distance(position_of(&self.fox.root_matrix()))
    }

    pub fn update(&mut self, dt: f32) {
        self.cycle.update(dt, &mut self.light);
        self.fox.update(dt);
        if self.fox.is_moving() || self.fox.is_jumping() {
            self.follow(dt);
        } else {
            self.camera.reset_moving_animation();
            self.camera.reset_heading_animation();
        }
        self.resort_if_camera_moved();
    }

    /// Blocks are numbered after the fox's parts so every draw id in a frame is unique.
    pub fn render(&self) -> Render {
        let mut renders = vec![self.fox.render()];
        let mut id = FoxPart::ALL.len() as u32;
        let mut next = |block: &Block| {
            let render = block.render(id);
            id += 1;
            render
        };
        renders.extend(self.opaque.iter().map(&mut next));
        renders.extend(self.transparent.iter().map(&mut next));
        Render::Composed(renders)
    }
}

impl<S> Flow<S> for World {
    fn on_init(&mut self, ctx: &mut Context, state: &mut S) {
        if self.cycle_from_config {
            self.cycle = DayNightCycle::new(ctx.config.day_length, ctx.config.orbit_radius);
        }
        self.fox.on_init(ctx, state);
        self.set_camera(ctx.camera);
    }

    fn on_update(&mut self, _: &Context, _: &mut S, dt: Duration) {
        self.update(dt.as_secs_f32());
    }

    fn on_render(&self) -> Render {
        self.render()
    }

    fn camera(&self) -> Option<Point3<f32>> {
        Some(self.camera.position())
    }
}
