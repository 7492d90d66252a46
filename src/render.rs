//! Render composition and pass batching.
//!
//! This module defines the [`Render`] enum, which rigs and scenes use to say
//! what should be drawn this frame. The frame loop flattens a `Render` into
//! two passes: opaque draws first, then transparent draws ordered back to
//! front relative to the camera.
//!
//! # Key types
//!
//! - [`Draw`] is one part of one object: shape tag, model matrix and colour
//! - [`Render`] composes draws into opaque / transparent batches
//! - [`DrawTarget`] receives the flattened draws; [`DrawList`] records them
//! - [`UploadCache`] skips re-uploading data identical to the last upload
//!

use std::{cmp::Ordering, collections::HashMap, hash::Hash};

use cgmath::{InnerSpace, Matrix4, Point3, Vector3};

/// Geometry tag of a part. Mesh generation lives with the backend; the rig only
/// says which primitive a part is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Cube,
    Sphere,
    Icosahedron,
    Prism { sides: u8 },
    Pyramid { sides: u8 },
    ClownHead,
}

/// A single draw call: one shape with its own model matrix and colour.
#[derive(Clone, Debug, PartialEq)]
pub struct Draw {
    pub id: u32,
    pub label: &'static str,
    pub shape: Shape,
    pub matrix: Matrix4<f32>,
    pub color: [f32; 4],
}

impl Draw {
    /// World position of the draw's origin (translation column of its matrix).
    pub fn position(&self) -> Point3<f32> {
        position_of(&self.matrix)
    }
}

pub fn position_of(matrix: &Matrix4<f32>) -> Point3<f32> {
    Point3::new(matrix.w.x, matrix.w.y, matrix.w.z)
}

/// Which pass a draw is submitted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    Opaque,
    Transparent,
}

/// Specifies how a scene object should be rendered.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Default(Draw)` renders a single opaque draw
/// - `Defaults(Vec<Draw>)` renders a batch of opaque draws in order
/// - `Transparent(Draw)` renders a single transparent draw
/// - `Transparents(Vec<Draw>)` renders a batch of transparent draws
/// - `Composed(Vec<Render>)` recursively renders a composition of renders
///
pub enum Render {
    None,
    Default(Draw),
    Defaults(Vec<Draw>),
    Transparent(Draw),
    Transparents(Vec<Draw>),
    Composed(Vec<Render>),
}

impl Render {
    pub(crate) fn set_pipelines(self, basics: &mut Vec<Draw>, trans: &mut Vec<Draw>) {
        match self {
            Render::Default(draw) => basics.push(draw),
            Render::Defaults(mut vec) => basics.append(&mut vec),
            Render::Transparent(draw) => trans.push(draw),
            Render::Transparents(mut vec) => trans.append(&mut vec),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(basics, trans)),
            Render::None => (),
        }
    }

    /// Flattens the render and submits it to `target`: opaque draws in
    /// submission order, then transparent draws farthest-from-camera first.
    pub fn submit(self, camera: Point3<f32>, target: &mut dyn DrawTarget) {
        let mut basics = Vec::new();
        let mut trans = Vec::new();
        self.set_pipelines(&mut basics, &mut trans);
        sort_back_to_front(camera, &mut trans);
        for draw in &basics {
            target.draw(Pass::Opaque, draw);
        }
        for draw in &trans {
            target.draw(Pass::Transparent, draw);
        }
    }
}

impl Default for Render {
    fn default() -> Self {
        Render::None
    }
}

/// Anything with a world position can be depth-sorted.
pub trait Positioned {
    fn world_position(&self) -> Point3<f32>;
}

impl Positioned for Draw {
    fn world_position(&self) -> Point3<f32> {
        self.position()
    }
}

impl Positioned for Point3<f32> {
    fn world_position(&self) -> Point3<f32> {
        *self
    }
}

/// Sorts `items` in descending distance from `camera` so blending composes back to front.
pub fn sort_back_to_front<T: Positioned>(camera: Point3<f32>, items: &mut [T]) {
    let distance = |item: &T| -> f32 {
        let delta: Vector3<f32> = item.world_position() - camera;
        delta.magnitude()
    };
    items.sort_by(|a, b| {
        distance(b)
            .partial_cmp(&distance(a))
            .unwrap_or(Ordering::Equal)
    });
}

/// Consumer of flattened draws, usually a GPU backend.
pub trait DrawTarget {
    fn draw(&mut self, pass: Pass, draw: &Draw);
}

/// A `DrawTarget` that records every draw, for headless runs and inspection.
#[derive(Debug, Default)]
pub struct DrawList {
    pub draws: Vec<(Pass, Draw)>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.draws.clear();
    }

    pub fn labels(&self, pass: Pass) -> Vec<&'static str> {
        self.draws
            .iter()
            .filter(|(p, _)| *p == pass)
            .map(|(_, draw)| draw.label)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

impl DrawTarget for DrawList {
    fn draw(&mut self, pass: Pass, draw: &Draw) {
        self.draws.push((pass, draw.clone()));
    }
}

/// Remembers the last data uploaded per key (for example per shape kind) so
/// that identical consecutive uploads can be skipped.
#[derive(Debug)]
pub struct UploadCache<K: Eq + Hash, T: PartialEq + Clone> {
    last: HashMap<K, Vec<T>>,
    skipped: usize,
}

impl<K: Eq + Hash, T: PartialEq + Clone> UploadCache<K, T> {
    pub fn new() -> Self {
        Self {
            last: HashMap::new(),
            skipped: 0,
        }
    }

    /// Returns `true` and remembers `data` if it differs from the last upload for `key`.
    pub fn needs_upload(&mut self, key: K, data: &[T]) -> bool {
        match self.last.get(&key) {
            Some(previous) if previous.as_slice() == data => {
                self.skipped += 1;
                false
            }
            _ => {
                self.last.insert(key, data.to_vec());
                true
            }
        }
    }

    pub fn invalidate(&mut self, key: &K) {
        self.last.remove(key);
    }

    /// Number of uploads avoided so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<K: Eq + Hash, T: PartialEq + Clone> Default for UploadCache<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
