//! Per-part pose overrides.
//!
//! A pose override is the deviation of one part from its rest transform:
//! a rotation (degrees per axis), a translation and a scale. Each channel
//! keeps an "active" flag so the composer can skip untouched channels.

use std::marker::PhantomData;

use cgmath::Vector3;

use crate::data_structures::rig::PartId;

/// One of the three cartesian axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn unit(self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::unit_x(),
            Axis::Y => Vector3::unit_y(),
            Axis::Z => Vector3::unit_z(),
        }
    }
}

/// Which channel of a pose override a value is written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TransformKind {
    Rotation,
    Translation,
    Scale,
}

impl TransformKind {
    /// The identity value of the channel: 0 for rotation and translation, 1 for scale.
    pub fn identity(self) -> f32 {
        match self {
            TransformKind::Rotation | TransformKind::Translation => 0.0,
            TransformKind::Scale => 1.0,
        }
    }
}

fn component_mut(v: &mut Vector3<f32>, axis: Axis) -> &mut f32 {
    match axis {
        Axis::X => &mut v.x,
        Axis::Y => &mut v.y,
        Axis::Z => &mut v.z,
    }
}

fn component(v: &Vector3<f32>, axis: Axis) -> f32 {
    match axis {
        Axis::X => v.x,
        Axis::Y => v.y,
        Axis::Z => v.z,
    }
}

/// The override of a single part.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseOverride {
    /// Degrees around X, Y and Z.
    pub rotation: Vector3<f32>,
    pub translation: Vector3<f32>,
    pub scale: Vector3<f32>,
    rotated: bool,
    translated: bool,
    scaled: bool,
}

impl PoseOverride {
    pub fn new() -> Self {
        Self {
            rotation: Vector3::new(0.0, 0.0, 0.0),
            translation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotated: false,
            translated: false,
            scaled: false,
        }
    }

    pub fn get(&self, kind: TransformKind, axis: Axis) -> f32 {
        match kind {
            TransformKind::Rotation => component(&self.rotation, axis),
            TransformKind::Translation => component(&self.translation, axis),
            TransformKind::Scale => component(&self.scale, axis),
        }
    }

    /// Overwrites one axis of one channel and refreshes that channel's active flag.
    pub fn set(&mut self, kind: TransformKind, axis: Axis, value: f32) {
        let channel = match kind {
            TransformKind::Rotation => &mut self.rotation,
            TransformKind::Translation => &mut self.translation,
            TransformKind::Scale => &mut self.scale,
        };
        *component_mut(channel, axis) = value;
        self.refresh(kind);
    }

    pub fn set_all(&mut self, kind: TransformKind, value: Vector3<f32>) {
        match kind {
            TransformKind::Rotation => self.rotation = value,
            TransformKind::Translation => self.translation = value,
            TransformKind::Scale => self.scale = value,
        }
        self.refresh(kind);
    }

    pub fn is_active(&self, kind: TransformKind) -> bool {
        match kind {
            TransformKind::Rotation => self.rotated,
            TransformKind::Translation => self.translated,
            TransformKind::Scale => self.scaled,
        }
    }

    /// True if any channel deviates from the rest transform.
    pub fn is_posed(&self) -> bool {
        self.rotated || self.translated || self.scaled
    }

    fn refresh(&mut self, kind: TransformKind) {
        let identity = kind.identity();
        let (channel, flag) = match kind {
            TransformKind::Rotation => (self.rotation, &mut self.rotated),
            TransformKind::Translation => (self.translation, &mut self.translated),
            TransformKind::Scale => (self.scale, &mut self.scaled),
        };
        *flag = Axis::ALL
            .iter()
            .any(|&axis| component(&channel, axis) != identity);
    }
}

impl Default for PoseOverride {
    fn default() -> Self {
        Self::new()
    }
}

/// Flat table of overrides, one per part of the rig `P`.
#[derive(Clone, Debug, PartialEq)]
pub struct PoseTable<P: PartId> {
    overrides: Vec<PoseOverride>,
    _parts: PhantomData<P>,
}

impl<P: PartId> PoseTable<P> {
    pub fn new() -> Self {
        Self {
            overrides: vec![PoseOverride::new(); P::ALL.len()],
            _parts: PhantomData,
        }
    }

    pub fn get(&self, part: P) -> &PoseOverride {
        &self.overrides[part.index()]
    }

    pub fn get_mut(&mut self, part: P) -> &mut PoseOverride {
        &mut self.overrides[part.index()]
    }

    pub fn set(&mut self, part: P, kind: TransformKind, axis: Axis, value: f32) {
        self.get_mut(part).set(kind, axis, value);
    }

    pub fn set_rotation(&mut self, part: P, degrees: f32, axis: Axis) {
        self.set(part, TransformKind::Rotation, axis, degrees);
    }

    pub fn set_translation(&mut self, part: P, value: f32, axis: Axis) {
        self.set(part, TransformKind::Translation, axis, value);
    }

    pub fn set_translation_xyz(&mut self, part: P, x: f32, y: f32, z: f32) {
        self.get_mut(part)
            .set_all(TransformKind::Translation, Vector3::new(x, y, z));
    }

    pub fn set_scale(&mut self, part: P, value: f32, axis: Axis) {
        self.set(part, TransformKind::Scale, axis, value);
    }

    pub fn set_uniform_scale(&mut self, part: P, value: f32) {
        self.get_mut(part)
            .set_all(TransformKind::Scale, Vector3::new(value, value, value));
    }

    pub fn reset_part(&mut self, part: P) {
        *self.get_mut(part) = PoseOverride::new();
    }

    pub fn reset(&mut self) {
        self.overrides.iter_mut().for_each(|o| *o = PoseOverride::new());
    }

    /// Parts that currently deviate from their rest transform.
    pub fn posed_parts(&self) -> impl Iterator<Item = P> + '_ {
        P::ALL
            .iter()
            .copied()
            .filter(|part| self.get(*part).is_posed())
    }
}

impl<P: PartId> Default for PoseTable<P> {
    fn default() -> Self {
        Self::new()
    }
}
