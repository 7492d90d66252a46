//! Rigs and hierarchical transform composition.
//!
//! A rig is a fixed tree of parts declared as data: each node names its
//! parent, the steps that shape the matrix handed down to its children, and
//! the local steps (usually a scale) that only affect the part itself. The
//! composer walks the nodes once, parents before children, so every part has
//! exactly one current matrix recomputed from the root down.

use cgmath::{Deg, InnerSpace, Matrix4, Point3, SquareMatrix, Vector3};
use log::warn;

use crate::{
    animation::tween::{TweenTrack, tween},
    data_structures::pose::{PoseOverride, PoseTable, TransformKind},
    error::RigError,
    render::{Draw, Render, Shape, position_of},
};

/// A closed set of parts making up one rig.
///
/// Implemented by enums declared with [`rig_parts!`]; an invalid part can
/// only come from a string lookup, which fails with [`RigError::UnknownPart`].
pub trait PartId: Copy + Eq + std::fmt::Debug + 'static {
    const ALL: &'static [Self];

    fn index(self) -> usize;

    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Result<Self, RigError> {
        Self::ALL
            .iter()
            .copied()
            .find(|part| part.name() == name)
            .ok_or_else(|| RigError::UnknownPart(name.to_string()))
    }
}

/// Declares a part enum and its [`PartId`] implementation.
///
/// ```ignore
/// rig_parts! {
///     pub enum ArmPart {
///         Shoulder => "shoulder",
///         Elbow => "elbow",
///     }
/// }
/// ```
#[macro_export]
macro_rules! rig_parts {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::data_structures::rig::PartId for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn index(self) -> usize {
                self as usize
            }

            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }
    };
}

/// How a pose rotation override is turned into a matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationMode {
    /// Rotate around X, then Y, then Z by the override's degrees.
    EulerXyz,
    /// Treat the override as a rotation vector: direction is the axis, length the degrees.
    AxisAngle,
}

/// One matrix operation of a node. Fixed steps are rest geometry, `Pose*`
/// steps read the part's override and are skipped while it is inactive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    Translate(Vector3<f32>),
    Rotate { degrees: f32, axis: Vector3<f32> },
    Scale(Vector3<f32>),
    PoseRotation(RotationMode),
    PoseTranslation,
    PoseScale,
}

impl Step {
    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        Step::Translate(Vector3::new(x, y, z))
    }

    pub fn rotate(degrees: f32, x: f32, y: f32, z: f32) -> Self {
        Step::Rotate {
            degrees,
            axis: Vector3::new(x, y, z),
        }
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Step::Scale(Vector3::new(x, y, z))
    }

    pub fn uniform_scale(s: f32) -> Self {
        Step::Scale(Vector3::new(s, s, s))
    }

    /// Post-multiplies `m` by this step.
    pub fn apply(&self, m: &mut Matrix4<f32>, pose: &PoseOverride) {
        match *self {
            Step::Translate(v) => *m = *m * Matrix4::from_translation(v),
            Step::Rotate { degrees, axis } => rotate(m, degrees, axis),
            Step::Scale(s) => *m = *m * Matrix4::from_nonuniform_scale(s.x, s.y, s.z),
            Step::PoseRotation(mode) => {
                if pose.is_active(TransformKind::Rotation) {
                    let r = pose.rotation;
                    match mode {
                        RotationMode::EulerXyz => {
                            *m = *m
                                * Matrix4::from_angle_x(Deg(r.x))
                                * Matrix4::from_angle_y(Deg(r.y))
                                * Matrix4::from_angle_z(Deg(r.z));
                        }
                        RotationMode::AxisAngle => rotate(m, r.magnitude(), r),
                    }
                }
            }
            Step::PoseTranslation => {
                if pose.is_active(TransformKind::Translation) {
                    *m = *m * Matrix4::from_translation(pose.translation);
                }
            }
            Step::PoseScale => {
                if pose.is_active(TransformKind::Scale) {
                    let s = pose.scale;
                    *m = *m * Matrix4::from_nonuniform_scale(s.x, s.y, s.z);
                }
            }
        }
    }
}

fn rotate(m: &mut Matrix4<f32>, degrees: f32, axis: Vector3<f32>) {
    if degrees == 0.0 {
        return;
    }
    if axis.magnitude2() == 0.0 {
        warn!("ignoring rotation of {} degrees around a zero-length axis", degrees);
        return;
    }
    *m = *m * Matrix4::from_axis_angle(axis.normalize(), Deg(degrees));
}

/// Declarative description of one part of a rig.
#[derive(Clone, Debug)]
pub struct NodeDef<P: PartId> {
    pub part: P,
    pub parent: Option<P>,
    /// Steps whose result is inherited by children.
    pub steps: Vec<Step>,
    /// Steps applied after the children's matrix has been captured.
    pub local: Vec<Step>,
    pub shape: Shape,
    pub color: [f32; 4],
}

impl<P: PartId> NodeDef<P> {
    /// A node attached directly to the rig's root matrix.
    pub fn root(part: P) -> Self {
        Self {
            part,
            parent: None,
            steps: Vec::new(),
            local: Vec::new(),
            shape: Shape::Cube,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    pub fn child(part: P, parent: P) -> Self {
        Self {
            parent: Some(parent),
            ..Self::root(part)
        }
    }

    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn local(mut self, step: Step) -> Self {
        self.local.push(step);
        self
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }
}

/// A validated rig with its pose table and the matrices of the last composition.
#[derive(Clone, Debug)]
pub struct Rig<P: PartId> {
    nodes: Vec<NodeDef<P>>,
    pose: PoseTable<P>,
    /// Matrix inherited by children (before local steps), indexed by part.
    branches: Vec<Matrix4<f32>>,
    /// Final matrix of each part, indexed by part.
    matrices: Vec<Matrix4<f32>>,
    root: Matrix4<f32>,
}

impl<P: PartId> Rig<P> {
    /// Validates the node definitions and composes the rest pose.
    ///
    /// Nodes are composed in the order given, so every parent must be defined
    /// before its children; this also rules out cycles.
    pub fn new(nodes: Vec<NodeDef<P>>) -> Result<Self, RigError> {
        let mut seen = vec![false; P::ALL.len()];
        for node in &nodes {
            if let Some(parent) = node.parent {
                if parent == node.part {
                    return Err(RigError::SelfParent(node.part.name()));
                }
                if !seen[parent.index()] {
                    return Err(RigError::ParentNotDeclared {
                        part: node.part.name(),
                        parent: parent.name(),
                    });
                }
            }
            if seen[node.part.index()] {
                return Err(RigError::DuplicatePart(node.part.name()));
            }
            seen[node.part.index()] = true;
        }
        if let Some(missing) = P::ALL.iter().find(|part| !seen[part.index()]) {
            return Err(RigError::MissingPart(missing.name()));
        }

        let identity = Matrix4::identity();
        let mut rig = Self {
            nodes,
            pose: PoseTable::new(),
            branches: vec![identity; P::ALL.len()],
            matrices: vec![identity; P::ALL.len()],
            root: identity,
        };
        rig.compose(identity);
        Ok(rig)
    }

    pub fn pose(&self) -> &PoseTable<P> {
        &self.pose
    }

    /// Mutable access to the overrides. Changes take effect on the next [`Rig::compose`].
    pub fn pose_mut(&mut self) -> &mut PoseTable<P> {
        &mut self.pose
    }

    pub fn nodes(&self) -> &[NodeDef<P>] {
        &self.nodes
    }

    pub fn root(&self) -> Matrix4<f32> {
        self.root
    }

    /// Recomputes every part's matrix from `root` down in definition order.
    ///
    /// A child always starts from its parent's matrix as it was before the
    /// parent's local steps, so scaling a part never moves its children.
    pub fn compose(&mut self, root: Matrix4<f32>) {
        self.root = root;
        for node in &self.nodes {
            let pose = self.pose.get(node.part);
            let mut m = match node.parent {
                Some(parent) => self.branches[parent.index()],
                None => root,
            };
            for step in &node.steps {
                step.apply(&mut m, pose);
            }
            self.branches[node.part.index()] = m;
            for step in &node.local {
                step.apply(&mut m, pose);
            }
            self.matrices[node.part.index()] = m;
        }
    }

    /// Recomposes with the current root.
    pub fn recompose(&mut self) {
        self.compose(self.root);
    }

    /// Writes every track's value for `seconds` into the pose, then recomposes.
    pub fn animate(&mut self, tracks: &[TweenTrack<P>], seconds: f32) {
        tween(&mut self.pose, tracks, seconds);
        self.recompose();
    }

    pub fn world_matrix(&self, part: P) -> Matrix4<f32> {
        self.matrices[part.index()]
    }

    /// The matrix handed to the part's children.
    pub fn branch_matrix(&self, part: P) -> Matrix4<f32> {
        self.branches[part.index()]
    }

    pub fn position(&self, part: P) -> Point3<f32> {
        position_of(&self.matrices[part.index()])
    }

    /// One draw per part, in definition order.
    pub fn draws(&self) -> Vec<Draw> {
        self.nodes
            .iter()
            .map(|node| Draw {
                id: node.part.index() as u32,
                label: node.part.name(),
                shape: node.shape,
                matrix: self.matrices[node.part.index()],
                color: node.color,
            })
            .collect()
    }

    pub fn render(&self) -> Render {
        Render::Defaults(self.draws())
    }
}
