//! Construction-time errors for rigs and data-driven animation tracks.

use thiserror::Error;

/// Everything that can go wrong while assembling a rig from node definitions
/// or resolving named parts.
///
/// All of these surface when a rig or track list is built, never while posing
/// or composing transforms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RigError {
    #[error("part `{0}` is defined more than once")]
    DuplicatePart(&'static str),

    #[error("part `{0}` has no node definition")]
    MissingPart(&'static str),

    #[error("part `{part}` references parent `{parent}` before it is defined")]
    ParentNotDeclared {
        part: &'static str,
        parent: &'static str,
    },

    #[error("part `{0}` cannot be its own parent")]
    SelfParent(&'static str),

    #[error("unknown part name `{0}`")]
    UnknownPart(String),
}
