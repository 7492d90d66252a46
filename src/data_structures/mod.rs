//! Engine data structures: rigs, pose overrides, blocks and instances.
//!
//! - `rig` holds declarative rigs and the transform composer
//! - `pose` holds per-part pose overrides
//! - `block` is a one-by-one world voxel
//! - `instance` packs draws into GPU instance buffers

pub mod block;
pub mod instance;
pub mod pose;
pub mod rig;
