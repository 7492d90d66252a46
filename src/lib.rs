//! pose-ngin
//!
//! Hierarchical posing and procedural animation for hand-authored rigs. A rig
//! is a tree of parts declared as data; the composer turns per-part pose
//! overrides into world matrices in one ordered pass, and animation drivers
//! (tweens, timed ping-pong animations, step sequences, the explode effect)
//! write those overrides every frame.
//!
//! High-level modules
//! - `animation`: tween tracks, timed animations, sequences and the explode driver
//! - `camera`: first- and third-person camera with eased moves
//! - `characters`: the Jester and the fox rigs with their behaviours
//! - `context`: configuration and per-frame context, logging setup
//! - `data_structures`: rigs, pose overrides, blocks and GPU instance packing
//! - `error`: rig construction errors
//! - `flow`: flows and the fixed-step frame loop
//! - `lighting`: the scene light and day/night cycle
//! - `render`: render composition, pass batching and depth sorting
//! - `world`: the fox's block world
//!

pub mod animation;
pub mod camera;
pub mod characters;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod lighting;
pub mod render;
pub mod world;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
