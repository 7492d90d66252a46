//! Procedural animation drivers.
//!
//! - `tween` holds stateless time-to-value tracks written into pose overrides
//! - `timed` holds self-clocked one-shot and ping-pong animations
//! - `sequence` chains timed animations into a linear state machine
//! - `explode` is the replayable explode effect
//! - `rng` is the seeded generator behind it

pub mod explode;
pub mod rng;
pub mod sequence;
pub mod timed;
pub mod tween;
