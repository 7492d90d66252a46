//! Characters built on [`crate::data_structures::rig`].
//!
//! - `jester` is the jointed humanoid with its run cycle and exploding head
//! - `fox` is the keyboard-driven cubic fox

pub mod fox;
pub mod jester;
