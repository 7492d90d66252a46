//! The Jester's exploding head.
//!
//! The head swells from 1x to 4x over a fixed countdown while jittering, then
//! vanishes, and after a short pause the effect ends. State is an explicit
//! value threaded through [`explode_step`], so a run is replayable from its seed.

use cgmath::Vector3;

use crate::animation::rng::LcgRng;

/// Timer increment per step.
pub const EXPLODE_TICK: f32 = 0.01;
/// Timer value at which the head stops growing and disappears.
pub const EXPLODE_COUNTDOWN: f32 = 10.0;
/// Timer value after which the effect is over.
pub const EXPLODE_END: f32 = 14.0;
pub const EXPLODE_MIN_SCALE: f32 = 1.0;
pub const EXPLODE_MAX_SCALE: f32 = 4.0;
/// Largest head offset on each axis while shaking.
pub const EXPLODE_JITTER: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplodeState {
    pub timer: f32,
    rng: LcgRng,
}

impl ExplodeState {
    pub fn new(seed: u64) -> Self {
        Self {
            timer: 0.0,
            rng: LcgRng::new(seed),
        }
    }
}

/// Head pose produced by one explode step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplodeFrame {
    pub head_scale: f32,
    pub head_offset: Vector3<f32>,
    pub finished: bool,
}

/// Maps `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}

/// Advances the effect by one step.
pub fn explode_step(mut state: ExplodeState) -> (ExplodeState, ExplodeFrame) {
    state.timer += EXPLODE_TICK;
    let head_scale = if state.timer < EXPLODE_COUNTDOWN {
        remap(
            state.timer,
            0.0,
            EXPLODE_COUNTDOWN,
            EXPLODE_MIN_SCALE,
            EXPLODE_MAX_SCALE,
        )
    } else {
        0.0
    };
    let head_offset = Vector3::new(
        state.rng.next_signed() * EXPLODE_JITTER,
        state.rng.next_signed() * EXPLODE_JITTER,
        state.rng.next_signed() * EXPLODE_JITTER,
    );
    let finished = state.timer > EXPLODE_END;
    (
        state,
        ExplodeFrame {
            head_scale,
            head_offset,
            finished,
        },
    )
}
